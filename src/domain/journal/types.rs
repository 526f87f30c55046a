use crate::domain::errors::JournalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instrument traded. Anything outside the preset list is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pair {
    EurUsd,
    GbpUsd,
    UsdJpy,
    XauUsd,
    Us30,
    BtcUsd,
    Other(String),
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pair::EurUsd => write!(f, "EURUSD"),
            Pair::GbpUsd => write!(f, "GBPUSD"),
            Pair::UsdJpy => write!(f, "USDJPY"),
            Pair::XauUsd => write!(f, "XAUUSD"),
            Pair::Us30 => write!(f, "US30"),
            Pair::BtcUsd => write!(f, "BTCUSD"),
            Pair::Other(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl FromStr for Pair {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        if symbol.is_empty() {
            return Err(JournalError::InvalidField {
                field: "pair",
                value: s.to_string(),
            });
        }
        let pair = match symbol.to_uppercase().as_str() {
            "EURUSD" => Pair::EurUsd,
            "GBPUSD" => Pair::GbpUsd,
            "USDJPY" => Pair::UsdJpy,
            "XAUUSD" => Pair::XauUsd,
            "US30" => Pair::Us30,
            "BTCUSD" => Pair::BtcUsd,
            other => Pair::Other(other.to_string()),
        };
        Ok(pair)
    }
}

/// Position direction ("Type" column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "Long"),
            TradeDirection::Short => write!(f, "Short"),
        }
    }
}

impl FromStr for TradeDirection {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(TradeDirection::Long),
            "short" | "sell" => Ok(TradeDirection::Short),
            _ => Err(JournalError::InvalidField {
                field: "type",
                value: s.to_string(),
            }),
        }
    }
}

/// Session window in which the trade was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timing {
    /// Frankfurt open
    Ffo,
    /// London open
    Lno,
    Mmm1,
    Mmm2,
    /// New York open
    Nyo,
    Nyt,
    /// London close
    Lnc,
}

impl Timing {
    pub const ALL: [Timing; 7] = [
        Timing::Ffo,
        Timing::Lno,
        Timing::Mmm1,
        Timing::Mmm2,
        Timing::Nyo,
        Timing::Nyt,
        Timing::Lnc,
    ];
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timing::Ffo => "FFO",
            Timing::Lno => "LNO",
            Timing::Mmm1 => "MMM1",
            Timing::Mmm2 => "MMM2",
            Timing::Nyo => "NYO",
            Timing::Nyt => "NYT",
            Timing::Lnc => "LNC",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Timing {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Timing::ALL
            .into_iter()
            .find(|t| t.to_string() == wanted)
            .ok_or_else(|| JournalError::InvalidField {
                field: "timing",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeResult {
    Win,
    Loss,
    BreakEven,
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeResult::Win => write!(f, "Win"),
            TradeResult::Loss => write!(f, "Loss"),
            TradeResult::BreakEven => write!(f, "BreakEven"),
        }
    }
}

impl FromStr for TradeResult {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "win" => Ok(TradeResult::Win),
            "loss" => Ok(TradeResult::Loss),
            "breakeven" | "be" => Ok(TradeResult::BreakEven),
            _ => Err(JournalError::InvalidField {
                field: "result",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parsing() {
        assert_eq!(Pair::from_str("eurusd").unwrap(), Pair::EurUsd);
        assert_eq!(Pair::from_str(" XAUUSD ").unwrap(), Pair::XauUsd);
        assert_eq!(
            Pair::from_str("nas100").unwrap(),
            Pair::Other("NAS100".to_string())
        );
        assert!(Pair::from_str("  ").is_err());
    }

    #[test]
    fn test_timing_roundtrips_through_display() {
        for timing in Timing::ALL {
            assert_eq!(Timing::from_str(&timing.to_string()).unwrap(), timing);
        }
        assert!(Timing::from_str("ASIA").is_err());
    }

    #[test]
    fn test_result_parsing_accepts_variants() {
        assert_eq!(TradeResult::from_str("Win").unwrap(), TradeResult::Win);
        assert_eq!(
            TradeResult::from_str("break-even").unwrap(),
            TradeResult::BreakEven
        );
        assert_eq!(TradeResult::from_str("BE").unwrap(), TradeResult::BreakEven);
        assert!(TradeResult::from_str("draw").is_err());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(
            TradeDirection::from_str("SHORT").unwrap(),
            TradeDirection::Short
        );
        let err = TradeDirection::from_str("sideways").unwrap_err();
        assert!(err.to_string().contains("type"));
    }
}
