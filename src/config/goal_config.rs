//! Goal policy configuration.
//!
//! Defaults come from the environment; a TOML file passed on the command line
//! can override any of them.

use crate::domain::journal::GoalPolicy;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Goal policy environment configuration
#[derive(Debug, Clone)]
pub struct GoalEnvConfig {
    pub baseline_equity: Decimal,
    pub daily_goal_percent: Decimal,
    pub loss_daily_goal_percent: Decimal,
    pub monthly_goal_multiplier: Decimal,
}

impl GoalEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = GoalPolicy::default();
        let config = Self {
            baseline_equity: Self::parse_decimal(
                "JOURNAL_BASELINE_EQUITY",
                defaults.baseline_equity,
            )?,
            daily_goal_percent: Self::parse_decimal(
                "JOURNAL_DAILY_GOAL_PCT",
                defaults.daily_goal_percent,
            )?,
            loss_daily_goal_percent: Self::parse_decimal(
                "JOURNAL_LOSS_DAILY_GOAL_PCT",
                defaults.loss_daily_goal_percent,
            )?,
            monthly_goal_multiplier: Self::parse_decimal(
                "JOURNAL_MONTHLY_GOAL_MULTIPLIER",
                defaults.monthly_goal_multiplier,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.baseline_equity <= Decimal::ZERO {
            anyhow::bail!(
                "JOURNAL_BASELINE_EQUITY must be positive, got {}",
                self.baseline_equity
            );
        }
        Ok(())
    }

    fn parse_decimal(key: &str, default: Decimal) -> Result<Decimal> {
        match env::var(key) {
            Ok(raw) => Decimal::from_str(raw.trim()).context(format!("Failed to parse {}", key)),
            Err(_) => Ok(default),
        }
    }

    pub fn policy(&self) -> GoalPolicy {
        GoalPolicy {
            baseline_equity: self.baseline_equity,
            daily_goal_percent: self.daily_goal_percent,
            loss_daily_goal_percent: self.loss_daily_goal_percent,
            monthly_goal_multiplier: self.monthly_goal_multiplier,
        }
    }
}

impl From<GoalPolicy> for GoalEnvConfig {
    fn from(policy: GoalPolicy) -> Self {
        Self {
            baseline_equity: policy.baseline_equity,
            daily_goal_percent: policy.daily_goal_percent,
            loss_daily_goal_percent: policy.loss_daily_goal_percent,
            monthly_goal_multiplier: policy.monthly_goal_multiplier,
        }
    }
}

/// Parses a goal policy from TOML. Keys left out keep their default value.
pub fn parse_goal_policy(content: &str) -> Result<GoalPolicy> {
    let policy: GoalPolicy =
        toml::from_str(content).context("Failed to parse goal policy TOML")?;
    GoalEnvConfig::from(policy.clone()).validate()?;
    Ok(policy)
}

pub fn load_goal_policy(path: &Path) -> Result<GoalPolicy> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read goal policy file: {}", path.display()))?;
    parse_goal_policy(&content).context(format!("Invalid goal policy file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let policy = parse_goal_policy("baseline_equity = \"25000\"\n").unwrap();
        assert_eq!(policy.baseline_equity, dec!(25000));
        assert_eq!(policy.loss_daily_goal_percent, dec!(0.7));
        assert_eq!(policy.monthly_goal_multiplier, dec!(1.14));
    }

    #[test]
    fn test_numeric_toml_values() {
        let policy = parse_goal_policy("daily_goal_percent = 1.5\n").unwrap();
        assert_eq!(policy.daily_goal_percent, dec!(1.5));
    }

    #[test]
    fn test_non_positive_baseline_rejected() {
        assert!(parse_goal_policy("baseline_equity = \"0\"\n").is_err());
    }

    #[test]
    fn test_missing_policy_file() {
        let err = load_goal_policy(Path::new("/nonexistent/policy.toml")).unwrap_err();
        assert!(err.to_string().contains("policy.toml"));
    }

    #[test]
    fn test_env_config_round_trips_policy() {
        let config = GoalEnvConfig::from(GoalPolicy::default());
        assert_eq!(config.policy(), GoalPolicy::default());
    }
}
