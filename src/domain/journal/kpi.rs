//! Derived trade KPIs.
//!
//! Everything here is a pure function of the submitted result and the goal
//! policy. Money is carried as `Decimal` so percentages come out exact.

use super::types::TradeResult;
use crate::domain::errors::JournalError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Targets the daily and monthly goals are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalPolicy {
    /// Starting account equity all deltas are relative to.
    pub baseline_equity: Decimal,
    /// Daily goal percentage offered when the trader doesn't pick one.
    pub daily_goal_percent: Decimal,
    /// Daily goal percentage applied after a losing trade.
    pub loss_daily_goal_percent: Decimal,
    /// Monthly target expressed as a multiple of the baseline.
    pub monthly_goal_multiplier: Decimal,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            baseline_equity: dec!(10000),
            daily_goal_percent: dec!(1.0),
            loss_daily_goal_percent: dec!(0.7),
            monthly_goal_multiplier: dec!(1.14),
        }
    }
}

impl GoalPolicy {
    /// `None` when the product doesn't fit in a `Decimal`.
    pub fn monthly_goal_value(&self) -> Option<Decimal> {
        self.baseline_equity.checked_mul(self.monthly_goal_multiplier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiInput {
    pub result: TradeResult,
    /// Trade PnL. Only the magnitude is used; the sign comes from `result`.
    pub pnl: Decimal,
    /// Account equity before the trade.
    pub equity: Decimal,
    /// Requested daily goal, in percent.
    pub daily_goal_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeKpis {
    /// Signed PnL actually applied to equity.
    pub pnl: Decimal,
    pub new_equity: Decimal,
    pub delta_percent: Decimal,
    /// Daily goal percentage after policy overrides.
    pub daily_goal_percent: Decimal,
    pub daily_goal_value: Decimal,
    pub monthly_goal_value: Decimal,
    pub monthly_diff: Decimal,
    pub monthly_diff_percent: Decimal,
}

/// Derives the KPIs of one trade.
///
/// Fails with `InvalidField` when the amounts are too large to be represented.
pub fn compute_kpis(input: &KpiInput, policy: &GoalPolicy) -> Result<TradeKpis, JournalError> {
    let out_of_range = || JournalError::InvalidField {
        field: "amount",
        value: format!("pnl {} on equity {}", input.pnl, input.equity),
    };

    let magnitude = input.pnl.abs();
    let pnl = match input.result {
        TradeResult::Win => magnitude,
        TradeResult::Loss => -magnitude,
        TradeResult::BreakEven => Decimal::ZERO,
    };
    let new_equity = input.equity.checked_add(pnl).ok_or_else(out_of_range)?;
    let baseline = policy.baseline_equity;

    let delta_percent = new_equity
        .checked_sub(baseline)
        .and_then(|delta| percent_of(delta, baseline))
        .ok_or_else(out_of_range)?;

    // After a loss the goal resets to the policy percentage and the loss must
    // be recovered on top of it.
    let (daily_goal_percent, recovery) = match input.result {
        TradeResult::Loss => (policy.loss_daily_goal_percent, magnitude),
        TradeResult::Win | TradeResult::BreakEven => (input.daily_goal_percent, Decimal::ZERO),
    };
    let daily_goal_value = new_equity
        .checked_mul(daily_goal_percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|v| v.checked_add(recovery))
        .ok_or_else(out_of_range)?;

    let monthly_goal_value = policy.monthly_goal_value().ok_or_else(out_of_range)?;
    let monthly_diff = monthly_goal_value
        .checked_sub(new_equity)
        .ok_or_else(out_of_range)?
        .max(Decimal::ZERO);
    let monthly_diff_percent = monthly_goal_value
        .checked_sub(baseline)
        .and_then(|room| percent_of(monthly_diff, room))
        .ok_or_else(out_of_range)?;

    Ok(TradeKpis {
        pnl,
        new_equity,
        delta_percent,
        daily_goal_percent,
        daily_goal_value,
        monthly_goal_value,
        monthly_diff,
        monthly_diff_percent,
    })
}

/// `part / whole * 100`, zero when `whole` is not positive. `None` on overflow.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// Formats an amount for persistence: two decimals with halves rounded away
/// from zero, trailing zeros trimmed.
pub fn format_amount(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(result: TradeResult, pnl: Decimal) -> KpiInput {
        KpiInput {
            result,
            pnl,
            equity: dec!(10000),
            daily_goal_percent: dec!(1.0),
        }
    }

    #[test]
    fn test_win_adds_pnl_and_reports_delta() {
        let kpis = compute_kpis(&input(TradeResult::Win, dec!(50)), &GoalPolicy::default())
            .unwrap();
        assert_eq!(kpis.new_equity, dec!(10050));
        assert_eq!(kpis.delta_percent, dec!(0.5));
        assert_eq!(kpis.pnl, dec!(50));
        assert_eq!(kpis.daily_goal_percent, dec!(1.0));
        assert_eq!(kpis.daily_goal_value, dec!(100.5));
    }

    #[test]
    fn test_loss_forces_goal_percent_and_adds_recovery() {
        let kpis = compute_kpis(&input(TradeResult::Loss, dec!(50)), &GoalPolicy::default())
            .unwrap();
        assert_eq!(kpis.new_equity, dec!(9950));
        assert_eq!(kpis.daily_goal_percent, dec!(0.7));
        assert_eq!(kpis.daily_goal_value, dec!(119.65));
        assert_eq!(kpis.delta_percent, dec!(-0.5));
    }

    #[test]
    fn test_loss_uses_magnitude_of_negative_pnl() {
        let kpis = compute_kpis(&input(TradeResult::Loss, dec!(-50)), &GoalPolicy::default())
            .unwrap();
        assert_eq!(kpis.new_equity, dec!(9950));
        assert_eq!(kpis.pnl, dec!(-50));
    }

    #[test]
    fn test_break_even_keeps_equity() {
        let kpis = compute_kpis(
            &input(TradeResult::BreakEven, dec!(12)),
            &GoalPolicy::default(),
        )
        .unwrap();
        assert_eq!(kpis.new_equity, dec!(10000));
        assert_eq!(kpis.delta_percent, Decimal::ZERO);
        assert_eq!(kpis.pnl, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_goal_gap() {
        let kpis = compute_kpis(&input(TradeResult::Win, dec!(700)), &GoalPolicy::default())
            .unwrap();
        assert_eq!(kpis.monthly_goal_value, dec!(11400));
        assert_eq!(kpis.monthly_diff, dec!(700));
        assert_eq!(kpis.monthly_diff_percent, dec!(50));
    }

    #[test]
    fn test_monthly_diff_clamped_once_goal_reached() {
        let kpis = compute_kpis(&input(TradeResult::Win, dec!(2000)), &GoalPolicy::default())
            .unwrap();
        assert_eq!(kpis.monthly_diff, Decimal::ZERO);
        assert_eq!(kpis.monthly_diff_percent, Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_policy_does_not_divide_by_zero() {
        let policy = GoalPolicy {
            baseline_equity: Decimal::ZERO,
            monthly_goal_multiplier: dec!(1),
            ..GoalPolicy::default()
        };
        let kpis = compute_kpis(&input(TradeResult::Win, dec!(50)), &policy)
            .unwrap();
        assert_eq!(kpis.delta_percent, Decimal::ZERO);
        assert_eq!(kpis.monthly_diff_percent, Decimal::ZERO);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(119.650)), "119.65");
        assert_eq!(format_amount(dec!(10050.00)), "10050");
        assert_eq!(format_amount(dec!(0.500)), "0.5");
        assert_eq!(format_amount(dec!(1.23456)), "1.23");
    }

    #[test]
    fn test_format_amount_rounds_halves_away_from_zero() {
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(-0.125)), "-0.13");
        assert_eq!(format_amount(dec!(2.675)), "2.68");
        assert_eq!(format_amount(dec!(0.124)), "0.12");
    }

    #[test]
    fn test_overflowing_amounts_are_rejected() {
        let huge = KpiInput {
            result: TradeResult::Win,
            pnl: dec!(1),
            equity: Decimal::MAX,
            daily_goal_percent: dec!(1.0),
        };
        let err = compute_kpis(&huge, &GoalPolicy::default()).unwrap_err();
        assert!(matches!(err, JournalError::InvalidField { field: "amount", .. }));

        let policy = GoalPolicy {
            baseline_equity: Decimal::MAX,
            monthly_goal_multiplier: dec!(2),
            ..GoalPolicy::default()
        };
        assert!(compute_kpis(&input(TradeResult::Win, dec!(50)), &policy).is_err());
    }
}
