use super::checklist::{ApproachChecklist, Confluences};
use super::kpi::{TradeKpis, format_amount};
use super::schema::Column;
use super::types::{Pair, Timing, TradeDirection, TradeResult};
use chrono::NaiveDateTime;

/// Timestamp format used for both `datetime_final` and `timestamp_saved`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A normalized journal entry, ready to be appended to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub trade_number: u64,
    pub datetime_final: NaiveDateTime,
    pub pair: Pair,
    pub direction: TradeDirection,
    pub timing: Timing,
    pub screenshot_url: Option<String>,
    pub result: Option<TradeResult>,
    /// Present whenever `result` is.
    pub kpis: Option<TradeKpis>,
    pub comments: String,
    pub confluences: Confluences,
    pub approaches: [ApproachChecklist; 4],
    pub timestamp_saved: NaiveDateTime,
}

impl TradeRecord {
    /// Value of a single column. Absent optional data is an empty string.
    pub fn value(&self, column: Column) -> String {
        let kpi = |f: fn(&TradeKpis) -> String| self.kpis.as_ref().map(f).unwrap_or_default();
        match column {
            Column::TradeNumber => self.trade_number.to_string(),
            Column::DatetimeFinal => self.datetime_final.format(TIMESTAMP_FORMAT).to_string(),
            Column::Pair => self.pair.to_string(),
            Column::Type => self.direction.to_string(),
            Column::Timing => self.timing.to_string(),
            Column::ScreenshotUrl => self.screenshot_url.clone().unwrap_or_default(),
            Column::Result => self.result.map(|r| r.to_string()).unwrap_or_default(),
            Column::PnlUsd => kpi(|k| format_amount(k.pnl)),
            Column::NewEquity => kpi(|k| format_amount(k.new_equity)),
            Column::Comments => self.comments.clone(),
            Column::DeltaPercent => kpi(|k| format_amount(k.delta_percent)),
            Column::DailyGoalPercent => kpi(|k| format_amount(k.daily_goal_percent)),
            Column::DailyGoalValue => kpi(|k| format_amount(k.daily_goal_value)),
            Column::SelectedConfluences => self.confluences.serialize(),
            Column::ConfluencesCount => self.confluences.count().to_string(),
            Column::Approach1Data => self.approaches[0].serialize(),
            Column::Approach2Data => self.approaches[1].serialize(),
            Column::Approach3Data => self.approaches[2].serialize(),
            Column::Approach4Data => self.approaches[3].serialize(),
            Column::TimestampSaved => self.timestamp_saved.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// The record as one row, in canonical column order.
    pub fn to_row(&self) -> Vec<String> {
        Column::ALL.iter().map(|c| self.value(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journal::kpi::{GoalPolicy, KpiInput, compute_kpis};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn bare_record() -> TradeRecord {
        TradeRecord {
            trade_number: 7,
            datetime_final: at(8, 30),
            pair: Pair::EurUsd,
            direction: TradeDirection::Long,
            timing: Timing::Lno,
            screenshot_url: None,
            result: None,
            kpis: None,
            comments: String::new(),
            confluences: Confluences::new(),
            approaches: Default::default(),
            timestamp_saved: at(9, 0),
        }
    }

    #[test]
    fn test_missing_fields_become_empty_cells() {
        let row = bare_record().to_row();
        assert_eq!(row.len(), Column::COUNT);
        assert_eq!(row[0], "7");
        assert_eq!(row[1], "2024-03-14 08:30:00");
        assert_eq!(row[2], "EURUSD");
        assert_eq!(row[3], "Long");
        assert_eq!(row[4], "LNO");
        assert_eq!(row[5], "");
        assert_eq!(row[6], "");
        assert_eq!(row[7], "");
        assert_eq!(row[14], "0");
        assert_eq!(row[19], "2024-03-14 09:00:00");
    }

    #[test]
    fn test_kpi_columns_are_filled_from_result() {
        let mut record = bare_record();
        record.result = Some(TradeResult::Loss);
        record.kpis = Some(compute_kpis(
            &KpiInput {
                result: TradeResult::Loss,
                pnl: dec!(50),
                equity: dec!(10000),
                daily_goal_percent: dec!(1),
            },
            &GoalPolicy::default(),
        )
        .unwrap());

        assert_eq!(record.value(Column::Result), "Loss");
        assert_eq!(record.value(Column::PnlUsd), "-50");
        assert_eq!(record.value(Column::NewEquity), "9950");
        assert_eq!(record.value(Column::DeltaPercent), "-0.5");
        assert_eq!(record.value(Column::DailyGoalPercent), "0.7");
        assert_eq!(record.value(Column::DailyGoalValue), "119.65");
    }

    #[test]
    fn test_checklists_serialize_into_their_columns() {
        let mut record = bare_record();
        record.confluences = ["HTF bias", "FVG"].into_iter().collect();
        record.approaches[2].set("sweep", "yes");

        let row = record.to_row();
        assert_eq!(row[13], "HTF bias, FVG");
        assert_eq!(row[14], "2");
        assert_eq!(row[15], "");
        assert_eq!(row[17], "sweep=yes");
    }
}
