//! Canonical journal schema.
//!
//! Every sink writes the same columns in the same order. Both the header row
//! and each data row are produced by iterating [`Column::ALL`], so the two can
//! never drift apart.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    TradeNumber,
    DatetimeFinal,
    Pair,
    Type,
    Timing,
    ScreenshotUrl,
    Result,
    PnlUsd,
    NewEquity,
    Comments,
    DeltaPercent,
    DailyGoalPercent,
    DailyGoalValue,
    SelectedConfluences,
    ConfluencesCount,
    Approach1Data,
    Approach2Data,
    Approach3Data,
    Approach4Data,
    TimestampSaved,
}

impl Column {
    /// Canonical column order.
    pub const ALL: [Column; 20] = [
        Column::TradeNumber,
        Column::DatetimeFinal,
        Column::Pair,
        Column::Type,
        Column::Timing,
        Column::ScreenshotUrl,
        Column::Result,
        Column::PnlUsd,
        Column::NewEquity,
        Column::Comments,
        Column::DeltaPercent,
        Column::DailyGoalPercent,
        Column::DailyGoalValue,
        Column::SelectedConfluences,
        Column::ConfluencesCount,
        Column::Approach1Data,
        Column::Approach2Data,
        Column::Approach3Data,
        Column::Approach4Data,
        Column::TimestampSaved,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Internal field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Column::TradeNumber => "trade_number",
            Column::DatetimeFinal => "datetime_final",
            Column::Pair => "pair",
            Column::Type => "type",
            Column::Timing => "timing",
            Column::ScreenshotUrl => "screenshot_url",
            Column::Result => "result",
            Column::PnlUsd => "pnl_usd",
            Column::NewEquity => "new_equity",
            Column::Comments => "comments",
            Column::DeltaPercent => "delta_percent",
            Column::DailyGoalPercent => "daily_goal_percent",
            Column::DailyGoalValue => "daily_goal_value",
            Column::SelectedConfluences => "selected_confluences",
            Column::ConfluencesCount => "confluences_count",
            Column::Approach1Data => "approach1_data",
            Column::Approach2Data => "approach2_data",
            Column::Approach3Data => "approach3_data",
            Column::Approach4Data => "approach4_data",
            Column::TimestampSaved => "timestamp_saved",
        }
    }

    /// Label written in the header row of every sink.
    pub fn label(&self) -> &'static str {
        match self {
            Column::TradeNumber => "Trade #",
            Column::DatetimeFinal => "Datetime Final",
            Column::Pair => "Pair",
            Column::Type => "Type",
            Column::Timing => "Timing",
            Column::ScreenshotUrl => "Screenshot URL",
            Column::Result => "Result",
            Column::PnlUsd => "PnL (USD)",
            Column::NewEquity => "Equity final",
            Column::Comments => "Comments",
            Column::DeltaPercent => "Delta % vs 10k",
            Column::DailyGoalPercent => "Daily Goal (%)",
            Column::DailyGoalValue => "Daily Goal Value",
            Column::SelectedConfluences => "Confluences",
            Column::ConfluencesCount => "Confluences #",
            Column::Approach1Data => "Approach #1 Info",
            Column::Approach2Data => "Approach #2 Info",
            Column::Approach3Data => "Approach #3 Info",
            Column::Approach4Data => "Approach #4 Info",
            Column::TimestampSaved => "Timestamp Saved",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The header row, as display labels in canonical order.
pub fn header_labels() -> Vec<String> {
    Column::ALL.iter().map(|c| c.label().to_string()).collect()
}

/// True when `row` is exactly the canonical header.
///
/// Surrounding whitespace is ignored since spreadsheets sometimes pad cells.
pub fn is_canonical_header(row: &[String]) -> bool {
    row.len() == Column::COUNT
        && row
            .iter()
            .zip(Column::ALL.iter())
            .all(|(cell, col)| cell.trim() == col.label())
}
