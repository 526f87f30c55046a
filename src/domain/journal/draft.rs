//! Raw form input and its normalization into a [`TradeRecord`].

use super::checklist::{ApproachChecklist, Confluences};
use super::kpi::{GoalPolicy, KpiInput, compute_kpis};
use super::record::TradeRecord;
use super::types::{Pair, Timing, TradeDirection, TradeResult};
use crate::domain::errors::JournalError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// Date and `HH:MM` time entered when backfilling an older trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDateTime {
    pub date: NaiveDate,
    pub time: String,
}

/// The trade datetime that will be stored, plus the problem recovered from, if any.
#[derive(Debug)]
pub struct ResolvedDateTime {
    pub value: NaiveDateTime,
    pub warning: Option<JournalError>,
}

/// Picks `datetime_final`: the manual backfill if given, otherwise `now`.
///
/// An unreadable or out-of-range manual time falls back to midnight on the
/// given date and reports a [`JournalError::TimeParse`] warning.
pub fn resolve_datetime(manual: Option<&ManualDateTime>, now: NaiveDateTime) -> ResolvedDateTime {
    let Some(manual) = manual else {
        return ResolvedDateTime {
            value: now,
            warning: None,
        };
    };

    match parse_hh_mm(&manual.time) {
        Some(time) => ResolvedDateTime {
            value: manual.date.and_time(time),
            warning: None,
        },
        None => {
            let warning = JournalError::TimeParse {
                input: manual.time.clone(),
                fallback: NaiveTime::MIN.format("%H:%M:%S").to_string(),
            };
            warn!(input = %manual.time, "Invalid manual trade time, defaulting to midnight");
            ResolvedDateTime {
                value: manual.date.and_time(NaiveTime::MIN),
                warning: Some(warning),
            }
        }
    }
}

fn parse_hh_mm(input: &str) -> Option<NaiveTime> {
    let (hh, mm) = input.trim().split_once(':')?;
    let hh = hh.trim().parse::<u32>().ok()?;
    let mm = mm.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hh, mm, 0)
}

/// Form state as submitted: free text and optional values, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct TradeDraft {
    pub pair: String,
    pub direction: String,
    pub timing: String,
    pub screenshot_url: Option<String>,
    pub result: Option<String>,
    pub pnl: Option<Decimal>,
    pub equity: Option<Decimal>,
    pub daily_goal_percent: Option<Decimal>,
    pub comments: String,
    pub confluences: Vec<String>,
    /// `(approach number, "key=value")` pairs, in entry order.
    pub approaches: Vec<(usize, String)>,
    pub manual_datetime: Option<ManualDateTime>,
}

/// A validated record plus any problems that were recovered along the way.
#[derive(Debug)]
pub struct NormalizedTrade {
    pub record: TradeRecord,
    pub warnings: Vec<JournalError>,
}

impl TradeDraft {
    pub fn new(
        pair: impl Into<String>,
        direction: impl Into<String>,
        timing: impl Into<String>,
    ) -> Self {
        Self {
            pair: pair.into(),
            direction: direction.into(),
            timing: timing.into(),
            ..Self::default()
        }
    }

    pub fn screenshot_url(mut self, url: impl Into<String>) -> Self {
        self.screenshot_url = Some(url.into());
        self
    }

    pub fn result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn pnl(mut self, pnl: Decimal) -> Self {
        self.pnl = Some(pnl);
        self
    }

    pub fn equity(mut self, equity: Decimal) -> Self {
        self.equity = Some(equity);
        self
    }

    pub fn daily_goal_percent(mut self, pct: Decimal) -> Self {
        self.daily_goal_percent = Some(pct);
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn confluence(mut self, name: impl Into<String>) -> Self {
        self.confluences.push(name.into());
        self
    }

    /// Adds a `key=value` answer to approach `index`. Numbers outside 1 to 4
    /// are rejected by [`TradeDraft::normalize`].
    pub fn approach_entry(mut self, index: usize, entry: impl Into<String>) -> Self {
        self.approaches.push((index, entry.into()));
        self
    }

    pub fn manual_datetime(mut self, date: NaiveDate, time: impl Into<String>) -> Self {
        self.manual_datetime = Some(ManualDateTime {
            date,
            time: time.into(),
        });
        self
    }

    /// Validates the draft and builds the record to persist.
    ///
    /// `trade_number` is left at 0; the store assigns it when appending.
    /// `now` is used for `timestamp_saved` and, without a manual backfill,
    /// for `datetime_final`.
    pub fn normalize(
        &self,
        now: NaiveDateTime,
        policy: &GoalPolicy,
    ) -> Result<NormalizedTrade, JournalError> {
        let pair = Pair::from_str(&self.pair)?;
        let direction = TradeDirection::from_str(&self.direction)?;
        let timing = Timing::from_str(&self.timing)?;
        let result = self
            .result
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(TradeResult::from_str)
            .transpose()?;

        let kpis = result
            .map(|result| {
                compute_kpis(
                    &KpiInput {
                        result,
                        pnl: self.pnl.unwrap_or_default(),
                        equity: self.equity.unwrap_or(policy.baseline_equity),
                        daily_goal_percent: self
                            .daily_goal_percent
                            .unwrap_or(policy.daily_goal_percent),
                    },
                    policy,
                )
            })
            .transpose()?;

        let mut approaches: [ApproachChecklist; 4] = Default::default();
        for (index, entry) in &self.approaches {
            let checklist = index
                .checked_sub(1)
                .and_then(|i| approaches.get_mut(i))
                .ok_or_else(|| JournalError::InvalidField {
                    field: "approach",
                    value: format!("#{}: {}", index, entry),
                })?;
            checklist.set_from_entry(entry)?;
        }

        let resolved = resolve_datetime(self.manual_datetime.as_ref(), now);

        let record = TradeRecord {
            trade_number: 0,
            datetime_final: resolved.value,
            pair,
            direction,
            timing,
            screenshot_url: self
                .screenshot_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            result,
            kpis,
            comments: self.comments.trim().to_string(),
            confluences: self.confluences.iter().collect::<Confluences>(),
            approaches,
            timestamp_saved: now,
        };

        Ok(NormalizedTrade {
            record,
            warnings: resolved.warning.into_iter().collect(),
        })
    }
}
