//! Trade Record Store
//!
//! Owns the journal sinks and the trade numbering. Every save goes through
//! [`TradeStore::append`], which counts the existing records, assigns the next
//! number and writes the same serialized row to each requested sink.
//!
//! # Numbering
//!
//! The next number is the row count + 1 of the sink being written: local when
//! the save targets it, otherwise remote. Sinks left out of a save are never
//! read. Counting and writing happen under one lock, so a single store never
//! hands out the same number twice to a sink. The store also remembers the
//! last number it wrote to each sink and never goes below it.
//!
//! # Failures
//!
//! Sinks fail independently. A broken remote spreadsheet doesn't stop the local
//! write; the caller gets an [`AppendReport`] listing the outcome per sink.

use crate::domain::errors::{JournalError, SinkError};
use crate::domain::journal::{GoalPolicy, TradeDraft, TradeRecord, header_labels};
use crate::domain::repositories::{RecordSink, SinkKind};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Result of writing one record to one sink.
#[derive(Debug)]
pub struct SinkOutcome {
    pub kind: SinkKind,
    pub result: Result<(), SinkError>,
}

/// What happened to a record across all requested sinks.
#[derive(Debug)]
pub struct AppendReport {
    pub record: TradeRecord,
    pub outcomes: Vec<SinkOutcome>,
}

impl AppendReport {
    pub fn trade_number(&self) -> u64 {
        self.record.trade_number
    }

    pub fn succeeded(&self) -> Vec<SinkKind> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.kind)
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (SinkKind, &SinkError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.kind, e)))
    }

    /// Every requested sink holds the row.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_ok())
    }
}

/// A saved form submission: the per-sink report plus recovered warnings.
#[derive(Debug)]
pub struct Submission {
    pub report: AppendReport,
    pub warnings: Vec<JournalError>,
}

#[derive(Default)]
struct StoreState {
    last_assigned: BTreeMap<SinkKind, u64>,
}

#[derive(Default)]
pub struct TradeStore {
    sinks: Vec<Arc<dyn RecordSink>>,
    state: Mutex<StoreState>,
}

impl TradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink, replacing any sink of the same kind.
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sinks.retain(|s| s.kind() != sink.kind());
        self.sinks.push(sink);
        self.sinks.sort_by_key(|s| s.kind());
        self
    }

    pub fn configured(&self) -> BTreeSet<SinkKind> {
        self.sinks.iter().map(|s| s.kind()).collect()
    }

    /// The sink a save to all configured sinks is counted on.
    fn primary(&self) -> Result<&dyn RecordSink, JournalError> {
        self.sinks
            .first()
            .map(|s| s.as_ref())
            .ok_or(JournalError::NoSinks)
    }

    /// Records already persisted on the primary sink, header excluded.
    pub async fn count_existing(&self) -> Result<usize, JournalError> {
        Ok(self.primary()?.count_existing().await?)
    }

    /// Number the next save to all configured sinks will receive.
    pub async fn next_trade_number(&self) -> Result<u64, JournalError> {
        let state = self.state.lock().await;
        Self::number_on(self.primary()?, &state).await
    }

    async fn number_on(sink: &dyn RecordSink, state: &StoreState) -> Result<u64, JournalError> {
        let existing = sink.count_existing().await? as u64;
        let floor = state
            .last_assigned
            .get(&sink.kind())
            .copied()
            .unwrap_or_default();
        Ok((existing + 1).max(floor + 1))
    }

    /// Numbers `record` and appends it to every sink in `requested` that is
    /// configured on this store.
    ///
    /// The number is counted on the first requested sink (local before
    /// remote). Any `trade_number` already on the record is replaced. Counting
    /// errors abort before anything is written; sink write errors are
    /// collected in the report.
    pub async fn append(
        &self,
        mut record: TradeRecord,
        requested: &BTreeSet<SinkKind>,
    ) -> Result<AppendReport, JournalError> {
        let targets: Vec<&dyn RecordSink> = self
            .sinks
            .iter()
            .filter(|s| requested.contains(&s.kind()))
            .map(|s| s.as_ref())
            .collect();
        let Some(&counted) = targets.first() else {
            return Err(JournalError::NoSinks);
        };

        let mut state = self.state.lock().await;
        record.trade_number = Self::number_on(counted, &state).await?;

        let header = header_labels();
        let row = record.to_row();

        let mut outcomes = Vec::with_capacity(targets.len());
        for sink in targets {
            let kind = sink.kind();
            let result = sink.append_row(&header, &row).await;
            match &result {
                Ok(()) => info!(sink = %kind, trade_number = record.trade_number, "Trade saved"),
                Err(e) => error!(sink = %kind, trade_number = record.trade_number, error = %e, "Failed to save trade"),
            }
            outcomes.push(SinkOutcome { kind, result });
        }

        let report = AppendReport { record, outcomes };
        for kind in report.succeeded() {
            state.last_assigned.insert(kind, report.trade_number());
        }
        if !report.is_complete() && report.any_succeeded() {
            warn!(
                trade_number = report.trade_number(),
                "Trade saved to some sinks only; sinks may now disagree"
            );
        }

        Ok(report)
    }

    /// Normalizes a form submission and appends it.
    pub async fn submit(
        &self,
        draft: &TradeDraft,
        requested: &BTreeSet<SinkKind>,
        now: NaiveDateTime,
        policy: &GoalPolicy,
    ) -> Result<Submission, JournalError> {
        let normalized = draft.normalize(now, policy)?;
        let report = self.append(normalized.record, requested).await?;
        Ok(Submission {
            report,
            warnings: normalized.warnings,
        })
    }
}
