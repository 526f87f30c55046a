//! Persistence Abstractions
//!
//! The journal is append-only. A sink only has to answer two questions: how
//! many records it already holds, and how to add one more row after them.
//!
//! # Design
//!
//! - `RecordSink`: an append-only destination for journal rows (CSV file,
//!   spreadsheet tab).
//! - `SheetClient`: the capability a remote spreadsheet must offer. Credential
//!   handling stays outside of it; implementations receive a ready client.
//!
//! Rows handed to a sink are already serialized in canonical column order, so
//! every sink receives byte-for-byte the same values.

use crate::domain::errors::SinkError;
use async_trait::async_trait;
use std::fmt;

/// The sinks a record can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SinkKind {
    Local,
    Remote,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Local => write!(f, "local"),
            SinkKind::Remote => write!(f, "remote"),
        }
    }
}

impl std::str::FromStr for SinkKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "csv" => Ok(SinkKind::Local),
            "remote" | "sheets" => Ok(SinkKind::Remote),
            _ => anyhow::bail!("Invalid sink: {}. Must be 'local' or 'remote'", s),
        }
    }
}

/// Append-only destination for journal rows.
#[async_trait]
pub trait RecordSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Number of data rows already stored. The header row is never counted.
    async fn count_existing(&self) -> Result<usize, SinkError>;

    /// Appends `row` after the last existing row, writing `header` first if
    /// the sink is still empty.
    async fn append_row(&self, header: &[String], row: &[String]) -> Result<(), SinkError>;
}

/// Minimal spreadsheet capability needed by the remote sink.
///
/// Rows are 1-based, as in spreadsheet notation.
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Every populated row of the worksheet, top to bottom.
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, SinkError>;

    /// Overwrites row `row` starting at the first column with `values`.
    async fn write_row_range(&self, row: usize, values: &[String]) -> Result<(), SinkError>;
}
