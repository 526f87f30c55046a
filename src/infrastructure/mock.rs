//! In-memory and failing collaborators, for tests and dry runs.

use crate::domain::errors::SinkError;
use crate::domain::repositories::{RecordSink, SheetClient, SinkKind};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Default)]
struct SheetState {
    rows: Vec<Vec<String>>,
    writes: Vec<usize>,
}

/// Spreadsheet tab held in memory. Clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemorySheet {
    state: Arc<Mutex<SheetState>>,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SheetState {
                rows,
                writes: Vec::new(),
            })),
        }
    }

    /// Snapshot of the sheet contents.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().rows.clone()
    }

    /// Row numbers written so far, in call order.
    pub fn writes(&self) -> Vec<usize> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SheetState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SheetClient for InMemorySheet {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, SinkError> {
        Ok(self.rows())
    }

    async fn write_row_range(&self, row: usize, values: &[String]) -> Result<(), SinkError> {
        if row == 0 {
            return Err(SinkError::unavailable("remote", "row numbers start at 1"));
        }
        let mut state = self.lock();
        if state.rows.len() < row {
            state.rows.resize(row, Vec::new());
        }
        state.rows[row - 1] = values.to_vec();
        state.writes.push(row);
        debug!(row, "InMemorySheet: row written");
        Ok(())
    }
}

/// Spreadsheet that can't be reached, as with revoked credentials.
#[derive(Clone)]
pub struct UnavailableSheet {
    reason: String,
}

impl UnavailableSheet {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SheetClient for UnavailableSheet {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, SinkError> {
        Err(SinkError::unavailable("remote", &self.reason))
    }

    async fn write_row_range(&self, _row: usize, _values: &[String]) -> Result<(), SinkError> {
        Err(SinkError::unavailable("remote", &self.reason))
    }
}

/// Sink that counts normally but rejects every append.
pub struct RejectingSink {
    kind: SinkKind,
    existing: usize,
}

impl RejectingSink {
    pub fn new(kind: SinkKind, existing: usize) -> Self {
        Self { kind, existing }
    }
}

#[async_trait]
impl RecordSink for RejectingSink {
    fn kind(&self) -> SinkKind {
        self.kind
    }

    async fn count_existing(&self) -> Result<usize, SinkError> {
        Ok(self.existing)
    }

    async fn append_row(&self, _header: &[String], _row: &[String]) -> Result<(), SinkError> {
        Err(SinkError::unavailable(self.kind.to_string(), "write rejected"))
    }
}
