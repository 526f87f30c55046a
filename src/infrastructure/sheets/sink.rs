use crate::domain::errors::SinkError;
use crate::domain::journal::is_canonical_header;
use crate::domain::repositories::{RecordSink, SheetClient, SinkKind};
use async_trait::async_trait;
use tracing::info;

/// Remote journal kept in a spreadsheet tab.
///
/// Row 1 holds the header labels; each save writes the row right after the
/// last populated one.
pub struct SpreadsheetSink<C: SheetClient> {
    client: C,
}

impl<C: SheetClient> SpreadsheetSink<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Rows currently in the sheet, with the header validated if present.
    async fn populated_rows(&self) -> Result<Vec<Vec<String>>, SinkError> {
        let rows = self.client.read_all_rows().await?;
        if let Some(header) = rows.first()
            && !is_canonical_header(header)
        {
            return Err(SinkError::schema_mismatch(SinkKind::Remote.to_string(), header));
        }
        Ok(rows)
    }
}

#[async_trait]
impl<C: SheetClient> RecordSink for SpreadsheetSink<C> {
    fn kind(&self) -> SinkKind {
        SinkKind::Remote
    }

    async fn count_existing(&self) -> Result<usize, SinkError> {
        let rows = self.populated_rows().await?;
        Ok(rows.len().saturating_sub(1))
    }

    async fn append_row(&self, header: &[String], row: &[String]) -> Result<(), SinkError> {
        let rows = self.populated_rows().await?;

        let next_row = if rows.is_empty() {
            self.client.write_row_range(1, header).await?;
            2
        } else {
            rows.len() + 1
        };

        self.client.write_row_range(next_row, row).await?;
        info!(row = next_row, "Trade appended to remote spreadsheet");
        Ok(())
    }
}
