use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::trade_store::TradeStore;
use crate::config::Config;
use crate::infrastructure::persistence::CsvJournalSink;
use crate::infrastructure::sheets::{GoogleSheetsClient, SpreadsheetSink};

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    /// Builds a store with every sink the configuration enables.
    pub fn init(config: &Config) -> Result<TradeStore> {
        let mut store = TradeStore::new();

        if config.journal.local_enabled {
            info!("Local journal at {}", config.journal.csv_path.display());
            store = store.with_sink(Arc::new(CsvJournalSink::new(config.journal.csv_path.clone())));
        }

        if config.sheets.enabled {
            info!(
                "Remote journal in spreadsheet {} (tab '{}')",
                config.sheets.spreadsheet_id, config.sheets.worksheet
            );
            let client = GoogleSheetsClient::new(&config.sheets)
                .context("Failed to initialize Google Sheets client")?;
            store = store.with_sink(Arc::new(SpreadsheetSink::new(client)));
        }

        if store.configured().is_empty() {
            anyhow::bail!(
                "No journal sink enabled: set JOURNAL_LOCAL_ENABLED=true or SHEETS_ENABLED=true"
            );
        }

        Ok(store)
    }
}
