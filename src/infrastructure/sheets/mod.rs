//! Remote spreadsheet journal.

pub mod client;
pub mod sink;

pub use client::GoogleSheetsClient;
pub use sink::SpreadsheetSink;
