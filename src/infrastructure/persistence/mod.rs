pub mod csv_journal;

pub use csv_journal::CsvJournalSink;
