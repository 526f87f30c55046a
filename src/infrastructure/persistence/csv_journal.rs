//! Local CSV journal.
//!
//! The file is opened, appended and closed on every save. Rows are encoded
//! into a buffer first and written with a single `write_all`, so a failed save
//! never leaves half a row behind.

use crate::domain::errors::SinkError;
use crate::domain::journal::is_canonical_header;
use crate::domain::repositories::{RecordSink, SinkKind};
use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub struct CsvJournalSink {
    path: Arc<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileState {
    /// Missing, empty, or blank: the header still has to be written.
    Empty,
    Populated { data_rows: usize },
}

impl CsvJournalSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn inspect(path: &Path) -> Result<FileState, SinkError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileState::Empty),
        Err(e) => return Err(e.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        None => return Ok(FileState::Empty),
        Some(first) => first?.iter().map(str::to_string).collect(),
    };
    if !is_canonical_header(&header) {
        return Err(SinkError::schema_mismatch(SinkKind::Local.to_string(), &header));
    }

    let mut data_rows = 0;
    for record in records {
        record?;
        data_rows += 1;
    }
    Ok(FileState::Populated { data_rows })
}

fn ends_with_newline(path: &Path) -> Result<bool, SinkError> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn encode_rows(rows: &[&[String]]) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(*row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SinkError::Io(e.into_error()))
}

fn append_blocking(path: &Path, header: &[String], row: &[String]) -> Result<(), SinkError> {
    let state = inspect(path)?;

    let mut bytes = match state {
        FileState::Empty => encode_rows(&[header, row])?,
        FileState::Populated { .. } => encode_rows(&[row])?,
    };
    // Hand-edited files may lack the final newline.
    if matches!(state, FileState::Populated { .. }) && !ends_with_newline(path)? {
        bytes.insert(0, b'\n');
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&bytes)?;
    file.flush()?;

    debug!(path = ?path, header_written = matches!(state, FileState::Empty), "CSV row appended");
    Ok(())
}

#[async_trait]
impl RecordSink for CsvJournalSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Local
    }

    async fn count_existing(&self) -> Result<usize, SinkError> {
        let path = Arc::clone(&self.path);
        let state = tokio::task::spawn_blocking(move || inspect(&path))
            .await
            .map_err(|e| SinkError::Io(io::Error::other(e)))??;

        Ok(match state {
            FileState::Empty => 0,
            FileState::Populated { data_rows } => data_rows,
        })
    }

    async fn append_row(&self, header: &[String], row: &[String]) -> Result<(), SinkError> {
        let path = Arc::clone(&self.path);
        let header = header.to_vec();
        let row = row.to_vec();

        tokio::task::spawn_blocking(move || append_blocking(&path, &header, &row))
            .await
            .map_err(|e| SinkError::Io(io::Error::other(e)))??;

        info!(path = ?self.path, "Trade appended to local journal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journal::header_labels;
    use tempfile::tempdir;

    fn row(values: &[&str]) -> Vec<String> {
        let mut row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        row.resize(header_labels().len(), String::new());
        row
    }

    #[tokio::test]
    async fn test_missing_file_counts_zero() {
        let dir = tempdir().unwrap();
        let sink = CsvJournalSink::new(dir.path().join("journal.csv"));
        assert_eq!(sink.count_existing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_only_file_counts_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        fs::write(&path, format!("{}\n", header_labels().join(","))).unwrap();

        let sink = CsvJournalSink::new(&path);
        assert_eq!(sink.count_existing().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let sink = CsvJournalSink::new(&path);
        let header = header_labels();

        sink.append_row(&header, &row(&["1", "2024-01-02 08:00:00"])).await.unwrap();
        sink.append_row(&header, &row(&["2", "2024-01-02 09:00:00"])).await.unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Trade #,Datetime Final,Pair"));
        assert!(lines[1].starts_with("1,2024-01-02 08:00:00,"));
        assert!(lines[2].starts_with("2,"));
        assert_eq!(contents.matches("Trade #").count(), 1);
        assert_eq!(sink.count_existing().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fields_with_delimiters_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let sink = CsvJournalSink::new(&path);

        let mut values = row(&["1"]);
        values[13] = "HTF bias, FVG".to_string();
        sink.append_row(&header_labels(), &values).await.unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"HTF bias, FVG\""));
        assert_eq!(sink.count_existing().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_trailing_newline_is_repaired() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let header = header_labels();
        let first = row(&["1"]).join(",");
        fs::write(&path, format!("{}\n{}", header.join(","), first)).unwrap();

        let sink = CsvJournalSink::new(&path);
        sink.append_row(&header, &row(&["2"])).await.unwrap();

        assert_eq!(sink.count_existing().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_foreign_header_is_rejected_and_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        fs::write(&path, "Pair,Trade #\nEURUSD,1\n").unwrap();

        let sink = CsvJournalSink::new(&path);
        let err = sink.count_existing().await.unwrap_err();
        assert!(matches!(err, SinkError::SchemaMismatch { .. }));

        let err = sink
            .append_row(&header_labels(), &row(&["2"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::SchemaMismatch { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Pair,Trade #\nEURUSD,1\n");
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journals").join("2024.csv");
        let sink = CsvJournalSink::new(&path);

        sink.append_row(&header_labels(), &row(&["1"])).await.unwrap();
        assert!(path.exists());
    }
}
