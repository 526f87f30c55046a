use thiserror::Error;

/// Errors raised while turning form input into a journal entry or saving it.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Manual backfill time could not be read. Recovered with a default time.
    #[error("Invalid trade time '{input}': expected HH:MM, using {fallback} instead")]
    TimeParse { input: String, fallback: String },

    #[error("Invalid value for {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("No sink selected: enable the local journal or the remote spreadsheet")]
    NoSinks,

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors raised by a single sink. Each sink fails independently of the others.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{sink} sink unavailable: {reason}")]
    Unavailable { sink: String, reason: String },

    #[error("{sink} sink has an unexpected header: found [{found}]")]
    SchemaMismatch { sink: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SinkError {
    pub fn unavailable(sink: impl Into<String>, reason: impl ToString) -> Self {
        SinkError::Unavailable {
            sink: sink.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema_mismatch(sink: impl Into<String>, found: &[String]) -> Self {
        SinkError::SchemaMismatch {
            sink: sink.into(),
            found: found.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_parse_formatting() {
        let error = JournalError::TimeParse {
            input: "25:99".to_string(),
            fallback: "00:00:00".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("25:99"));
        assert!(msg.contains("00:00:00"));
    }

    #[test]
    fn test_schema_mismatch_formatting() {
        let error = SinkError::schema_mismatch("local", &["Pair".to_string(), "Trade #".to_string()]);

        let msg = error.to_string();
        assert!(msg.starts_with("local sink"));
        assert!(msg.contains("Pair, Trade #"));
    }

    #[test]
    fn test_sink_error_converts_into_journal_error() {
        let error: JournalError = SinkError::unavailable("remote", "401 Unauthorized").into();
        assert!(matches!(error, JournalError::Sink(SinkError::Unavailable { .. })));
        assert!(error.to_string().contains("401"));
    }
}
