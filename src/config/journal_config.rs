//! Local journal configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

/// Local CSV journal environment configuration
#[derive(Debug, Clone)]
pub struct JournalEnvConfig {
    pub local_enabled: bool,
    pub csv_path: PathBuf,
}

impl Default for JournalEnvConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            csv_path: PathBuf::from("trades_journal.csv"),
        }
    }
}

impl JournalEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            local_enabled: env::var("JOURNAL_LOCAL_ENABLED")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(defaults.local_enabled),
            csv_path: env::var("JOURNAL_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_config_defaults() {
        let config = JournalEnvConfig::default();
        assert!(config.local_enabled);
        assert_eq!(config.csv_path, PathBuf::from("trades_journal.csv"));
    }
}
