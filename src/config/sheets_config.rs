//! Remote spreadsheet configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Google Sheets environment configuration
#[derive(Debug, Clone)]
pub struct SheetsEnvConfig {
    pub enabled: bool,
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub access_token: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl Default for SheetsEnvConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            spreadsheet_id: String::new(),
            worksheet: "Journal2024".to_string(),
            access_token: String::new(),
            api_base_url: "https://sheets.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SheetsEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            enabled: env::var("SHEETS_ENABLED")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(defaults.enabled),
            spreadsheet_id: env::var("SHEETS_SPREADSHEET_ID").unwrap_or_default(),
            worksheet: env::var("SHEETS_WORKSHEET").unwrap_or(defaults.worksheet),
            access_token: env::var("SHEETS_ACCESS_TOKEN").unwrap_or_default(),
            api_base_url: env::var("SHEETS_API_BASE_URL").unwrap_or(defaults.api_base_url),
            timeout_secs: env::var("SHEETS_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse::<u64>()
                .context("Failed to parse SHEETS_TIMEOUT_SECS")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// An enabled sheet needs somewhere to write and a token to write with.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.spreadsheet_id.trim().is_empty() {
            anyhow::bail!("SHEETS_SPREADSHEET_ID is required when SHEETS_ENABLED=true");
        }
        if self.access_token.trim().is_empty() {
            anyhow::bail!("SHEETS_ACCESS_TOKEN is required when SHEETS_ENABLED=true");
        }
        if self.worksheet.trim().is_empty() {
            anyhow::bail!("SHEETS_WORKSHEET must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sheets_need_nothing() {
        assert!(SheetsEnvConfig::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_sheets_require_id_and_token() {
        let mut config = SheetsEnvConfig {
            enabled: true,
            ..SheetsEnvConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SHEETS_SPREADSHEET_ID"));

        config.spreadsheet_id = "abc".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SHEETS_ACCESS_TOKEN"));

        config.access_token = "token".to_string();
        assert!(config.validate().is_ok());
    }
}
