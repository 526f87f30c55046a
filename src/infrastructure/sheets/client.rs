//! Google Sheets v4 values API client.
//!
//! Only the two calls the journal needs: read the whole tab, and overwrite one
//! row. Authentication is a bearer access token minted elsewhere.

use crate::config::SheetsEnvConfig;
use crate::domain::errors::SinkError;
use crate::domain::repositories::{SheetClient, SinkKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct GoogleSheetsClient {
    http: Client,
    api_base_url: Url,
    spreadsheet_id: String,
    worksheet: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: [&'a [String]; 1],
}

impl GoogleSheetsClient {
    pub fn new(config: &SheetsEnvConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build Sheets HTTP client")?;
        let api_base_url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid SHEETS_API_BASE_URL: {}", config.api_base_url))?;

        Ok(Self {
            http,
            api_base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// `https://.../v4/spreadsheets/{id}/values/{range}`
    fn values_url(&self, range: &str) -> Result<Url, SinkError> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| unavailable("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    fn sheet_prefix(&self) -> String {
        quote_sheet_name(&self.worksheet)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SinkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(unavailable(format!("HTTP {}: {}", status, body.trim())))
    }
}

fn unavailable(reason: impl ToString) -> SinkError {
    SinkError::unavailable(SinkKind::Remote.to_string(), reason)
}

/// A1 sheet reference, quoted so names with spaces or quotes survive.
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Spreadsheet column letters: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 range covering `width` cells of row `row`.
pub fn row_range(sheet: &str, row: usize, width: usize) -> String {
    format!(
        "{}!A{}:{}{}",
        quote_sheet_name(sheet),
        row,
        column_letter(width.max(1)),
        row
    )
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, SinkError> {
        let url = self.values_url(&self.sheet_prefix())?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(unavailable)?;
        let range: ValueRange = Self::check(response)
            .await?
            .json()
            .await
            .map_err(unavailable)?;

        debug!(rows = range.values.len(), "Fetched worksheet rows");
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_row_range(&self, row: usize, values: &[String]) -> Result<(), SinkError> {
        let range = row_range(&self.worksheet, row, values.len());
        let url = self.values_url(&range)?;
        let body = ValueRangeUpdate {
            range: &range,
            major_dimension: "ROWS",
            values: [values],
        };

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;
        Self::check(response).await?;

        debug!(range = %range, "Worksheet row updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SheetsEnvConfig {
        SheetsEnvConfig {
            enabled: true,
            spreadsheet_id: "sheet-123".to_string(),
            worksheet: "Journal 2024".to_string(),
            access_token: "token".to_string(),
            api_base_url: "https://sheets.googleapis.com".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(20), "T");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_row_range_quotes_sheet_name() {
        assert_eq!(row_range("Journal2024", 5, 20), "'Journal2024'!A5:T5");
        assert_eq!(row_range("Bob's", 1, 3), "'Bob''s'!A1:C1");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = GoogleSheetsClient::new(&config()).unwrap();
        let url = client
            .values_url(&row_range("Journal 2024", 2, 20))
            .unwrap();
        assert_eq!(url.host_str(), Some("sheets.googleapis.com"));
        assert!(
            url.path()
                .starts_with("/v4/spreadsheets/sheet-123/values/")
        );
        assert!(url.path().contains("Journal%202024"));
    }

    #[test]
    fn test_cells_are_stringified() {
        assert_eq!(cell_to_string(serde_json::json!("Win")), "Win");
        assert_eq!(cell_to_string(serde_json::json!(12)), "12");
        assert_eq!(cell_to_string(serde_json::Value::Null), "");
    }

    #[test]
    fn test_update_body_shape() {
        let values = vec!["1".to_string(), "EURUSD".to_string()];
        let body = ValueRangeUpdate {
            range: "'Journal'!A2:B2",
            major_dimension: "ROWS",
            values: [values.as_slice()],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["majorDimension"], "ROWS");
        assert_eq!(json["values"][0][1], "EURUSD");
    }
}
