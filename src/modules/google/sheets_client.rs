//! Google Sheets REST client
//!
//! Metadata read (sheet title discovery) and row append. Failures here
//! are recorder failures: fatal for the save request.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::core::error::{AppError, Result};

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

pub struct SheetsClient {
    http: reqwest::Client,
}

impl Default for SheetsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetsClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Display name of the first sheet. The shared spreadsheet's first
    /// tab may be renamed at any time, so the name is discovered rather
    /// than assumed.
    pub async fn first_sheet_title(&self, token: &str, spreadsheet_id: &str) -> Result<String> {
        let url = format!("{}/{}", SHEETS_URL, spreadsheet_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await
            .map_err(|e| AppError::Recorder(format!("Spreadsheet metadata read failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(recorder_error("Spreadsheet metadata read failed", response).await);
        }

        let spreadsheet: Spreadsheet = response.json().await.map_err(|e| {
            AppError::Recorder(format!("Failed to parse spreadsheet metadata: {}", e))
        })?;

        spreadsheet
            .sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| AppError::Recorder("Spreadsheet has no sheets".to_string()))
    }

    /// Append one row to the named sheet. USER_ENTERED lets the store's
    /// own parsing interpret dates and numbers entered as text.
    pub async fn append_row(
        &self,
        token: &str,
        spreadsheet_id: &str,
        sheet_title: &str,
        row: &[String],
    ) -> Result<()> {
        let range = append_range(sheet_title);
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_URL,
            spreadsheet_id,
            urlencoding::encode(&range)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| AppError::Recorder(format!("Sheet append failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(recorder_error("Sheet append failed", response).await);
        }

        debug!(
            "Appended row with {} fields to '{}' in {}",
            row.len(),
            sheet_title,
            spreadsheet_id
        );
        Ok(())
    }
}

async fn recorder_error(context: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Recorder(format!("{}: HTTP {} - {}", context, status, body))
}

/// A1-notation range for the discovered sheet. Titles with spaces,
/// non-ASCII, or other non-alphanumeric characters must be wrapped in
/// single quotes (internal quotes doubled) or the API rejects the
/// range; quoting is always valid, so quote unconditionally.
fn append_range(sheet_title: &str) -> String {
    format!("'{}'!A1", sheet_title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_range_quotes_plain_titles() {
        assert_eq!(append_range("Sheet1"), "'Sheet1'!A1");
    }

    #[test]
    fn test_append_range_handles_renamed_tabs() {
        assert_eq!(append_range("Repair Log 2567"), "'Repair Log 2567'!A1");
        assert_eq!(append_range("รายงานซ่อม"), "'รายงานซ่อม'!A1");
    }

    #[test]
    fn test_append_range_doubles_internal_quotes() {
        assert_eq!(append_range("O'Clock"), "'O''Clock'!A1");
    }
}
