//! Google Drive REST client
//!
//! Folder lookup/create under a fixed root and resumable file upload.
//! Every method takes the bearer token per call because the token may
//! be request-scoped (session auth variant).

use std::path::Path;

use reqwest::header;
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::core::error::{AppError, Result};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Durable reference to an uploaded file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

impl DriveFile {
    /// The viewable link stored in the sheet row. Falls back to the
    /// canonical view URL if the API response omitted webViewLink.
    pub fn view_link(&self) -> String {
        self.web_view_link
            .clone()
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", self.id))
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
}

pub struct DriveClient {
    http: reqwest::Client,
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Look up a non-trashed folder with exactly `name` directly under
    /// `parent_id`. Returns the first match, if any.
    pub async fn find_folder(
        &self,
        token: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and '{}' in parents and trashed = false",
            escape_query_value(name),
            FOLDER_MIME_TYPE,
            parent_id
        );

        let response = self
            .http
            .get(FILES_URL)
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("fields", "files(id, name)")])
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Drive folder lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(upload_error("Drive folder lookup failed", response).await);
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to parse Drive file list: {}", e)))?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Create a folder named `name` under `parent_id` and return its id.
    pub async fn create_folder(&self, token: &str, name: &str, parent_id: &str) -> Result<String> {
        let metadata = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id],
        });

        let response = self
            .http
            .post(FILES_URL)
            .bearer_auth(token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Drive folder create failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(upload_error("Drive folder create failed", response).await);
        }

        let entry: FileEntry = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to parse created folder: {}", e)))?;

        debug!("Created Drive folder '{}' ({})", name, entry.id);
        Ok(entry.id)
    }

    /// Upload a file via a resumable session: metadata POST, then the
    /// content streamed from `path` so large scans are not buffered in
    /// memory.
    pub async fn upload_file(
        &self,
        token: &str,
        name: &str,
        parent_id: &str,
        content_type: &str,
        path: &Path,
    ) -> Result<DriveFile> {
        let metadata = json!({
            "name": name,
            "parents": [parent_id],
        });

        let response = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .query(&[("uploadType", "resumable"), ("fields", "id, webViewLink")])
            .header("X-Upload-Content-Type", content_type)
            .json(&metadata)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Drive upload session failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(upload_error("Drive upload session failed", response).await);
        }

        let session_uri = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                AppError::Upload("Drive upload session returned no session URI".to_string())
            })?;

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| AppError::Upload(format!("Failed to open spooled upload: {}", e)))?;
        let content_length = file
            .metadata()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to stat spooled upload: {}", e)))?
            .len();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .http
            .put(&session_uri)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Drive file upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(upload_error("Drive file upload failed", response).await);
        }

        let uploaded: DriveFile = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to parse uploaded file: {}", e)))?;

        debug!("Uploaded '{}' to Drive ({})", name, uploaded.id);
        Ok(uploaded)
    }
}

/// Escape a value for the Drive `q` filter syntax. A raw single quote
/// would terminate the name term and break the query.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

async fn upload_error(context: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Upload(format!("{}: HTTP {} - {}", context, status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_query_value_quotes() {
        assert_eq!(escape_query_value("O'Connor"), "O\\'Connor");
        assert_eq!(escape_query_value("a\\b"), "a\\\\b");
        assert_eq!(escape_query_value("สมุทรสาคร 10"), "สมุทรสาคร 10");
    }

    #[test]
    fn test_view_link_fallback() {
        let file = DriveFile {
            id: "abc123".to_string(),
            web_view_link: None,
        };
        assert_eq!(file.view_link(), "https://drive.google.com/file/d/abc123/view");

        let file = DriveFile {
            id: "abc123".to_string(),
            web_view_link: Some("https://drive.google.com/x".to_string()),
        };
        assert_eq!(file.view_link(), "https://drive.google.com/x");
    }
}
