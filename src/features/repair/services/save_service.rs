//! Save orchestrator
//!
//! Sequences folder resolution, upload, filename normalization, and
//! the sheet append for one request, with two-tier failure isolation:
//! anything that goes wrong while storing the attachment is downgraded
//! to a warning and a marker in the file-reference column; a failed
//! row append is the one unrecoverable error. The spreadsheet row is
//! the authoritative record; the file is supplementary evidence.

use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::core::error::Result;
use crate::features::auth::AccessTokenProvider;
use crate::features::repair::models::RepairReport;
use crate::features::repair::services::folder_service::FolderService;
use crate::features::repair::services::naming::compute_filename;
use crate::features::repair::services::recorder_service::RecorderService;
use crate::modules::google::DriveClient;
use crate::shared::constants::UPLOAD_FAILED_MARKER;

/// One uploaded document, spooled to disk for the duration of the
/// request. The temp file is owned exclusively by this request and is
/// removed when the value drops, on every exit path.
pub struct StagedUpload {
    pub temp: NamedTempFile,
    pub original_name: String,
    pub content_type: String,
}

/// Tri-state result of a save: the row was always written; the
/// attachment may have failed.
pub enum SaveOutcome {
    Saved,
    SavedWithWarning(String),
}

pub struct SaveService {
    provider: Arc<dyn AccessTokenProvider>,
    folders: Arc<FolderService>,
    drive: Arc<DriveClient>,
    recorder: Arc<RecorderService>,
}

impl SaveService {
    pub fn new(
        provider: Arc<dyn AccessTokenProvider>,
        folders: Arc<FolderService>,
        drive: Arc<DriveClient>,
        recorder: Arc<RecorderService>,
    ) -> Self {
        Self {
            provider,
            folders,
            drive,
            recorder,
        }
    }

    /// Save one report: upload the attachment (if any) into the
    /// per-substation folder, then append the row with whatever file
    /// reference resulted.
    pub async fn save(
        &self,
        report: RepairReport,
        upload: Option<StagedUpload>,
        session_token: Option<&str>,
    ) -> Result<SaveOutcome> {
        // Failure to obtain a token is immediately fatal.
        let token = self.provider.access_token(session_token).await?;

        let (file_reference, warning) = match upload {
            None => (String::new(), None),
            Some(upload) => {
                let result = self.store_attachment(&token, &report, &upload).await;
                // `upload` drops here: the temp file is deleted whether
                // the attachment made it to the store or not.
                merge_file_reference(result)
            }
        };

        if let Some(ref w) = warning {
            warn!("Attachment not stored, appending row with marker: {}", w);
        }

        // Always attempted exactly once; a failure here escapes.
        self.recorder
            .append_report(&token, &report, &file_reference)
            .await?;

        match warning {
            None => {
                info!("Report saved for substation '{}'", report.substation);
                Ok(SaveOutcome::Saved)
            }
            Some(w) => Ok(SaveOutcome::SavedWithWarning(w)),
        }
    }

    /// Folder resolve → filename compute → upload. Any error is an
    /// upload failure handled by the caller.
    async fn store_attachment(
        &self,
        token: &str,
        report: &RepairReport,
        upload: &StagedUpload,
    ) -> Result<String> {
        let folder_id = self
            .folders
            .resolve_or_create(token, &report.substation)
            .await?;

        let filename = compute_filename(report, &upload.original_name);

        let uploaded = self
            .drive
            .upload_file(
                token,
                &filename,
                &folder_id,
                &upload.content_type,
                upload.temp.path(),
            )
            .await?;

        Ok(uploaded.view_link())
    }
}

/// Collapse the attachment outcome into the file-reference column
/// value and an optional warning for the caller.
fn merge_file_reference(result: Result<String>) -> (String, Option<String>) {
    match result {
        Ok(link) => (link, None),
        Err(e) => (
            UPLOAD_FAILED_MARKER.to_string(),
            Some(format!("File upload failed: {}", e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[test]
    fn test_merge_file_reference_success_has_no_warning() {
        let (reference, warning) =
            merge_file_reference(Ok("https://drive.google.com/file/d/x/view".to_string()));
        assert_eq!(reference, "https://drive.google.com/file/d/x/view");
        assert!(warning.is_none());
    }

    #[test]
    fn test_merge_file_reference_failure_carries_marker_and_message() {
        let (reference, warning) =
            merge_file_reference(Err(AppError::Upload("quota exceeded".to_string())));
        assert_eq!(reference, UPLOAD_FAILED_MARKER);
        assert_eq!(warning.as_deref(), Some("File upload failed: quota exceeded"));
    }
}
