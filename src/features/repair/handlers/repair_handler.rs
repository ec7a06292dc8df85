use std::io::Write;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::repair::dtos::SaveRepairReportDto;
use crate::features::repair::models::RepairReport;
use crate::features::repair::services::{SaveOutcome, SaveService, StagedUpload};
use crate::shared::constants::SESSION_TOKEN_HEADER;
use crate::shared::types::SaveResponse;

/// Save a repair report
///
/// Accepts multipart/form-data with:
/// - `data`: JSON-encoded RepairReport (required)
/// - `file`: the scanned source document (optional, single file)
///
/// The row is always appended when possible; a failed file upload only
/// downgrades the response to success-with-warning.
#[utoipa::path(
    post,
    path = "/api/repair/save",
    tag = "repair",
    request_body(
        content = SaveRepairReportDto,
        content_type = "multipart/form-data",
        description = "Report fields as JSON plus the optional scanned document",
    ),
    responses(
        (status = 200, description = "Report saved (warning present if the attachment was not stored)", body = SaveResponse),
        (status = 400, description = "Malformed multipart data or report JSON"),
        (status = 500, description = "Authorization failed or the row could not be appended")
    )
)]
pub async fn save_report(
    State(service): State<Arc<SaveService>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<SaveResponse>, AppError> {
    let mut report: Option<RepairReport> = None;
    let mut upload: Option<StagedUpload> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "data" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read data field: {}", e))
                })?;
                let parsed: RepairReport = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid report JSON: {}", e)))?;
                report = Some(parsed);
            }
            "file" => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                // Spool to a request-owned temp file instead of
                // buffering the whole scan in memory. Deleted on drop.
                let mut temp = NamedTempFile::new().map_err(|e| {
                    AppError::Internal(format!("Failed to stage uploaded file: {}", e))
                })?;

                while let Some(chunk) = field.chunk().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })? {
                    temp.as_file_mut().write_all(&chunk).map_err(|e| {
                        AppError::Internal(format!("Failed to stage uploaded file: {}", e))
                    })?;
                }

                upload = Some(StagedUpload {
                    temp,
                    original_name,
                    content_type,
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let report =
        report.ok_or_else(|| AppError::BadRequest("Missing data field".to_string()))?;

    let session_token = headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = service.save(report, upload, session_token).await?;

    let response = match outcome {
        SaveOutcome::Saved => SaveResponse::ok(),
        SaveOutcome::SavedWithWarning(warning) => SaveResponse::with_warning(warning),
    };

    Ok(Json(response))
}
