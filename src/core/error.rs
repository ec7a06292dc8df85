use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    /// Failure anywhere in the folder-resolve / filename / upload
    /// sub-sequence. Never escapes the save orchestrator: it is
    /// downgraded to a warning plus a marker in the file-reference
    /// column.
    #[error("{0}")]
    Upload(String),

    /// Spreadsheet metadata read or append failure. Fatal for the
    /// request; no compensation is attempted.
    #[error("{0}")]
    Recorder(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side fault outside the external stores (disk, spooling).
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(ref msg) | AppError::Auth(ref msg) => {
                tracing::error!("Request failed before save pipeline: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Recorder(ref msg) => {
                tracing::error!("Sheet append failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Contained by the orchestrator in normal flow; if one
            // ever escapes it is still a server-side failure.
            AppError::Upload(ref msg) => {
                tracing::error!("Unhandled upload failure: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_keeps_underlying_message_verbatim() {
        let err = AppError::Upload("Drive quota exceeded".to_string());
        assert_eq!(err.to_string(), "Drive quota exceeded");
    }

    #[test]
    fn test_status_codes_separate_client_and_server_faults() {
        let client_fault = AppError::BadRequest("missing data field".to_string());
        assert_eq!(
            client_fault.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        // Disk/spooling faults are the server's, not the caller's
        let server_fault = AppError::Internal("Failed to stage uploaded file".to_string());
        assert_eq!(
            server_fault.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let recorder = AppError::Recorder("append failed".to_string());
        assert_eq!(
            recorder.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_config_error_names_the_category() {
        let err = AppError::Config("GOOGLE_SHEET_ID must be set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GOOGLE_SHEET_ID must be set"
        );
    }
}
