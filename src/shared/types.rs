use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape for a successful save.
///
/// `warning` is present only for partial success (the row was appended
/// but the attachment could not be stored).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            warning: None,
        }
    }

    pub fn with_warning(warning: String) -> Self {
        Self {
            success: true,
            warning: Some(warning),
        }
    }
}

/// Wire shape for hard failures. The message is surfaced verbatim;
/// the audience is an internal operator, not a public client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_response_plain_success_omits_warning() {
        let json = serde_json::to_value(SaveResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }

    #[test]
    fn test_save_response_partial_success_carries_warning() {
        let json = serde_json::to_value(SaveResponse::with_warning("upload failed".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "warning": "upload failed"})
        );
    }
}
