use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One equipment-repair report as submitted by the reviewing operator.
///
/// Every field may be empty; content validation is the UI's
/// responsibility, not this service's. The record has no identity of
/// its own until it becomes a sheet row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairReport {
    /// Substation name; display value and folder grouping key.
    pub substation: String,
    /// Report document number, used in filename construction.
    pub doc_number: String,
    pub equipment_id: String,
    /// Raw wording from the scanned document.
    pub details: String,
    /// Normalized/formal wording produced by the extraction step.
    /// Absent in reports captured with the v1 schema.
    pub details_ai: String,
    pub responsible: String,
    pub status: ReportStatus,
    /// Free-form date string, stored as written, never parsed.
    pub signed_date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deserializes_with_all_fields_missing() {
        let report: RepairReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report.substation, "");
        assert_eq!(report.status, ReportStatus::InProgress);
    }

    #[test]
    fn test_status_wire_names() {
        let report: RepairReport =
            serde_json::from_str(r#"{"status": "resolved", "docNumber": "123/2567"}"#).unwrap();
        assert_eq!(report.status, ReportStatus::Resolved);
        assert_eq!(report.status.as_str(), "resolved");
        assert_eq!(report.doc_number, "123/2567");
    }
}
