use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::core::error::Result;
use crate::features::repair::models::RepairReport;
use crate::modules::google::SheetsClient;

/// Appends report rows to the shared spreadsheet.
pub struct RecorderService {
    sheets: Arc<SheetsClient>,
    spreadsheet_id: String,
    timezone: Tz,
}

impl RecorderService {
    pub fn new(sheets: Arc<SheetsClient>, spreadsheet_id: String, timezone: Tz) -> Self {
        Self {
            sheets,
            spreadsheet_id,
            timezone,
        }
    }

    /// Append exactly one row for the report. The target sheet name is
    /// discovered from metadata, never assumed. Failure here is fatal
    /// for the request.
    pub async fn append_report(
        &self,
        token: &str,
        report: &RepairReport,
        file_reference: &str,
    ) -> Result<()> {
        let sheet_title = self
            .sheets
            .first_sheet_title(token, &self.spreadsheet_id)
            .await?;

        let row = build_row(report, file_reference, Utc::now(), self.timezone);

        self.sheets
            .append_row(token, &self.spreadsheet_id, &sheet_title, &row)
            .await?;

        info!(
            "Report row appended to '{}' for substation '{}'",
            sheet_title, report.substation
        );
        Ok(())
    }
}

/// Positional row layout. Order is fixed; there is no header matching.
pub fn build_row(
    report: &RepairReport,
    file_reference: &str,
    now: DateTime<Utc>,
    timezone: Tz,
) -> Vec<String> {
    let timestamp = now
        .with_timezone(&timezone)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string();

    vec![
        timestamp,
        report.substation.clone(),
        report.doc_number.clone(),
        report.equipment_id.clone(),
        report.details.clone(),
        report.details_ai.clone(),
        report.responsible.clone(),
        report.status.as_str().to_string(),
        report.signed_date.clone(),
        file_reference.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::repair::models::ReportStatus;
    use chrono::TimeZone;

    #[test]
    fn test_build_row_order_and_width() {
        let report = RepairReport {
            substation: "สถานีไฟฟ้าสมุทรสาคร 10".to_string(),
            doc_number: "123/2567".to_string(),
            equipment_id: "TR-01".to_string(),
            details: "หม้อแปลงรั่ว".to_string(),
            details_ai: "พบการรั่วไหลของน้ำมันหม้อแปลง".to_string(),
            responsible: "สมชาย".to_string(),
            status: ReportStatus::Resolved,
            signed_date: "1 ก.พ. 2567".to_string(),
        };

        let now = Utc.with_ymd_and_hms(2024, 2, 1, 5, 30, 0).unwrap();
        let row = build_row(&report, "https://drive.google.com/x", now, chrono_tz::Asia::Bangkok);

        assert_eq!(row.len(), 10);
        // Asia/Bangkok is UTC+7
        assert_eq!(row[0], "01/02/2024 12:30:00");
        assert_eq!(row[1], "สถานีไฟฟ้าสมุทรสาคร 10");
        assert_eq!(row[2], "123/2567");
        assert_eq!(row[7], "resolved");
        assert_eq!(row[9], "https://drive.google.com/x");
    }

    #[test]
    fn test_build_row_empty_file_reference_for_no_attachment() {
        let report = RepairReport::default();
        let row = build_row(&report, "", Utc::now(), chrono_tz::Asia::Bangkok);
        assert_eq!(row.len(), 10);
        assert_eq!(row[9], "");
    }
}
