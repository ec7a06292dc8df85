mod repair_report;

pub use repair_report::{RepairReport, ReportStatus};
