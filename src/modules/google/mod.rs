//! Modules layer - Infrastructure clients for the Google APIs
//!
//! Drive (folder resolution, file upload) and Sheets (metadata read,
//! row append). Authorization is supplied per call by the selected
//! access-token provider.

mod drive_client;
mod sheets_client;

pub use drive_client::{DriveClient, DriveFile};
pub use sheets_client::SheetsClient;
