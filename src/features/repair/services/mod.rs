pub mod folder_service;
pub mod naming;
pub mod recorder_service;
pub mod save_service;

pub use folder_service::{FolderService, FolderStore};
pub use recorder_service::RecorderService;
pub use save_service::{SaveOutcome, SaveService, StagedUpload};
