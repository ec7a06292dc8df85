use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::core::error::Result;
use crate::features::repair::services::naming::normalize_substation;
use crate::modules::google::DriveClient;

/// Folder lookup and creation under a fixed parent. Implemented by the
/// Drive client in production; the seam exists so the resolve logic can
/// be exercised without a live store.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn find_folder(&self, token: &str, name: &str, parent_id: &str)
        -> Result<Option<String>>;

    async fn create_folder(&self, token: &str, name: &str, parent_id: &str) -> Result<String>;
}

#[async_trait]
impl FolderStore for DriveClient {
    async fn find_folder(
        &self,
        token: &str,
        name: &str,
        parent_id: &str,
    ) -> Result<Option<String>> {
        DriveClient::find_folder(self, token, name, parent_id).await
    }

    async fn create_folder(&self, token: &str, name: &str, parent_id: &str) -> Result<String> {
        DriveClient::create_folder(self, token, name, parent_id).await
    }
}

/// Resolves the per-substation folder under the configured Drive root.
///
/// No caching across requests: every save re-queries the store. Two
/// near-simultaneous first-time saves for the same new substation can
/// therefore create two folders with the same name; accepted, not
/// corrected.
pub struct FolderService {
    store: Arc<dyn FolderStore>,
    root_folder_id: String,
}

impl FolderService {
    pub fn new(store: Arc<dyn FolderStore>, root_folder_id: String) -> Self {
        Self {
            store,
            root_folder_id,
        }
    }

    /// Find or create the folder named after the normalized substation
    /// name and return its id.
    pub async fn resolve_or_create(&self, token: &str, substation: &str) -> Result<String> {
        let folder_name = normalize_substation(substation);

        if let Some(id) = self
            .store
            .find_folder(token, &folder_name, &self.root_folder_id)
            .await?
        {
            debug!("Found existing folder '{}' ({})", folder_name, id);
            return Ok(id);
        }

        self.store
            .create_folder(token, &folder_name, &self.root_folder_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingStore {
        existing: Option<String>,
        created_names: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn with_existing(id: &str) -> Self {
            Self {
                existing: Some(id.to_string()),
                created_names: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self {
                existing: None,
                created_names: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FolderStore for RecordingStore {
        async fn find_folder(
            &self,
            _token: &str,
            _name: &str,
            _parent_id: &str,
        ) -> Result<Option<String>> {
            Ok(self.existing.clone())
        }

        async fn create_folder(
            &self,
            _token: &str,
            name: &str,
            _parent_id: &str,
        ) -> Result<String> {
            self.created_names.lock().unwrap().push(name.to_string());
            Ok("created-id".to_string())
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_existing_folder_without_creating() {
        let store = Arc::new(RecordingStore::with_existing("folder-42"));
        let service = FolderService::new(store.clone(), "root".to_string());

        let id = service
            .resolve_or_create("token", "สถานีไฟฟ้าสมุทรสาคร 10")
            .await
            .unwrap();

        assert_eq!(id, "folder-42");
        assert!(store.created_names.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_folder_under_normalized_name() {
        let store = Arc::new(RecordingStore::empty());
        let service = FolderService::new(store.clone(), "root".to_string());

        let id = service
            .resolve_or_create("token", "สถานีไฟฟ้าสมุทรสาคร 10")
            .await
            .unwrap();

        assert_eq!(id, "created-id");
        // Exactly one create, with the station prefix stripped
        let created = store.created_names.lock().unwrap();
        assert_eq!(created.as_slice(), ["สมุทรสาคร 10"]);
    }
}
