//! Persistent storage for the registration list.
//!
//! The whole list lives in one JSON document that is rewritten on every save.
//! Loading is deliberately lossy: a missing, unreadable or malformed document
//! yields an empty list instead of an error, so the service stays available
//! even when the file is damaged. The problem is logged, never surfaced.

use super::Registration;
use crate::error::ApiError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// JSON document store on the local filesystem.
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    /// Create a new file store. Does not touch the filesystem.
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Ensure the document exists, creating it as an empty list if absent.
    pub async fn init(&self) -> Result<(), ApiError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(&self.storage_path).await? {
            debug!("Registration file present at {:?}", self.storage_path);
            return Ok(());
        }

        self.save(&[]).await?;
        info!(
            "Initialized empty registration file at {:?}",
            self.storage_path
        );
        Ok(())
    }

    /// Serialize the full list and replace the document.
    ///
    /// Output is pretty-printed with two-space indentation; non-ASCII text is
    /// written as-is. The write goes to a temp file that is then renamed over
    /// the document.
    pub async fn save(&self, records: &[Registration]) -> Result<(), ApiError> {
        let data = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved {} registrations ({} bytes) to {:?}",
            records.len(),
            data.len(),
            self.storage_path
        );
        Ok(())
    }

    /// Read the full list. Never fails; see the module docs.
    pub async fn load(&self) -> Vec<Registration> {
        let data = match fs::read(&self.storage_path).await {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Could not read registration file {:?}, treating as empty: {}",
                    self.storage_path, e
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Registration>>(&data) {
            Ok(records) => {
                debug!(
                    "Loaded {} registrations from {:?}",
                    records.len(),
                    self.storage_path
                );
                records
            }
            Err(e) => {
                warn!(
                    "Registration file {:?} is malformed, treating as empty: {}",
                    self.storage_path, e
                );
                Vec::new()
            }
        }
    }
}

/// In-memory store for testing or when persistence is disabled.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Registration>>,
}

impl MemoryStore {
    pub async fn save(&self, records: &[Registration]) -> Result<(), ApiError> {
        *self.records.write().await = records.to_vec();
        debug!("Memory store: holding {} registrations", records.len());
        Ok(())
    }

    pub async fn load(&self) -> Vec<Registration> {
        self.records.read().await.clone()
    }
}

/// Storage backend with or without a file on disk.
pub enum Store {
    /// JSON document on disk
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// Create a file store and make sure its document exists.
    pub async fn file(storage_path: PathBuf) -> Result<Self, ApiError> {
        let store = FileStore::new(storage_path);
        store.init().await?;
        Ok(Store::File(store))
    }

    /// Create an empty memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    /// Replace the stored list.
    pub async fn save(&self, records: &[Registration]) -> Result<(), ApiError> {
        match self {
            Store::File(s) => s.save(records).await,
            Store::Memory(s) => s.save(records).await,
        }
    }

    /// Load the stored list (lossy for the file backend).
    pub async fn load(&self) -> Vec<Registration> {
        match self {
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, name: &str, participants: i64) -> Registration {
        Registration {
            id: id.into(),
            name: name.into(),
            email: "a@x.com".into(),
            phone: "123".into(),
            participants,
            comments: String::new(),
            timestamp: "2024-05-01T09:30:15.000000".into(),
        }
    }

    #[tokio::test]
    async fn test_init_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("registrations.json");

        let store = Store::file(path.clone()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_init_keeps_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registrations.json");
        let store = FileStore::new(path.clone());
        store.save(&[record("1", "Anna", 2)]).await.unwrap();

        store.init().await.unwrap();

        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_is_pretty_and_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registrations.json");
        let store = FileStore::new(path.clone());

        store.save(&[record("1", "Jürgen Größe", 1)]).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Jürgen Größe"));
        assert!(text.contains("\n    \"id\": \"1\""));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_save_load_round_trip_is_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registrations.json");
        let store = FileStore::new(path.clone());
        store
            .save(&[record("1", "Anna", 2), record("2", "Ben", 5)])
            .await
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let loaded = store.load().await;
        store.save(&loaded).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(loaded[0].name, "Anna");
        assert_eq!(loaded[1].name, "Ben");
    }

    #[tokio::test]
    async fn test_load_malformed_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registrations.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("missing.json"));

        assert!(store.load().await.is_empty());
    }

    #[test]
    fn test_memory_store_operations() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Store::memory();
            assert!(store.load().await.is_empty());

            store.save(&[record("1", "Anna", 2)]).await.unwrap();

            let records = store.load().await;
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, "1");
        });
    }
}
