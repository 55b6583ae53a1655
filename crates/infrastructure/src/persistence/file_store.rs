//! File-backed key-value store.
//!
//! All values live in one JSON object:
//! ```json
//! {
//!   "authToken": "eyJ...",
//!   "refreshToken": "r1",
//!   "tokenExpiry": "2026-05-04T10:30:00.000Z"
//! }
//! ```
//! A missing file is an empty store. Writes go to a sibling temporary file
//! that is then renamed over the original, so a reader never sees half of a
//! batch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use warden_application::ports::{KeyValueStore, StoreError};

use crate::serialization::{SessionDocument as Document, decode_document, encode_document};

/// Key-value store persisted as a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the given file. The file is created lazily.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default session file in the platform data directory:
    /// - Linux: ~/.local/share/warden/session.json
    /// - macOS: ~/Library/Application Support/warden/session.json
    /// - Windows: %APPDATA%/warden/session.json
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("warden").join("session.json"))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StoreError> {
        match fs::read(&self.path).await {
            Ok(content) => {
                decode_document(&content).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content =
            encode_document(document).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    /// Applies `change` to the document and writes it back if it changed.
    async fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let before = document.clone();
        change(&mut document);
        if document != before {
            self.save(&document).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|document| {
            document.remove(key);
        })
        .await
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        self.update(|document| {
            for (key, value) in entries {
                document.insert((*key).to_string(), value.clone());
            }
        })
        .await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.update(|document| {
            for key in keys {
                document.remove(*key);
            }
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        assert_eq!(store.get("authToken").await.unwrap(), None);
        store.remove("authToken").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStore::new(&path)
            .set_many(&[
                ("authToken", "a.b.c".to_string()),
                ("refreshToken", "r1".to_string()),
            ])
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("authToken").await.unwrap().as_deref(), Some("a.b.c"));
        assert_eq!(reopened.get("refreshToken").await.unwrap().as_deref(), Some("r1"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_many_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set("authToken", "t").await.unwrap();
        store.set("theme", "dark").await.unwrap();

        store.remove_many(&["authToken", "refreshToken"]).await.unwrap();

        assert_eq!(store.get("authToken").await.unwrap(), None);
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FileStore::new(&path).get("authToken").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_default_path_is_under_warden() {
        if let Some(path) = FileStore::default_path() {
            assert!(path.ends_with("warden/session.json"));
        }
    }
}
