//! JSON file backed `SecretStore`.
//!
//! The whole store is one JSON document:
//!
//! ```text
//! { "entries": [...], "vaults": ["Default", ...], "masterHash": "..." | null }
//! ```
//!
//! Every setter is a read-modify-write of that document followed by an
//! **atomic** replace (temp file in the same directory, then rename), so
//! readers never observe a half-written file.  Each key is still updated
//! independently; a crash between two setters can leave them out of step.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{SecretStore, StoreDocument};
use crate::errors::{VaultError, Result};
use crate::vault::Entry;

/// A store persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,

    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Use `path` as the backing file.  It is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path to the store file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing file is an empty store.
    async fn read_document(&self) -> Result<StoreDocument> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data).map_err(|e| {
            VaultError::StoreError(format!("{} is not a valid store: {e}", self.path.display()))
        })
    }

    /// Write the document to disk atomically.
    async fn write_document(&self, doc: &StoreDocument) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| VaultError::SerializationError(format!("store: {e}")))?;

        let parent = self.path.parent().unwrap_or(Path::new("."));
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "store written");
        Ok(())
    }

    async fn update(&self, apply: impl FnOnce(&mut StoreDocument) + Send) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        apply(&mut doc);
        self.write_document(&doc).await
    }
}

#[async_trait]
impl SecretStore for JsonFileStore {
    async fn get_entries(&self) -> Result<Vec<Entry>> {
        Ok(self.read_document().await?.entries)
    }

    async fn set_entries(&self, entries: &[Entry]) -> Result<()> {
        let entries = entries.to_vec();
        self.update(move |doc| doc.entries = entries).await
    }

    async fn get_vaults(&self) -> Result<Vec<String>> {
        Ok(self.read_document().await?.vaults)
    }

    async fn set_vaults(&self, vaults: &[String]) -> Result<()> {
        let vaults = vaults.to_vec();
        self.update(move |doc| doc.vaults = vaults).await
    }

    async fn get_master_commitment(&self) -> Result<Option<String>> {
        Ok(self.read_document().await?.master_hash)
    }

    async fn set_master_commitment(&self, commitment: &str) -> Result<()> {
        let commitment = commitment.to_string();
        self.update(move |doc| doc.master_hash = Some(commitment))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("store.json"));

        assert!(store.get_entries().await.unwrap().is_empty());
        assert_eq!(store.get_vaults().await.unwrap(), vec!["Default".to_string()]);
        assert!(store.get_master_commitment().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn setters_preserve_other_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("store.json");
        let store = JsonFileStore::new(&path);

        store.set_master_commitment("$passvault$test").await.unwrap();
        store
            .set_vaults(&["Default".to_string(), "Work".to_string()])
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get_master_commitment().await.unwrap().as_deref(),
            Some("$passvault$test")
        );
        assert_eq!(reopened.get_vaults().await.unwrap().len(), 2);
        assert!(!tmp.path().join("nested").join(".store.json.tmp").exists());
    }

    #[tokio::test]
    async fn document_uses_camel_case_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let store = JsonFileStore::new(&path);
        store.set_master_commitment("c").await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["masterHash"], "c");
        assert!(raw["entries"].is_array());
        assert!(raw["vaults"].is_array());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_store_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "not json {{").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get_entries().await,
            Err(VaultError::StoreError(_))
        ));
    }
}
