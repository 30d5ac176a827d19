//! In-memory `SecretStore`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SecretStore, StoreDocument};
use crate::errors::Result;
use crate::vault::Entry;

/// A store that lives and dies with the process.
///
/// Each instance is fully isolated, which makes it the natural test double
/// for the vault manager and the unlock session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RwLock<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a prepared document.
    pub fn with_document(doc: StoreDocument) -> Self {
        Self {
            doc: RwLock::new(doc),
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> StoreDocument {
        self.doc.read().await.clone()
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get_entries(&self) -> Result<Vec<Entry>> {
        Ok(self.doc.read().await.entries.clone())
    }

    async fn set_entries(&self, entries: &[Entry]) -> Result<()> {
        self.doc.write().await.entries = entries.to_vec();
        Ok(())
    }

    async fn get_vaults(&self) -> Result<Vec<String>> {
        Ok(self.doc.read().await.vaults.clone())
    }

    async fn set_vaults(&self, vaults: &[String]) -> Result<()> {
        self.doc.write().await.vaults = vaults.to_vec();
        Ok(())
    }

    async fn get_master_commitment(&self) -> Result<Option<String>> {
        Ok(self.doc.read().await.master_hash.clone())
    }

    async fn set_master_commitment(&self, commitment: &str) -> Result<()> {
        self.doc.write().await.master_hash = Some(commitment.to_string());
        Ok(())
    }
}
