//! Persistence collaborator.
//!
//! The vault core only needs a key-addressed blob store with three
//! independent keys: entries, vault names and the master commitment.
//! Writes are whole-value overwrites; there is no transaction across keys.
//!
//! - `MemoryStore` keeps everything in process memory (tests, embedding)
//! - `JsonFileStore` persists one JSON document with atomic rewrites

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::vault::Entry;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Vault that exists before the user creates any.
pub const DEFAULT_VAULT: &str = "Default";

/// Key-addressed store the vault core persists through.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_entries(&self) -> Result<Vec<Entry>>;

    async fn set_entries(&self, entries: &[Entry]) -> Result<()>;

    async fn get_vaults(&self) -> Result<Vec<String>>;

    async fn set_vaults(&self, vaults: &[String]) -> Result<()>;

    /// The stored commitment, or `None` before the first unlock.
    async fn get_master_commitment(&self) -> Result<Option<String>>;

    async fn set_master_commitment(&self, commitment: &str) -> Result<()>;
}

/// Everything a store holds, in its serialized shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(default = "default_vaults")]
    pub vaults: Vec<String>,

    #[serde(default)]
    pub master_hash: Option<String>,
}

fn default_vaults() -> Vec<String> {
    vec![DEFAULT_VAULT.to_string()]
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            vaults: default_vaults(),
            master_hash: None,
        }
    }
}
