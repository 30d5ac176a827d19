//! High-level vault operations.
//!
//! `VaultManager` owns the in-memory entry collection and the list of
//! vault names, and writes each back to the injected store right after a
//! mutation succeeds.  Every mutator builds the next collection, awaits
//! the store write, and only then swaps it in, so a failed write leaves
//! memory and disk agreeing.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::crypto::{decrypt, encrypt, DerivedKey};
use crate::errors::{VaultError, Result};
use crate::store::{SecretStore, DEFAULT_VAULT};

use super::entry::{DecryptedEntry, Entry};

/// The main vault handle.  Create one with `VaultManager::load`, then use
/// its methods to manage entries and vaults.
pub struct VaultManager {
    store: Arc<dyn SecretStore>,

    /// All entries across all vaults, in insertion order.
    entries: Vec<Entry>,

    /// Known vault names, unique, in creation order.
    vaults: Vec<String>,

    /// Scope for title-based edits.
    active_vault: String,
}

impl VaultManager {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load entries and vault names from `store`.
    ///
    /// The active vault starts as the first known vault.
    pub async fn load(store: Arc<dyn SecretStore>) -> Result<Self> {
        let entries = store.get_entries().await?;
        let mut vaults = store.get_vaults().await?;
        if vaults.is_empty() {
            vaults.push(DEFAULT_VAULT.to_string());
        }
        let active_vault = vaults[0].clone();

        debug!(
            entries = entries.len(),
            vaults = vaults.len(),
            "vault manager loaded"
        );

        Ok(Self {
            store,
            entries,
            vaults,
            active_vault,
        })
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Add a new entry to `vault_name`, returning its id.
    ///
    /// Password and notes are sealed independently.  A vault name that is
    /// not yet known is registered as well.
    pub async fn add_entry(
        &mut self,
        title: &str,
        password: &str,
        notes: &str,
        vault_name: &str,
        key: &DerivedKey,
    ) -> Result<Uuid> {
        validate_title(title)?;
        validate_vault_name(vault_name)?;

        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            encrypted_password: encrypt(password, key)?,
            encrypted_notes: encrypt(notes, key)?,
            vault: vault_name.to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = entry.id;

        if !self.has_vault(vault_name) {
            self.add_vault(vault_name).await?;
        }

        let mut next = self.entries.clone();
        next.push(entry);
        self.commit_entries(next).await?;

        info!(%id, vault = vault_name, "entry added");
        Ok(id)
    }

    /// Replace the first entry titled `title` in the active vault.
    ///
    /// Both fields are re-sealed; `id` and `created_at` are kept.
    pub async fn edit_entry(
        &mut self,
        title: &str,
        new_password: &str,
        new_notes: &str,
        key: &DerivedKey,
    ) -> Result<Uuid> {
        let id = self
            .entries
            .iter()
            .find(|e| e.vault == self.active_vault && e.title == title)
            .map(|e| e.id)
            .ok_or_else(|| {
                VaultError::NotFound(format!(
                    "Entry '{title}' in vault '{}'",
                    self.active_vault
                ))
            })?;

        self.edit_entry_by_id(id, new_password, new_notes, key)
            .await?;
        Ok(id)
    }

    /// Replace the entry with the given id, whatever vault it is in.
    pub async fn edit_entry_by_id(
        &mut self,
        id: Uuid,
        new_password: &str,
        new_notes: &str,
        key: &DerivedKey,
    ) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| VaultError::NotFound(format!("Entry {id}")))?;

        let existing = &self.entries[index];
        let replacement = Entry {
            id,
            title: existing.title.clone(),
            encrypted_password: encrypt(new_password, key)?,
            encrypted_notes: encrypt(new_notes, key)?,
            vault: existing.vault.clone(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let mut next = self.entries.clone();
        next[index] = replacement;
        self.commit_entries(next).await?;

        info!(%id, "entry updated");
        Ok(())
    }

    /// Remove every entry titled `title`, in any vault.
    ///
    /// Returns how many were removed; zero is not an error.
    pub async fn delete_entry(&mut self, title: &str) -> Result<usize> {
        let next: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.title != title)
            .cloned()
            .collect();

        let removed = self.entries.len() - next.len();
        if removed == 0 {
            debug!("delete matched no entries");
            return Ok(0);
        }

        self.commit_entries(next).await?;
        info!(removed, "entries deleted");
        Ok(removed)
    }

    /// Remove the entry with the given id.
    pub async fn delete_entry_by_id(&mut self, id: Uuid) -> Result<()> {
        if !self.entries.iter().any(|e| e.id == id) {
            return Err(VaultError::NotFound(format!("Entry {id}")));
        }

        let next: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.commit_entries(next).await?;

        info!(%id, "entry deleted");
        Ok(())
    }

    /// Decrypt every entry of `vault_name`.
    ///
    /// One decryption future per entry is fanned out and gathered; if any
    /// of them fails the whole call fails and nothing is returned.
    pub async fn list_decrypted(
        &self,
        vault_name: &str,
        key: &DerivedKey,
    ) -> Result<Vec<DecryptedEntry>> {
        let jobs = self
            .entries
            .iter()
            .filter(|e| e.vault == vault_name)
            .map(|entry| async move {
                let password = decrypt(&entry.encrypted_password, key)?;
                let notes = decrypt(&entry.encrypted_notes, key)?;
                Ok::<_, VaultError>(DecryptedEntry {
                    id: entry.id,
                    title: entry.title.clone(),
                    password: password.into(),
                    notes: notes.into(),
                    vault: entry.vault.clone(),
                })
            });

        let decrypted = try_join_all(jobs).await?;
        debug!(vault = vault_name, count = decrypted.len(), "entries decrypted");
        Ok(decrypted)
    }

    // ------------------------------------------------------------------
    // Vault operations
    // ------------------------------------------------------------------

    /// Register a vault name.  Returns `false` if it already existed.
    pub async fn add_vault(&mut self, name: &str) -> Result<bool> {
        validate_vault_name(name)?;
        if self.has_vault(name) {
            return Ok(false);
        }

        let mut next = self.vaults.clone();
        next.push(name.to_string());
        self.store.set_vaults(&next).await?;
        self.vaults = next;

        info!(vault = name, "vault created");
        Ok(true)
    }

    /// Make `name` the scope for title-based edits.
    pub fn select_vault(&mut self, name: &str) -> Result<()> {
        if !self.has_vault(name) {
            return Err(VaultError::NotFound(format!("Vault '{name}'")));
        }
        self.active_vault = name.to_string();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn active_vault(&self) -> &str {
        &self.active_vault
    }

    pub fn vaults(&self) -> &[String] {
        &self.vaults
    }

    /// All sealed entries, across vaults.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn has_vault(&self, name: &str) -> bool {
        self.vaults.iter().any(|v| v == name)
    }

    async fn commit_entries(&mut self, next: Vec<Entry>) -> Result<()> {
        self.store.set_entries(&next).await?;
        self.entries = next;
        Ok(())
    }
}

// ------------------------------------------------------------------
// Validation
// ------------------------------------------------------------------

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(VaultError::Validation("entry title cannot be empty".into()));
    }
    Ok(())
}

fn validate_vault_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::Validation("vault name cannot be empty".into()));
    }
    Ok(())
}
