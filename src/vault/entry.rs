//! Entry and DecryptedEntry types.
//!
//! An `Entry` is what crosses the store boundary: both sensitive fields
//! are sealed envelopes.  A `DecryptedEntry` only exists for the duration
//! of a listing and wipes its plaintext on drop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::EncryptionEnvelope;

/// A single stored credential.
///
/// `id` is the stable identity; `title` is a display field and may be
/// shared by several entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,

    pub title: String,

    /// Sealed password.
    #[serde(rename = "password")]
    pub encrypted_password: EncryptionEnvelope,

    /// Sealed free-form notes.
    #[serde(rename = "notes")]
    pub encrypted_notes: EncryptionEnvelope,

    /// Name of the vault this entry belongs to.
    pub vault: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Plaintext view of an entry, returned by `VaultManager::list_decrypted`.
#[derive(Clone)]
pub struct DecryptedEntry {
    pub id: Uuid,
    pub title: String,
    pub password: Zeroizing<String>,
    pub notes: Zeroizing<String>,
    pub vault: String,
}

impl std::fmt::Debug for DecryptedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("password", &"<redacted>")
            .field("notes", &"<redacted>")
            .field("vault", &self.vault)
            .finish()
    }
}
