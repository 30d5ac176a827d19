//! Per-field hybrid encryption envelope.
//!
//! Every sensitive field is sealed independently:
//!
//! 1. X25519 encapsulation against the recipient derived from the key.
//! 2. HKDF-SHA256 turns the shared secret into an AES-256-GCM key, salted
//!    with the encapsulated key and the recipient public key.
//! 3. AES-256-GCM with a fresh random 12-byte nonce.  The encapsulated key
//!    is bound in as associated data.
//!
//! The wire record keeps the three parts as base64 strings:
//!
//! ```text
//! { "encryptedData": "...", "encapsulatedKey": "...", "iv": "..." }
//! ```

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::kem::{Recipient, ENCAPSULATED_KEY_LEN};
use super::keys::{hkdf_expand, DerivedKey};
use crate::errors::{VaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

const AEAD_INFO: &[u8] = b"passvault-envelope-aead";

/// The at-rest representation of one encrypted field.
///
/// Fields stay base64-encoded exactly as stored; decoding happens in
/// [`decrypt`] so a malformed field surfaces as `DecryptionFailed` for
/// that field only.  Missing fields deserialize as empty strings for the
/// same reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionEnvelope {
    #[serde(default)]
    encrypted_data: String,
    #[serde(default)]
    encapsulated_key: String,
    #[serde(default)]
    iv: String,
}

impl EncryptionEnvelope {
    /// Assemble an envelope from raw parts.
    pub fn from_parts(ciphertext: &[u8], encapsulated_key: &[u8], iv: &[u8]) -> Self {
        Self {
            encrypted_data: BASE64.encode(ciphertext),
            encapsulated_key: BASE64.encode(encapsulated_key),
            iv: BASE64.encode(iv),
        }
    }

    /// AEAD ciphertext including the tag.
    pub fn ciphertext(&self) -> Result<Vec<u8>> {
        decode_field(&self.encrypted_data)
    }

    /// KEM ciphertext (the ephemeral public key).
    pub fn encapsulated_key(&self) -> Result<Vec<u8>> {
        decode_field(&self.encapsulated_key)
    }

    /// Nonce used for this envelope.
    pub fn iv(&self) -> Result<Vec<u8>> {
        decode_field(&self.iv)
    }

    /// Serialize to the JSON wire record.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VaultError::SerializationError(format!("envelope: {e}")))
    }

    /// Parse a JSON wire record.  Anything unparseable is a decryption failure.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|_| VaultError::DecryptionFailed)
    }
}

fn decode_field(field: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(field)
        .map_err(|_| VaultError::DecryptionFailed)
}

fn aead_cipher(shared: &[u8], encapsulated: &[u8], recipient: &Recipient) -> Result<Aes256Gcm> {
    let mut salt = Vec::with_capacity(ENCAPSULATED_KEY_LEN * 2);
    salt.extend_from_slice(encapsulated);
    salt.extend_from_slice(recipient.public_bytes());

    let aead_key = hkdf_expand(Some(&salt), shared, AEAD_INFO)?;
    Aes256Gcm::new_from_slice(&aead_key[..])
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))
}

/// Seal `plaintext` under `key`.
pub fn encrypt(plaintext: &str, key: &DerivedKey) -> Result<EncryptionEnvelope> {
    let recipient = Recipient::from_key(key)?;
    let (shared, encapsulated) = recipient.encapsulate()?;
    let cipher = aead_cipher(&shared[..], &encapsulated, &recipient)?;

    // Fresh random nonce for every call.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext.as_bytes(),
                aad: &encapsulated,
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(EncryptionEnvelope::from_parts(
        &ciphertext,
        &encapsulated,
        nonce.as_slice(),
    ))
}

/// Open an envelope produced by [`encrypt`].
///
/// Either the exact original plaintext comes back or `DecryptionFailed`.
pub fn decrypt(envelope: &EncryptionEnvelope, key: &DerivedKey) -> Result<String> {
    let ciphertext = envelope.ciphertext()?;
    let encapsulated = envelope.encapsulated_key()?;
    let iv = envelope.iv()?;

    if iv.len() != NONCE_LEN
        || encapsulated.len() != ENCAPSULATED_KEY_LEN
        || ciphertext.len() < TAG_LEN
    {
        return Err(VaultError::DecryptionFailed);
    }

    let recipient = Recipient::from_key(key)?;
    let shared = recipient.decapsulate(&encapsulated)?;
    let cipher = aead_cipher(&shared[..], &encapsulated, &recipient)
        .map_err(|_| VaultError::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &ciphertext,
                aad: &encapsulated,
            },
        )
        .map_err(|_| VaultError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::DecryptionFailed
    })
}
