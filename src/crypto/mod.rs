//! Cryptographic primitives for passvault.
//!
//! This module provides:
//! - Argon2id master-key derivation and the stored commitment (`kdf`)
//! - The zeroizing `DerivedKey` and HKDF/HMAC sub-key helpers (`keys`)
//! - X25519 key encapsulation (`kem`)
//! - The per-field hybrid envelope, X25519 + AES-256-GCM (`envelope`)

pub mod envelope;
pub mod kdf;
pub mod kem;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive, ...};
pub use envelope::{decrypt, encrypt, EncryptionEnvelope};
pub use kdf::{derive, derive_async, generate_salt, Argon2Params, Derivation, MasterCredential};
pub use keys::DerivedKey;
