//! Key material helpers built on HKDF-SHA256 and HMAC-SHA256.
//!
//! From the single Argon2id-derived master key we derive:
//! - The **recipient secret** used by the envelope KEM.
//! - A **commitment tag** that proves knowledge of the key without
//!   revealing it.
//!
//! Per-envelope AEAD keys are also expanded here from KEM shared secrets.

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{VaultError, Result};

/// Length of the derived key and of every sub-key (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the commitment tag (HMAC-SHA256 output).
pub const COMMITMENT_TAG_LEN: usize = 32;

const RECIPIENT_INFO: &[u8] = b"passvault-kem-recipient";
const COMMITMENT_LABEL: &[u8] = b"passvault-master-commitment";

/// The 32-byte symmetric key derived from the master password.
///
/// Deliberately not `Clone`: the only owner is the unlocked session,
/// everything else borrows it.  Memory is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the static X25519 secret this key stands for as a KEM recipient.
    pub fn recipient_secret(&self) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        hkdf_expand(None, &self.bytes, RECIPIENT_INFO)
    }

    /// Compute the one-way commitment tag over this key and `salt`.
    pub fn commitment_tag(&self, salt: &[u8]) -> Result<[u8; COMMITMENT_TAG_LEN]> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.bytes)
            .map_err(|e| VaultError::DerivationFailed(format!("invalid HMAC key: {e}")))?;
        mac.update(COMMITMENT_LABEL);
        mac.update(salt);

        let mut tag = [0u8; COMMITMENT_TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(tag)
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Expand `ikm` into a 32-byte sub-key bound to `info`.
///
/// The result is wrapped in `Zeroizing` so intermediate keys never linger.
pub fn hkdf_expand(
    salt: Option<&[u8]>,
    ikm: &[u8],
    info: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info, &mut okm[..])
        .map_err(|e| VaultError::DerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}
