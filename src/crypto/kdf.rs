//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The derivation yields the 32-byte session key and
//! a textual commitment that is safe to persist.
//!
//! Commitment layout (base64 without padding):
//!
//! ```text
//! $passvault$v=1$m=<memory_kib>,t=<iterations>,p=<parallelism>$<salt>$<tag>
//! ```
//!
//! The salt and cost parameters travel with the commitment so that a
//! later unlock re-derives with exactly the same inputs.

use std::fmt;

use argon2::{Algorithm, Argon2, Block, Params, Version};
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use base64::Engine;
use rand::RngCore;
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use super::keys::{DerivedKey, COMMITMENT_TAG_LEN, KEY_LEN};
use crate::errors::{VaultError, Result};

/// Length of the per-installation salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Shortest salt Argon2 accepts.
const MIN_SALT_LEN: usize = 8;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

const COMMITMENT_SCHEME: &str = "passvault";
const COMMITMENT_VERSION: u32 = 1;

/// Argon2id cost parameters.
///
/// These map 1:1 to the fields in `Settings` and are embedded in every
/// commitment so an unlock always uses the parameters it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::DerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(VaultError::DerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(VaultError::DerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output of one key derivation.
#[derive(Debug)]
pub struct Derivation {
    pub key: DerivedKey,
    pub commitment: String,
}

/// Derive the session key and its commitment from a password and salt.
///
/// The same password + salt + params always produce the same output.
/// The Argon2 working memory is reserved up front, so a host that cannot
/// provide it yields `DerivationFailed` instead of aborting.
pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Derivation> {
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::DerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let block_count = argon2_params.block_count();
    let mut blocks: Vec<Block> = Vec::new();
    blocks.try_reserve_exact(block_count).map_err(|_| {
        VaultError::DerivationFailed(format!(
            "cannot allocate {} KiB of Argon2 memory",
            params.memory_kib
        ))
    })?;
    blocks.resize(block_count, Block::default());

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut raw = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into_with_memory(password, salt, &mut raw[..], blocks.as_mut_slice())
        .map_err(|e| VaultError::DerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let key = DerivedKey::new(*raw);
    let credential = MasterCredential {
        params: *params,
        salt: salt.to_vec(),
        tag: key.commitment_tag(salt)?,
    };

    Ok(Derivation {
        key,
        commitment: credential.to_string(),
    })
}

/// Run [`derive`] on the blocking thread pool so async callers suspend
/// instead of stalling the runtime.
pub async fn derive_async(
    password: Zeroizing<String>,
    salt: Vec<u8>,
    params: Argon2Params,
) -> Result<Derivation> {
    debug!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "deriving master key"
    );
    tokio::task::spawn_blocking(move || derive(password.as_bytes(), &salt, &params))
        .await
        .map_err(|e| VaultError::DerivationFailed(format!("derivation worker failed: {e}")))?
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Parsed form of a stored commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCredential {
    pub params: Argon2Params,
    pub salt: Vec<u8>,
    tag: [u8; COMMITMENT_TAG_LEN],
}

impl MasterCredential {
    /// Parse a commitment string produced by [`derive`].
    pub fn parse(encoded: &str) -> Result<Self> {
        let invalid = |msg: &str| VaultError::InvalidCredential(msg.to_string());

        let mut parts = encoded.split('$');
        if parts.next() != Some("") || parts.next() != Some(COMMITMENT_SCHEME) {
            return Err(invalid("unknown commitment scheme"));
        }

        let version = parts
            .next()
            .and_then(|v| v.strip_prefix("v="))
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| invalid("missing version"))?;
        if version != COMMITMENT_VERSION {
            return Err(VaultError::InvalidCredential(format!(
                "unsupported version {version}, expected {COMMITMENT_VERSION}"
            )));
        }

        let params = parse_params(parts.next().ok_or_else(|| invalid("missing parameters"))?)
            .ok_or_else(|| invalid("bad parameters"))?;

        let salt = parts
            .next()
            .and_then(|s| B64.decode(s).ok())
            .filter(|s| s.len() >= MIN_SALT_LEN)
            .ok_or_else(|| invalid("bad salt"))?;

        let tag: [u8; COMMITMENT_TAG_LEN] = parts
            .next()
            .and_then(|t| B64.decode(t).ok())
            .and_then(|t| t.try_into().ok())
            .ok_or_else(|| invalid("bad tag"))?;

        if parts.next().is_some() {
            return Err(invalid("trailing fields"));
        }

        Ok(Self { params, salt, tag })
    }

    /// Check whether `key` matches this commitment in constant time.
    pub fn matches(&self, key: &DerivedKey) -> Result<bool> {
        let candidate = key.commitment_tag(&self.salt)?;
        Ok(candidate[..].ct_eq(&self.tag[..]).into())
    }
}

impl fmt::Display for MasterCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${COMMITMENT_SCHEME}$v={COMMITMENT_VERSION}$m={},t={},p={}${}${}",
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            B64.encode(&self.salt),
            B64.encode(self.tag),
        )
    }
}

fn parse_params(field: &str) -> Option<Argon2Params> {
    let mut memory_kib = None;
    let mut iterations = None;
    let mut parallelism = None;

    for pair in field.split(',') {
        let (name, value) = pair.split_once('=')?;
        let value = value.parse::<u32>().ok()?;
        match name {
            "m" => memory_kib = Some(value),
            "t" => iterations = Some(value),
            "p" => parallelism = Some(value),
            _ => return None,
        }
    }

    Some(Argon2Params {
        memory_kib: memory_kib?,
        iterations: iterations?,
        parallelism: parallelism?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn rejects_weak_params() {
        let weak = Argon2Params {
            memory_kib: 1024,
            ..fast_params()
        };
        let err = derive(b"pw", &[0u8; SALT_LEN], &weak).unwrap_err();
        assert!(matches!(err, VaultError::DerivationFailed(_)));

        let no_iterations = Argon2Params {
            iterations: 0,
            ..fast_params()
        };
        assert!(derive(b"pw", &[0u8; SALT_LEN], &no_iterations).is_err());
    }

    #[test]
    fn commitment_round_trips_through_parse() {
        let salt = generate_salt();
        let out = derive(b"correct-horse", &salt, &fast_params()).unwrap();

        let parsed = MasterCredential::parse(&out.commitment).unwrap();
        assert_eq!(parsed.params, fast_params());
        assert_eq!(parsed.salt, salt.to_vec());
        assert_eq!(parsed.to_string(), out.commitment);
        assert!(parsed.matches(&out.key).unwrap());
    }

    #[test]
    fn commitment_does_not_embed_key() {
        let out = derive(b"pw-embed", &generate_salt(), &fast_params()).unwrap();
        let key_b64 = B64.encode(out.key.as_bytes());
        assert!(!out.commitment.contains(&key_b64));
    }

    #[test]
    fn parse_rejects_malformed_commitments() {
        for bad in [
            "",
            "plain-text",
            "$argon2id$v=19$m=8192,t=1,p=1$c2FsdA$dGFn",
            "$passvault$v=2$m=8192,t=1,p=1$c2FsdHNhbHQ$AAAA",
            "$passvault$v=1$m=8192,t=1$c2FsdHNhbHQ$AAAA",
            "$passvault$v=1$m=8192,t=1,p=1$$AAAA",
            "$passvault$v=1$m=8192,t=1,p=1$c2FsdHNhbHQ$not-base64!",
        ] {
            assert!(
                matches!(
                    MasterCredential::parse(bad),
                    Err(VaultError::InvalidCredential(_))
                ),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_salt_argon2_cannot_use() {
        let tag = B64.encode([0u8; COMMITMENT_TAG_LEN]);
        let short = format!("$passvault$v=1$m=8192,t=1,p=1${}${tag}", B64.encode([0u8; 6]));
        assert!(matches!(
            MasterCredential::parse(&short),
            Err(VaultError::InvalidCredential(_))
        ));

        let minimal = format!(
            "$passvault$v=1$m=8192,t=1,p=1${}${tag}",
            B64.encode([0u8; MIN_SALT_LEN])
        );
        assert!(MasterCredential::parse(&minimal).is_ok());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
