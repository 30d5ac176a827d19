//! X25519 key encapsulation.
//!
//! The recipient's static secret is expanded from the derived key, so
//! anyone holding the key can decapsulate.  Each encapsulation uses a
//! fresh ephemeral secret; its public half is the encapsulated key.

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{VaultError, Result};

/// Length of an encapsulated key (an X25519 public key).
pub const ENCAPSULATED_KEY_LEN: usize = 32;

/// Recipient key pair derived from a [`DerivedKey`].
pub struct Recipient {
    secret: StaticSecret,
    public: PublicKey,
}

impl Recipient {
    /// Build the recipient key pair bound to `key`.
    pub fn from_key(key: &DerivedKey) -> Result<Self> {
        let seed = key.recipient_secret()?;
        let secret = StaticSecret::from(*seed);
        let public = PublicKey::from(&secret);
        Ok(Self { secret, public })
    }

    /// The recipient public key bytes.
    pub fn public_bytes(&self) -> &[u8; 32] {
        self.public.as_bytes()
    }

    /// Produce a fresh shared secret and the encapsulated key that carries it.
    pub fn encapsulate(&self) -> Result<(Zeroizing<[u8; 32]>, [u8; ENCAPSULATED_KEY_LEN])> {
        let mut seed = Zeroizing::new([0u8; KEY_LEN]);
        rand::rng().fill_bytes(&mut seed[..]);

        let ephemeral = StaticSecret::from(*seed);
        let encapsulated = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.public);

        if !shared.was_contributory() {
            return Err(VaultError::EncryptionFailed(
                "KEM produced a non-contributory shared secret".into(),
            ));
        }

        Ok((Zeroizing::new(shared.to_bytes()), encapsulated.to_bytes()))
    }

    /// Recover the shared secret from an encapsulated key.
    ///
    /// Low-order points are rejected; any other bytes yield *some*
    /// secret, and a wrong one is caught by the AEAD tag downstream.
    pub fn decapsulate(&self, encapsulated: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
        let bytes: [u8; ENCAPSULATED_KEY_LEN] = encapsulated
            .try_into()
            .map_err(|_| VaultError::DecryptionFailed)?;

        let shared = self.secret.diffie_hellman(&PublicKey::from(bytes));
        if !shared.was_contributory() {
            return Err(VaultError::DecryptionFailed);
        }

        Ok(Zeroizing::new(shared.to_bytes()))
    }
}
