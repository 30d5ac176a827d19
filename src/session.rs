//! Unlock state machine.
//!
//! A `Session` is either `Locked` or `Unlocked`.  Unlocking on first run
//! establishes the master commitment; afterwards it authenticates against
//! it.  The derived key exists only inside the `Unlocked` state and is
//! lent out by reference.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{derive_async, generate_salt, Argon2Params, DerivedKey, MasterCredential};
use crate::errors::{VaultError, Result};
use crate::store::SecretStore;

/// How a successful unlock came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// No commitment existed; one was created from this password.
    Initialized,
    /// The password matched the stored commitment.
    Authenticated,
}

enum LockState {
    Locked,
    Unlocked {
        key: DerivedKey,
        last_activity: Instant,
    },
}

/// The single owner of the derived key.
pub struct Session {
    store: Arc<dyn SecretStore>,

    /// Cost parameters for a first-run derivation.  Later unlocks use the
    /// parameters recorded in the commitment.
    params: Argon2Params,

    /// Idle window after which the key is discarded.  `None` = never.
    auto_lock: Option<Duration>,

    state: LockState,
}

impl Session {
    /// Create a locked session over `store`.
    pub fn new(store: Arc<dyn SecretStore>, params: Argon2Params) -> Self {
        Self {
            store,
            params,
            auto_lock: None,
            state: LockState::Locked,
        }
    }

    /// Lock automatically once the key has been idle for `idle`.
    pub fn with_auto_lock(mut self, idle: Duration) -> Self {
        self.auto_lock = Some(idle);
        self
    }

    /// Attempt to unlock with `password`.
    ///
    /// Any previously held key is discarded first, so a failed attempt
    /// always leaves the session locked.
    pub async fn unlock(&mut self, password: &str) -> Result<UnlockOutcome> {
        self.lock();

        let password = Zeroizing::new(password.to_string());
        let outcome = match self.store.get_master_commitment().await? {
            None => {
                let salt = generate_salt().to_vec();
                let derived = derive_async(password, salt, self.params).await?;
                self.store.set_master_commitment(&derived.commitment).await?;
                info!("master password set");
                self.enter_unlocked(derived.key);
                UnlockOutcome::Initialized
            }
            Some(stored) => {
                let credential = MasterCredential::parse(&stored)?;
                let derived =
                    derive_async(password, credential.salt.clone(), credential.params).await?;

                if !credential.matches(&derived.key)? {
                    warn!("unlock rejected: wrong master password");
                    return Err(VaultError::AuthenticationFailed);
                }
                debug!("master password verified");
                self.enter_unlocked(derived.key);
                UnlockOutcome::Authenticated
            }
        };

        Ok(outcome)
    }

    /// Discard the key.  Locking a locked session is a no-op.
    pub fn lock(&mut self) {
        if matches!(self.state, LockState::Unlocked { .. }) {
            debug!("session locked");
        }
        // Dropping the old state zeroizes the key.
        self.state = LockState::Locked;
    }

    /// Whether the session currently holds no usable key.
    ///
    /// An elapsed idle window discards the key here as well.
    pub fn is_locked(&mut self) -> bool {
        self.expire_if_idle();
        matches!(self.state, LockState::Locked)
    }

    /// Borrow the key, refreshing the idle timer.
    ///
    /// Returns `Locked` when locked, including when the idle window has
    /// just elapsed (in which case the key is discarded now).
    pub fn key(&mut self) -> Result<&DerivedKey> {
        self.expire_if_idle();

        match &mut self.state {
            LockState::Unlocked { key, last_activity } => {
                *last_activity = Instant::now();
                Ok(key)
            }
            LockState::Locked => Err(VaultError::Locked),
        }
    }

    fn expire_if_idle(&mut self) {
        let expired = match &self.state {
            LockState::Locked => false,
            LockState::Unlocked { last_activity, .. } => self.idle_expired(*last_activity),
        };
        if expired {
            info!("session auto-locked after idle timeout");
            self.lock();
        }
    }

    fn idle_expired(&self, last_activity: Instant) -> bool {
        self.auto_lock
            .is_some_and(|idle| last_activity.elapsed() >= idle)
    }

    fn enter_unlocked(&mut self, key: DerivedKey) {
        self.state = LockState::Unlocked {
            key,
            last_activity: Instant::now(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_MEMORY_KIB;
    use crate::store::MemoryStore;

    fn fast_params() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn starts_locked() {
        let mut session = Session::new(Arc::new(MemoryStore::new()), fast_params());
        assert!(session.is_locked());
        assert!(matches!(session.key(), Err(VaultError::Locked)));
    }

    #[tokio::test]
    async fn failed_reunlock_leaves_session_locked() {
        let mut session = Session::new(Arc::new(MemoryStore::new()), fast_params());
        session.unlock("first-password").await.unwrap();
        assert!(!session.is_locked());

        let err = session.unlock("other-password").await.unwrap_err();
        assert!(matches!(err, VaultError::AuthenticationFailed));
        assert!(session.is_locked());
    }

    #[tokio::test]
    async fn zero_idle_window_locks_on_next_use() {
        let mut session = Session::new(Arc::new(MemoryStore::new()), fast_params())
            .with_auto_lock(Duration::ZERO);
        session.unlock("pw-auto-lock").await.unwrap();

        assert!(session.is_locked());
        assert!(matches!(session.key(), Err(VaultError::Locked)));
    }

    #[tokio::test]
    async fn idle_check_discards_the_key() {
        let mut session = Session::new(Arc::new(MemoryStore::new()), fast_params())
            .with_auto_lock(Duration::ZERO);
        session.unlock("pw-auto-lock").await.unwrap();
        assert!(matches!(session.state, LockState::Unlocked { .. }));

        assert!(session.is_locked());
        assert!(matches!(session.state, LockState::Locked));
    }

    #[tokio::test]
    async fn activity_within_window_keeps_session_open() {
        let mut session = Session::new(Arc::new(MemoryStore::new()), fast_params())
            .with_auto_lock(Duration::from_secs(3600));
        session.unlock("pw-auto-lock").await.unwrap();

        assert!(!session.is_locked());
        assert!(session.key().is_ok());
        assert!(matches!(session.state, LockState::Unlocked { .. }));
    }
}
