//! Vault module: entries grouped into named vaults.
//!
//! This module provides:
//! - `Entry` and `DecryptedEntry` types (`entry`)
//! - `VaultManager` for adding, editing, deleting and listing entries (`manager`)

pub mod entry;
pub mod manager;

// Re-export the most commonly used items.
pub use entry::{DecryptedEntry, Entry};
pub use manager::VaultManager;
