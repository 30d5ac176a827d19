use thiserror::Error;

/// All errors that can occur in passvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Authentication failed: wrong master password")]
    AuthenticationFailed,

    #[error("Decryption failed: envelope is corrupted, tampered, or sealed under another key")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Stored master credential is malformed: {0}")]
    InvalidCredential(String),

    // --- Session errors ---
    #[error("Vault is locked, unlock it with the master password first")]
    Locked,

    // --- Vault errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    // --- Store errors ---
    #[error("Store error: {0}")]
    StoreError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for passvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
