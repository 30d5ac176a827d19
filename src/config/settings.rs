use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::Argon2Params;
use crate::errors::{VaultError, Result};

/// Installation-level configuration, loaded from `<data_dir>/passvault.toml`.
///
/// Every field has a sensible default so passvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name (relative to the data dir) of the JSON store.
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Vault used when a command does not name one.
    #[serde(default = "default_vault")]
    pub default_vault: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Lock the session after this many idle seconds.  Unset = never.
    #[serde(default)]
    pub auto_lock_secs: Option<u64>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store_file() -> String {
    "store.json".to_string()
}

fn default_vault() -> String {
    crate::store::DEFAULT_VAULT.to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            default_vault: default_vault(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            auto_lock_secs: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data dir.
    pub const FILE_NAME: &'static str = "passvault.toml";

    /// Load settings from `<data_dir>/passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the JSON store.
    ///
    /// Example: `data_dir/store.json`
    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.store_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Idle auto-lock window, if configured.
    pub fn auto_lock(&self) -> Option<Duration> {
        self.auto_lock_secs.map(Duration::from_secs)
    }
}

/// Platform default data directory, e.g. `~/.local/share/passvault`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("passvault")
}

// ── Tests ────────────────────────────────────────────────────────────
