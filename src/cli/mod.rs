//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{default_data_dir, Settings};
use crate::errors::{VaultError, Result};
use crate::session::{Session, UnlockOutcome};
use crate::store::{JsonFileStore, SecretStore};
use crate::vault::VaultManager;

/// Minimum password length to prevent trivially weak master passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// passvault CLI: local credential vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local credential vault with per-field encryption",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding passvault.toml and the store
    #[arg(long, env = "PASSVAULT_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set the master password (first run) or check it
    Init,

    /// Add an entry
    Add {
        /// Entry title (e.g. GitHub)
        title: String,
        /// Vault to add to (default from config)
        #[arg(long)]
        vault: Option<String>,
        /// Free-form notes (omit for interactive prompt)
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Replace an entry's password and notes
    Edit {
        /// Title of the entry to edit
        title: String,
        /// Vault the entry lives in (default from config)
        #[arg(long)]
        vault: Option<String>,
        /// New notes (omit for interactive prompt)
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete entries by title, or a single entry by id
    Delete {
        /// Entry title, or entry id with --id
        target: String,
        /// Treat TARGET as an entry id
        #[arg(long)]
        id: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List the entries of a vault
    List {
        /// Vault to list (default from config)
        #[arg(long)]
        vault: Option<String>,
        /// Show passwords instead of masking them
        #[arg(long)]
        show: bool,
    },

    /// Copy an entry's password to the clipboard
    Copy {
        /// Entry title
        title: String,
        /// Vault the entry lives in (default from config)
        #[arg(long)]
        vault: Option<String>,
    },

    /// Manage vaults (add, list)
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

/// Vault subcommands.
#[derive(clap::Subcommand)]
pub enum VaultAction {
    /// Create a vault (no-op if it exists)
    Add {
        /// Vault name
        name: String,
    },

    /// List all vaults
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs once the master password has been accepted.
pub struct Unlocked {
    pub outcome: UnlockOutcome,
    pub settings: Settings,
    pub session: Session,
    pub manager: VaultManager,
}

impl Unlocked {
    /// The vault named on the command line, or the configured default.
    pub fn vault_or_default(&self, vault: Option<&str>) -> String {
        vault.map_or_else(|| self.settings.default_vault.clone(), str::to_string)
    }
}

/// Resolve the data directory from the CLI arguments.
pub fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(default_data_dir)
}

/// Load settings, open the store, and unlock a session.
///
/// On first run the password is prompted with confirmation and becomes the
/// master password.
pub async fn unlock(cli: &Cli) -> Result<Unlocked> {
    let dir = data_dir(cli);
    let settings = Settings::load(&dir)?;
    let store: Arc<dyn SecretStore> = Arc::new(JsonFileStore::new(settings.store_path(&dir)));

    let first_run = store.get_master_commitment().await?.is_none();
    let password = if first_run {
        prompt_new_password()?
    } else {
        prompt_password()?
    };

    let mut session = Session::new(Arc::clone(&store), settings.argon2_params());
    if let Some(idle) = settings.auto_lock() {
        session = session.with_auto_lock(idle);
    }
    let outcome = session.unlock(&password).await?;

    let manager = VaultManager::load(store).await?;

    Ok(Unlocked {
        outcome,
        settings,
        session,
        manager,
    })
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (first run).
///
/// Also respects `PASSVAULT_PASSWORD`.  Enforces a minimum length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.chars().count() < MIN_PASSWORD_LEN {
            return Err(VaultError::Validation(format!(
                "master password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Read an entry's password: piped stdin if present, otherwise a hidden prompt.
///
/// Piped input loses at most one trailing line ending; any other
/// whitespace is part of the password.
pub fn read_entry_password(title: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let kept = strip_line_ending(&buf).len();
        buf.truncate(kept);
        return Ok(buf);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {title}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

/// Notes from the command line, or an interactive prompt when attached to a terminal.
pub fn read_entry_notes(notes: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(n) = notes {
        return Ok(Zeroizing::new(n.to_string()));
    }
    if !io::stdin().is_terminal() {
        return Ok(Zeroizing::new(String::new()));
    }

    let n: String = dialoguer::Input::new()
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(n))
}
