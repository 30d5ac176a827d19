//! `passvault copy`: put an entry's password on the clipboard.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `copy` command.
pub async fn execute(cli: &Cli, title: &str, vault: Option<&str>) -> Result<()> {
    let mut unlocked = unlock(cli).await?;
    let vault = unlocked.vault_or_default(vault);

    let key = unlocked.session.key()?;
    let entries = unlocked.manager.list_decrypted(&vault, key).await?;
    let entry = entries
        .iter()
        .find(|e| e.title == title)
        .ok_or_else(|| VaultError::NotFound(format!("Entry '{title}' in vault '{vault}'")))?;

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(entry.password.as_str())
        .map_err(|e| VaultError::CommandFailed(format!("clipboard write failed: {e}")))?;

    output::success(&format!("Password for '{title}' copied to clipboard"));
    Ok(())
}
