//! `passvault list`: decrypt and display a vault's entries.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub async fn execute(cli: &Cli, vault: Option<&str>, show: bool) -> Result<()> {
    let mut unlocked = unlock(cli).await?;
    let vault = unlocked.vault_or_default(vault);

    let key = unlocked.session.key()?;
    let entries = unlocked.manager.list_decrypted(&vault, key).await?;

    output::info(&format!("{vault}: {} entry(ies)", entries.len()));
    output::print_entries_table(&entries, show);

    Ok(())
}
