//! `passvault add`: seal a new entry into a vault.

use crate::cli::output;
use crate::cli::{read_entry_notes, read_entry_password, unlock, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub async fn execute(
    cli: &Cli,
    title: &str,
    vault: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let password = read_entry_password(title)?;
    let notes = read_entry_notes(notes)?;

    let mut unlocked = unlock(cli).await?;
    let vault = unlocked.vault_or_default(vault);

    let key = unlocked.session.key()?;
    unlocked
        .manager
        .add_entry(title, &password, &notes, &vault, key)
        .await?;

    output::success(&format!("Entry '{title}' added to vault '{vault}'"));
    Ok(())
}
