//! `passvault edit`: replace an entry's password and notes.

use crate::cli::output;
use crate::cli::{read_entry_notes, read_entry_password, unlock, Cli};
use crate::errors::Result;

/// Execute the `edit` command.
///
/// Matches the first entry titled `title` in the chosen vault.
pub async fn execute(
    cli: &Cli,
    title: &str,
    vault: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let mut unlocked = unlock(cli).await?;
    let vault = unlocked.vault_or_default(vault);
    unlocked.manager.select_vault(&vault)?;

    let password = read_entry_password(title)?;
    let notes = read_entry_notes(notes)?;

    let key = unlocked.session.key()?;
    let id = unlocked
        .manager
        .edit_entry(title, &password, &notes, key)
        .await?;

    output::success(&format!("Entry '{title}' updated ({id})"));
    Ok(())
}
