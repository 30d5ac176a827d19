//! `passvault delete`: remove entries by title, or one entry by id.

use dialoguer::Confirm;
use uuid::Uuid;

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `delete` command.
pub async fn execute(cli: &Cli, target: &str, by_id: bool, force: bool) -> Result<()> {
    let id = if by_id {
        Some(
            Uuid::parse_str(target)
                .map_err(|e| VaultError::Validation(format!("invalid entry id '{target}': {e}")))?,
        )
    } else {
        None
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let prompt = match id {
            Some(id) => format!("Delete entry {id}?"),
            None => format!("Delete every entry titled '{target}'?"),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut unlocked = unlock(cli).await?;

    match id {
        Some(id) => {
            unlocked.manager.delete_entry_by_id(id).await?;
            output::success(&format!("Deleted entry {id}"));
        }
        None => {
            let removed = unlocked.manager.delete_entry(target).await?;
            if removed == 0 {
                output::info(&format!("No entries titled '{target}'"));
            } else {
                output::success(&format!("Deleted {removed} entry(ies) titled '{target}'"));
            }
        }
    }

    Ok(())
}
