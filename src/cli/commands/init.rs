//! `passvault init`: set the master password on first run, or check it.

use crate::cli::output;
use crate::cli::{data_dir, unlock, Cli};
use crate::errors::Result;
use crate::session::UnlockOutcome;

/// Execute the `init` command.
pub async fn execute(cli: &Cli) -> Result<()> {
    let unlocked = unlock(cli).await?;

    match unlocked.outcome {
        UnlockOutcome::Initialized => {
            output::success(&format!(
                "Master password set. Store: {}",
                unlocked.settings.store_path(&data_dir(cli)).display()
            ));
            output::tip("Run `passvault add <TITLE>` to add your first entry.");
        }
        UnlockOutcome::Authenticated => {
            output::info("Master password already set and verified.");
        }
    }

    Ok(())
}
