//! `passvault vault add|list`: manage vault names.

use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute `vault add`.
pub async fn execute_add(cli: &Cli, name: &str) -> Result<()> {
    let mut unlocked = unlock(cli).await?;

    if unlocked.manager.add_vault(name).await? {
        output::success(&format!("Vault '{name}' created"));
    } else {
        output::info(&format!("Vault '{name}' already exists"));
    }
    Ok(())
}

/// Execute `vault list`.
pub async fn execute_list(cli: &Cli) -> Result<()> {
    let unlocked = unlock(cli).await?;
    output::print_vaults_table(unlocked.manager.vaults(), &unlocked.settings.default_vault);
    Ok(())
}
