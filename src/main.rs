use clap::Parser;
use passvault::cli::commands;
use passvault::cli::{Cli, Commands, VaultAction};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    passvault::logging::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli).await,
        Commands::Add {
            ref title,
            ref vault,
            ref notes,
        } => commands::add::execute(&cli, title, vault.as_deref(), notes.as_deref()).await,
        Commands::Edit {
            ref title,
            ref vault,
            ref notes,
        } => commands::edit::execute(&cli, title, vault.as_deref(), notes.as_deref()).await,
        Commands::Delete {
            ref target,
            id,
            force,
        } => commands::delete::execute(&cli, target, id, force).await,
        Commands::List { ref vault, show } => {
            commands::list::execute(&cli, vault.as_deref(), show).await
        }
        Commands::Copy {
            ref title,
            ref vault,
        } => commands::copy::execute(&cli, title, vault.as_deref()).await,
        Commands::Vault { ref action } => match action {
            VaultAction::Add { ref name } => commands::vault::execute_add(&cli, name).await,
            VaultAction::List => commands::vault::execute_list(&cli).await,
        },
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
