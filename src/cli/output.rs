//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::DecryptedEntry;

/// Shown in place of a password unless `--show` is passed.
const MASK: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of decrypted entries (Id, Title, Password, Notes).
pub fn print_entries_table(entries: &[DecryptedEntry], show_passwords: bool) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `passvault add <TITLE>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Title", "Password", "Notes"]);

    for e in entries {
        let password = if show_passwords {
            e.password.as_str()
        } else {
            MASK
        };
        table.add_row(vec![
            e.id.to_string(),
            e.title.clone(),
            password.to_string(),
            e.notes.as_str().to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a two-column table of vault names, with a marker beside the default.
pub fn print_vaults_table(vaults: &[String], default_vault: &str) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault", ""]);

    for v in vaults {
        let marker = if v == default_vault { "default" } else { "" };
        table.add_row(vec![v.as_str(), marker]);
    }

    println!("{table}");
}
