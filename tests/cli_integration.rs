//! Integration tests for the passvault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master password comes from `PASSVAULT_PASSWORD` and each test gets its
//! own data directory with a cheap Argon2 configuration.

use std::sync::Arc;

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use passvault::config::Settings;
use passvault::session::Session;
use passvault::store::{JsonFileStore, SecretStore};
use passvault::vault::VaultManager;
use predicates::prelude::*;

const MASTER: &str = "correct horse battery";

/// Helper: get a Command pointing at the passvault binary.
fn passvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("passvault").expect("binary should exist")
}

/// A data dir whose config keeps key derivation fast.
fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("passvault.toml")
        .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n")
        .unwrap();
    dir
}

/// A command bound to `dir` and the test master password.
fn cmd(dir: &TempDir) -> Command {
    let mut c = passvault();
    c.env("PASSVAULT_PASSWORD", MASTER)
        .env_remove("PASSVAULT_DIR")
        .arg("--data-dir")
        .arg(dir.path());
    c
}

#[test]
fn help_flag_shows_usage() {
    passvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local credential vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("vault"));
}

#[test]
fn version_flag_shows_version() {
    passvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    passvault().assert().failure();
}

#[test]
fn init_creates_store_with_commitment() {
    let dir = data_dir();

    cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Master password set"));

    let store = dir.child("store.json");
    store.assert(predicate::path::exists());
    store.assert(predicate::str::contains("$passvault$v=1$"));
    store.assert(predicate::str::contains(MASTER).not());

    cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already set"));
}

#[test]
fn short_master_password_is_rejected_on_first_run() {
    let dir = data_dir();
    passvault()
        .env("PASSVAULT_PASSWORD", "short")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
    dir.child("store.json").assert(predicate::path::missing());
}

#[test]
fn wrong_master_password_fails() {
    let dir = data_dir();
    cmd(&dir).arg("init").assert().success();

    passvault()
        .env("PASSVAULT_PASSWORD", "not the master password")
        .arg("--data-dir")
        .arg(dir.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong master password"));
}

#[test]
fn add_list_edit_delete_flow() {
    let dir = data_dir();

    cmd(&dir)
        .args(["add", "GitHub", "--vault", "Work", "--notes", "2FA on"])
        .write_stdin("p@ss\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry 'GitHub' added to vault 'Work'"));

    // Sealed on disk.
    dir.child("store.json")
        .assert(predicate::str::contains("p@ss").not());

    // Masked by default, shown with --show.
    cmd(&dir)
        .args(["list", "--vault", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("p@ss").not());

    cmd(&dir)
        .args(["list", "--vault", "Work", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p@ss"))
        .stdout(predicate::str::contains("2FA on"));

    // Other vaults do not see it.
    cmd(&dir)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub").not());

    cmd(&dir)
        .args(["edit", "GitHub", "--vault", "Work", "--notes", "rotated"])
        .write_stdin("n3w-pass\n")
        .assert()
        .success();

    cmd(&dir)
        .args(["list", "--vault", "Work", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n3w-pass"))
        .stdout(predicate::str::contains("rotated"));

    cmd(&dir)
        .args(["delete", "GitHub", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1"));

    cmd(&dir)
        .args(["list", "--vault", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub").not());
}

#[tokio::test]
async fn piped_password_keeps_surrounding_whitespace() {
    let dir = data_dir();

    cmd(&dir)
        .args(["add", "Site", "--notes", ""])
        .write_stdin(" pw-ends-with-space  \t\n")
        .assert()
        .success();

    cmd(&dir)
        .args(["list", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pw-ends-with-space"));

    // Read the sealed value back through the library to compare exactly.
    let settings = Settings::load(dir.path()).unwrap();
    let store: Arc<dyn SecretStore> =
        Arc::new(JsonFileStore::new(settings.store_path(dir.path())));
    let mut session = Session::new(Arc::clone(&store), settings.argon2_params());
    session.unlock(MASTER).await.unwrap();
    let manager = VaultManager::load(store).await.unwrap();

    let listed = manager
        .list_decrypted("Default", session.key().unwrap())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].password.as_str(), " pw-ends-with-space  \t");
}

#[test]
fn edit_missing_entry_fails() {
    let dir = data_dir();
    cmd(&dir).arg("init").assert().success();

    cmd(&dir)
        .args(["edit", "Nope", "--notes", ""])
        .write_stdin("pw\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_by_bad_id_fails() {
    let dir = data_dir();
    cmd(&dir)
        .args(["delete", "--id", "not-a-uuid", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid entry id"));
}

#[test]
fn vault_add_and_list() {
    let dir = data_dir();

    cmd(&dir)
        .args(["vault", "add", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault 'Work' created"));

    cmd(&dir)
        .args(["vault", "add", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    cmd(&dir)
        .args(["vault", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default"))
        .stdout(predicate::str::contains("Work"));
}
