//! CLI integration tests for bazaar
//!
//! Tests the bazaar CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with its config directory isolated in `dir`
#[allow(deprecated)]
fn bazaar_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bazaar").unwrap();
    cmd.env("BAZAAR_CONFIG_DIR", dir.path().join("config"));
    cmd.env_remove("BAZAAR_DATABASE");
    cmd.env_remove("BAZAAR_HOST");
    cmd.env_remove("BAZAAR_PORT");
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();

    bazaar_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_path_honours_override() {
    let dir = TempDir::new().unwrap();

    bazaar_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(
            dir.path().join("config").display().to_string(),
        ));
}

#[test]
fn test_config_list_defaults() {
    let dir = TempDir::new().unwrap();

    bazaar_cmd(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server.port = 8080"))
        .stdout(predicate::str::contains("chat.max_message_length = 2000"))
        .stdout(predicate::str::contains("chat.room_order = created"));
}

#[test]
fn test_config_set_get_reset() {
    let dir = TempDir::new().unwrap();

    bazaar_cmd(&dir)
        .args(["config", "set", "chat.room_order", "activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set chat.room_order = activity"));

    assert!(dir.path().join("config").join("config.toml").exists());

    bazaar_cmd(&dir)
        .args(["config", "get", "chat.room_order"])
        .assert()
        .success()
        .stdout(predicate::str::diff("activity\n"));

    bazaar_cmd(&dir)
        .args(["config", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reset to defaults"));

    bazaar_cmd(&dir)
        .args(["config", "get", "chat.room_order"])
        .assert()
        .success()
        .stdout(predicate::str::diff("created\n"));
}

#[test]
fn test_config_rejects_bad_input() {
    let dir = TempDir::new().unwrap();

    bazaar_cmd(&dir)
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    bazaar_cmd(&dir)
        .args(["config", "set", "chat.room_order", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid room order"));
}

#[test]
fn test_migrate_creates_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("data").join("bazaar.db");

    bazaar_cmd(&dir)
        .args(["migrate", "--database"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("from v0 to v2"));

    assert!(db_path.exists());

    bazaar_cmd(&dir)
        .args(["migrate", "--database"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date (v2)"));
}

#[test]
fn test_doctor_reports_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bazaar.db");

    bazaar_cmd(&dir)
        .args(["migrate", "--quiet", "--database"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    bazaar_cmd(&dir)
        .args(["doctor", "--database"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Database: Connected"))
        .stdout(predicate::str::contains("[OK] Database: Schema v2"))
        .stdout(predicate::str::contains("All checks passed!"));
}
