//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn coursemate() -> Command {
    let mut cmd = Command::cargo_bin("coursemate").unwrap();
    // Keep a developer's .env or shell from leaking into the tests
    cmd.env_remove("DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    coursemate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    coursemate()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--skip-migrations"))
        .stdout(predicate::str::contains("--max-connections"));
}

#[test]
fn test_migrate_help() {
    coursemate()
        .arg("migrate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_serve_without_database_url_fails() {
    coursemate()
        .current_dir(std::env::temp_dir())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_migrate_without_database_url_fails() {
    coursemate()
        .current_dir(std::env::temp_dir())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_invalid_bind_address_rejected() {
    coursemate()
        .arg("serve")
        .arg("--bind")
        .arg("not-an-address")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bind"));
}
