//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn travelhub() -> Command {
    let mut cmd = Command::cargo_bin("travelhub").unwrap();
    // Keep the developer's environment out of the tests
    cmd.env_remove("DATABASE_URL")
        .env_remove("SECRET_KEY")
        .env_remove("TRAVELHUB_CONFIG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    travelhub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("setup-db"))
        .stdout(predicate::str::contains("provision-admin"));
}

#[test]
fn test_serve_help() {
    travelhub()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_check_db_help() {
    travelhub()
        .arg("check-db")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("root credentials"));
}

#[test]
fn test_provision_admin_help() {
    travelhub()
        .arg("provision-admin")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ADMIN_PASSWORD"));
}

#[test]
fn test_provision_admin_requires_username() {
    travelhub()
        .arg("provision-admin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<USERNAME>"));
}

#[test]
fn test_provision_admin_without_password_env_fails_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    travelhub()
        .current_dir(dir.path())
        .env_remove("ADMIN_PASSWORD")
        .arg("provision-admin")
        .arg("root")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ADMIN_PASSWORD is not set"));
}

#[test]
fn test_serve_without_secret_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    travelhub()
        .current_dir(dir.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRET_KEY"));
}

#[test]
fn test_completions_bash() {
    travelhub()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("travelhub"));
}
