use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn condo(session_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("condo").unwrap();
    cmd.env("CONDO_SESSION_FILE", session_dir.path().join("session.json"))
        .env("CONDO_API_BASE", "http://127.0.0.1:9")
        .env_remove("CONDO_PASSWORD");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("entities"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn entities_prints_catalog() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .arg("entities")
        .assert()
        .success()
        .stdout(predicate::str::contains("residentes"))
        .stdout(predicate::str::contains("/api/horarios/"));
}

#[test]
fn unknown_entity_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .args(["list", "pagos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Known entities"));
}

#[test]
fn list_requires_login() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .args(["list", "residentes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn whoami_without_session() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("No hay sesión iniciada"));
}

#[test]
fn login_requires_password() {
    let dir = TempDir::new().unwrap();
    condo(&dir)
        .args(["login", "ana@condo.bo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Password required"));
}
