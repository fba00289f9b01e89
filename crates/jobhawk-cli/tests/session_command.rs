use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_jobhawk_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("jobhawk")
}

/// Seed a session artifact into the fake home directory.
fn seed_session(home: &std::path::Path) {
    let state_dir = home.join(".jobhawk");
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(
        state_dir.join("cookies.json"),
        r#"[{"name": "sid", "value": "super-secret-value", "domain": ".monster.com", "path": "/"}]"#,
    )
    .unwrap();
}

#[test]
fn test_session_show_without_artifact() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.env("HOME", home.path()).arg("session").arg("show");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No saved session"));
}

#[test]
fn test_session_show_lists_names_but_never_values() {
    let home = tempfile::tempdir().unwrap();
    seed_session(home.path());

    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.env("HOME", home.path()).arg("session").arg("show");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 cookies"))
        .stdout(predicate::str::contains("sid"))
        .stdout(predicate::str::contains(".monster.com"))
        .stdout(predicate::str::contains("super-secret-value").not());
}

#[test]
fn test_session_clear_removes_artifact() {
    let home = tempfile::tempdir().unwrap();
    seed_session(home.path());

    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.env("HOME", home.path()).arg("session").arg("clear");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Session cleared"));

    assert!(!home.path().join(".jobhawk").join("cookies.json").exists());
}

#[test]
fn test_session_clear_is_idempotent() {
    let home = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let mut cmd = Command::new(get_jobhawk_bin());
        cmd.env("HOME", home.path()).arg("session").arg("clear");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("No saved session to clear"));
    }
}
