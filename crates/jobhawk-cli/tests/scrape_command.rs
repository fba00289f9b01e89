use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_jobhawk_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("jobhawk")
}

fn scrape_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.env("HOME", home)
        .env_remove("JOBHAWK_EMAIL")
        .env_remove("JOBHAWK_PASSWORD")
        .arg("scrape");
    cmd
}

#[test]
fn test_scrape_help_documents_inputs() {
    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.arg("scrape").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--title"))
        .stdout(predicate::str::contains("--location"))
        .stdout(predicate::str::contains("--max-items"))
        .stdout(predicate::str::contains("--headless"))
        .stdout(predicate::str::contains("JOBHAWK_EMAIL"));
}

#[test]
fn test_scrape_requires_credentials_before_launching() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = scrape_cmd(home.path());
    cmd.args(["--title", "software engineer", "--location", "Remote"]);

    // Fails up front with a pointer at the env vars, never reaching Chrome.
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("JOBHAWK_EMAIL"))
        .stderr(predicate::str::contains("JOBHAWK_PASSWORD"));
}

#[test]
fn test_scrape_rejects_unknown_site() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = scrape_cmd(home.path());
    cmd.args([
        "--title",
        "software engineer",
        "--location",
        "Remote",
        "--site",
        "not-a-job-board",
    ])
    .env("JOBHAWK_EMAIL", "user@example.com")
    .env("JOBHAWK_PASSWORD", "pw");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown site"));
}

#[test]
fn test_scrape_requires_title_and_location() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = scrape_cmd(home.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}
