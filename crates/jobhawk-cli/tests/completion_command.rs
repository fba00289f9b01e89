use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_jobhawk_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("jobhawk")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.bashrc"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_jobhawk()"))
        .stdout(predicate::str::contains("complete -F _jobhawk"));
}

#[test]
fn test_completion_zsh_generates_script() {
    let mut cmd = Command::new(get_jobhawk_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef jobhawk"))
        .stdout(predicate::str::contains("_jobhawk()"));
}
