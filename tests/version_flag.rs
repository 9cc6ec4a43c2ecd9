use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn prints_version() {
    Command::cargo_bin("apod-gallery")
        .expect("binary built")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prints_help() {
    Command::cargo_bin("apod-gallery")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("APOD Gallery"))
        .stdout(predicate::str::contains("--no-browser"));
}

#[test]
fn rejects_unknown_flags() {
    Command::cargo_bin("apod-gallery")
        .expect("binary built")
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown flag"));
}
