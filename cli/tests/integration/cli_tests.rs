//! CLI skeleton: help, version and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn habprov() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("habprov"));
    cmd.env("NO_COLOR", "1").env_remove("HABPROV_CONFIG");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    habprov().assert().code(2).stderr(predicate::str::contains(
        "Provision a machine to run a Habitat package",
    ));
}

#[test]
fn test_cli_help_lists_every_phase() {
    let assert = habprov().arg("--help").assert().success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for command in ["converge", "install", "init", "prepare", "run", "script", "ident", "options"] {
        assert!(out.contains(command), "help is missing `{command}`:\n{out}");
    }
}

#[test]
fn test_version_command_shows_version() {
    habprov()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("habprov "));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let assert = habprov().args(["version", "--json"]).assert().success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_script_rejects_unknown_phase() {
    habprov()
        .args(["script", "deploy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value 'deploy'"));
}
