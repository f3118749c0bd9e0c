//! Config file discovery and configuration errors, seen from the binary.

#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn habprov(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("habprov"));
    cmd.env("NO_COLOR", "1")
        .env_remove("HABPROV_CONFIG")
        .current_dir(cwd);
    cmd
}

fn write_config(dir: &Path, name: &str, yaml: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    habprov(dir.path())
        .args(["script", "install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found: habprov.yml"));
}

#[test]
fn test_missing_config_file_json_error() {
    let dir = TempDir::new().expect("tempdir");
    let assert = habprov(dir.path())
        .args(["options", "--json"])
        .assert()
        .code(1);
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "config_not_found");
}

#[test]
fn test_default_file_in_working_directory_is_used() {
    let dir = TempDir::new().expect("tempdir");
    write_config(dir.path(), "habprov.yml", "suite: web\nprovisioner:\n  package_origin: core\n");
    habprov(dir.path())
        .args(["script", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hab pkg install core/web --channel stable"));
}

#[test]
fn test_env_var_names_the_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        "cache.yml",
        "suite: cache\nprovisioner:\n  package_name: core/redis\n",
    );
    habprov(dir.path())
        .env("HABPROV_CONFIG", &path)
        .args(["script", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hab svc load core/redis --force"));
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "habprov.yml",
        "suite: web\nprovisioner:\n  package_origin: core\n  chanel: unstable\n",
    );
    habprov(dir.path())
        .args(["script", "run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chanel"));
}

#[test]
fn test_empty_origin_is_reported_before_anything_runs() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "habprov.yml",
        "suite: web\nprovisioner:\n  package_origin: ''\n",
    );
    let assert = habprov(dir.path())
        .args(["converge", "--json"])
        .assert()
        .code(1);
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON");
    assert_eq!(value["code"], "missing_required_fields");
    let message = value["message"].as_str().expect("message");
    assert!(message.contains("package_origin"), "got: {message}");
}

#[test]
fn test_unsupported_platform_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        dir.path(),
        "habprov.yml",
        "suite: web\nplatform: macos-14\nprovisioner:\n  package_origin: core\n",
    );
    habprov(dir.path())
        .args(["script", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported platform 'macos-14'"));
}

#[test]
fn test_latest_artifact_without_results_directory_fails() {
    let dir = TempDir::new().expect("tempdir");
    let project = dir.path().join("a").join("b").join("c");
    std::fs::create_dir_all(&project).expect("project dir");
    write_config(
        &project,
        "habprov.yml",
        "suite: web\nprovisioner:\n  package_origin: core\n  install_latest_artifact: true\n",
    );
    habprov(&project)
        .args(["script", "run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No results directory found"));
}
