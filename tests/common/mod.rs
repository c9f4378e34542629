//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a tpm command isolated from the user's config and env
pub fn tpm() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tpm"));
    cmd.env(
        "XDG_CONFIG_HOME",
        std::env::temp_dir().join("tpm-tests-no-user-config"),
    )
    .env_remove("TPM_LOG")
    .env_remove("TPM_WORKSPACE")
    .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a workspace holding the demo records
pub fn setup_test_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tpm().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a workspace with no records
pub fn setup_empty_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tpm()
        .current_dir(tmp.path())
        .args(["init", "--empty"])
        .assert()
        .success();
    tmp
}

/// Run a command in the workspace and return its stdout
pub fn stdout_of(tmp: &TempDir, args: &[&str]) -> String {
    let output = tpm().current_dir(tmp.path()).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "tpm {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run a command with `--format json` and parse its output
pub fn json_of(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let mut full = args.to_vec();
    full.extend(["--format", "json"]);
    serde_json::from_str(&stdout_of(tmp, &full)).unwrap()
}

/// Helper to create an installation and return its ID
pub fn create_test_installation(tmp: &TempDir, part_id: &str, location: &str) -> String {
    stdout_of(
        tmp,
        &[
            "inst",
            "new",
            "--part-id",
            part_id,
            "--location",
            location,
            "--engineer",
            "Test Engineer",
            "--format",
            "id",
        ],
    )
    .trim()
    .to_string()
}

/// Helper to create a batch and return its ID
pub fn create_test_batch(tmp: &TempDir, vendor: &str, material: &str, quantity: u32) -> String {
    stdout_of(
        tmp,
        &[
            "batch",
            "new",
            "--vendor",
            vendor,
            "--material",
            material,
            "--quantity",
            &quantity.to_string(),
            "--format",
            "id",
        ],
    )
    .trim()
    .to_string()
}
