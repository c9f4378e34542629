//! Workspace, summary and general CLI tests

mod common;

use common::{json_of, setup_empty_workspace, setup_test_workspace, tpm};
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Init
// ============================================================================

#[test]
fn test_init_creates_workspace() {
    let tmp = TempDir::new().unwrap();

    tpm()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tpm workspace"))
        .stdout(predicate::str::contains("3 installation(s), 3 inspection(s), 3 batch(es)"));

    assert!(tmp.path().join(".tpm/records.yaml").is_file());
    assert!(tmp.path().join(".tpm/config.yaml").is_file());
}

#[test]
fn test_init_twice_needs_force() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tpm()
        .current_dir(tmp.path())
        .args(["init", "--force", "--empty"])
        .assert()
        .success();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No installations found."));
}

#[test]
fn test_init_into_path() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("depot");

    tpm()
        .current_dir(tmp.path())
        .args(["init", "depot"])
        .assert()
        .success();

    assert!(target.join(".tpm/records.yaml").is_file());
}

#[test]
fn test_commands_work_from_subdirectory() {
    let tmp = setup_test_workspace();
    let sub = tmp.path().join("reports/2024");
    std::fs::create_dir_all(&sub).unwrap();

    tpm()
        .current_dir(&sub)
        .args(["batch", "list", "--count"])
        .assert()
        .success()
        .stdout("3\n");
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary_counts_and_due_list() {
    let tmp = setup_test_workspace();
    let summary = json_of(&tmp, &["summary", "--as-of", "2024-09-01"]);

    assert_eq!(summary["as_of"], "2024-09-01");
    assert_eq!(summary["installations"]["received"], 1);
    assert_eq!(summary["installations"]["maintenance"], 0);
    assert_eq!(summary["batches"]["delivered"], 1);
    assert_eq!(summary["inspections"]["replace"], 1);
    assert_eq!(summary["units_delivered"], 500);

    let due: Vec<&str> = summary["due"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["inspection_id"].as_str().unwrap())
        .collect();
    assert_eq!(due, vec!["INSP-003", "INSP-002"]);
}

#[test]
fn test_summary_pretty_output() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["summary", "--as-of", "2024-12-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Track parts summary"))
        .stdout(predicate::str::contains("INSP-001"))
        .stdout(predicate::str::contains("immediate replacement required"));
}

#[test]
fn test_summary_empty_workspace() {
    let tmp = setup_empty_workspace();

    tpm()
        .current_dir(tmp.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("No inspections due."));
}

// ============================================================================
// Misc
// ============================================================================

#[test]
fn test_help_lists_commands() {
    tpm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inst"))
        .stdout(predicate::str::contains("insp"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_completions_bash() {
    tpm()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tpm"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["-vv", "inst", "advance", "INST-003", "installed", "--format", "id"])
        .assert()
        .success()
        .stdout("INST-003\n")
        .stderr(predicate::str::contains("installation status changed"));
}

#[test]
fn test_log_json_lines() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["-v", "--log-json", "batch", "advance", "SL-BATCH-2024-Q3-003"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"message\":\"batch status changed\""));
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = setup_test_workspace();
    std::fs::write(
        tmp.path().join(".tpm/config.yaml"),
        "tokens:\n  mode: sometimes\n",
    )
    .unwrap();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_save_refused_while_records_locked() {
    let tmp = setup_test_workspace();
    std::fs::write(tmp.path().join(".tpm/records.lock"), "").unwrap();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-003", "installed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));

    std::fs::remove_file(tmp.path().join(".tpm/records.lock")).unwrap();
    let inst = json_of(&tmp, &["inst", "show", "INST-003"]);
    assert_eq!(inst["status"], "received");
}
