//! Installation command tests

mod common;

use common::{create_test_installation, json_of, setup_test_workspace, stdout_of, tpm};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_inst_list_shows_seed_records() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INST-001"))
        .stdout(predicate::str::contains("INST-003"))
        .stdout(predicate::str::contains("3 installation(s) found."));
}

#[test]
fn test_inst_list_status_filter() {
    let tmp = setup_test_workspace();
    let out = stdout_of(&tmp, &["inst", "list", "--status", "received", "--format", "id"]);
    assert_eq!(out, "INST-003\n");

    let out = stdout_of(&tmp, &["inst", "list", "--status", "open", "--format", "id"]);
    assert_eq!(out, "INST-002\nINST-003\n");
}

#[test]
fn test_inst_list_json_and_count() {
    let tmp = setup_test_workspace();
    let list = json_of(&tmp, &["inst", "list"]);
    assert_eq!(list.as_array().map(Vec::len), Some(3));

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "list", "--count"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_inst_new_starts_received_with_next_id() {
    let tmp = setup_test_workspace();
    let id = create_test_installation(&tmp, "TRP-EC-004-2024", "Track Section D-3, KM 156.8");
    assert_eq!(id, "INST-004");

    let rec = json_of(&tmp, &["inst", "show", "INST-004"]);
    assert_eq!(rec["status"], "received");
    assert_eq!(rec["engineer"], "Test Engineer");
    assert!(rec.get("verification_token").is_none());
}

#[test]
fn test_inst_new_ids_are_unique() {
    let tmp = setup_test_workspace();
    let a = create_test_installation(&tmp, "P-1", "Depot 1");
    let b = create_test_installation(&tmp, "P-2", "Depot 2");
    assert_ne!(a, b);
    assert_eq!(b, "INST-005");
}

#[test]
fn test_inst_new_missing_required_field_fails() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "new", "--part-id", "P-1", "--location", "Depot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("engineer"));

    // Nothing was stored
    let list = json_of(&tmp, &["inst", "list"]);
    assert_eq!(list.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_inst_advance_valid_transition_sets_token() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-003", "installed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("received → installed"));

    let rec = json_of(&tmp, &["inst", "show", "INST-003"]);
    assert_eq!(rec["status"], "installed");
    let token = rec["verification_token"].as_str().unwrap();
    assert!(token.starts_with("0x"));

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "show", "INST-003", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification: valid"));
}

#[test]
fn test_inst_advance_invalid_transition_leaves_record() {
    let tmp = setup_test_workspace();
    let before = json_of(&tmp, &["inst", "show", "INST-003"]);

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-003", "verified"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status transition"))
        .stderr(predicate::str::contains("installed, maintenance"));

    let after = json_of(&tmp, &["inst", "show", "INST-003"]);
    assert_eq!(before, after);
}

#[test]
fn test_inst_repeating_transition_fails() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-002", "verified"])
        .assert()
        .success();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-002", "verified"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status transition"));
}

#[test]
fn test_inst_maintenance_is_terminal() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-001", "maintenance"])
        .assert()
        .success();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-001", "received"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terminal"));
}

#[test]
fn test_inst_unknown_status_rejected_by_parser() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "advance", "INST-003", "scrapped"])
        .assert()
        .failure();
}

#[test]
fn test_inst_show_unknown_id() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "show", "INST-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_inst_outside_workspace_fails() {
    let tmp = TempDir::new().unwrap();

    tpm()
        .current_dir(tmp.path())
        .args(["inst", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a tpm workspace"));
}

#[test]
fn test_inst_workspace_flag() {
    let tmp = setup_test_workspace();
    let elsewhere = TempDir::new().unwrap();

    tpm()
        .current_dir(elsewhere.path())
        .args(["inst", "list", "--format", "id", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("INST-001"));
}
