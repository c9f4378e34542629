//! Inspection command tests

mod common;

use common::{json_of, setup_test_workspace, stdout_of, tpm};
use predicates::prelude::*;
use tempfile::TempDir;

fn record_inspection(tmp: &TempDir, date: &str, result: &str) -> serde_json::Value {
    json_of(
        tmp,
        &[
            "insp",
            "new",
            "--part-id",
            "TRP-EC-001-2024",
            "--location",
            "Track Section A-12, KM 145.2",
            "--date",
            date,
            "--inspector",
            "Priya Sharma",
            "--result",
            result,
            "--findings",
            "Routine check",
        ],
    )
}

#[test]
fn test_insp_ok_schedules_three_months_out() {
    let tmp = setup_test_workspace();
    let rec = record_inspection(&tmp, "2024-08-15", "ok");
    assert_eq!(rec["id"], "INSP-004");
    assert_eq!(rec["next_inspection"], "2024-11-15");
    assert!(rec["verification_token"].as_str().unwrap().starts_with("0x"));
}

#[test]
fn test_insp_defect_schedules_one_month_out() {
    let tmp = setup_test_workspace();
    let rec = record_inspection(&tmp, "2024-07-20", "defect");
    assert_eq!(rec["next_inspection"], "2024-08-20");
}

#[test]
fn test_insp_replace_requires_immediate_replacement() {
    let tmp = setup_test_workspace();
    let rec = record_inspection(&tmp, "2024-07-20", "replace");
    assert_eq!(rec["next_inspection"], "immediate replacement required");
}

#[test]
fn test_insp_month_end_clamps() {
    let tmp = setup_test_workspace();
    let rec = record_inspection(&tmp, "2024-01-31", "defect");
    assert_eq!(rec["next_inspection"], "2024-02-29");
}

#[test]
fn test_insp_interval_from_workspace_config() {
    let tmp = setup_test_workspace();
    std::fs::write(
        tmp.path().join(".tpm/config.yaml"),
        "inspection:\n  ok_months: 6\n",
    )
    .unwrap();

    let rec = record_inspection(&tmp, "2024-08-15", "ok");
    assert_eq!(rec["next_inspection"], "2025-02-15");
}

#[test]
fn test_insp_missing_findings_fails() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args([
            "insp",
            "new",
            "--part-id",
            "TRP-EC-001-2024",
            "--inspector",
            "Priya Sharma",
            "--result",
            "ok",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("findings"));
}

#[test]
fn test_insp_invalid_result_rejected() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args([
            "insp",
            "new",
            "--part-id",
            "P",
            "--inspector",
            "I",
            "--findings",
            "F",
            "--result",
            "excellent",
        ])
        .assert()
        .failure();
}

#[test]
fn test_insp_list_due() {
    let tmp = setup_test_workspace();
    let out = stdout_of(
        &tmp,
        &["insp", "list", "--due", "--as-of", "2024-09-01", "--format", "id"],
    );
    assert_eq!(out, "INSP-002\nINSP-003\n");
}

#[test]
fn test_insp_list_result_filter() {
    let tmp = setup_test_workspace();
    let out = stdout_of(&tmp, &["insp", "list", "--result", "failed", "--format", "id"]);
    assert_eq!(out, "INSP-002\nINSP-003\n");
}

#[test]
fn test_insp_show_pretty() {
    let tmp = setup_test_workspace();

    tpm()
        .current_dir(tmp.path())
        .args(["insp", "show", "INSP-003"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INSP-003"))
        .stdout(predicate::str::contains("immediate replacement required"));
}

#[test]
fn test_insp_images_are_kept() {
    let tmp = setup_test_workspace();
    let rec = json_of(
        &tmp,
        &[
            "insp",
            "new",
            "--part-id",
            "TRP-RP-002-2024",
            "--date",
            "2024-09-10",
            "--inspector",
            "Ravi Patel",
            "--result",
            "defect",
            "--findings",
            "Pad wear",
            "--image",
            "pad-front.jpg",
            "--image",
            "pad-side.jpg",
        ],
    );
    assert_eq!(rec["images"].as_array().map(Vec::len), Some(2));
}
