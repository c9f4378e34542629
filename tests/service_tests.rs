//! Library-level tests of the track service

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use tpm::core::{
    BatchFields, BatchStatus, InspectionFields, InspectionResult, InstallationFields,
    InstallationStatus, NextInspection, ServiceError, Snapshot, TrackService, WorkflowEngine,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn install_fields(part_id: &str) -> InstallationFields {
    InstallationFields {
        part_id: part_id.to_string(),
        part_type: "Elastic Rail Clip".to_string(),
        location: "Track Section A-12, KM 145.2".to_string(),
        engineer: "John Smith".to_string(),
        ..Default::default()
    }
}

fn inspection_fields(result: InspectionResult, inspected: &str) -> InspectionFields {
    InspectionFields {
        part_id: "TRP-EC-001-2024".to_string(),
        inspection_date: Some(date(inspected)),
        inspector: "Alice Johnson".to_string(),
        result,
        findings: "Routine".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_new_installation_is_received_with_unique_id() {
    let svc = TrackService::default();
    let a = svc.create_installation(install_fields("P-1")).unwrap();
    let b = svc.create_installation(install_fields("P-2")).unwrap();

    assert_eq!(a.status, InstallationStatus::Received);
    assert_eq!(a.id, "INST-001");
    assert_eq!(b.id, "INST-002");
    assert!(a.verification_token.is_none());
}

#[test]
fn test_advance_succeeds_only_for_allowed_targets() {
    use InstallationStatus::*;

    for from in InstallationStatus::ALL {
        for to in InstallationStatus::ALL {
            let svc = TrackService::default();
            let rec = svc.create_installation(install_fields("P-1")).unwrap();
            // Walk the record to `from` along the allowed path
            let path: &[InstallationStatus] = match from {
                Received => &[],
                Installed => &[Installed],
                Verified => &[Installed, Verified],
                Maintenance => &[Maintenance],
            };
            for step in path {
                svc.advance_installation_status(&rec.id, *step).unwrap();
            }
            let before = svc.installation(&rec.id).unwrap();

            let allowed = svc.allowed_installation_transitions(&rec.id).unwrap();
            let result = svc.advance_installation_status(&rec.id, to);
            if allowed.contains(&to) {
                let updated = result.unwrap();
                assert_eq!(updated.status, to);
                assert!(updated.verification_token.is_some());
            } else {
                assert!(
                    matches!(result, Err(ServiceError::InvalidTransition { .. })),
                    "{from} -> {to} should be rejected"
                );
                assert_eq!(svc.installation(&rec.id).unwrap(), before);
            }
        }
    }
}

#[test]
fn test_repeating_an_applied_transition_fails() {
    let svc = TrackService::default();
    let rec = svc.create_installation(install_fields("P-1")).unwrap();
    svc.advance_installation_status(&rec.id, InstallationStatus::Installed)
        .unwrap();

    let err = svc
        .advance_installation_status(&rec.id, InstallationStatus::Installed)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
}

#[test]
fn test_next_inspection_dates() {
    let svc = TrackService::default();

    let ok = svc
        .create_inspection(inspection_fields(InspectionResult::Ok, "2024-08-15"))
        .unwrap();
    assert_eq!(ok.next_inspection, NextInspection::Due(date("2024-11-15")));

    let defect = svc
        .create_inspection(inspection_fields(InspectionResult::Defect, "2024-07-20"))
        .unwrap();
    assert_eq!(defect.next_inspection, NextInspection::Due(date("2024-08-20")));

    let replace = svc
        .create_inspection(inspection_fields(InspectionResult::Replace, "2024-07-20"))
        .unwrap();
    assert_eq!(replace.next_inspection, NextInspection::ImmediateReplacement);
    assert_eq!(
        replace.next_inspection.to_string(),
        "immediate replacement required"
    );
}

#[test]
fn test_missing_inspection_date_is_validation_error() {
    let svc = TrackService::default();
    let mut fields = inspection_fields(InspectionResult::Ok, "2024-08-15");
    fields.inspection_date = None;

    let err = svc.create_inspection(fields).unwrap_err();
    match err {
        ServiceError::Validation(v) => assert_eq!(v.field, "inspection_date"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(svc.inspections().is_empty());
}

#[test]
fn test_qr_lookup() {
    let svc = TrackService::default();
    let part = svc.lookup_by_qr_code("TRP-EC-001-2024").unwrap();
    assert_eq!(part.part_type, "Elastic Rail Clip");

    let err = svc.lookup_by_qr_code("UNKNOWN").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { kind: "part", .. }));
}

#[test]
fn test_batch_lifecycle_is_forward_only() {
    let svc = TrackService::default()
        .with_clock(|| NaiveDate::from_ymd_opt(2024, 5, 2).unwrap_or_default());
    let batch = svc
        .create_batch(BatchFields {
            vendor: "Railway Components Ltd".to_string(),
            material_type: "Rail Pad".to_string(),
            quantity: 300,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(batch.batch_id, "RA-BATCH-2024-Q2-001");

    let err = svc
        .advance_batch_status(&batch.batch_id, BatchStatus::Shipped)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));

    for next in [BatchStatus::Approved, BatchStatus::Shipped, BatchStatus::Delivered] {
        let updated = svc.advance_batch_status(&batch.batch_id, next).unwrap();
        assert_eq!(updated.status, next);
    }
    assert_eq!(svc.verify_batch(&batch.batch_id).unwrap(), Some(true));
    assert_eq!(svc.summary(date("2024-05-02")).units_delivered, 300);
}

#[test]
fn test_concurrent_creation_yields_unique_ids() {
    let svc = Arc::new(TrackService::default());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                (0..20)
                    .map(|i| {
                        svc.create_installation(install_fields(&format!("P-{t}-{i}")))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), 160);
    assert_eq!(unique.len(), 160);
    assert_eq!(svc.installations().len(), 160);
}

#[test]
fn test_concurrent_advances_apply_exactly_once() {
    let svc = Arc::new(TrackService::default());
    let rec = svc.create_installation(install_fields("P-1")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = Arc::clone(&svc);
            let id = rec.id.clone();
            thread::spawn(move || {
                svc.advance_installation_status(&id, InstallationStatus::Installed)
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn test_snapshot_round_trip_through_yaml() {
    let svc = TrackService::seeded().unwrap();
    svc.advance_installation_status("INST-003", InstallationStatus::Installed)
        .unwrap();
    svc.create_inspection(inspection_fields(InspectionResult::Defect, "2024-09-10"))
        .unwrap();

    let snapshot = svc.snapshot();
    let yaml = serde_yml::to_string(&snapshot).unwrap();
    let restored: Snapshot = serde_yml::from_str(&yaml).unwrap();
    assert_eq!(restored, snapshot);

    let reopened = TrackService::from_snapshot(restored, WorkflowEngine::default()).unwrap();
    assert_eq!(reopened.verify_installation("INST-003").unwrap(), Some(true));
    assert_eq!(reopened.verify_inspection("INSP-004").unwrap(), Some(true));

    // Numbering continues after the restored records
    let next = reopened.create_installation(install_fields("P-9")).unwrap();
    assert_eq!(next.id, "INST-004");
}

#[test]
fn test_snapshot_with_duplicate_ids_is_rejected() {
    let mut snapshot = Snapshot::seeded();
    let dup = snapshot.installations[0].clone();
    snapshot.installations.push(dup);

    let err = TrackService::from_snapshot(snapshot, WorkflowEngine::default()).unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate { .. }));
}

#[test]
fn test_snapshot_with_last_sequence_loads_but_cannot_grow() {
    let mut snapshot = Snapshot::seeded();
    snapshot.installations[2].id = "INST-4294967295".to_string();

    let svc = TrackService::from_snapshot(snapshot, WorkflowEngine::default()).unwrap();
    assert_eq!(svc.installations().len(), 3);
    assert!(svc.installation("INST-4294967295").is_ok());

    let err = svc.create_installation(install_fields("P-1")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::SequenceExhausted {
            kind: "installation",
            ..
        }
    ));
    assert_eq!(svc.installations().len(), 3);
}

#[test]
fn test_batch_material_needs_a_letter_or_digit() {
    let svc = TrackService::default();
    let err = svc
        .create_batch(BatchFields {
            vendor: "Track Systems Corp".to_string(),
            material_type: "--".to_string(),
            quantity: 10,
            ..Default::default()
        })
        .unwrap_err();
    match err {
        ServiceError::Validation(v) => assert_eq!(v.field, "material_type"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(svc.batches().is_empty());
}
