//! Demo records written by `tpm init`
//!
//! Three installations, three inspections, three vendor batches and two
//! catalogued parts covering every status a new workspace can show.

use chrono::NaiveDate;

use crate::core::entity::{BatchStatus, InspectionResult, InstallationStatus, PartStatus};
use crate::core::schedule::NextInspection;
use crate::core::token::VerificationToken;
use crate::entities::batch::BatchRecord;
use crate::entities::inspection::InspectionRecord;
use crate::entities::installation::InstallationRecord;
use crate::entities::part::PartRecord;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn token(raw: &str) -> Option<VerificationToken> {
    Some(VerificationToken::from_raw(raw))
}

pub fn installations() -> Vec<InstallationRecord> {
    vec![
        InstallationRecord {
            id: "INST-001".to_string(),
            part_id: "TRP-EC-001-2024".to_string(),
            part_type: "Elastic Rail Clip".to_string(),
            location: "Track Section A-12, KM 145.2".to_string(),
            installation_date: Some(date(2024, 2, 20)),
            engineer: "John Anderson".to_string(),
            status: InstallationStatus::Verified,
            notes: Some("Installation completed successfully. All torque specifications met.".to_string()),
            verification_token: token("0x8f3a2b1c"),
        },
        InstallationRecord {
            id: "INST-002".to_string(),
            part_id: "TRP-RP-002-2024".to_string(),
            part_type: "Rail Pad".to_string(),
            location: "Track Section B-8, KM 203.7".to_string(),
            installation_date: Some(date(2024, 5, 18)),
            engineer: "Sarah Mitchell".to_string(),
            status: InstallationStatus::Installed,
            notes: Some("Installation complete, pending verification.".to_string()),
            verification_token: token("0x7e2d9c4f"),
        },
        InstallationRecord {
            id: "INST-003".to_string(),
            part_id: "TRP-SL-003-2024".to_string(),
            part_type: "Railway Sleeper".to_string(),
            location: "Track Section C-15, KM 287.1".to_string(),
            installation_date: Some(date(2024, 8, 10)),
            engineer: "Mike Roberts".to_string(),
            status: InstallationStatus::Received,
            notes: Some("Parts received at depot, ready for installation.".to_string()),
            verification_token: None,
        },
    ]
}

pub fn inspections() -> Vec<InspectionRecord> {
    vec![
        InspectionRecord {
            id: "INSP-001".to_string(),
            part_id: "TRP-EC-001-2024".to_string(),
            part_type: "Elastic Rail Clip".to_string(),
            location: "Track Section A-12, KM 145.2".to_string(),
            inspection_date: date(2024, 8, 15),
            inspector: "Alice Johnson".to_string(),
            result: InspectionResult::Ok,
            findings: "Visual inspection shows no signs of wear or damage. Torque within specifications.".to_string(),
            images: Vec::new(),
            next_inspection: NextInspection::Due(date(2024, 11, 15)),
            verification_token: token("0x9b2c4f8e"),
        },
        InspectionRecord {
            id: "INSP-002".to_string(),
            part_id: "TRP-RP-002-2024".to_string(),
            part_type: "Rail Pad".to_string(),
            location: "Track Section B-8, KM 203.7".to_string(),
            inspection_date: date(2024, 7, 20),
            inspector: "Robert Chen".to_string(),
            result: InspectionResult::Defect,
            findings: "Minor surface cracking observed on the underside. Requires monitoring.".to_string(),
            images: Vec::new(),
            next_inspection: NextInspection::Due(date(2024, 8, 20)),
            verification_token: token("0x7a5d3e1b"),
        },
        InspectionRecord {
            id: "INSP-003".to_string(),
            part_id: "TRP-SL-003-2024".to_string(),
            part_type: "Railway Sleeper".to_string(),
            location: "Track Section C-15, KM 287.1".to_string(),
            inspection_date: date(2024, 9, 5),
            inspector: "Maria Garcia".to_string(),
            result: InspectionResult::Replace,
            findings: "Significant concrete deterioration and structural integrity compromised.".to_string(),
            images: Vec::new(),
            next_inspection: NextInspection::ImmediateReplacement,
            verification_token: token("0x4c8f2a9d"),
        },
    ]
}

pub fn batches() -> Vec<BatchRecord> {
    vec![
        BatchRecord {
            batch_id: "EC-BATCH-2024-Q1-001".to_string(),
            vendor: "Steel Forge Industries".to_string(),
            material_type: "Elastic Rail Clip".to_string(),
            quantity: 500,
            manufacturing_date: Some(date(2024, 1, 15)),
            warranty_months: Some(36),
            submitted: date(2024, 1, 15),
            status: BatchStatus::Delivered,
            verification_token: token("0x8f3a2b1c"),
        },
        BatchRecord {
            batch_id: "RP-BATCH-2024-Q2-002".to_string(),
            vendor: "Railway Components Ltd".to_string(),
            material_type: "Rail Pad".to_string(),
            quantity: 300,
            manufacturing_date: Some(date(2024, 4, 10)),
            warranty_months: Some(24),
            submitted: date(2024, 4, 10),
            status: BatchStatus::Shipped,
            verification_token: token("0x7e2d9c4f"),
        },
        BatchRecord {
            batch_id: "SL-BATCH-2024-Q3-003".to_string(),
            vendor: "Concrete Solutions Inc".to_string(),
            material_type: "Railway Sleeper".to_string(),
            quantity: 150,
            manufacturing_date: Some(date(2024, 7, 22)),
            warranty_months: Some(60),
            submitted: date(2024, 7, 22),
            status: BatchStatus::Approved,
            verification_token: token("0x9a5c7e3d"),
        },
    ]
}

pub fn parts() -> Vec<PartRecord> {
    vec![
        PartRecord {
            id: "TRP-EC-001-2024".to_string(),
            part_type: "Elastic Rail Clip".to_string(),
            batch_id: "EC-BATCH-2024-Q1-001".to_string(),
            vendor: "Steel Forge Industries".to_string(),
            manufacturing_date: date(2024, 1, 15),
            installation_date: Some(date(2024, 2, 20)),
            location: Some("Track Section A-12, KM 145.2".to_string()),
            status: PartStatus::Active,
            last_inspection: Some(date(2024, 8, 15)),
            next_inspection: Some(date(2024, 11, 15)),
        },
        PartRecord {
            id: "TRP-RP-002-2024".to_string(),
            part_type: "Rail Pad".to_string(),
            batch_id: "RP-BATCH-2024-Q2-002".to_string(),
            vendor: "Railway Components Ltd".to_string(),
            manufacturing_date: date(2024, 4, 10),
            installation_date: Some(date(2024, 5, 18)),
            location: Some("Track Section B-8, KM 203.7".to_string()),
            status: PartStatus::InspectionDue,
            last_inspection: Some(date(2024, 7, 20)),
            next_inspection: Some(date(2024, 10, 20)),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Record;

    #[test]
    fn test_seed_ids_are_unique_and_sequenced() {
        let ids: Vec<_> = installations().iter().map(|r| r.sequence()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        let ids: Vec<_> = batches().iter().map(|r| r.sequence()).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_seed_records_pass_validation() {
        assert!(installations().iter().all(|r| r.validate().is_ok()));
        assert!(inspections().iter().all(|r| r.validate().is_ok()));
        assert!(batches().iter().all(|r| r.validate().is_ok()));
    }
}
