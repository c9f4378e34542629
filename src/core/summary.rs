//! Status counts and due inspections across all collections

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::entity::{BatchStatus, InspectionResult, InstallationStatus};
use crate::core::schedule::NextInspection;
use crate::entities::batch::BatchRecord;
use crate::entities::inspection::InspectionRecord;
use crate::entities::installation::InstallationRecord;

/// An inspection whose next date has arrived, or that requires replacement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueInspection {
    pub inspection_id: String,
    pub part_id: String,
    pub location: String,
    pub next_inspection: NextInspection,
}

/// Snapshot of record counts as of a given date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub as_of: NaiveDate,
    pub installations: BTreeMap<InstallationStatus, usize>,
    pub batches: BTreeMap<BatchStatus, usize>,
    pub inspections: BTreeMap<InspectionResult, usize>,
    pub units_delivered: u64,
    pub due: Vec<DueInspection>,
}

impl Summary {
    pub fn compute(
        installations: &[InstallationRecord],
        inspections: &[InspectionRecord],
        batches: &[BatchRecord],
        as_of: NaiveDate,
    ) -> Self {
        // Every status appears, even with a zero count
        let mut inst_counts: BTreeMap<_, usize> =
            InstallationStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for rec in installations {
            *inst_counts.entry(rec.status).or_default() += 1;
        }

        let mut batch_counts: BTreeMap<_, usize> =
            BatchStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for batch in batches {
            *batch_counts.entry(batch.status).or_default() += 1;
        }

        let mut result_counts: BTreeMap<_, usize> =
            InspectionResult::ALL.iter().map(|r| (*r, 0)).collect();
        for insp in inspections {
            *result_counts.entry(insp.result).or_default() += 1;
        }

        let units_delivered = batches
            .iter()
            .filter(|b| b.status == BatchStatus::Delivered)
            .map(|b| u64::from(b.quantity))
            .sum();

        let mut due: Vec<DueInspection> = inspections
            .iter()
            .filter(|i| i.is_due(as_of))
            .map(|i| DueInspection {
                inspection_id: i.id.clone(),
                part_id: i.part_id.clone(),
                location: i.location.clone(),
                next_inspection: i.next_inspection,
            })
            .collect();
        // Replacements first, then oldest due date
        due.sort_by_key(|d| (d.next_inspection.date().is_some(), d.next_inspection.date()));

        Self {
            as_of,
            installations: inst_counts,
            batches: batch_counts,
            inspections: result_counts,
            units_delivered,
            due,
        }
    }
}
