//! Inspection entity type - one field inspection of an installed part
//!
//! Inspections are recorded in a single step and never change afterwards.
//! The next inspection date is derived at creation from the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{require_text, InspectionResult, Record, ValidationError};
use crate::core::identity::RecordPrefix;
use crate::core::schedule::{InspectionIntervals, NextInspection};
use crate::core::token::VerificationToken;

/// An Inspection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    /// Unique identifier (INSP-NNN), assigned by the store
    #[serde(default)]
    pub id: String,

    /// QR code / part ID of the inspected part
    pub part_id: String,

    /// Part type
    #[serde(default)]
    pub part_type: String,

    /// Track location
    #[serde(default)]
    pub location: String,

    /// Date of inspection
    pub inspection_date: NaiveDate,

    /// Inspector name
    pub inspector: String,

    /// Outcome of the inspection
    #[serde(default)]
    pub result: InspectionResult,

    /// What the inspector observed
    pub findings: String,

    /// Photo references taken during the inspection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Derived next inspection date or replacement flag
    pub next_inspection: NextInspection,

    /// Token assigned when the inspection was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<VerificationToken>,
}

impl InspectionRecord {
    /// Create a new inspection, deriving its next inspection date
    ///
    /// Returns `None` if the derived date would fall outside the calendar range.
    pub fn new(
        part_id: String,
        inspection_date: NaiveDate,
        inspector: String,
        result: InspectionResult,
        findings: String,
        intervals: &InspectionIntervals,
    ) -> Option<Self> {
        let next_inspection = NextInspection::derive(result, inspection_date, intervals)?;
        Some(Self {
            id: String::new(),
            part_id,
            part_type: String::new(),
            location: String::new(),
            inspection_date,
            inspector,
            result,
            findings,
            images: Vec::new(),
            next_inspection,
            verification_token: None,
        })
    }

    /// Whether the part needs attention on or before `as_of`
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.next_inspection.is_due(as_of)
    }
}

impl Record for InspectionRecord {
    const KIND: &'static str = "inspection";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = RecordPrefix::Insp.format(seq);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "part_id", &self.part_id)?;
        require_text(Self::KIND, "inspector", &self.inspector)?;
        require_text(Self::KIND, "findings", &self.findings)
    }

    fn token(&self) -> Option<&VerificationToken> {
        self.verification_token.as_ref()
    }

    fn set_token(&mut self, token: Option<VerificationToken>) {
        self.verification_token = token;
    }
}
