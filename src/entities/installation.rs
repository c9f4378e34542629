//! Installation entity type - a part received at a depot and fitted to track

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{require_text, InstallationStatus, Record, Tracked, ValidationError};
use crate::core::identity::RecordPrefix;
use crate::core::token::VerificationToken;

/// An Installation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Unique identifier (INST-NNN), assigned by the store
    #[serde(default)]
    pub id: String,

    /// QR code / part ID of the installed part
    pub part_id: String,

    /// Part type (e.g., "Elastic Rail Clip")
    #[serde(default)]
    pub part_type: String,

    /// Track location (e.g., "Track Section A-12, KM 145.2")
    pub location: String,

    /// Date of installation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,

    /// Engineer responsible
    pub engineer: String,

    /// Current status
    #[serde(default)]
    pub status: InstallationStatus,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Token from the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<VerificationToken>,
}

impl InstallationRecord {
    /// Create a new record in `received` status; the ID is assigned on append
    pub fn new(part_id: String, part_type: String, location: String, engineer: String) -> Self {
        Self {
            id: String::new(),
            part_id,
            part_type,
            location,
            installation_date: None,
            engineer,
            status: InstallationStatus::default(),
            notes: None,
            verification_token: None,
        }
    }
}

impl Record for InstallationRecord {
    const KIND: &'static str = "installation";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = RecordPrefix::Inst.format(seq);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "part_id", &self.part_id)?;
        require_text(Self::KIND, "location", &self.location)?;
        require_text(Self::KIND, "engineer", &self.engineer)
    }

    fn token(&self) -> Option<&VerificationToken> {
        self.verification_token.as_ref()
    }

    fn set_token(&mut self, token: Option<VerificationToken>) {
        self.verification_token = token;
    }
}

impl Tracked for InstallationRecord {
    type Status = InstallationStatus;

    fn status(&self) -> InstallationStatus {
        self.status
    }

    fn set_status(&mut self, status: InstallationStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InstallationRecord {
        InstallationRecord::new(
            "TRP-EC-004-2024".to_string(),
            "Elastic Rail Clip".to_string(),
            "Track Section D-3, KM 156.8".to_string(),
            "Lisa Chen".to_string(),
        )
    }

    #[test]
    fn test_installation_creation() {
        let rec = sample();
        assert!(rec.id.is_empty());
        assert_eq!(rec.status, InstallationStatus::Received);
        assert!(rec.verification_token.is_none());
    }

    #[test]
    fn test_assign_id() {
        let mut rec = sample();
        rec.assign_id(4);
        assert_eq!(rec.id, "INST-004");
        assert_eq!(rec.sequence(), Some(4));
    }

    #[test]
    fn test_required_fields() {
        assert!(sample().validate().is_ok());

        let mut rec = sample();
        rec.engineer.clear();
        assert_eq!(rec.validate().unwrap_err().field, "engineer");

        let mut rec = sample();
        rec.part_id = " ".to_string();
        assert_eq!(rec.validate().unwrap_err().field, "part_id");

        // Part type is optional
        let mut rec = sample();
        rec.part_type.clear();
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn test_yaml_layout() {
        let mut rec = sample();
        rec.assign_id(1);
        rec.installation_date = NaiveDate::from_ymd_opt(2024, 2, 20);

        let yaml = serde_yml::to_string(&rec).unwrap();
        assert!(yaml.contains("id: INST-001"));
        assert!(yaml.contains("status: received"));
        assert!(yaml.contains("installation_date:"));
        assert!(yaml.contains("2024-02-20"));
        assert!(!yaml.contains("verification_token"));
    }
}
