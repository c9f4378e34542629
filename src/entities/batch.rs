//! Batch entity type - a vendor's manufacturing and supply batch

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{require_text, BatchStatus, Record, Tracked, ValidationError};
use crate::core::identity;
use crate::core::token::VerificationToken;

/// A vendor Batch record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Batch identifier (XX-BATCH-YYYY-Qn-NNN), assigned by the store
    #[serde(default)]
    pub batch_id: String,

    /// Supplying vendor
    pub vendor: String,

    /// Material type (e.g., "Rail Pad")
    pub material_type: String,

    /// Number of units in the batch
    pub quantity: u32,

    /// Date the batch was manufactured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_date: Option<NaiveDate>,

    /// Warranty period in months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_months: Option<u32>,

    /// Date the batch was submitted; its year and quarter go into the ID
    pub submitted: NaiveDate,

    /// Current status
    #[serde(default)]
    pub status: BatchStatus,

    /// Token from the last status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<VerificationToken>,
}

impl BatchRecord {
    /// Create a new pending batch; the ID is assigned on append
    pub fn new(vendor: String, material_type: String, quantity: u32, submitted: NaiveDate) -> Self {
        Self {
            batch_id: String::new(),
            vendor,
            material_type,
            quantity,
            manufacturing_date: None,
            warranty_months: None,
            submitted,
            status: BatchStatus::default(),
            verification_token: None,
        }
    }
}

impl Record for BatchRecord {
    const KIND: &'static str = "batch";

    fn id(&self) -> &str {
        &self.batch_id
    }

    fn assign_id(&mut self, seq: u32) {
        self.batch_id = identity::batch_id(&self.material_type, self.submitted, seq);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "vendor", &self.vendor)?;
        // The ID's material code needs a letter or digit to start from
        if identity::material_code(&self.material_type).is_empty() {
            return Err(ValidationError::new(Self::KIND, "material_type"));
        }
        if self.quantity == 0 {
            return Err(ValidationError::new(Self::KIND, "quantity"));
        }
        Ok(())
    }

    fn token(&self) -> Option<&VerificationToken> {
        self.verification_token.as_ref()
    }

    fn set_token(&mut self, token: Option<VerificationToken>) {
        self.verification_token = token;
    }
}

impl Tracked for BatchRecord {
    type Status = BatchStatus;

    fn status(&self) -> BatchStatus {
        self.status
    }

    fn set_status(&mut self, status: BatchStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(quantity: u32) -> BatchRecord {
        BatchRecord::new(
            "Track Systems Corp".to_string(),
            "Rail Liner".to_string(),
            quantity,
            NaiveDate::from_ymd_opt(2024, 10, 3).unwrap(),
        )
    }

    #[test]
    fn test_batch_id_assignment() {
        let mut batch = sample(250);
        batch.assign_id(4);
        assert_eq!(batch.batch_id, "RA-BATCH-2024-Q4-004");
        assert_eq!(batch.sequence(), Some(4));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        assert_eq!(sample(0).validate().unwrap_err().field, "quantity");
        assert!(sample(1).validate().is_ok());
    }

    #[test]
    fn test_missing_vendor() {
        let mut batch = sample(10);
        batch.vendor.clear();
        assert_eq!(batch.validate().unwrap_err().field, "vendor");
    }

    #[test]
    fn test_punctuation_only_material_is_rejected() {
        let mut batch = sample(10);
        batch.material_type = "--".to_string();
        assert_eq!(batch.validate().unwrap_err().field, "material_type");

        batch.material_type = "   ".to_string();
        assert_eq!(batch.validate().unwrap_err().field, "material_type");

        batch.material_type = "-- Pad".to_string();
        assert!(batch.validate().is_err());

        batch.material_type = "Pad".to_string();
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_status_serialization() {
        let mut batch = sample(10);
        batch.status = BatchStatus::Shipped;
        let yaml = serde_yml::to_string(&batch).unwrap();
        assert!(yaml.contains("status: shipped"));
        assert!(yaml.contains("2024-10-03"));
    }
}
