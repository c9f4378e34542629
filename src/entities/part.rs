//! Part entity type - a catalogued track part addressed by its QR code

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::PartStatus;

/// A track part as returned by a QR lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    /// QR code / part ID (e.g., "TRP-EC-001-2024")
    pub id: String,

    /// Part type
    pub part_type: String,

    /// Batch the part was shipped in
    pub batch_id: String,

    /// Supplying vendor
    pub vendor: String,

    pub manufacturing_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub status: PartStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inspection: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_inspection: Option<NaiveDate>,
}
