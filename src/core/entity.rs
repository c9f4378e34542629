//! Record trait - common interface for all lifecycle record types

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::core::identity;
use crate::core::token::VerificationToken;
use crate::core::workflow::Lifecycle;

/// A required field was missing or empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} record is missing required field '{field}'")]
pub struct ValidationError {
    pub kind: &'static str,
    pub field: &'static str,
}

impl ValidationError {
    pub fn new(kind: &'static str, field: &'static str) -> Self {
        Self { kind, field }
    }
}

/// Check that a text field holds something other than whitespace
pub fn require_text(kind: &'static str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(kind, field))
    } else {
        Ok(())
    }
}

/// Common trait for all records held in a [`RecordStore`](crate::core::store::RecordStore)
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The record kind used in messages (e.g., "installation")
    const KIND: &'static str;

    /// Get the record's unique ID (empty until the store assigns one)
    fn id(&self) -> &str;

    /// Assign the generated ID for the given sequence number
    fn assign_id(&mut self, seq: u32);

    /// Check required fields before the record enters a store
    fn validate(&self) -> Result<(), ValidationError>;

    /// Sequence number encoded in the ID, if any
    fn sequence(&self) -> Option<u32> {
        identity::parse_sequence(self.id())
    }

    /// Current verification token
    fn token(&self) -> Option<&VerificationToken>;

    /// Replace the verification token
    fn set_token(&mut self, token: Option<VerificationToken>);
}

/// A record whose status moves through a [`Lifecycle`]
pub trait Tracked: Record {
    type Status: Lifecycle;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);
}

/// Installation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum InstallationStatus {
    #[default]
    Received,
    Installed,
    Verified,
    Maintenance,
}

impl InstallationStatus {
    pub const ALL: [InstallationStatus; 4] = [
        InstallationStatus::Received,
        InstallationStatus::Installed,
        InstallationStatus::Verified,
        InstallationStatus::Maintenance,
    ];
}

impl std::fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallationStatus::Received => write!(f, "received"),
            InstallationStatus::Installed => write!(f, "installed"),
            InstallationStatus::Verified => write!(f, "verified"),
            InstallationStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl std::str::FromStr for InstallationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "received" => Ok(InstallationStatus::Received),
            "installed" => Ok(InstallationStatus::Installed),
            "verified" => Ok(InstallationStatus::Verified),
            "maintenance" => Ok(InstallationStatus::Maintenance),
            _ => Err(format!(
                "Invalid installation status: {}. Use received, installed, verified, or maintenance",
                s
            )),
        }
    }
}

/// Vendor batch status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum BatchStatus {
    #[default]
    Pending,
    Approved,
    Shipped,
    Delivered,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 4] = [
        BatchStatus::Pending,
        BatchStatus::Approved,
        BatchStatus::Shipped,
        BatchStatus::Delivered,
    ];
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::Pending => write!(f, "pending"),
            BatchStatus::Approved => write!(f, "approved"),
            BatchStatus::Shipped => write!(f, "shipped"),
            BatchStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BatchStatus::Pending),
            "approved" => Ok(BatchStatus::Approved),
            "shipped" => Ok(BatchStatus::Shipped),
            "delivered" => Ok(BatchStatus::Delivered),
            _ => Err(format!(
                "Invalid batch status: {}. Use pending, approved, shipped, or delivered",
                s
            )),
        }
    }
}

/// Inspection outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum InspectionResult {
    #[default]
    Ok,
    Defect,
    Replace,
}

impl InspectionResult {
    pub const ALL: [InspectionResult; 3] = [
        InspectionResult::Ok,
        InspectionResult::Defect,
        InspectionResult::Replace,
    ];
}

impl std::fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionResult::Ok => write!(f, "ok"),
            InspectionResult::Defect => write!(f, "defect"),
            InspectionResult::Replace => write!(f, "replace"),
        }
    }
}

impl std::str::FromStr for InspectionResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(InspectionResult::Ok),
            "defect" => Ok(InspectionResult::Defect),
            "replace" => Ok(InspectionResult::Replace),
            _ => Err(format!(
                "Invalid inspection result: {}. Use ok, defect, or replace",
                s
            )),
        }
    }
}

/// Field status of a catalogued track part
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum PartStatus {
    #[default]
    Active,
    InspectionDue,
    MaintenanceRequired,
    Retired,
}

impl std::fmt::Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartStatus::Active => write!(f, "active"),
            PartStatus::InspectionDue => write!(f, "inspection_due"),
            PartStatus::MaintenanceRequired => write!(f, "maintenance_required"),
            PartStatus::Retired => write!(f, "retired"),
        }
    }
}
