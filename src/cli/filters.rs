//! Filter enums for list commands

use clap::ValueEnum;

use crate::core::entity::{BatchStatus, InspectionResult, InstallationStatus};

/// Installation status filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum InstallationFilter {
    Received,
    Installed,
    Verified,
    Maintenance,
    /// Not yet verified and not in maintenance
    Open,
    /// All statuses - default
    #[default]
    All,
}

impl InstallationFilter {
    /// Check if a status matches this filter
    pub fn matches(&self, status: InstallationStatus) -> bool {
        match self {
            InstallationFilter::Received => status == InstallationStatus::Received,
            InstallationFilter::Installed => status == InstallationStatus::Installed,
            InstallationFilter::Verified => status == InstallationStatus::Verified,
            InstallationFilter::Maintenance => status == InstallationStatus::Maintenance,
            InstallationFilter::Open => matches!(
                status,
                InstallationStatus::Received | InstallationStatus::Installed
            ),
            InstallationFilter::All => true,
        }
    }
}

/// Batch status filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum BatchFilter {
    Pending,
    Approved,
    Shipped,
    Delivered,
    /// Anything not yet delivered
    Open,
    /// All statuses - default
    #[default]
    All,
}

impl BatchFilter {
    pub fn matches(&self, status: BatchStatus) -> bool {
        match self {
            BatchFilter::Pending => status == BatchStatus::Pending,
            BatchFilter::Approved => status == BatchStatus::Approved,
            BatchFilter::Shipped => status == BatchStatus::Shipped,
            BatchFilter::Delivered => status == BatchStatus::Delivered,
            BatchFilter::Open => status != BatchStatus::Delivered,
            BatchFilter::All => true,
        }
    }
}

/// Inspection result filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ResultFilter {
    Ok,
    Defect,
    Replace,
    /// Defect or replace
    Failed,
    #[default]
    All,
}

impl ResultFilter {
    pub fn matches(&self, result: InspectionResult) -> bool {
        match self {
            ResultFilter::Ok => result == InspectionResult::Ok,
            ResultFilter::Defect => result == InspectionResult::Defect,
            ResultFilter::Replace => result == InspectionResult::Replace,
            ResultFilter::Failed => result != InspectionResult::Ok,
            ResultFilter::All => true,
        }
    }
}
