//! Core module - fundamental types and services

pub mod catalog;
pub mod config;
pub mod entity;
pub mod identity;
pub mod logging;
pub mod schedule;
pub mod seed;
pub mod service;
pub mod store;
pub mod summary;
pub mod task;
pub mod token;
pub mod workflow;
pub mod workspace;

pub use catalog::PartCatalog;
pub use config::{Config, ConfigError, TokenMode};
pub use entity::{
    BatchStatus, InspectionResult, InstallationStatus, PartStatus, Record, Tracked,
    ValidationError,
};
pub use identity::RecordPrefix;
pub use schedule::{InspectionIntervals, NextInspection};
pub use service::{
    BatchFields, InspectionFields, InstallationFields, ServiceError, Snapshot, TrackService,
};
pub use store::{RecordStore, StoreError, Versioned};
pub use summary::{DueInspection, Summary};
pub use task::{DelayedTask, TaskError};
pub use token::{DigestTokens, RandomTokens, TokenSource, VerificationToken};
pub use workflow::{Lifecycle, WorkflowEngine, WorkflowError};
pub use workspace::{Fingerprint, Workspace, WorkspaceError, WorkspaceLock};
