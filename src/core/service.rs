//! Track service - the operations the CLI (or any front end) calls
//!
//! Owns one [`RecordStore`] per record kind, the part catalog and the
//! workflow engine. All operations take `&self`; the stores do their own
//! locking, so a service can be shared across threads behind an `Arc`.

use chrono::{NaiveDate, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::core::catalog::PartCatalog;
use crate::core::entity::{
    BatchStatus, InspectionResult, InstallationStatus, Record, Tracked, ValidationError,
};
use crate::core::schedule::InspectionIntervals;
use crate::core::seed;
use crate::core::store::{RecordStore, StoreError};
use crate::core::summary::Summary;
use crate::core::workflow::{Lifecycle, WorkflowEngine, WorkflowError};
use crate::entities::batch::BatchRecord;
use crate::entities::inspection::InspectionRecord;
use crate::entities::installation::InstallationRecord;
use crate::entities::part::PartRecord;

/// Errors returned by [`TrackService`] operations
#[derive(Debug, Error, Diagnostic)]
pub enum ServiceError {
    #[error("{0}")]
    #[diagnostic(code(tpm::validation), help("Fill in the required field and retry"))]
    Validation(#[from] ValidationError),

    #[error("Invalid status transition for {kind} '{id}': {from} → {to}")]
    #[diagnostic(code(tpm::invalid_transition), help("From {from} the allowed transitions are: {allowed}"))]
    InvalidTransition {
        kind: &'static str,
        id: String,
        from: String,
        to: String,
        allowed: String,
    },

    #[error("{kind} '{id}' not found")]
    #[diagnostic(code(tpm::not_found))]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' was modified concurrently (expected version {expected}, found {actual})")]
    #[diagnostic(code(tpm::conflict), help("Reload the record and retry"))]
    Conflict {
        kind: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("{kind} '{id}' already exists")]
    #[diagnostic(code(tpm::duplicate))]
    Duplicate { kind: &'static str, id: String },

    #[error("{kind} '{id}' cannot be rewritten as '{found}'; IDs never change")]
    #[diagnostic(code(tpm::id_changed))]
    IdChanged {
        kind: &'static str,
        id: String,
        found: String,
    },

    #[error("No {kind} sequence numbers left after {last}")]
    #[diagnostic(
        code(tpm::sequence_exhausted),
        help("Renumber the {kind} records in .tpm/records.yaml")
    )]
    SequenceExhausted { kind: &'static str, last: u32 },

    #[error("Failed to compute verification token: {0}")]
    #[diagnostic(code(tpm::token))]
    Token(#[source] serde_json::Error),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => ServiceError::Validation(v),
            StoreError::NotFound { kind, id } => ServiceError::NotFound { kind, id },
            StoreError::VersionConflict {
                kind,
                id,
                expected,
                actual,
            } => ServiceError::Conflict {
                kind,
                id,
                expected,
                actual,
            },
            StoreError::Duplicate { kind, id } => ServiceError::Duplicate { kind, id },
            StoreError::IdChanged { kind, id, found } => {
                ServiceError::IdChanged { kind, id, found }
            }
            StoreError::SequenceExhausted { kind, last } => {
                ServiceError::SequenceExhausted { kind, last }
            }
        }
    }
}

impl ServiceError {
    fn from_workflow<T: Tracked>(record: &T, e: WorkflowError) -> Self {
        match e {
            WorkflowError::InvalidTransition { from, to } => ServiceError::InvalidTransition {
                kind: T::KIND,
                id: record.id().to_string(),
                from,
                to,
                allowed: describe_allowed(record.status()),
            },
            WorkflowError::Payload(e) => ServiceError::Token(e),
        }
    }
}

fn describe_allowed<S: Lifecycle>(status: S) -> String {
    let allowed = status.allowed_transitions();
    if allowed.is_empty() {
        "none (terminal status)".to_string()
    } else {
        allowed
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Input for [`TrackService::create_installation`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallationFields {
    pub part_id: String,
    pub part_type: String,
    pub location: String,
    pub installation_date: Option<NaiveDate>,
    pub engineer: String,
    pub notes: Option<String>,
}

/// Input for [`TrackService::create_inspection`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionFields {
    pub part_id: String,
    pub part_type: String,
    pub location: String,
    pub inspection_date: Option<NaiveDate>,
    pub inspector: String,
    pub result: InspectionResult,
    pub findings: String,
    pub images: Vec<String>,
}

/// Input for [`TrackService::create_batch`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchFields {
    pub vendor: String,
    pub material_type: String,
    pub quantity: u32,
    pub manufacturing_date: Option<NaiveDate>,
    pub warranty_months: Option<u32>,
}

/// All records of a service, as saved in a workspace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub installations: Vec<InstallationRecord>,
    #[serde(default)]
    pub inspections: Vec<InspectionRecord>,
    #[serde(default)]
    pub batches: Vec<BatchRecord>,
}

impl Snapshot {
    /// The demo records a new workspace starts with
    pub fn seeded() -> Self {
        Self {
            installations: seed::installations(),
            inspections: seed::inspections(),
            batches: seed::batches(),
        }
    }
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Track-parts lifecycle service
pub struct TrackService {
    installations: RecordStore<InstallationRecord>,
    inspections: RecordStore<InspectionRecord>,
    batches: RecordStore<BatchRecord>,
    catalog: PartCatalog,
    engine: WorkflowEngine,
    intervals: InspectionIntervals,
    clock: Clock,
}

impl std::fmt::Debug for TrackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackService")
            .field("installations", &self.installations.len())
            .field("inspections", &self.inspections.len())
            .field("batches", &self.batches.len())
            .field("catalog", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Default for TrackService {
    fn default() -> Self {
        Self::new(WorkflowEngine::default())
    }
}

impl TrackService {
    /// Create an empty service with the seeded part catalog
    pub fn new(engine: WorkflowEngine) -> Self {
        Self {
            installations: RecordStore::new(),
            inspections: RecordStore::new(),
            batches: RecordStore::new(),
            catalog: PartCatalog::new(seed::parts()),
            engine,
            intervals: InspectionIntervals::default(),
            clock: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Create a service holding the records of a snapshot
    pub fn from_snapshot(snapshot: Snapshot, engine: WorkflowEngine) -> Result<Self, ServiceError> {
        Ok(Self {
            installations: RecordStore::from_records(snapshot.installations)?,
            inspections: RecordStore::from_records(snapshot.inspections)?,
            batches: RecordStore::from_records(snapshot.batches)?,
            ..Self::new(engine)
        })
    }

    /// Create a service holding the demo records
    pub fn seeded() -> Result<Self, ServiceError> {
        Self::from_snapshot(Snapshot::seeded(), WorkflowEngine::default())
    }

    pub fn with_intervals(mut self, intervals: InspectionIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_catalog(mut self, catalog: PartCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the source of "today" used for batch IDs
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn catalog(&self) -> &PartCatalog {
        &self.catalog
    }

    // =========================================================================
    // Installations
    // =========================================================================

    /// Record a part received at the depot
    pub fn create_installation(
        &self,
        fields: InstallationFields,
    ) -> Result<InstallationRecord, ServiceError> {
        let mut record = InstallationRecord::new(
            fields.part_id,
            fields.part_type,
            fields.location,
            fields.engineer,
        );
        record.installation_date = fields.installation_date;
        record.notes = fields.notes.filter(|n| !n.trim().is_empty());

        let record = self.installations.append(record)?;
        info!(id = %record.id, part = %record.part_id, "installation created");
        Ok(record)
    }

    /// Move an installation to a new status
    pub fn advance_installation_status(
        &self,
        id: &str,
        to: InstallationStatus,
    ) -> Result<InstallationRecord, ServiceError> {
        let updated = self.installations.update(id, |current| {
            self.engine
                .advance(current, to)
                .map_err(|e| ServiceError::from_workflow(current, e))
        })?;
        info!(id, status = %updated.status, "installation status changed");
        Ok(updated)
    }

    /// Statuses the installation may move to next
    pub fn allowed_installation_transitions(
        &self,
        id: &str,
    ) -> Result<Vec<InstallationStatus>, ServiceError> {
        let current = self.installation(id)?;
        Ok(self.engine.allowed_transitions(current.status))
    }

    pub fn installation(&self, id: &str) -> Result<InstallationRecord, ServiceError> {
        self.installations
            .get(id)
            .ok_or_else(|| not_found::<InstallationRecord>(id))
    }

    pub fn installations(&self) -> Vec<InstallationRecord> {
        self.installations.list()
    }

    /// Check an installation's token; `None` when there is nothing to check
    pub fn verify_installation(&self, id: &str) -> Result<Option<bool>, ServiceError> {
        Ok(self.engine.verify(&self.installation(id)?))
    }

    // =========================================================================
    // Inspections
    // =========================================================================

    /// Record an inspection and derive its next inspection date
    pub fn create_inspection(
        &self,
        fields: InspectionFields,
    ) -> Result<InspectionRecord, ServiceError> {
        const KIND: &str = InspectionRecord::KIND;

        let inspected = fields
            .inspection_date
            .ok_or(ValidationError::new(KIND, "inspection_date"))?;
        let mut record = InspectionRecord::new(
            fields.part_id,
            inspected,
            fields.inspector,
            fields.result,
            fields.findings,
            &self.intervals,
        )
        .ok_or(ValidationError::new(KIND, "inspection_date"))?;
        record.part_type = fields.part_type;
        record.location = fields.location;
        record.images = fields.images;

        let record = self
            .inspections
            .append_with(record, |r| self.engine.seal(r).map_err(ServiceError::Token))?;
        info!(
            id = %record.id,
            part = %record.part_id,
            result = %record.result,
            next = %record.next_inspection,
            "inspection recorded"
        );
        Ok(record)
    }

    pub fn inspection(&self, id: &str) -> Result<InspectionRecord, ServiceError> {
        self.inspections
            .get(id)
            .ok_or_else(|| not_found::<InspectionRecord>(id))
    }

    pub fn inspections(&self) -> Vec<InspectionRecord> {
        self.inspections.list()
    }

    pub fn verify_inspection(&self, id: &str) -> Result<Option<bool>, ServiceError> {
        Ok(self.engine.verify(&self.inspection(id)?))
    }

    // =========================================================================
    // Batches
    // =========================================================================

    /// Submit a vendor batch for approval
    pub fn create_batch(&self, fields: BatchFields) -> Result<BatchRecord, ServiceError> {
        let mut record = BatchRecord::new(
            fields.vendor,
            fields.material_type,
            fields.quantity,
            self.today(),
        );
        record.manufacturing_date = fields.manufacturing_date;
        record.warranty_months = fields.warranty_months;

        let record = self.batches.append(record)?;
        info!(id = %record.batch_id, vendor = %record.vendor, "batch submitted");
        Ok(record)
    }

    /// Move a batch to its next status
    pub fn advance_batch_status(
        &self,
        batch_id: &str,
        to: BatchStatus,
    ) -> Result<BatchRecord, ServiceError> {
        let updated = self.batches.update(batch_id, |current| {
            self.engine
                .advance(current, to)
                .map_err(|e| ServiceError::from_workflow(current, e))
        })?;
        info!(id = batch_id, status = %updated.status, "batch status changed");
        Ok(updated)
    }

    pub fn allowed_batch_transitions(&self, batch_id: &str) -> Result<Vec<BatchStatus>, ServiceError> {
        let current = self.batch(batch_id)?;
        Ok(self.engine.allowed_transitions(current.status))
    }

    pub fn batch(&self, batch_id: &str) -> Result<BatchRecord, ServiceError> {
        self.batches
            .get(batch_id)
            .ok_or_else(|| not_found::<BatchRecord>(batch_id))
    }

    pub fn batches(&self) -> Vec<BatchRecord> {
        self.batches.list()
    }

    pub fn verify_batch(&self, batch_id: &str) -> Result<Option<bool>, ServiceError> {
        Ok(self.engine.verify(&self.batch(batch_id)?))
    }

    // =========================================================================
    // Lookup and reporting
    // =========================================================================

    /// Resolve a QR code to a catalogued part
    pub fn lookup_by_qr_code(&self, code: &str) -> Result<PartRecord, ServiceError> {
        self.catalog
            .lookup(code)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "part",
                id: code.trim().to_string(),
            })
    }

    /// Counts and due inspections as of a date
    pub fn summary(&self, as_of: NaiveDate) -> Summary {
        Summary::compute(
            &self.installations.list(),
            &self.inspections.list(),
            &self.batches.list(),
            as_of,
        )
    }

    /// Copy all records out for saving
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            installations: self.installations.list(),
            inspections: self.inspections.list(),
            batches: self.batches.list(),
        }
    }
}

fn not_found<T: Record>(id: &str) -> ServiceError {
    ServiceError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}
