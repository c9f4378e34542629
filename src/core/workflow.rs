//! Workflow engine for status transitions
//!
//! Each tracked record kind declares its allowed transitions through the
//! [`Lifecycle`] trait. The [`WorkflowEngine`] validates a requested change
//! against that table, applies it to a copy of the record and attaches a fresh
//! verification token. The input record is never touched, so a rejected
//! transition leaves the caller's state exactly as it was.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::entity::{BatchStatus, InstallationStatus, Record, Tracked};
use crate::core::token::{DigestTokens, TokenSource, VerificationToken};

/// A status set with an allow-list of transitions
pub trait Lifecycle:
    Copy + Eq + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Statuses reachable in one step from `self`
    fn allowed_transitions(self) -> &'static [Self];

    /// Check if a status transition is valid
    fn can_transition(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// No transition leaves this status
    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl Lifecycle for InstallationStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            InstallationStatus::Received => {
                &[InstallationStatus::Installed, InstallationStatus::Maintenance]
            }
            InstallationStatus::Installed => {
                &[InstallationStatus::Verified, InstallationStatus::Maintenance]
            }
            InstallationStatus::Verified => &[InstallationStatus::Maintenance],
            InstallationStatus::Maintenance => &[],
        }
    }
}

impl Lifecycle for BatchStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        match self {
            BatchStatus::Pending => &[BatchStatus::Approved],
            BatchStatus::Approved => &[BatchStatus::Shipped],
            BatchStatus::Shipped => &[BatchStatus::Delivered],
            BatchStatus::Delivered => &[],
        }
    }
}

/// Errors that can occur during workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid status transition: {from} → {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Failed to serialize record for token: {0}")]
    Payload(#[from] serde_json::Error),
}

impl WorkflowError {
    pub fn invalid<S: Lifecycle>(from: S, to: S) -> Self {
        WorkflowError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Validate a transition without touching any record
pub fn check_transition<S: Lifecycle>(from: S, to: S) -> Result<(), WorkflowError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(WorkflowError::invalid(from, to))
    }
}

/// Serialized form of a record with its token cleared, used as token input
pub fn token_payload<T: Record>(record: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut unsealed = record.clone();
    unsealed.set_token(None);
    serde_json::to_vec(&unsealed)
}

/// Workflow engine for managing status transitions
#[derive(Clone)]
pub struct WorkflowEngine {
    tokens: Arc<dyn TokenSource>,
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new(Arc::new(DigestTokens::default()))
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine").finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    /// Create a new workflow engine
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self { tokens }
    }

    /// Get allowed transitions from the current status
    pub fn allowed_transitions<S: Lifecycle>(&self, current: S) -> Vec<S> {
        current.allowed_transitions().to_vec()
    }

    /// Apply a transition, returning the updated record
    pub fn advance<T: Tracked>(&self, record: &T, to: T::Status) -> Result<T, WorkflowError> {
        let from = record.status();
        if let Err(e) = check_transition(from, to) {
            warn!(kind = T::KIND, id = record.id(), %from, %to, "transition rejected");
            return Err(e);
        }

        let mut next = record.clone();
        next.set_status(to);
        self.seal(&mut next)?;
        debug!(kind = T::KIND, id = next.id(), %from, %to, "transition applied");
        Ok(next)
    }

    /// Attach a token computed from the record's current content
    pub fn seal<T: Record>(&self, record: &mut T) -> Result<(), serde_json::Error> {
        let payload = token_payload(record)?;
        record.set_token(Some(self.tokens.issue(&payload)));
        Ok(())
    }

    /// Check a record's token; `None` if it has none or the source can't tell
    pub fn verify<T: Record>(&self, record: &T) -> Option<bool> {
        let token: &VerificationToken = record.token()?;
        let payload = token_payload(record).ok()?;
        self.tokens.verify(&payload, token)
    }
}
