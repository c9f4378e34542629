//! In-memory record store
//!
//! Holds an ordered collection of one record kind. IDs come from a monotonic
//! counter kept under the same lock as the records, so concurrent appends
//! never reuse a sequence number. Every stored record carries a version that
//! is bumped on each write, which lets callers do optimistic `replace_if`.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

use crate::core::entity::{Record, ValidationError};

/// Errors raised by a [`RecordStore`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        kind: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("{kind} '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("{kind} '{id}' cannot be rewritten as '{found}'; IDs never change")]
    IdChanged {
        kind: &'static str,
        id: String,
        found: String,
    },

    #[error("No {kind} sequence numbers left after {last}")]
    SequenceExhausted { kind: &'static str, last: u32 },
}

/// A record together with its write version
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub record: T,
}

#[derive(Debug)]
struct Inner<T> {
    records: Vec<Versioned<T>>,
    // Wider than the ID sequence so a loaded `PREFIX-4294967295` still fits
    next_seq: u64,
}

impl<T: Record> Inner<T> {
    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|v| v.record.id() == id)
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }

    fn check_id(id: &str, record: &T) -> Result<(), StoreError> {
        if record.id() == id {
            Ok(())
        } else {
            Err(StoreError::IdChanged {
                kind: T::KIND,
                id: id.to_string(),
                found: record.id().to_string(),
            })
        }
    }
}

/// Thread-safe ordered collection of records of one kind
#[derive(Debug)]
pub struct RecordStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    /// Create an empty store whose first ID uses sequence 1
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// Create a store holding existing records (e.g., seed data or a loaded workspace)
    ///
    /// The counter continues after the highest sequence found, or after the
    /// record count if that is larger. A store whose highest sequence is
    /// `u32::MAX` loads fine but refuses further appends.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Result<Self, StoreError> {
        let mut stored: Vec<Versioned<T>> = Vec::new();
        for record in records {
            if stored.iter().any(|v| v.record.id() == record.id()) {
                return Err(StoreError::Duplicate {
                    kind: T::KIND,
                    id: record.id().to_string(),
                });
            }
            stored.push(Versioned { version: 1, record });
        }

        let highest = stored
            .iter()
            .filter_map(|v| v.record.sequence())
            .max()
            .unwrap_or(0);
        let next_seq = u64::from(highest).max(stored.len() as u64) + 1;

        Ok(Self {
            inner: RwLock::new(Inner {
                records: stored,
                next_seq,
            }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
        // Writes are single assignments; poisoned data stays consistent
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Validate, assign the next ID, and append a record
    pub fn append(&self, record: T) -> Result<T, StoreError> {
        self.append_with(record, |_| Ok(()))
    }

    /// Like [`append`](Self::append), running `finish` after the ID is assigned
    ///
    /// `finish` sees the record with its final ID and may fill derived fields.
    /// If it fails nothing is stored and the sequence number is not consumed.
    pub fn append_with<E, F>(&self, mut record: T, finish: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        record.validate().map_err(StoreError::from)?;

        let mut inner = self.write();
        let seq = u32::try_from(inner.next_seq).map_err(|_| StoreError::SequenceExhausted {
            kind: T::KIND,
            last: u32::MAX,
        })?;
        record.assign_id(seq);
        if inner.position(record.id()).is_some() {
            return Err(StoreError::Duplicate {
                kind: T::KIND,
                id: record.id().to_string(),
            }
            .into());
        }
        finish(&mut record)?;
        inner.next_seq = u64::from(seq) + 1;
        inner.records.push(Versioned {
            version: 1,
            record: record.clone(),
        });
        debug!(kind = T::KIND, id = record.id(), "record appended");
        Ok(record)
    }

    /// Replace the record with the given ID (last write wins)
    ///
    /// The replacement must carry the same ID.
    pub fn replace(&self, id: &str, record: T) -> Result<(), StoreError> {
        Inner::check_id(id, &record)?;
        let mut inner = self.write();
        let pos = inner.position(id).ok_or_else(|| Inner::<T>::not_found(id))?;
        let slot = &mut inner.records[pos];
        slot.version += 1;
        slot.record = record;
        debug!(kind = T::KIND, id, version = slot.version, "record replaced");
        Ok(())
    }

    /// Replace the record only if it is still at `expected` version
    pub fn replace_if(&self, id: &str, expected: u64, record: T) -> Result<u64, StoreError> {
        Inner::check_id(id, &record)?;
        let mut inner = self.write();
        let pos = inner.position(id).ok_or_else(|| Inner::<T>::not_found(id))?;
        let slot = &mut inner.records[pos];
        if slot.version != expected {
            return Err(StoreError::VersionConflict {
                kind: T::KIND,
                id: id.to_string(),
                expected,
                actual: slot.version,
            });
        }
        slot.version += 1;
        slot.record = record;
        Ok(slot.version)
    }

    /// Read-modify-write a record under the store's write lock
    ///
    /// `f` receives the current record and returns its replacement. If `f`
    /// fails, or returns a record with another ID, nothing is written.
    pub fn update<E, F>(&self, id: &str, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&T) -> Result<T, E>,
    {
        let mut inner = self.write();
        let pos = inner.position(id).ok_or_else(|| Inner::<T>::not_found(id))?;
        let slot = &mut inner.records[pos];
        let updated = f(&slot.record)?;
        Inner::check_id(id, &updated)?;
        slot.version += 1;
        slot.record = updated.clone();
        debug!(kind = T::KIND, id, version = slot.version, "record updated");
        Ok(updated)
    }

    /// Get a copy of a record by ID
    pub fn get(&self, id: &str) -> Option<T> {
        self.get_versioned(id).map(|v| v.record)
    }

    /// Get a copy of a record and its version
    pub fn get_versioned(&self, id: &str) -> Option<Versioned<T>> {
        let inner = self.read();
        inner.position(id).map(|pos| inner.records[pos].clone())
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<T> {
        self.read().records.iter().map(|v| v.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Sequence number the next append will use
    pub fn next_sequence(&self) -> u64 {
        self.read().next_seq
    }
}
