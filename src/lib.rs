//! TPM: Track Parts Manager
//!
//! Lifecycle records for railway track parts: vendor batches moving through
//! approval and delivery, depot installations moving through verification,
//! and field inspections that schedule the next visit. Records live in
//! in-memory stores and are saved as plain YAML in a `.tpm/` workspace.

pub mod cli;
pub mod core;
pub mod entities;
