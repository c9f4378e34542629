//! CLI command implementations

pub mod batch;
pub mod completions;
pub mod init;
pub mod insp;
pub mod inst;
pub mod scan;
pub mod summary;
