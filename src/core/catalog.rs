//! QR code part catalog
//!
//! A static lookup table keyed by part ID. Scanning hardware is outside this
//! crate; whatever produced the code hands it to [`PartCatalog::lookup`].

use std::collections::BTreeMap;

use crate::entities::part::PartRecord;

/// Lookup table of catalogued parts
#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    parts: BTreeMap<String, PartRecord>,
}

impl PartCatalog {
    pub fn new(parts: impl IntoIterator<Item = PartRecord>) -> Self {
        Self {
            parts: parts.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Resolve a scanned or typed code to a part
    ///
    /// Surrounding whitespace is ignored; matching is case-sensitive.
    pub fn lookup(&self, code: &str) -> Option<&PartRecord> {
        self.parts.get(code.trim())
    }

    /// All catalogued codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
