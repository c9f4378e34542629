//! Human-readable record identifiers
//!
//! Installation and inspection records use `PREFIX-NNN` (e.g., `INST-004`).
//! Vendor batches use `XX-BATCH-YYYY-Qn-NNN` (e.g., `EC-BATCH-2024-Q1-001`),
//! where `XX` comes from the material type and the date part from the
//! submission date. The trailing number is always the collection sequence.

use chrono::{Datelike, NaiveDate};

/// Minimum width of the zero-padded sequence
const SEQUENCE_WIDTH: usize = 3;

/// ID prefixes for sequentially numbered record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPrefix {
    Inst,
    Insp,
}

impl RecordPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Inst => "INST",
            RecordPrefix::Insp => "INSP",
        }
    }

    /// Format a sequence number as a full ID
    pub fn format(&self, seq: u32) -> String {
        format!("{}-{:0width$}", self.as_str(), seq, width = SEQUENCE_WIDTH)
    }
}

impl std::fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecordPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INST" => Ok(RecordPrefix::Inst),
            "INSP" => Ok(RecordPrefix::Insp),
            _ => Err(format!("Unknown record prefix: {}", s)),
        }
    }
}

/// Read the trailing sequence number of an ID (`INST-007` -> 7)
pub fn parse_sequence(id: &str) -> Option<u32> {
    let (_, tail) = id.rsplit_once('-')?;
    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Calendar quarter (1-4) of a date
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Two-letter material code: first two letters of the first word, upper-cased
///
/// "Rail Pad" -> "RA". Seeded batches carry hand-assigned codes (`EC`, `RP`);
/// only newly submitted batches are numbered with this rule.
pub fn material_code(material_type: &str) -> String {
    material_type
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Derive a batch ID from its material type, submission date and sequence
pub fn batch_id(material_type: &str, submitted: NaiveDate, seq: u32) -> String {
    format!(
        "{}-BATCH-{}-Q{}-{:0width$}",
        material_code(material_type),
        submitted.year(),
        quarter(submitted),
        seq,
        width = SEQUENCE_WIDTH
    )
}
