//! Next-inspection scheduling
//!
//! The next inspection date is derived once, when an inspection is recorded,
//! from its result and date. A `replace` result has no next date; the part is
//! flagged for immediate replacement instead.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::entity::InspectionResult;

/// Text stored in place of a date when the part must be replaced
pub const IMMEDIATE_REPLACEMENT: &str = "immediate replacement required";

/// Date format used for scheduled dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Months until the next inspection per result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionIntervals {
    pub ok_months: u32,
    pub defect_months: u32,
}

impl Default for InspectionIntervals {
    fn default() -> Self {
        Self {
            ok_months: 3,
            defect_months: 1,
        }
    }
}

/// When a part is next due for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextInspection {
    Due(NaiveDate),
    ImmediateReplacement,
}

impl NextInspection {
    /// Derive the next inspection from a result and the inspection date
    ///
    /// Adding months clamps to the end of the target month
    /// (2024-01-31 + 1 month = 2024-02-29). Returns `None` only when the
    /// resulting date is out of chrono's range.
    pub fn derive(
        result: InspectionResult,
        inspected: NaiveDate,
        intervals: &InspectionIntervals,
    ) -> Option<Self> {
        let months = match result {
            InspectionResult::Ok => intervals.ok_months,
            InspectionResult::Defect => intervals.defect_months,
            InspectionResult::Replace => return Some(NextInspection::ImmediateReplacement),
        };
        inspected
            .checked_add_months(Months::new(months))
            .map(NextInspection::Due)
    }

    /// The due date, if any
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            NextInspection::Due(d) => Some(*d),
            NextInspection::ImmediateReplacement => None,
        }
    }

    /// Whether the part needs attention on or before `as_of`
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        match self {
            NextInspection::Due(d) => *d <= as_of,
            NextInspection::ImmediateReplacement => true,
        }
    }
}

impl std::fmt::Display for NextInspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NextInspection::Due(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            NextInspection::ImmediateReplacement => f.write_str(IMMEDIATE_REPLACEMENT),
        }
    }
}

impl std::str::FromStr for NextInspection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(IMMEDIATE_REPLACEMENT) {
            return Ok(NextInspection::ImmediateReplacement);
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(NextInspection::Due)
            .map_err(|_| {
                format!(
                    "Invalid next inspection: {}. Use YYYY-MM-DD or '{}'",
                    s, IMMEDIATE_REPLACEMENT
                )
            })
    }
}

impl Serialize for NextInspection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NextInspection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
