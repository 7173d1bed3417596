//! The raw record type shared across all permit sources.
//!
//! `RawAvailabilityRecord` is one upstream entry before any date parsing has
//! happened.  Each source converts its native response into these records so
//! that the normalizer is the only place that knows about date formats and
//! status strings.
//!
//! ## For contributors
//!
//! If you are adding a new source you should be able to express its entries
//! with one of the existing variants.  Add a variant only when the upstream
//! data genuinely cannot be represented, and teach
//! [`crate::normalize`] about it in the same change.

use std::collections::BTreeMap;

/// A single upstream availability entry, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAvailabilityRecord {
    /// An entry from the structured availability feed.
    Api {
        /// Map key the entry was found under, expected to be `YYYY-MM-DD`.
        date_key: String,
        /// Top-level status string, if the entry carried one.
        status: Option<String>,
        /// Per-segment statuses nested under the date (e.g. launch slots).
        segments: BTreeMap<String, Option<String>>,
    },

    /// An accessible label scraped from the booking page, e.g.
    /// `"Monday, January 05, 2026 - Available"`.
    Label { label: String },
}

impl RawAvailabilityRecord {
    /// Shorthand for a structured entry without sub-segments.
    pub fn api(date_key: impl Into<String>, status: Option<&str>) -> Self {
        Self::Api {
            date_key: date_key.into(),
            status: status.map(String::from),
            segments: BTreeMap::new(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
