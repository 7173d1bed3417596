//! Turns raw upstream records into canonical `(date, available)` pairs.
//!
//! Each record is handled on its own: a record that cannot be parsed is
//! dropped and reported in [`Normalized::errors`] while the rest of the batch
//! carries on.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::RecordParseError;
use crate::source::RawAvailabilityRecord;

/// Exact status string (and label token) that marks a day as open.
pub const AVAILABLE: &str = "Available";

/// Separator between the date and status parts of a page label.
const LABEL_DELIMITER: &str = " - ";

const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Label date formats, tried in order.
const LABEL_DATE_FORMATS: &[&str] = &["%A, %B %d, %Y", "%Y-%m-%d"];

/// One day's availability, normalized from whatever form the source used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalDateStatus {
    pub date: NaiveDate,
    pub available: bool,
}

impl CanonicalDateStatus {
    pub fn new(date: NaiveDate, available: bool) -> Self {
        Self { date, available }
    }
}

/// Result of normalizing one batch.
#[derive(Debug, Default)]
pub struct Normalized {
    pub statuses: Vec<CanonicalDateStatus>,
    pub errors: Vec<RecordParseError>,
}

/// Normalize a batch of records, isolating failures per record.
pub fn normalize(records: &[RawAvailabilityRecord]) -> Normalized {
    let mut out = Normalized::default();

    for record in records {
        match normalize_record(record) {
            Ok(statuses) => out.statuses.extend(statuses),
            Err(err) => {
                warn!(input = %err.input_preview, reason = %err.reason, "skipping unparseable record");
                out.errors.push(err);
            }
        }
    }

    out
}

/// Map a single record to zero or more statuses.
pub fn normalize_record(
    record: &RawAvailabilityRecord,
) -> Result<Vec<CanonicalDateStatus>, RecordParseError> {
    match record {
        RawAvailabilityRecord::Api {
            date_key,
            status,
            segments,
        } => {
            let date = NaiveDate::parse_from_str(date_key.trim(), API_DATE_FORMAT)
                .map_err(|e| RecordParseError::new(date_key, format!("invalid date key: {e}")))?;

            // One signal per "Available" marker; repeats are collapsed later.
            let signals = std::iter::once(status)
                .chain(segments.values())
                .filter(|s| s.as_deref() == Some(AVAILABLE))
                .count();

            if signals == 0 {
                return Ok(vec![CanonicalDateStatus::new(date, false)]);
            }
            Ok(vec![CanonicalDateStatus::new(date, true); signals])
        }

        RawAvailabilityRecord::Label { label } => {
            if !label.contains(AVAILABLE) {
                return Ok(Vec::new());
            }
            let date = parse_label_date(label)?;
            Ok(vec![CanonicalDateStatus::new(date, true)])
        }
    }
}

/// Parse the date portion (everything before the first `" - "`) of a label.
fn parse_label_date(label: &str) -> Result<NaiveDate, RecordParseError> {
    let date_part = label
        .split(LABEL_DELIMITER)
        .next()
        .unwrap_or(label)
        .trim();

    LABEL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| RecordParseError::new(label, format!("unrecognized date {date_part:?}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
