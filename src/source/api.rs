//! Structured availability feed.
//!
//! The feed answers `GET <endpoint>?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
//! with a JSON document shaped like:
//!
//! ```json
//! {
//!   "availability": {
//!     "2026-07-01": {
//!       "status": "Available",
//!       "daily_availability": { "launch-1": { "status": "Available" } }
//!     }
//!   }
//! }
//! ```
//!
//! Entries are read loosely: a malformed entry still becomes a record (with
//! no status) and is left for the normalizer to judge.  A body that is not
//! JSON, not an object, or an object with neither an `availability` member
//! nor any date keys (an upstream error object) is rejected here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::{Map, Value};

use super::{fetch_text, PermitSource, RawAvailabilityRecord};
use crate::error::{preview, FormatError, SourceError};
use crate::window::DateWindow;

/// Key the observed feed nests its date map under.
const AVAILABILITY_KEY: &str = "availability";
/// Key holding per-segment statuses inside a date entry.
const SEGMENTS_KEY: &str = "daily_availability";
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A JSON availability feed data source.
pub struct ApiSource {
    client: Client,
    /// Feed URL, without query string.
    pub endpoint: String,
    /// Range sent upstream as `start_date` / `end_date`.  Upstream is not
    /// trusted to honour it; the window filter runs again client-side.
    pub window: DateWindow,
}

impl ApiSource {
    pub fn new(client: Client, endpoint: impl Into<String>, window: DateWindow) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            window,
        }
    }

    /// Parse an already-fetched response body into raw records.
    ///
    /// Pure function so the shape handling can be tested without a server.
    pub fn parse_body(body: &str) -> Result<Vec<RawAvailabilityRecord>, FormatError> {
        let doc: Value = serde_json::from_str(body).map_err(|source| FormatError::Json {
            source,
            preview: preview(body),
        })?;

        let root = match doc {
            Value::Object(root) => root,
            other => {
                return Err(FormatError::UnexpectedShape {
                    detail: format!("expected a JSON object, got {}", kind_of(&other)),
                    preview: preview(body),
                })
            }
        };

        let dates = match root.get(AVAILABILITY_KEY) {
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(FormatError::UnexpectedShape {
                    detail: format!("`{AVAILABILITY_KEY}` is {}, not an object", kind_of(other)),
                    preview: preview(body),
                })
            }
            // Bare date map without the wrapper; an error object such as
            // `{"error": "rate limited"}` has no date keys and is rejected.
            None if root.is_empty() || root.keys().any(|k| looks_like_date(k)) => &root,
            None => {
                return Err(FormatError::UnexpectedShape {
                    detail: format!("no `{AVAILABILITY_KEY}` member and no date keys"),
                    preview: preview(body),
                })
            }
        };

        Ok(dates
            .iter()
            .map(|(date_key, entry)| record_from_entry(date_key, entry))
            .collect())
    }
}

fn looks_like_date(key: &str) -> bool {
    NaiveDate::parse_from_str(key.trim(), QUERY_DATE_FORMAT).is_ok()
}

fn record_from_entry(date_key: &str, entry: &Value) -> RawAvailabilityRecord {
    let segments = entry
        .get(SEGMENTS_KEY)
        .and_then(Value::as_object)
        .map(segment_statuses)
        .unwrap_or_default();

    RawAvailabilityRecord::Api {
        date_key: date_key.to_string(),
        status: status_of(entry),
        segments,
    }
}

fn segment_statuses(map: &Map<String, Value>) -> BTreeMap<String, Option<String>> {
    map.iter()
        .map(|(name, seg)| (name.clone(), status_of(seg)))
        .collect()
}

fn status_of(value: &Value) -> Option<String> {
    value.get("status").and_then(Value::as_str).map(String::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl PermitSource for ApiSource {
    fn name(&self) -> &str {
        "api"
    }

    fn fetch(&self) -> Result<Vec<RawAvailabilityRecord>, SourceError> {
        let start = self.window.start().format(QUERY_DATE_FORMAT).to_string();
        let end = self.window.end().format(QUERY_DATE_FORMAT).to_string();

        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("start_date", start), ("end_date", end)]);

        let body = fetch_text(request)?;
        Ok(Self::parse_body(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
