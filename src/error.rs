//! Error taxonomy for a check cycle.
//!
//! Everything here is recoverable inside the cycle: fetch and format errors
//! degrade to "no availability", record errors drop a single record, and
//! notification errors are logged after availability has already been found.
//! Only [`ConfigError`] stops the process, and it does so before any fetch.

use thiserror::Error;

/// Maximum number of characters of upstream input echoed into diagnostics.
pub const PREVIEW_CHARS: usize = 500;

/// Truncate `input` to [`PREVIEW_CHARS`] characters for log output.
///
/// Cuts on a character boundary and appends `...` when anything was dropped.
pub fn preview(input: &str) -> String {
    match input.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &input[..idx]),
        None => input.to_string(),
    }
}

/// Talking to the upstream source failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("upstream returned {status}: {body_preview}")]
    Status {
        status: reqwest::StatusCode,
        body_preview: String,
    },

    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// The response body is not in a shape this source understands.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("response is not valid JSON ({source}); body: {preview}")]
    Json {
        source: serde_json::Error,
        preview: String,
    },

    #[error("unexpected response shape: {detail}; body: {preview}")]
    UnexpectedShape { detail: String, preview: String },

    #[error("no availability markers found in page; body: {preview}")]
    NoMarkers { preview: String },
}

/// Anything a [`crate::source::PermitSource`] can fail with.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("unreadable response: {0}")]
    Format(#[from] FormatError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.into())
    }
}

/// A single upstream record could not be turned into a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped record {input_preview:?}: {reason}")]
pub struct RecordParseError {
    pub input_preview: String,
    pub reason: String,
}

impl RecordParseError {
    pub fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input_preview: preview(input),
            reason: reason.into(),
        }
    }
}

/// Delivering an alert failed.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("date window start {start} is after end {end}")]
    InvertedWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("invalid {what} url {value:?}: {reason}")]
    InvalidUrl {
        what: &'static str,
        value: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
