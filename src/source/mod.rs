//! Permit source abstraction layer.
//!
//! This module defines the [`PermitSource`] trait and the common
//! [`RawAvailabilityRecord`] type.  Concrete sources live in sub-modules:
//! [`api`] reads the structured availability feed and [`page`] scrapes the
//! accessible labels off the booking page.
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `ical.rs`).
//! 2. Define a struct and implement [`PermitSource`] for it.
//! 3. Add `mod ical;` below, re-export the struct, and add a [`SourceKind`]
//!    variant so it can be selected from the command line.
//!
//! Normalizing, filtering and notifying are all source-agnostic.

mod api;
mod page;
mod record;

pub use api::ApiSource;
pub use page::PageSource;
pub use record::RawAvailabilityRecord;

use std::time::Duration;

use clap::ValueEnum;
use reqwest::blocking::{Client, RequestBuilder};
use tracing::debug;

use crate::error::{preview, FetchError, SourceError};

/// Client identifier sent upstream; bare library agents get rejected.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Default bound on a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait that every permit source must implement.
///
/// A check cycle calls [`fetch()`](PermitSource::fetch) exactly once.
pub trait PermitSource {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Perform the upstream request and return the raw entries.
    ///
    /// An empty `Vec` is a normal outcome ("nothing published"), not an
    /// error.  Errors are reserved for requests that failed or bodies that
    /// could not be read at all.
    fn fetch(&self) -> Result<Vec<RawAvailabilityRecord>, SourceError>;
}

/// Which upstream representation to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Structured JSON availability feed.
    #[default]
    Api,
    /// Booking page whose accessible labels encode availability.
    Page,
}

/// Build the blocking HTTP client shared by all sources.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send `request` and return the body of a 2xx response.
fn fetch_text(request: RequestBuilder) -> Result<String, SourceError> {
    let response = request.send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            body_preview: preview(&body),
        }
        .into());
    }

    debug!(bytes = body.len(), preview = %preview(&body), "fetched response");
    Ok(body)
}

// ---------------------------------------------------------------------------
// Local HTTP fixtures
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
