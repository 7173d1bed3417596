//! Booking-page source.
//!
//! The reservation calendar renders one cell per day with an accessible
//! label such as `"Monday, January 05, 2026 - Available"`.  Every element
//! carrying an `aria-label` becomes a candidate record; deciding which ones
//! are dates is left to [`crate::normalize`].

use reqwest::blocking::Client;
use scraper::{Html, Selector};

use super::{fetch_text, PermitSource, RawAvailabilityRecord};
use crate::error::{preview, FormatError, SourceError};

const LABEL_SELECTOR: &str = "[aria-label]";

/// A scraped booking page data source.
pub struct PageSource {
    client: Client,
    /// Page URL, fetched as-is with no query parameters.
    pub url: String,
}

impl PageSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Pull every accessible label out of an already-fetched document.
    ///
    /// A document with no labelled elements at all is not a calendar page
    /// (error page, bot wall, redesign) and is reported as a format error.
    pub fn parse_document(html: &str) -> Result<Vec<RawAvailabilityRecord>, FormatError> {
        let selector = Selector::parse(LABEL_SELECTOR).map_err(|e| FormatError::UnexpectedShape {
            detail: format!("label selector rejected: {e}"),
            preview: String::new(),
        })?;

        let document = Html::parse_document(html);
        let records: Vec<_> = document
            .select(&selector)
            .filter_map(|el| el.value().attr("aria-label"))
            .map(|label| RawAvailabilityRecord::label(label.trim()))
            .collect();

        if records.is_empty() {
            return Err(FormatError::NoMarkers {
                preview: preview(html),
            });
        }

        Ok(records)
    }
}

impl PermitSource for PageSource {
    fn name(&self) -> &str {
        "page"
    }

    fn fetch(&self) -> Result<Vec<RawAvailabilityRecord>, SourceError> {
        let body = fetch_text(self.client.get(&self.url))?;
        Ok(Self::parse_document(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
