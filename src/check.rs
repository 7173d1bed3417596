//! One check cycle: fetch, normalize, filter, then notify at most once.
//!
//! Nothing in here fails.  A source error degrades to "no availability" and
//! a notifier error is logged after the fact; the next scheduled invocation
//! is the only retry.

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::NotificationError;
use crate::normalize::normalize;
use crate::notify::{Alert, Notifier};
use crate::source::PermitSource;
use crate::window::{available_dates, AvailableDateSet, DateWindow};

/// What a cycle found and whether anyone was told.
#[derive(Debug)]
pub struct CycleReport {
    pub dates: AvailableDateSet,
    /// Records dropped by the normalizer.
    pub skipped_records: usize,
    pub notification: NotificationOutcome,
}

#[derive(Debug)]
pub enum NotificationOutcome {
    /// Nothing was available, so no alert was attempted.
    NotNeeded,
    Sent,
    Failed(NotificationError),
}

/// Fetch, normalize and filter.  Returns an empty set on any source error.
pub fn run_check(source: &dyn PermitSource, window: &DateWindow) -> AvailableDateSet {
    scan(source, window).0
}

/// [`run_check`], also returning how many records the normalizer dropped.
fn scan(source: &dyn PermitSource, window: &DateWindow) -> (AvailableDateSet, usize) {
    let records = match source.fetch() {
        Ok(records) => records,
        Err(e) => {
            warn!(source = source.name(), error = %e, "error checking availability");
            return (AvailableDateSet::default(), 0);
        }
    };
    debug!(source = source.name(), records = records.len(), "fetched records");

    let normalized = normalize(&records);
    let dates = available_dates(&normalized.statuses, window);
    debug!(
        statuses = normalized.statuses.len(),
        skipped = normalized.errors.len(),
        dates = dates.len(),
        %window,
        "filtered availability"
    );

    (dates, normalized.errors.len())
}

/// Run one full cycle and hand any open dates to `notifier`.
pub fn check_and_notify(
    source: &dyn PermitSource,
    window: &DateWindow,
    notifier: &dyn Notifier,
    booking_url: &str,
) -> CycleReport {
    let (dates, skipped_records) = scan(source, window);

    if dates.is_empty() {
        info!("no permits available");
        return CycleReport {
            dates,
            skipped_records,
            notification: NotificationOutcome::NotNeeded,
        };
    }

    let alert = Alert::new(dates.to_display_strings(), booking_url, Local::now());
    info!(dates = dates.len(), notifier = notifier.name(), "permits available, sending alert");

    let notification = match notifier.notify(&alert) {
        Ok(()) => NotificationOutcome::Sent,
        Err(e) => {
            warn!(notifier = notifier.name(), error = %e, "error sending notification");
            NotificationOutcome::Failed(e)
        }
    };

    CycleReport {
        dates,
        skipped_records,
        notification,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
