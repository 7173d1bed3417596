//! Date window filtering and de-duplication.
//!
//! Everything in this module is pure: the same statuses and window always
//! produce the same [`AvailableDateSet`].

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::ConfigError;
use crate::normalize::CanonicalDateStatus;

/// How dates are rendered for humans, e.g. `Monday, January 05, 2026`.
pub const DISPLAY_FORMAT: &str = "%A, %B %d, %Y";

/// Month and day the default window closes on.
const SEASON_END: (u32, u32) = (10, 8);

/// Inclusive calendar-date range of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// `today` through October 8.
    ///
    /// Once October 8 has passed the window reaches into next year's season
    /// instead of collapsing to an empty (inverted) range.
    pub fn season_from(today: NaiveDate) -> Self {
        let (month, day) = SEASON_END;
        let end = NaiveDate::from_ymd_opt(today.year(), month, day)
            .filter(|end| *end >= today)
            .or_else(|| NaiveDate::from_ymd_opt(today.year() + 1, month, day))
            .unwrap_or(today);
        Self { start: today, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Ascending, duplicate-free list of open dates found in one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableDateSet(Vec<NaiveDate>);

impl AvailableDateSet {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Dates rendered with [`DISPLAY_FORMAT`], in order.
    pub fn to_display_strings(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|d| d.format(DISPLAY_FORMAT).to_string())
            .collect()
    }
}

/// Distinct dates with at least one available signal inside `window`.
pub fn available_dates(statuses: &[CanonicalDateStatus], window: &DateWindow) -> AvailableDateSet {
    let dates: BTreeSet<NaiveDate> = statuses
        .iter()
        .filter(|s| s.available && window.contains(s.date))
        .map(|s| s.date)
        .collect();

    AvailableDateSet(dates.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn open(date: NaiveDate) -> CanonicalDateStatus {
        CanonicalDateStatus::new(date, true)
    }

    fn closed(date: NaiveDate) -> CanonicalDateStatus {
        CanonicalDateStatus::new(date, false)
    }

    fn july() -> DateWindow {
        DateWindow::new(d(2026, 7, 1), d(2026, 7, 31)).unwrap()
    }

    // -- DateWindow ----------------------------------------------------------

    #[test]
    fn inverted_window_is_rejected() {
        let err = DateWindow::new(d(2026, 8, 1), d(2026, 7, 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedWindow { .. }));
    }

    #[test]
    fn single_day_window_is_allowed() {
        let w = DateWindow::new(d(2026, 7, 4), d(2026, 7, 4)).unwrap();
        assert!(w.contains(d(2026, 7, 4)));
        assert!(!w.contains(d(2026, 7, 5)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let w = july();
        assert!(w.contains(d(2026, 7, 1)));
        assert!(w.contains(d(2026, 7, 31)));
        assert!(!w.contains(d(2026, 6, 30)));
        assert!(!w.contains(d(2026, 8, 1)));
    }

    #[test]
    fn season_runs_through_october_eighth() {
        let w = DateWindow::season_from(d(2026, 5, 20));
        assert_eq!(w.start(), d(2026, 5, 20));
        assert_eq!(w.end(), d(2026, 10, 8));
    }

    #[test]
    fn season_on_closing_day_is_single_day() {
        let w = DateWindow::season_from(d(2026, 10, 8));
        assert_eq!(w.start(), w.end());
    }

    #[test]
    fn season_rolls_over_after_closing_day() {
        let w = DateWindow::season_from(d(2026, 10, 16));
        assert_eq!(w.start(), d(2026, 10, 16));
        assert_eq!(w.end(), d(2027, 10, 8));
    }

    // -- available_dates -----------------------------------------------------

    #[test]
    fn keeps_only_available_dates_inside_window() {
        let statuses = vec![
            open(d(2026, 6, 30)),
            open(d(2026, 7, 1)),
            closed(d(2026, 7, 2)),
            open(d(2026, 7, 31)),
            open(d(2026, 8, 1)),
        ];

        let set = available_dates(&statuses, &july());
        assert_eq!(set.dates(), &[d(2026, 7, 1), d(2026, 7, 31)]);
    }

    #[test]
    fn output_is_sorted_and_unique() {
        let statuses = vec![
            open(d(2026, 7, 20)),
            open(d(2026, 7, 3)),
            open(d(2026, 7, 20)),
            open(d(2026, 7, 3)),
            open(d(2026, 7, 10)),
        ];

        let set = available_dates(&statuses, &july());
        assert_eq!(set.dates(), &[d(2026, 7, 3), d(2026, 7, 10), d(2026, 7, 20)]);
    }

    #[test]
    fn one_open_signal_outweighs_closed_ones() {
        let statuses = vec![closed(d(2026, 7, 9)), open(d(2026, 7, 9)), closed(d(2026, 7, 9))];
        assert_eq!(available_dates(&statuses, &july()).dates(), &[d(2026, 7, 9)]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let statuses = vec![open(d(2026, 7, 5)), open(d(2026, 7, 2)), closed(d(2026, 7, 8))];
        let first = available_dates(&statuses, &july());
        let second = available_dates(&statuses, &july());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_gives_empty_set() {
        let set = available_dates(&[], &july());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn display_strings_use_long_form() {
        let statuses = vec![open(d(2026, 1, 5))];
        let w = DateWindow::new(d(2026, 1, 1), d(2026, 1, 31)).unwrap();
        assert_eq!(
            available_dates(&statuses, &w).to_display_strings(),
            vec!["Monday, January 05, 2026".to_string()]
        );
    }
}
