//! Weekend date generation
//!
//! Produces the Friday-to-Monday windows searched on every run: one every
//! two weeks for a year from the start date.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::Weekend;

/// Days between two consecutive searched weekends
pub const CADENCE_DAYS: u64 = 14;

/// How far ahead of the start date departures are generated
pub const HORIZON_DAYS: u64 = 365;

/// The first Friday on or after `date`
#[must_use]
pub fn next_friday(date: NaiveDate) -> NaiveDate {
    let today = date.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    date + Days::new(u64::from((friday + 7 - today) % 7))
}

/// Generate the weekends to search.
///
/// Without a start date the window opens on the next Friday on or after
/// `today`. Departures are aligned to Fridays, spaced [`CADENCE_DAYS`] apart
/// and stay strictly before `start + HORIZON_DAYS`.
#[must_use]
pub fn generate_weekends(start: Option<NaiveDate>, today: NaiveDate) -> Vec<Weekend> {
    let anchor = start.unwrap_or_else(|| next_friday(today));
    let limit = anchor + Days::new(HORIZON_DAYS);

    let mut weekends = Vec::new();
    let mut departure = next_friday(anchor);
    while departure < limit {
        weekends.push(Weekend::starting(departure));
        departure = departure + Days::new(CADENCE_DAYS);
    }

    tracing::debug!(
        "Generated {} weekends from {} until {}",
        weekends.len(),
        anchor,
        limit
    );
    weekends
}
