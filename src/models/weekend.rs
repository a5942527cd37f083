//! Weekend model for Friday-to-Monday travel windows

use std::fmt::Display;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Nights between the Friday departure and the Monday return
pub const TRIP_NIGHTS: u64 = 3;

/// A departure/return date pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weekend {
    /// Outbound flight date (a Friday)
    pub departure: NaiveDate,
    /// Inbound flight date (the following Monday)
    pub return_date: NaiveDate,
}

impl Weekend {
    /// Create the weekend starting on `departure`, returning three days later
    #[must_use]
    pub fn starting(departure: NaiveDate) -> Self {
        Self {
            departure,
            return_date: departure + Days::new(TRIP_NIGHTS),
        }
    }
}

impl Display for Weekend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.departure, self.return_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn test_weekend_returns_on_monday() {
        let friday = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let weekend = Weekend::starting(friday);
        assert_eq!(weekend.return_date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(weekend.return_date.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_weekend_display() {
        let weekend = Weekend::starting(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap());
        assert_eq!(weekend.to_string(), "2026-12-25 → 2026-12-28");
    }
}
