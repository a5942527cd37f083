//! Flight offer model as returned by the Kiwi flight search API

use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Destination country of an offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub code: String,
    /// Country name as reported by the flight search API
    #[serde(default)]
    pub name: String,
}

/// Flight duration breakdown, in seconds (integer or fractional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightDuration {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub departure: Option<f64>,
    #[serde(default, rename = "return")]
    pub return_leg: Option<f64>,
}

/// A single round trip offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Total price in EUR
    pub price: f64,
    #[serde(rename = "cityTo", default)]
    pub city_to: String,
    #[serde(rename = "countryTo", default)]
    pub country_to: Country,
    #[serde(default)]
    pub duration: FlightDuration,
    /// Booking link
    #[serde(default)]
    pub deep_link: String,
    #[serde(rename = "flyFrom", default)]
    pub fly_from: Option<String>,
    #[serde(rename = "flyTo", default)]
    pub fly_to: Option<String>,
}

impl FlightOffer {
    /// Total flight duration in hours
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.duration.total / SECONDS_PER_HOUR
    }

    /// Destination country code
    #[must_use]
    pub fn destination_code(&self) -> &str {
        &self.country_to.code
    }
}
