//! Kiwi (Skypicker) flight search client
//!
//! Issues one round trip search per origin and weekend, sorted by price,
//! towards any destination. An error status is logged and its body decoded
//! like any other; only transport failures and bodies that are not JSON end
//! the run. There is no retry.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::WeekendFlightsError;
use crate::config::SearchConfig;
use crate::models::{FlightOffer, Weekend};

/// Date format expected by the search API
const API_DATE_FORMAT: &str = "%d/%m/%Y";

/// Source of round trip offers
pub trait FlightSearch {
    /// Offers from `origin` leaving on the weekend's departure date and
    /// returning on its return date
    async fn search_flights(&self, origin: &str, weekend: &Weekend) -> Result<Vec<FlightOffer>>;
}

/// Search response from the Kiwi API
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

/// Kiwi flight search API client
pub struct KiwiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    partner: String,
    currency: String,
    limit: u32,
}

fn api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

impl KiwiClient {
    /// Create a new client
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weekend-flights/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            partner: config.partner.clone(),
            currency: config.currency.clone(),
            limit: config.limit,
        })
    }

    fn query(&self, origin: &str, weekend: &Weekend) -> Vec<(&'static str, String)> {
        let departure = api_date(weekend.departure);
        let return_date = api_date(weekend.return_date);
        vec![
            ("fly_from", origin.to_string()),
            ("fly_to", "anywhere".to_string()),
            ("date_from", departure.clone()),
            ("date_to", departure),
            ("return_from", return_date.clone()),
            ("return_to", return_date),
            ("partner", self.partner.clone()),
            ("curr", self.currency.clone()),
            ("limit", self.limit.to_string()),
            ("sort", "price".to_string()),
            ("flight_type", "round".to_string()),
        ]
    }
}

impl FlightSearch for KiwiClient {
    #[instrument(skip(self, weekend), fields(departure = %weekend.departure))]
    async fn search_flights(&self, origin: &str, weekend: &Weekend) -> Result<Vec<FlightOffer>> {
        let url = format!("{}/flights", self.base_url);
        let start_time = Instant::now();

        let mut request = self.client.get(&url).query(&self.query(origin, weekend));
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Flight search request failed for {origin} on {weekend}"))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Flight search for {} on {} returned {}", origin, weekend, status);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read flight search response for {origin}"))?;
        let search: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            WeekendFlightsError::api(format!(
                "Flight search for {origin} on {weekend} returned {status} with an unreadable body: {e}"
            ))
        })?;

        info!(
            "Found {} offers from {} for {} in {:.3}s",
            search.data.len(),
            origin,
            weekend,
            start_time.elapsed().as_secs_f64()
        );
        debug!("Cheapest offer: {:?}", search.data.first());

        Ok(search.data)
    }
}
