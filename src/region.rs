//! Destination region classification
//!
//! Decides whether a destination country qualifies for the lower European
//! price cap. Morocco is treated as European. Every other country is looked
//! up on restcountries.com.
//!
//! The classification fails closed: when the lookup cannot produce a region
//! the country is reported as non-European, which applies the higher world
//! price cap to it. A network outage therefore lets more expensive European
//! offers through instead of aborting the run. Lookups are not cached, every
//! offer triggers its own request.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::WeekendFlightsError;
use crate::config::RegionsConfig;

/// Country always classified as European
pub const MOROCCO: &str = "MA";

/// Region name that selects the European price cap
pub const EUROPE: &str = "Europe";

/// Source of country metadata
pub trait CountryDirectory {
    /// Region name of the country with the given ISO alpha-2 code
    async fn region_of(&self, country_code: &str) -> Result<String>;
}

/// Classifies destinations as Europe/Morocco or rest of world
pub struct RegionClassifier<D> {
    directory: D,
}

impl<D: CountryDirectory> RegionClassifier<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// True for Morocco and for countries whose region is Europe.
    ///
    /// Never fails: any lookup error yields `false`.
    pub async fn is_europe_or_morocco(&self, country_code: &str) -> bool {
        if country_code.eq_ignore_ascii_case(MOROCCO) {
            return true;
        }
        if country_code.is_empty() {
            debug!("Offer has no destination country code, using world price cap");
            return false;
        }

        match self.directory.region_of(country_code).await {
            Ok(region) => {
                debug!("Country {} is in region {}", country_code, region);
                region == EUROPE
            }
            Err(err) => {
                warn!(
                    "Region lookup for {} failed, treating it as outside Europe: {:#}",
                    country_code, err
                );
                false
            }
        }
    }
}

/// restcountries.com v3.1 client
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    region: Option<String>,
}

impl RestCountriesClient {
    /// Create a new client
    pub fn new(config: &RegionsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weekend-flights/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl CountryDirectory for RestCountriesClient {
    #[instrument(skip(self))]
    async fn region_of(&self, country_code: &str) -> Result<String> {
        let url = format!(
            "{}/alpha/{}",
            self.base_url,
            urlencoding::encode(country_code)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WeekendFlightsError::api(format!(
                "Country lookup for {} returned {}",
                country_code,
                response.status()
            ))
            .into());
        }

        let records: Vec<CountryRecord> = response
            .json()
            .await
            .with_context(|| "Failed to parse restcountries response")?;

        records
            .into_iter()
            .next()
            .and_then(|record| record.region)
            .ok_or_else(|| anyhow!("No region returned for {}", country_code))
    }
}
