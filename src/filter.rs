//! Price cap filtering of flight offers

use tracing::debug;

use crate::config::PricingConfig;
use crate::models::FlightOffer;
use crate::region::{CountryDirectory, RegionClassifier};

/// Default cap for Europe and Morocco, EUR
pub const EUROPE_PRICE: f64 = 50.0;
/// Default cap for the rest of the world, EUR
pub const WORLD_PRICE: f64 = 150.0;

/// Maximum accepted price per destination region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceCaps {
    pub europe: f64,
    pub world: f64,
}

impl Default for PriceCaps {
    fn default() -> Self {
        Self {
            europe: EUROPE_PRICE,
            world: WORLD_PRICE,
        }
    }
}

impl PriceCaps {
    #[must_use]
    pub fn cap_for(&self, europe_or_morocco: bool) -> f64 {
        if europe_or_morocco {
            self.europe
        } else {
            self.world
        }
    }
}

/// Keeps offers that are cheap enough for their destination region
#[derive(Debug, Clone)]
pub struct OfferFilter {
    caps: PriceCaps,
    min_duration_hours: f64,
}

impl Default for OfferFilter {
    fn default() -> Self {
        Self {
            caps: PriceCaps::default(),
            min_duration_hours: 1.0,
        }
    }
}

impl From<&PricingConfig> for OfferFilter {
    fn from(config: &PricingConfig) -> Self {
        Self {
            caps: PriceCaps {
                europe: config.europe_price,
                world: config.world_price,
            },
            min_duration_hours: config.min_duration_hours,
        }
    }
}

impl OfferFilter {
    /// Filter offers, preserving their order.
    ///
    /// Offers shorter than the minimum duration are dropped before any region
    /// lookup. The cap is inclusive.
    pub async fn filter_flights<D: CountryDirectory>(
        &self,
        offers: Vec<FlightOffer>,
        classifier: &RegionClassifier<D>,
    ) -> Vec<FlightOffer> {
        let mut results = Vec::new();

        for offer in offers {
            let hours = offer.duration_hours();
            if hours < self.min_duration_hours {
                debug!(
                    "Skipping offer to {} with implausible duration {:.2}h",
                    offer.city_to, hours
                );
                continue;
            }

            let europe = classifier
                .is_europe_or_morocco(offer.destination_code())
                .await;
            let cap = self.caps.cap_for(europe);

            if offer.price <= cap {
                debug!("Keeping {} at {} € (cap {})", offer.city_to, offer.price, cap);
                results.push(offer);
            } else {
                debug!("Dropping {} at {} € (cap {})", offer.city_to, offer.price, cap);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, FlightDuration};
    use anyhow::{Result, anyhow};
    use rstest::rstest;
    use std::cell::Cell;

    /// Knows a handful of countries, fails for everything else
    #[derive(Default)]
    struct FakeDirectory {
        lookups: Cell<usize>,
    }

    impl CountryDirectory for FakeDirectory {
        async fn region_of(&self, country_code: &str) -> Result<String> {
            self.lookups.set(self.lookups.get() + 1);
            match country_code {
                "PT" | "IT" => Ok("Europe".to_string()),
                "JP" => Ok("Asia".to_string()),
                _ => Err(anyhow!("connection refused")),
            }
        }
    }

    fn offer(city: &str, code: &str, price: f64, seconds: u32) -> FlightOffer {
        FlightOffer {
            price,
            city_to: city.to_string(),
            country_to: Country {
                code: code.to_string(),
                name: city.to_string(),
            },
            duration: FlightDuration {
                total: f64::from(seconds),
                ..FlightDuration::default()
            },
            deep_link: format!("https://kiwi.example/{city}"),
            fly_from: None,
            fly_to: None,
        }
    }

    #[rstest]
    #[case("PT", 50.0, true)]
    #[case("PT", 50.01, false)]
    #[case("MA", 50.0, true)]
    #[case("MA", 50.01, false)]
    #[case("JP", 150.0, true)]
    #[case("JP", 150.01, false)]
    #[case("JP", 120.0, true)]
    #[case("XX", 150.0, true)]
    #[tokio::test]
    async fn test_price_cap_boundaries(#[case] code: &str, #[case] price: f64, #[case] kept: bool) {
        let classifier = RegionClassifier::new(FakeDirectory::default());
        let results = OfferFilter::default()
            .filter_flights(vec![offer("X", code, price, 7200)], &classifier)
            .await;
        assert_eq!(results.len() == 1, kept);
    }

    #[tokio::test]
    async fn test_short_flights_are_dropped_without_lookup() {
        let classifier = RegionClassifier::new(FakeDirectory::default());
        let offers = vec![
            offer("Girona", "IT", 1.0, 0),
            offer("Reus", "IT", 1.0, 3599),
            offer("Rome", "IT", 30.0, 3600),
        ];

        let results = OfferFilter::default()
            .filter_flights(offers, &classifier)
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].city_to, "Rome");
        assert_eq!(classifier_lookups(&classifier), 1);
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        let classifier = RegionClassifier::new(FakeDirectory::default());
        let offers = vec![
            offer("Lisbon", "PT", 20.0, 7200),
            offer("Milan", "IT", 80.0, 7200),
            offer("Marrakech", "MA", 45.0, 7200),
            offer("Tokyo", "JP", 140.0, 50000),
        ];

        let results = OfferFilter::default()
            .filter_flights(offers, &classifier)
            .await;

        let cities: Vec<&str> = results.iter().map(|o| o.city_to.as_str()).collect();
        assert_eq!(cities, vec!["Lisbon", "Marrakech", "Tokyo"]);
    }

    #[tokio::test]
    async fn test_every_offer_is_looked_up() {
        let classifier = RegionClassifier::new(FakeDirectory::default());
        let offers = vec![
            offer("Lisbon", "PT", 20.0, 7200),
            offer("Porto", "PT", 25.0, 7200),
        ];

        OfferFilter::default()
            .filter_flights(offers, &classifier)
            .await;

        assert_eq!(classifier_lookups(&classifier), 2);
    }

    #[test]
    fn test_filter_from_pricing_config() {
        let config = PricingConfig {
            europe_price: 30.0,
            world_price: 90.0,
            min_duration_hours: 2.0,
        };
        let filter = OfferFilter::from(&config);
        assert_eq!(filter.caps.cap_for(true), 30.0);
        assert_eq!(filter.caps.cap_for(false), 90.0);
        assert_eq!(filter.min_duration_hours, 2.0);
    }

    fn classifier_lookups(classifier: &RegionClassifier<FakeDirectory>) -> usize {
        classifier.directory().lookups.get()
    }
}
