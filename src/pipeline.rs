//! Search, filter and notify pipeline
//!
//! Runs every origin against every weekend one request at a time, filters the
//! offers and mails the survivors. The first failing search or delivery ends
//! the run with an error; nothing is sent for a partial batch.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::email::{Mailer, build_email};
use crate::filter::OfferFilter;
use crate::flights::FlightSearch;
use crate::models::{FlightOffer, Weekend};
use crate::region::{CountryDirectory, RegionClassifier};

/// Outcome of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Flight searches issued
    pub searches: usize,
    /// Offers returned by the flight search API
    pub offers_seen: usize,
    /// Offers that passed the price caps
    pub offers_kept: usize,
    /// False when the no-offers message was sent
    pub sent_offers: bool,
}

/// Wires the flight search, region lookup and mailer together
pub struct DealFinder<S, D, M> {
    search: S,
    classifier: RegionClassifier<D>,
    mailer: M,
    filter: OfferFilter,
    origins: Vec<String>,
}

impl<S, D, M> DealFinder<S, D, M>
where
    S: FlightSearch,
    D: CountryDirectory,
    M: Mailer,
{
    pub fn new(
        search: S,
        directory: D,
        mailer: M,
        filter: OfferFilter,
        origins: Vec<String>,
    ) -> Self {
        Self {
            search,
            classifier: RegionClassifier::new(directory),
            mailer,
            filter,
            origins,
        }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// Offers below their price cap for every origin and weekend, in search order
    pub async fn collect_offers(&self, weekends: &[Weekend]) -> Result<Vec<FlightOffer>> {
        let mut summary = RunSummary::default();
        self.collect(weekends, &mut summary).await
    }

    /// Collect the offers and email them
    #[instrument(skip_all, fields(origins = ?self.origins, weekends = weekends.len()))]
    pub async fn run(&self, weekends: &[Weekend]) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        let offers = self.collect(weekends, &mut summary).await?;
        summary.offers_kept = offers.len();
        summary.sent_offers = !offers.is_empty();

        let body = build_email(&offers);
        self.mailer
            .send(body)
            .await
            .context("Failed to deliver offers email")?;

        info!(
            "Run finished in {:.1}s: {} searches, {} offers seen, {} kept",
            start_time.elapsed().as_secs_f64(),
            summary.searches,
            summary.offers_seen,
            summary.offers_kept
        );
        Ok(summary)
    }

    async fn collect(
        &self,
        weekends: &[Weekend],
        summary: &mut RunSummary,
    ) -> Result<Vec<FlightOffer>> {
        let mut all_results = Vec::new();

        for origin in &self.origins {
            for weekend in weekends {
                let offers = self
                    .search
                    .search_flights(origin, weekend)
                    .await
                    .with_context(|| format!("Flight search failed for {origin} on {weekend}"))?;
                summary.searches += 1;
                summary.offers_seen += offers.len();

                let valid = self.filter.filter_flights(offers, &self.classifier).await;
                if !valid.is_empty() {
                    info!("{} offers under the cap from {} for {}", valid.len(), origin, weekend);
                }
                all_results.extend(valid);
            }
        }

        Ok(all_results)
    }
}
