use anyhow::{Context, Result};
use chrono::Local;

use weekend_flights::{
    DealFinder, GmailMailer, KiwiClient, OfferFilter, RestCountriesClient, WeekendFlightsConfig,
    WeekendFlightsError, generate_weekends, telemetry,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let result = run().await;
    if let Err(err) = &result {
        if let Some(known) = err.downcast_ref::<WeekendFlightsError>() {
            eprintln!("{}", known.user_message());
        }
    }
    result
}

async fn run() -> Result<()> {
    let config = WeekendFlightsConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    let today = Local::now().date_naive();
    let weekends = generate_weekends(config.start_date, today);
    tracing::info!(
        "Searching {} weekends from {:?}",
        weekends.len(),
        config.search.origins
    );

    let finder = DealFinder::new(
        KiwiClient::new(&config.search)?,
        RestCountriesClient::new(&config.regions)?,
        GmailMailer::new(&config.mail)?,
        OfferFilter::from(&config.pricing),
        config.search.origins.clone(),
    );

    let summary = finder.run(&weekends).await?;
    if !summary.sent_offers {
        tracing::info!("No offers under the price caps this time");
    }

    Ok(())
}
