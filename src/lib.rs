//! Weekend flight deals
//!
//! Searches round trips from the configured origins for every other weekend
//! of the coming year, keeps the ones under a region dependent price cap and
//! emails them.

pub mod config;
pub mod email;
pub mod error;
pub mod filter;
pub mod flights;
pub mod models;
pub mod pipeline;
pub mod region;
pub mod telemetry;
pub mod weekends;

// Re-export core types for public API
pub use config::WeekendFlightsConfig;
pub use email::{GmailMailer, Mailer, build_email};
pub use error::WeekendFlightsError;
pub use filter::{EUROPE_PRICE, OfferFilter, PriceCaps, WORLD_PRICE};
pub use flights::{FlightSearch, KiwiClient};
pub use models::{FlightOffer, Weekend};
pub use pipeline::{DealFinder, RunSummary};
pub use region::{CountryDirectory, RegionClassifier, RestCountriesClient};
pub use weekends::generate_weekends;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
