//! Data models for the weekend flight finder
//!
//! - Weekend: Friday-to-Monday travel windows
//! - Offer: round trip offers as returned by the flight search API

pub mod offer;
pub mod weekend;

// Re-export all public types for convenient access
pub use offer::{Country, FlightDuration, FlightOffer};
pub use weekend::Weekend;
