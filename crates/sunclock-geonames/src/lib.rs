//! Client for the geonames.org "find nearby place name" web service.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeonamesClient;
pub use error::GeonamesError;
pub use types::NearbyPlace;
