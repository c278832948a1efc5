//! Upcoming satellite-flare lookup.
//!
//! The flare page is plain HTML with no published contract, so parsing is
//! kept apart from the network call: [`parse::parse_flares`] is a pure
//! function over page text, and [`FlareClient`] only fetches.

pub mod client;
pub mod error;
pub mod parse;

pub use client::FlareClient;
pub use error::FlareError;
pub use parse::parse_flares;
