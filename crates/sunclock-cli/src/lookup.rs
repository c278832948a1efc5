//! One-shot lookups against the web services, outside any relay session.

use anyhow::Context;
use sunclock_core::flare::flare_summary;
use sunclock_core::{AppConfig, CoordinateBundle};
use sunclock_flares::FlareClient;
use sunclock_geonames::GeonamesClient;
use sunclock_relay::{lookup_flares, resolve_place, Host};

use crate::console::ConsoleHost;

/// # Errors
///
/// Returns an error wrapping the [`sunclock_flares::FlareError`] if the
/// configured URL is invalid or the HTTP client cannot be built.
pub(crate) fn flare_client(config: &AppConfig) -> anyhow::Result<FlareClient> {
    FlareClient::new(&config.flares_url, &config.user_agent)
        .context("failed to build flare client")
}

/// # Errors
///
/// Returns an error wrapping the [`sunclock_geonames::GeonamesError`] if the
/// configured base URL is invalid or the HTTP client cannot be built.
pub(crate) fn geonames_client(config: &AppConfig) -> anyhow::Result<GeonamesClient> {
    GeonamesClient::with_base_url(
        &config.geonames_username,
        &config.user_agent,
        &config.geonames_base_url,
    )
    .context("failed to build geonames client")
}

/// Prints every parsed flare, then the summary line the relay would log.
///
/// # Errors
///
/// Returns an error if the flare client cannot be constructed.
pub(crate) async fn run_flares(config: &AppConfig) -> anyhow::Result<()> {
    let client = flare_client(config)?;

    let flares = lookup_flares(&client, config.timings.flares_guard).await;
    if flares.is_empty() {
        println!("no flares listed at {}", client.url());
    }
    for flare in &flares {
        println!(
            "{}  mag {:+.1}  az {:>3}",
            flare.timestamp_utc.format("%Y-%m-%d %H:%M:%S UTC"),
            flare.brightness_magnitude,
            flare.azimuth_degrees
        );
    }
    println!("summary: {}", flare_summary(&flares));
    Ok(())
}

/// Reverse-geocodes a coordinate and prints the bundle and its display URL.
///
/// # Errors
///
/// Returns an error if the geonames client cannot be constructed or the
/// bundle cannot be encoded.
pub(crate) async fn run_geocode(config: &AppConfig, lat: f64, lon: f64) -> anyhow::Result<()> {
    let client = geonames_client(config)?;

    let offset = ConsoleHost::new().utc_offset_seconds();
    let bundle = CoordinateBundle::located(lat, lon, offset);
    let bundle = resolve_place(&client, bundle, config.timings.geocode_guard).await;

    println!("{}", serde_json::to_string_pretty(&bundle)?);
    println!("{}", config.urls.show_coords_with(&bundle.to_fragment()?));
    Ok(())
}
