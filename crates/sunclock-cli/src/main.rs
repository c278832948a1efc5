use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sunclock_core::{AppConfig, Environment, RelayVariant};
use sunclock_relay::{HostEvent, Relay};
use tracing_subscriber::EnvFilter;

mod console;
mod lookup;
mod replay;

use console::{ConsoleHost, FixedProvider};

#[derive(Debug, Parser)]
#[command(name = "sunclock")]
#[command(about = "Phone-side coordinate relay for the Sunclock watchface")]
struct Cli {
    /// Latitude reported by the simulated location provider
    #[arg(long, global = true, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude reported by the simulated location provider
    #[arg(long, global = true, allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Run the basic relay: no flares, no configuration screens
    #[arg(long, global = true)]
    basic: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Simulate a coordinate request from the watch
    Request,
    /// Simulate the user opening the configuration page
    Configure,
    /// Simulate a configuration page closing with RESPONSE
    Closed { response: String },
    /// Read host events as JSON lines from stdin, sharing one session
    Replay,
    /// Fetch and print upcoming flares
    Flares,
    /// Reverse-geocode --lat/--lon and print the resulting bundle
    Geocode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = sunclock_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config.log_level, &config.env);
    tracing::debug!(?config, "configuration loaded");

    match &cli.command {
        Some(Commands::Request) => {
            let event = HostEvent::AppMessage {
                payload: request_payload(),
            };
            run_event(&cli, &config, event).await
        }
        Some(Commands::Configure) => run_event(&cli, &config, HostEvent::ShowConfiguration).await,
        Some(Commands::Closed { response }) => {
            let event = HostEvent::WebviewClosed {
                response: response.clone(),
            };
            run_event(&cli, &config, event).await
        }
        Some(Commands::Replay) => {
            let relay = build_relay(&cli, &config)?;
            replay::run_replay(&relay, tokio::io::stdin()).await
        }
        Some(Commands::Flares) => lookup::run_flares(&config).await,
        Some(Commands::Geocode) => {
            let (lat, lon) = cli
                .lat
                .zip(cli.lon)
                .context("geocode requires both --lat and --lon")?;
            lookup::run_geocode(&config, lat, lon).await
        }
        None => {
            println!("sunclock relay ready ({} variant)", variant_name(&cli, &config));
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies. Production logs
/// are compact and uncoloured.
fn init_tracing(log_level: &str, env: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if plain_logs(env) {
        builder.with_ansi(false).with_target(false).compact().init();
    } else {
        builder.init();
    }
}

fn plain_logs(env: &Environment) -> bool {
    *env == Environment::Production
}

fn request_payload() -> serde_json::Map<String, serde_json::Value> {
    let mut payload = serde_json::Map::new();
    payload.insert("getLatLong".to_string(), serde_json::Value::from(1));
    payload
}

fn variant(cli: &Cli, config: &AppConfig) -> RelayVariant {
    if cli.basic {
        RelayVariant::Basic
    } else {
        config.variant
    }
}

fn variant_name(cli: &Cli, config: &AppConfig) -> &'static str {
    match variant(cli, config) {
        RelayVariant::Full => "full",
        RelayVariant::Basic => "basic",
    }
}

/// Wires the console host and the configured web clients into a relay.
fn build_relay(cli: &Cli, config: &AppConfig) -> anyhow::Result<Relay> {
    let host = Arc::new(ConsoleHost::new());
    let provider = Arc::new(FixedProvider::new(cli.lat.zip(cli.lon)));

    let mut builder = Relay::builder(host, provider, config.urls.clone())
        .variant(variant(cli, config))
        .timings(config.timings);

    if variant(cli, config) == RelayVariant::Full {
        let flares = lookup::flare_client(config)?;
        let geonames = lookup::geonames_client(config)?;
        builder = builder.flares(Arc::new(flares)).resolver(Arc::new(geonames));
    }

    Ok(builder.build())
}

async fn run_event(cli: &Cli, config: &AppConfig, event: HostEvent) -> anyhow::Result<()> {
    let relay = build_relay(cli, config)?;
    relay.handle(HostEvent::Ready);
    relay.handle(event);
    relay.settle().await;
    Ok(())
}

#[cfg(test)]
mod tests;
