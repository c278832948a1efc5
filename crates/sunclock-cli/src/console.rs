//! Host services backed by the terminal.

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::Local;
use sunclock_core::DeviceReply;
use sunclock_relay::{
    Host, HostError, LocationProvider, Position, PositionOptions, ProviderError,
};

/// Prints outbound traffic to stdout instead of a watch and a webview.
pub(crate) struct ConsoleHost;

impl ConsoleHost {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Host for ConsoleHost {
    fn send_device_message(&self, reply: &DeviceReply) -> Result<(), HostError> {
        let named = serde_json::to_string(reply)
            .map_err(|e| HostError::DeviceUnreachable(e.to_string()))?;
        println!("device <- {named}");
        println!("device <- dict {}", hex(&reply.to_dictionary()));
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        println!("open {url}");
        Ok(())
    }

    fn utc_offset_seconds(&self) -> i32 {
        utc_offset_from_local(Local::now().offset().local_minus_utc())
    }
}

/// Seconds to add to local time to reach UTC, positive west of Greenwich.
pub(crate) fn utc_offset_from_local(local_minus_utc: i32) -> i32 {
    -local_minus_utc
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

/// Reports a fixed position, or "position unavailable" when none was given.
pub(crate) struct FixedProvider {
    position: Option<(f64, f64)>,
}

impl FixedProvider {
    pub(crate) fn new(position: Option<(f64, f64)>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, ProviderError> {
        tracing::debug!(?options, "position query");
        match self.position {
            Some((latitude, longitude)) => Ok(Position {
                latitude,
                longitude,
                accuracy_m: None,
            }),
            None => Err(ProviderError::new(
                ProviderError::POSITION_UNAVAILABLE,
                "Position unavailable",
            )),
        }
    }
}
