//! Turns a position cycle's outcome into the reply for its channel.

use std::sync::Arc;

use sunclock_core::flare::flare_summary;
use sunclock_core::{ConfigUrls, CoordinateBundle, DeviceReply, FlareEvent};

use crate::host::{Host, HostError};
use crate::location::{LocationFailure, Position};

/// Where the result of one position cycle goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Send to the watch. With `confirm`, also open the "coordinates sent"
    /// page once the message is queued.
    Device { confirm: bool },
    /// Show on the phone's show-coordinates page.
    Screen,
}

pub struct ResultFormatter {
    host: Arc<dyn Host>,
    urls: ConfigUrls,
}

impl ResultFormatter {
    #[must_use]
    pub fn new(host: Arc<dyn Host>, urls: ConfigUrls) -> Self {
        Self { host, urls }
    }

    #[must_use]
    pub fn urls(&self) -> &ConfigUrls {
        &self.urls
    }

    /// Delivers a successful fix.
    ///
    /// # Errors
    ///
    /// Returns the [`HostError`] from the failed send or page open. When the
    /// device message cannot be queued the confirmation page is not opened.
    pub fn deliver_position(
        &self,
        delivery: Delivery,
        position: &Position,
        utc_offset_seconds: i32,
        flares: &[FlareEvent],
    ) -> Result<(), HostError> {
        tracing::info!(
            lat = position.latitude,
            lng = position.longitude,
            utc_offset_seconds,
            flare = %flare_summary(flares),
            ?delivery,
            "location success"
        );

        match delivery {
            Delivery::Device { confirm } => {
                let reply =
                    DeviceReply::coordinates(position.latitude, position.longitude, utc_offset_seconds);
                self.host.send_device_message(&reply)?;
                if confirm {
                    tracing::info!(url = %self.urls.coords_sent, "opening send confirmation");
                    self.host.open_url(self.urls.coords_sent.as_str())?;
                }
                Ok(())
            }
            Delivery::Screen => {
                let bundle = CoordinateBundle::located(
                    position.latitude,
                    position.longitude,
                    utc_offset_seconds,
                );
                self.display_bundle(&bundle)
            }
        }
    }

    /// Delivers a failed cycle. The confirmation page is never opened.
    ///
    /// # Errors
    ///
    /// Returns the [`HostError`] from the failed send or page open.
    pub fn deliver_failure(
        &self,
        delivery: Delivery,
        failure: &LocationFailure,
    ) -> Result<(), HostError> {
        match delivery {
            Delivery::Device { .. } => self
                .host
                .send_device_message(&DeviceReply::failed(failure.code(), failure.message())),
            Delivery::Screen => {
                self.display_bundle(&CoordinateBundle::failed(failure.code(), failure.message()))
            }
        }
    }

    /// Opens the show-coordinates page with `bundle` in the URL fragment.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::OpenUrl`] if the bundle cannot be encoded or the
    /// host cannot open the page.
    pub fn display_bundle(&self, bundle: &CoordinateBundle) -> Result<(), HostError> {
        let fragment = bundle.to_fragment().map_err(|e| HostError::OpenUrl {
            url: self.urls.show_coords.to_string(),
            reason: e.to_string(),
        })?;
        let url = self.urls.show_coords_with(&fragment);
        tracing::info!(%url, "warping to show-coordinates page");
        self.host.open_url(&url)
    }
}
