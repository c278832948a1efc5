//! Event routing: maps each host event to a channel and a pipeline.

use std::sync::Arc;

use sunclock_core::{
    ConfigUrls, CoordinateBundle, DeviceRequest, GuardTimings, RelayVariant, ScreenClosed,
    ScreenResponse,
};

use crate::flares::{lookup_flares, FlareFeed};
use crate::formatter::{Delivery, ResultFormatter};
use crate::geocode::{resolve_place, PlaceResolver};
use crate::guard::TaskSlot;
use crate::host::{Host, HostError, HostEvent};
use crate::location::{request_position, LocationProvider, PositionOptions};
use crate::session::Session;

/// Builder for [`Relay`].
pub struct RelayBuilder {
    variant: RelayVariant,
    host: Arc<dyn Host>,
    provider: Arc<dyn LocationProvider>,
    urls: ConfigUrls,
    timings: GuardTimings,
    flares: Option<Arc<dyn FlareFeed>>,
    resolver: Option<Arc<dyn PlaceResolver>>,
}

impl RelayBuilder {
    #[must_use]
    pub fn variant(mut self, variant: RelayVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn timings(mut self, timings: GuardTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Flare feed consulted before each successful reply. Ignored by `Basic`.
    #[must_use]
    pub fn flares(mut self, feed: Arc<dyn FlareFeed>) -> Self {
        self.flares = Some(feed);
        self
    }

    /// Reverse geocoder for `decode-` responses. Ignored by `Basic`.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn PlaceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn build(self) -> Relay {
        let basic = self.variant == RelayVariant::Basic;
        Relay {
            inner: Arc::new(Inner {
                variant: self.variant,
                formatter: ResultFormatter::new(Arc::clone(&self.host), self.urls),
                host: self.host,
                provider: self.provider,
                options: PositionOptions::from_timings(&self.timings),
                timings: self.timings,
                flares: if basic { None } else { self.flares },
                resolver: if basic { None } else { self.resolver },
                session: Session::new(),
                location: TaskSlot::new("location"),
                geocode: TaskSlot::new("geocode"),
            }),
        }
    }
}

/// The relay. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<Inner>,
}

struct Inner {
    variant: RelayVariant,
    host: Arc<dyn Host>,
    provider: Arc<dyn LocationProvider>,
    formatter: ResultFormatter,
    options: PositionOptions,
    timings: GuardTimings,
    flares: Option<Arc<dyn FlareFeed>>,
    resolver: Option<Arc<dyn PlaceResolver>>,
    session: Session,
    location: TaskSlot,
    geocode: TaskSlot,
}

impl Relay {
    #[must_use]
    pub fn builder(
        host: Arc<dyn Host>,
        provider: Arc<dyn LocationProvider>,
        urls: ConfigUrls,
    ) -> RelayBuilder {
        RelayBuilder {
            variant: RelayVariant::Full,
            host,
            provider,
            urls,
            timings: GuardTimings::default(),
            flares: None,
            resolver: None,
        }
    }

    #[must_use]
    pub fn variant(&self) -> RelayVariant {
        self.inner.variant
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Handles one host event.
    ///
    /// Pipelines run as background tasks; a new position or geocode cycle
    /// supersedes one still in flight. Must be called within a Tokio runtime.
    pub fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::Ready => tracing::info!("host ready; waiting for a watch request"),
            HostEvent::AppMessage { payload } => {
                let request = DeviceRequest::from_payload(&payload);
                if let Some(hint) = request.timeout_hint {
                    tracing::debug!(hint, "legacy timeout hint received");
                }
                if request.wants_coordinates {
                    tracing::info!("coordinate request received from watch");
                    self.start_location(Delivery::Device { confirm: false });
                } else {
                    tracing::debug!(?payload, "ignoring watch message without request marker");
                }
            }
            HostEvent::ShowConfiguration => {
                if self.is_basic("show-configuration") {
                    return;
                }
                tracing::info!("launching configuration");
                self.open_main_config();
            }
            HostEvent::WebviewClosed { response } => {
                if self.is_basic("webview-closed") {
                    return;
                }
                self.screen_closed(&response);
            }
        }
    }

    /// Waits until no pipeline task is running.
    pub async fn settle(&self) {
        self.inner.location.settle().await;
        self.inner.geocode.settle().await;
    }

    fn is_basic(&self, event: &str) -> bool {
        let basic = self.inner.variant == RelayVariant::Basic;
        if basic {
            tracing::debug!(event, "configuration screens are not available in the basic relay");
        }
        basic
    }

    fn screen_closed(&self, raw: &str) {
        tracing::debug!(response = raw, "webview closed");

        let closed = ScreenClosed::parse(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable configuration response");
            ScreenClosed::Response(ScreenResponse::Unreadable(raw.to_string()))
        });

        let is_retry = closed == ScreenClosed::Cancelled;
        let Some(response) = self.inner.session.resolve(closed) else {
            tracing::info!("no real response to use in lieu of CANCELLED");
            return;
        };
        if is_retry {
            tracing::info!(response = response.label(), "retrying previous response after CANCELLED");
        }

        self.dispatch(response);
    }

    fn dispatch(&self, response: ScreenResponse) {
        match response {
            ScreenResponse::Cancel => tracing::info!("configuration cancelled"),
            ScreenResponse::ShowCoords => {
                tracing::info!("launching coordinate display query");
                self.start_location(Delivery::Screen);
            }
            ScreenResponse::SendCoords => {
                tracing::info!("sending coordinates to watch");
                self.start_location(Delivery::Device { confirm: true });
            }
            ScreenResponse::ShowConfig => {
                tracing::info!("re-displaying main configuration");
                self.open_main_config();
            }
            ScreenResponse::Decode(bundle) => {
                tracing::info!(lat = bundle.latitude, lng = bundle.longitude, "reverse geocode requested");
                self.start_geocode(bundle);
            }
            ScreenResponse::Config(value) => {
                tracing::info!(config = %value, "configuration page returned");
            }
            ScreenResponse::Unreadable(raw) => {
                tracing::info!(response = %raw, "nothing to do for unreadable response");
            }
        }
    }

    fn open_main_config(&self) {
        let url = self.inner.formatter.urls().main.as_str();
        report(self.inner.host.open_url(url));
    }

    fn start_location(&self, delivery: Delivery) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .location
            .start(async move { inner.run_location_cycle(delivery).await });
    }

    fn start_geocode(&self, bundle: CoordinateBundle) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .geocode
            .start(async move { inner.run_geocode_cycle(bundle).await });
    }
}

impl Inner {
    async fn run_location_cycle(&self, delivery: Delivery) {
        let outcome = request_position(
            self.provider.as_ref(),
            &self.options,
            self.timings.location_guard,
        )
        .await;

        let sent = match outcome {
            Ok(position) => {
                let flares = match &self.flares {
                    Some(feed) => lookup_flares(feed.as_ref(), self.timings.flares_guard).await,
                    None => Vec::new(),
                };
                let utc_offset = self.host.utc_offset_seconds();
                self.formatter
                    .deliver_position(delivery, &position, utc_offset, &flares)
            }
            Err(failure) => self.formatter.deliver_failure(delivery, &failure),
        };
        report(sent);
    }

    async fn run_geocode_cycle(&self, bundle: CoordinateBundle) {
        let bundle = match &self.resolver {
            Some(resolver) => {
                resolve_place(resolver.as_ref(), bundle, self.timings.geocode_guard).await
            }
            None => {
                tracing::warn!("no place resolver configured; showing bundle unchanged");
                bundle
            }
        };
        report(self.formatter.display_bundle(&bundle));
    }
}

fn report(result: Result<(), HostError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "host rejected outbound message");
    }
}
