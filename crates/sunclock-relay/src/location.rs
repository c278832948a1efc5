//! Position queries against the phone's location services.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use sunclock_core::GuardTimings;
use thiserror::Error;

use crate::guard::guarded;

/// Reported when the provider never answered within the outer guard.
pub const GUARD_TIMEOUT_MESSAGE: &str = "No response from getCurrentPosition";

/// A fix from the location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in metres, if the provider reports one.
    pub accuracy_m: Option<f64>,
}

/// An error reported by the provider itself.
///
/// Codes follow the W3C geolocation numbering, which starts at 1; code 0
/// is reserved for the relay's own guard timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i32,
    pub message: String,
}

impl ProviderError {
    pub const PERMISSION_DENIED: i32 = 1;
    pub const POSITION_UNAVAILABLE: i32 = 2;
    pub const TIMEOUT: i32 = 3;

    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Options passed to the provider with every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionOptions {
    /// Serialized under `"enableHighAccuracy "` (trailing space), a key no
    /// provider reads. See [`Self::enable_high_accuracy`].
    #[serde(rename = "enableHighAccuracy ")]
    pub high_accuracy_requested: bool,
    #[serde(serialize_with = "as_millis")]
    pub timeout: Duration,
    #[serde(rename = "maximumAge", serialize_with = "as_millis")]
    pub maximum_age: Duration,
}

impl PositionOptions {
    #[must_use]
    pub fn from_timings(timings: &GuardTimings) -> Self {
        Self {
            high_accuracy_requested: false,
            timeout: timings.location_timeout,
            maximum_age: timings.location_max_age,
        }
    }

    /// Whether providers should switch to high-accuracy mode.
    ///
    /// Always `false`: the requested flag is never forwarded.
    #[must_use]
    pub fn enable_high_accuracy(&self) -> bool {
        false
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from_timings(&GuardTimings::default())
    }
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// The phone's current-position query.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolves with a fix or a provider error. May never resolve.
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, ProviderError>;
}

/// Why a position cycle ended without a fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No response from getCurrentPosition")]
    GuardTimeout,
}

impl LocationFailure {
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Provider(e) => e.code,
            Self::GuardTimeout => 0,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Provider(e) => &e.message,
            Self::GuardTimeout => GUARD_TIMEOUT_MESSAGE,
        }
    }
}

/// Queries `provider` once, bounded by the outer `guard`.
///
/// The provider's own timeout (in `options`) and the guard are independent;
/// the guard covers providers that hang without ever answering.
///
/// # Errors
///
/// Returns [`LocationFailure::Provider`] for a provider error and
/// [`LocationFailure::GuardTimeout`] if the guard fired first.
pub async fn request_position(
    provider: &dyn LocationProvider,
    options: &PositionOptions,
    guard: Duration,
) -> Result<Position, LocationFailure> {
    match guarded(guard, provider.current_position(options)).await {
        Ok(Ok(position)) => {
            tracing::debug!(
                lat = position.latitude,
                lng = position.longitude,
                "location success"
            );
            Ok(position)
        }
        Ok(Err(e)) => {
            tracing::warn!(code = e.code, message = %e.message, "location error");
            Err(LocationFailure::Provider(e))
        }
        Err(elapsed) => {
            tracing::warn!(%elapsed, "position query guard fired");
            Err(LocationFailure::GuardTimeout)
        }
    }
}
