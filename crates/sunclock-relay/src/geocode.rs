//! Reverse geocoding of a displayed bundle.
//!
//! Lookup failures never reach the user as errors: the bundle is always
//! returned, with a sentinel place name standing in for the missing result.

use std::time::Duration;

use async_trait::async_trait;
use sunclock_core::CoordinateBundle;
use sunclock_geonames::{GeonamesClient, GeonamesError, NearbyPlace};

use crate::guard::guarded;

/// Place name used when the lookup timed out or the service was unreachable.
pub const GEOCODE_TIMEOUT_PLACE: &str = "??? geonames.org timeout ???";

/// Place name used when the service answered but gave no usable place.
pub const GEOCODE_FAILED_PLACE: &str = "??? geonames.org lookup failed ???";

/// Resolves a coordinate to its nearest named place.
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    async fn nearest_place(&self, latitude: f64, longitude: f64)
        -> Result<NearbyPlace, GeonamesError>;
}

#[async_trait]
impl PlaceResolver for GeonamesClient {
    async fn nearest_place(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NearbyPlace, GeonamesError> {
        self.find_nearby_place(latitude, longitude).await
    }
}

/// Enriches `bundle` with the nearest place, bounded by `guard`.
pub async fn resolve_place(
    resolver: &dyn PlaceResolver,
    mut bundle: CoordinateBundle,
    guard: Duration,
) -> CoordinateBundle {
    let lookup = resolver.nearest_place(bundle.latitude, bundle.longitude);
    match guarded(guard, lookup).await {
        Ok(Ok(place)) => {
            tracing::info!(place = %place.toponym_name, distance = %place.distance, "reverse geocoded");
            bundle.place_name = Some(place.toponym_name);
            bundle.distance_km = Some(place.distance);
            bundle.region = place.admin_name1;
            bundle.country = place.country_name;
        }
        Ok(Err(e @ (GeonamesError::Http(_) | GeonamesError::UnexpectedStatus { .. }))) => {
            tracing::warn!(error = %e, "reverse geocoding transport failure");
            bundle.place_name = Some(GEOCODE_TIMEOUT_PLACE.to_string());
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "reverse geocoding failed");
            bundle.place_name = Some(GEOCODE_FAILED_PLACE.to_string());
        }
        Err(elapsed) => {
            tracing::warn!(%elapsed, "reverse geocoding guard fired");
            bundle.place_name = Some(GEOCODE_TIMEOUT_PLACE.to_string());
        }
    }
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Answer {
        Place(NearbyPlace),
        Status(u16),
        Api(i64),
        Hang,
    }

    struct FakeResolver(Answer);

    #[async_trait]
    impl PlaceResolver for FakeResolver {
        async fn nearest_place(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<NearbyPlace, GeonamesError> {
            match &self.0 {
                Answer::Place(place) => Ok(place.clone()),
                Answer::Status(status) => Err(GeonamesError::UnexpectedStatus {
                    status: *status,
                    url: "http://geonames.invalid/".to_string(),
                }),
                Answer::Api(code) => Err(GeonamesError::ApiError {
                    code: *code,
                    message: "daily limit exceeded".to_string(),
                }),
                Answer::Hang => std::future::pending().await,
            }
        }
    }

    fn seattle_bundle() -> CoordinateBundle {
        CoordinateBundle::located(47.6062, -122.3321, 25_200)
    }

    #[tokio::test]
    async fn success_fills_place_fields() {
        let resolver = FakeResolver(Answer::Place(NearbyPlace {
            toponym_name: "Seattle".to_string(),
            distance: "0.41337".to_string(),
            admin_name1: Some("Washington".to_string()),
            country_name: Some("United States".to_string()),
        }));

        let bundle = resolve_place(&resolver, seattle_bundle(), Duration::from_secs(5)).await;

        assert_eq!(bundle.place_name.as_deref(), Some("Seattle"));
        assert_eq!(bundle.distance_km.as_deref(), Some("0.41337"));
        assert_eq!(bundle.region.as_deref(), Some("Washington"));
        assert_eq!(bundle.country.as_deref(), Some("United States"));
        assert!((bundle.latitude - 47.6062).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn guard_expiry_yields_timeout_sentinel() {
        let bundle =
            resolve_place(&FakeResolver(Answer::Hang), seattle_bundle(), Duration::from_secs(5))
                .await;
        assert_eq!(bundle.place_name.as_deref(), Some(GEOCODE_TIMEOUT_PLACE));
        assert_eq!(bundle.region, None);
    }

    #[tokio::test]
    async fn bad_status_yields_timeout_sentinel() {
        let bundle = resolve_place(
            &FakeResolver(Answer::Status(503)),
            seattle_bundle(),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(bundle.place_name.as_deref(), Some(GEOCODE_TIMEOUT_PLACE));
    }

    #[tokio::test]
    async fn api_error_yields_failed_sentinel() {
        let bundle = resolve_place(
            &FakeResolver(Answer::Api(18)),
            seattle_bundle(),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(bundle.place_name.as_deref(), Some(GEOCODE_FAILED_PLACE));
    }
}
