//! HTTP client for the geonames.org web services.
//!
//! Only the `findNearbyPlaceNameJSON` endpoint is used. Requests carry the
//! static account name as the `username` query parameter; geonames has no
//! other authentication.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeonamesError;
use crate::types::{FindNearbyResponse, NearbyPlace};

const DEFAULT_BASE_URL: &str = "http://api.geonames.org/";
const FIND_NEARBY_PLACE_NAME: &str = "findNearbyPlaceNameJSON";

/// Client for the geonames.org API.
///
/// Use [`GeonamesClient::new`] for production or
/// [`GeonamesClient::with_base_url`] to point at a mock server in tests.
pub struct GeonamesClient {
    client: Client,
    username: String,
    base_url: Url,
}

impl GeonamesClient {
    /// Creates a new client pointed at the public geonames API.
    ///
    /// # Errors
    ///
    /// Returns [`GeonamesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(username: &str, user_agent: &str) -> Result<Self, GeonamesError> {
        Self::with_base_url(username, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeonamesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeonamesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        username: &str,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeonamesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so `join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeonamesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            username: username.to_owned(),
            base_url,
        })
    }

    /// Finds the single nearest populated place to a coordinate.
    ///
    /// # Errors
    ///
    /// - [`GeonamesError::InvalidCoordinates`] if either value is out of range.
    /// - [`GeonamesError::Http`] on network failure.
    /// - [`GeonamesError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeonamesError::ApiError`] if the body carries a geonames `status`.
    /// - [`GeonamesError::Deserialize`] if the body is not the expected shape.
    /// - [`GeonamesError::NoResult`] if the service returned no places.
    pub async fn find_nearby_place(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NearbyPlace, GeonamesError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeonamesError::InvalidCoordinates(latitude, longitude));
        }

        let url = self.find_nearby_url(latitude, longitude)?;
        tracing::debug!(lat = latitude, lng = longitude, "geonames: find nearby place name");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeonamesError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.redacted(&url),
            });
        }

        let body = response.text().await?;
        let parsed: FindNearbyResponse =
            serde_json::from_str(&body).map_err(|e| GeonamesError::Deserialize {
                context: format!("{FIND_NEARBY_PLACE_NAME}(lat={latitude}, lng={longitude})"),
                source: e,
            })?;

        if let Some(api_status) = parsed.status {
            return Err(GeonamesError::ApiError {
                code: api_status.value,
                message: api_status.message,
            });
        }

        parsed
            .geonames
            .into_iter()
            .next()
            .ok_or(GeonamesError::NoResult(latitude, longitude))
    }

    /// Builds the endpoint URL with percent-encoded query parameters.
    fn find_nearby_url(&self, latitude: f64, longitude: f64) -> Result<Url, GeonamesError> {
        let mut url =
            self.base_url
                .join(FIND_NEARBY_PLACE_NAME)
                .map_err(|e| GeonamesError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lng", &longitude.to_string())
            .append_pair("maxRows", "1")
            .append_pair("username", &self.username);
        Ok(url)
    }

    /// The request URL with the account name masked, for error messages.
    fn redacted(&self, url: &Url) -> String {
        url.as_str()
            .replace(&format!("username={}", self.username), "username=[redacted]")
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
