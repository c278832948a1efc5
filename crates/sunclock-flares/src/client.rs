use std::time::Duration;

use chrono::{Datelike, Utc};
use reqwest::{Client, Url};
use sunclock_core::FlareEvent;

use crate::error::FlareError;
use crate::parse::parse_flares;

/// HTTP client for the flare listing page.
///
/// The page is fetched from a fixed URL; the observer position is not sent.
pub struct FlareClient {
    client: Client,
    url: Url,
}

impl FlareClient {
    /// Creates a client for the page at `url`.
    ///
    /// Requests time out after 30 s; callers wrap [`Self::fetch_flares`] in
    /// their own shorter guard.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::InvalidUrl`] if `url` does not parse, or
    /// [`FlareError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, FlareError> {
        let parsed = Url::parse(url).map_err(|e| FlareError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: parsed,
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the page and returns its flares in page order.
    ///
    /// An empty list is a successful result: the page may simply list none.
    ///
    /// # Errors
    ///
    /// - [`FlareError::UnexpectedStatus`] for any non-2xx response.
    /// - [`FlareError::Http`] on network failure or an unreadable body.
    pub async fn fetch_flares(&self) -> Result<Vec<FlareEvent>, FlareError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlareError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.text().await?;
        let flares = parse_flares(&body, Utc::now().year());
        tracing::debug!(count = flares.len(), url = %self.url, "parsed flare table");
        Ok(flares)
    }
}
