use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which build of the relay is running.
///
/// `Basic` is the reduced relay: it answers device requests only, never
/// consults the flare page, and ignores configuration-screen events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayVariant {
    Full,
    Basic,
}

impl std::fmt::Display for RelayVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayVariant::Full => write!(f, "full"),
            RelayVariant::Basic => write!(f, "basic"),
        }
    }
}

/// The three configuration pages the host can be asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUrls {
    pub main: Url,
    pub show_coords: Url,
    pub coords_sent: Url,
}

impl ConfigUrls {
    /// Resolves the fixed page names against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if `base` is not an absolute URL.
    pub fn from_base(base: &str) -> Result<Self, url::ParseError> {
        // A base without a trailing slash would have its last segment replaced.
        let normalised = format!("{}/", base.trim_end_matches('/'));
        let base = Url::parse(&normalised)?;
        Ok(Self {
            main: base.join("config.html")?,
            show_coords: base.join("show_coords.html")?,
            coords_sent: base.join("coords_sent.html")?,
        })
    }

    /// The show-coordinates page with `fragment` attached verbatim.
    ///
    /// `fragment` must already be URL-safe (see
    /// [`CoordinateBundle::to_fragment`](crate::CoordinateBundle::to_fragment)).
    #[must_use]
    pub fn show_coords_with(&self, fragment: &str) -> String {
        format!("{}#{fragment}", self.show_coords)
    }
}

/// Guard and provider timings for the three guarded operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardTimings {
    /// Outer guard around the position query.
    pub location_guard: Duration,
    /// Timeout handed to the position provider itself.
    pub location_timeout: Duration,
    /// Oldest cached position the provider may return.
    pub location_max_age: Duration,
    pub geocode_guard: Duration,
    pub flares_guard: Duration,
}

impl Default for GuardTimings {
    fn default() -> Self {
        Self {
            location_guard: Duration::from_millis(15_000),
            location_timeout: Duration::from_millis(10_000),
            location_max_age: Duration::from_millis(60_000),
            geocode_guard: Duration::from_millis(5_000),
            flares_guard: Duration::from_millis(5_000),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub variant: RelayVariant,
    pub urls: ConfigUrls,
    pub geonames_base_url: String,
    pub geonames_username: String,
    pub flares_url: String,
    pub user_agent: String,
    pub timings: GuardTimings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("variant", &self.variant)
            .field("urls", &self.urls)
            .field("geonames_base_url", &self.geonames_base_url)
            .field("geonames_username", &"[redacted]")
            .field("flares_url", &self.flares_url)
            .field("user_agent", &self.user_agent)
            .field("timings", &self.timings)
            .finish()
    }
}
