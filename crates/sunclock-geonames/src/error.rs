use thiserror::Error;

/// Errors returned by the geonames client.
#[derive(Debug, Error)]
pub enum GeonamesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The service answered with a `status` object instead of results,
    /// e.g. an exhausted daily credit limit for the account.
    #[error("geonames API error {code}: {message}")]
    ApiError { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no place found near {0}, {1}")]
    NoResult(f64, f64),

    #[error("invalid coordinates: {0}, {1}")]
    InvalidCoordinates(f64, f64),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
