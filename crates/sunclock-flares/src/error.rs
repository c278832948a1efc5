use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlareError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid flare page URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
