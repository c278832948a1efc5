pub mod app_config;
pub mod bundle;
pub mod config;
pub mod device;
pub mod flare;
pub mod screen;

pub use app_config::{AppConfig, ConfigUrls, Environment, GuardTimings, RelayVariant};
pub use bundle::CoordinateBundle;
pub use config::{load_app_config, load_app_config_from_env};
pub use device::{DeviceReply, DeviceRequest, MessageKey};
pub use flare::FlareEvent;
pub use screen::{ScreenClosed, ScreenResponse};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while decoding payloads that cross the host boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("device dictionary truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("device dictionary tuple {key} has unsupported type {kind}")]
    UnsupportedTuple { key: u32, kind: u8 },
}
