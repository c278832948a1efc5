use serde::Deserialize;
use serde_json::{Map, Value};
use sunclock_core::DeviceReply;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("device message was not delivered: {0}")]
    DeviceUnreachable(String),

    #[error("could not open {url}: {reason}")]
    OpenUrl { url: String, reason: String },
}

/// Outbound services the phone-side host provides.
pub trait Host: Send + Sync {
    /// Queues a message for the watch. Delivery is not confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DeviceUnreachable`] if the message could not be queued.
    fn send_device_message(&self, reply: &DeviceReply) -> Result<(), HostError>;

    /// Opens a configuration page in the host's webview.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::OpenUrl`] if the webview cannot be opened.
    fn open_url(&self, url: &str) -> Result<(), HostError>;

    /// Seconds to add to the phone's local time to get UTC.
    ///
    /// Positive west of Greenwich.
    fn utc_offset_seconds(&self) -> i32;
}

/// Events the host delivers to the relay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    Ready,
    /// A message from the watch, by field name.
    AppMessage {
        #[serde(default)]
        payload: Map<String, Value>,
    },
    ShowConfiguration,
    WebviewClosed { response: String },
}
