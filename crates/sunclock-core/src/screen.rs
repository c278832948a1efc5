//! Responses returned by the configuration pages when their webview closes.
//!
//! The host hands back a single string. It is decoded once, here, into a
//! [`ScreenClosed`] so the router never inspects raw response text.

use serde_json::Value;

use crate::bundle::{decode_component, CoordinateBundle};
use crate::CodecError;

/// Reserved by the host for a webview dismissed without a page response.
pub const CANCELLED: &str = "CANCELLED";

const DECODE_PREFIX: &str = "decode-";

/// What the host reported when a configuration page closed.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenClosed {
    /// The host dismissed the page; retry the last real response, if any.
    Cancelled,
    Response(ScreenResponse),
}

/// A response produced by one of the configuration pages.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenResponse {
    /// The user backed out of the page.
    Cancel,
    /// Read coordinates and display them on the show-coordinates page.
    ShowCoords,
    /// Read coordinates, send them to the watch and confirm on the phone.
    SendCoords,
    /// Re-open the main configuration page.
    ShowConfig,
    /// Reverse-geocode a bundle previously shown on the show-coordinates page.
    Decode(CoordinateBundle),
    /// Any other page result. Logged only.
    Config(Value),
    /// A response that could not be decoded, kept verbatim. Acting on it is
    /// a no-op, but it still replaces the remembered response.
    Unreadable(String),
}

impl ScreenClosed {
    /// Decodes the host's raw response string.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if a `decode-` payload is not a percent-encoded
    /// bundle, or if an unrecognised response is not percent-encoded JSON.
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        if raw == CANCELLED {
            return Ok(Self::Cancelled);
        }
        ScreenResponse::parse(raw).map(Self::Response)
    }
}

impl ScreenResponse {
    /// Decodes a page response.
    ///
    /// # Errors
    ///
    /// See [`ScreenClosed::parse`].
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        match raw {
            "cancel" => Ok(Self::Cancel),
            "show-coords" => Ok(Self::ShowCoords),
            "send-coords" => Ok(Self::SendCoords),
            "show-config" => Ok(Self::ShowConfig),
            _ => {
                if let Some(payload) = raw.strip_prefix(DECODE_PREFIX) {
                    return CoordinateBundle::from_fragment(payload).map(Self::Decode);
                }
                let json = decode_component(raw)?;
                serde_json::from_str(&json)
                    .map(Self::Config)
                    .map_err(|e| CodecError::Json {
                        context: "configuration result".to_string(),
                        source: e,
                    })
            }
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::ShowCoords => "show-coords",
            Self::SendCoords => "send-coords",
            Self::ShowConfig => "show-config",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::Unreadable(_) => "unreadable",
        }
    }
}
