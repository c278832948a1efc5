//! The Coordinate Bundle shared by the phone-side pipelines and the
//! configuration pages.
//!
//! Bundles cross the webview boundary as JSON, percent-encoded the way a
//! browser's `encodeURIComponent` does, so the page can `decodeURIComponent`
//! the URL fragment and hand the very same text back in a `decode-` response.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A position (or a failure to get one), optionally enriched with a place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBundle {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    /// Seconds to add to local time to get UTC.
    #[serde(rename = "tz-off")]
    pub utc_offset_seconds: i32,
    /// `0` means no error.
    #[serde(rename = "err-code", default)]
    pub error_code: i32,
    #[serde(rename = "err-msg", default)]
    pub error_message: String,
    #[serde(rename = "place-name", default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Distance in kilometres to the named place, as reported by the geocoder.
    #[serde(rename = "range", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<String>,
}

impl CoordinateBundle {
    #[must_use]
    pub fn located(latitude: f64, longitude: f64, utc_offset_seconds: i32) -> Self {
        Self {
            latitude,
            longitude,
            utc_offset_seconds,
            error_code: 0,
            error_message: String::new(),
            place_name: None,
            region: None,
            country: None,
            distance_km: None,
        }
    }

    /// A bundle reporting a failed position query. Coordinates and offset are zeroed.
    #[must_use]
    pub fn failed(error_code: i32, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
            ..Self::located(0.0, 0.0, 0)
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_code != 0 || !self.error_message.is_empty()
    }

    /// Serializes to JSON and percent-encodes the result for use as a URL fragment.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if a coordinate is not finite.
    pub fn to_fragment(&self) -> Result<String, CodecError> {
        let json = serde_json::to_string(self).map_err(|e| CodecError::Json {
            context: "coordinate bundle".to_string(),
            source: e,
        })?;
        Ok(encode_component(&json))
    }

    /// Inverse of [`Self::to_fragment`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encoding`] if the percent-decoded bytes are not
    /// UTF-8, or [`CodecError::Json`] if they are not a bundle.
    pub fn from_fragment(fragment: &str) -> Result<Self, CodecError> {
        let json = decode_component(fragment)?;
        serde_json::from_str(&json).map_err(|e| CodecError::Json {
            context: "coordinate bundle".to_string(),
            source: e,
        })
    }
}

/// Percent-encodes `raw` with the `encodeURIComponent` character set.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Percent-decodes `encoded` into UTF-8 text.
///
/// # Errors
///
/// Returns [`CodecError::Encoding`] if the decoded bytes are not UTF-8.
pub fn decode_component(encoded: &str) -> Result<String, CodecError> {
    Ok(percent_decode_str(encoded).decode_utf8()?.into_owned())
}
