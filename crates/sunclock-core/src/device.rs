//! Messages exchanged with the wearable.
//!
//! The watch addresses message fields by small integer keys; the phone-side
//! host exposes the same fields by name. Both forms are supported here: the
//! named form via serde, the binary dictionary form via
//! [`DeviceReply::to_dictionary`] and [`DeviceRequest::from_dictionary`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CodecError;

const TUPLE_BYTE_ARRAY: u8 = 0;
const TUPLE_CSTRING: u8 = 1;
const TUPLE_UINT: u8 = 2;
const TUPLE_INT: u8 = 3;

/// Numeric message keys understood by the watch firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageKey {
    GetLatLong = 0,
    /// Degrees × 1 000 000.
    Latitude = 1,
    /// Degrees × 1 000 000.
    Longitude = 2,
    UtcOffset = 3,
    FailCode = 4,
    FailMessage = 5,
}

/// A request received from the watch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRequest {
    pub wants_coordinates: bool,
    /// Legacy timeout hint. Accepted and logged, never acted on.
    pub timeout_hint: Option<i64>,
}

impl DeviceRequest {
    /// Reads a request from the host's named payload.
    #[must_use]
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            wants_coordinates: payload.get("getLatLong").is_some_and(is_truthy),
            timeout_hint: payload.get("latLongTimeout").and_then(Value::as_i64),
        }
    }

    /// Reads a request from the watch's binary dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] or [`CodecError::UnsupportedTuple`]
    /// if `bytes` is not a well-formed dictionary.
    pub fn from_dictionary(bytes: &[u8]) -> Result<Self, CodecError> {
        let tuples = decode_dictionary(bytes)?;
        Ok(Self {
            wants_coordinates: tuples
                .iter()
                .any(|(key, _)| *key == MessageKey::GetLatLong as u32),
            timeout_hint: None,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A reply sent to the watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceReply {
    #[serde(rename_all = "camelCase")]
    Coordinates {
        latitude_data: i32,
        longitude_data: i32,
        utc_offset: i32,
    },
    #[serde(rename_all = "camelCase")]
    LocationFailed {
        location_fail_code: i32,
        location_fail_message: String,
    },
}

impl DeviceReply {
    /// Builds a success reply, scaling degrees to micro-degrees.
    ///
    /// The transport only carries integers, so the scaled value is rounded
    /// rather than truncated.
    #[must_use]
    pub fn coordinates(latitude: f64, longitude: f64, utc_offset: i32) -> Self {
        Self::Coordinates {
            latitude_data: scale_degrees(latitude),
            longitude_data: scale_degrees(longitude),
            utc_offset,
        }
    }

    #[must_use]
    pub fn failed(code: i32, message: impl Into<String>) -> Self {
        Self::LocationFailed {
            location_fail_code: code,
            location_fail_message: message.into(),
        }
    }

    /// Encodes the reply in the watch's binary dictionary format.
    #[must_use]
    pub fn to_dictionary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::Coordinates {
                latitude_data,
                longitude_data,
                utc_offset,
            } => {
                out.push(3);
                push_int(&mut out, MessageKey::Latitude, *latitude_data);
                push_int(&mut out, MessageKey::Longitude, *longitude_data);
                push_int(&mut out, MessageKey::UtcOffset, *utc_offset);
            }
            Self::LocationFailed {
                location_fail_code,
                location_fail_message,
            } => {
                out.push(2);
                push_int(&mut out, MessageKey::FailCode, *location_fail_code);
                push_cstring(&mut out, MessageKey::FailMessage, location_fail_message);
            }
        }
        out
    }
}

/// Rounds `degrees × 1 000 000` to the nearest integer, halves toward +∞.
#[allow(clippy::cast_possible_truncation)]
fn scale_degrees(degrees: f64) -> i32 {
    let scaled = (degrees * 1_000_000.0 + 0.5).floor();
    scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn push_header(out: &mut Vec<u8>, key: MessageKey, kind: u8, len: u16) {
    out.extend_from_slice(&(key as u32).to_le_bytes());
    out.push(kind);
    out.extend_from_slice(&len.to_le_bytes());
}

fn push_int(out: &mut Vec<u8>, key: MessageKey, value: i32) {
    push_header(out, key, TUPLE_INT, 4);
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_cstring(out: &mut Vec<u8>, key: MessageKey, value: &str) {
    // Interior NULs would end the string early on the watch.
    let text: Vec<u8> = value.bytes().filter(|b| *b != 0).collect();
    let len = u16::try_from(text.len() + 1).unwrap_or(u16::MAX);
    push_header(out, key, TUPLE_CSTRING, len);
    out.extend_from_slice(&text[..usize::from(len) - 1]);
    out.push(0);
}

/// A decoded dictionary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TupleValue {
    Bytes(Vec<u8>),
    Text(String),
    Unsigned(u32),
    Signed(i32),
}

/// Decodes a binary dictionary into `(key, value)` pairs in wire order.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] if a header or value runs past the end
/// of `bytes`, or [`CodecError::UnsupportedTuple`] for unknown tuple types
/// and integer widths.
pub fn decode_dictionary(bytes: &[u8]) -> Result<Vec<(u32, TupleValue)>, CodecError> {
    let Some((&count, mut rest)) = bytes.split_first() else {
        return Err(CodecError::Truncated { offset: 0 });
    };
    let mut offset = 1;
    let mut tuples = Vec::with_capacity(usize::from(count));

    for _ in 0..count {
        if rest.len() < 7 {
            return Err(CodecError::Truncated { offset });
        }
        let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let kind = rest[4];
        let len = usize::from(u16::from_le_bytes([rest[5], rest[6]]));
        rest = &rest[7..];
        offset += 7;
        if rest.len() < len {
            return Err(CodecError::Truncated { offset });
        }
        let (raw, tail) = rest.split_at(len);

        let value = match (kind, len) {
            (TUPLE_BYTE_ARRAY, _) => TupleValue::Bytes(raw.to_vec()),
            (TUPLE_CSTRING, _) => {
                let text = raw.split(|b| *b == 0).next().unwrap_or_default();
                TupleValue::Text(String::from_utf8_lossy(text).into_owned())
            }
            (TUPLE_UINT, 1) => TupleValue::Unsigned(u32::from(raw[0])),
            (TUPLE_UINT, 2) => TupleValue::Unsigned(u32::from(u16::from_le_bytes([raw[0], raw[1]]))),
            (TUPLE_UINT, 4) => TupleValue::Unsigned(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            (TUPLE_INT, 1) => TupleValue::Signed(i32::from(i8::from_le_bytes([raw[0]]))),
            (TUPLE_INT, 2) => TupleValue::Signed(i32::from(i16::from_le_bytes([raw[0], raw[1]]))),
            (TUPLE_INT, 4) => TupleValue::Signed(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            _ => return Err(CodecError::UnsupportedTuple { key, kind }),
        };

        tuples.push((key, value));
        rest = tail;
        offset += len;
    }

    Ok(tuples)
}

#[cfg(test)]
#[path = "device_test.rs"]
mod tests;
