//! Parser for the flare listing table.
//!
//! # Row grammar
//!
//! ```text
//! row       := '<a href="flaredetails.aspx' ATTR* '">' TIMESTAMP '</a></td>'
//!              '<td align="center">' BRIGHTNESS '</td>'
//!              '<td align="center">' DIGITS DEG '</td>'
//!              '<td align="center">' AZIMUTH DEG ANY+ '</td>'
//! DEG       := '°' | '&deg;' | '&#176;'
//! TIMESTAMP := 'YYYY-MM-DD HH:MM:SS' | 'DD Mon YYYY HH:MM:SS' | 'Mon DD, HH:MM:SS'
//! ```
//!
//! The third cell is the flare altitude and is not kept. A row never spans a
//! line break. Timestamps are UTC; the year-less form takes the caller's
//! reference year. Rows whose fields do not parse are skipped.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use sunclock_core::FlareEvent;

static FLARE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<a href="flaredetails\.aspx[^"]*">(.+?)</a></td>"#,
        r#"<td align="center">(.+?)</td>"#,
        r#"<td align="center">\d+?(?:°|&deg;|&#176;)</td>"#,
        r#"<td align="center">(\d+)(?:°|&deg;|&#176;).+?</td>"#,
    ))
    .expect("valid flare row regex")
});

const DATED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d %b %Y %H:%M:%S"];
const YEARLESS_FORMAT: &str = "%Y %b %d, %H:%M:%S";

/// Extracts every well-formed flare row from `html`, in page order.
#[must_use]
pub fn parse_flares(html: &str, reference_year: i32) -> Vec<FlareEvent> {
    FLARE_ROW_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let timestamp_utc = parse_timestamp(&cap[1], reference_year)?;
            let brightness_magnitude = cap[2].trim().parse::<f64>().ok()?;
            let azimuth_degrees = cap[3].parse::<u16>().ok().filter(|az| *az <= 360)?;
            Some(FlareEvent {
                timestamp_utc,
                brightness_magnitude,
                azimuth_degrees,
            })
        })
        .collect()
}

/// Parses an anchor timestamp as UTC.
pub(crate) fn parse_timestamp(text: &str, reference_year: i32) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let text = text
        .strip_suffix("GMT")
        .or_else(|| text.strip_suffix("UTC"))
        .unwrap_or(text)
        .trim_end();

    DATED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(&format!("{reference_year} {text}"), YEARLESS_FORMAT)
                .ok()
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
