use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Shown when no upcoming flare is known.
pub const NO_FLARE_SUMMARY: &str = "00:00 (+3.1)";

/// One upcoming satellite flare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareEvent {
    pub timestamp_utc: DateTime<Utc>,
    /// Visual magnitude; more negative is brighter.
    pub brightness_magnitude: f64,
    pub azimuth_degrees: u16,
}

impl FlareEvent {
    /// `HH:MM (±B.B)` in UTC.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:02}:{:02} ({:+.1})",
            self.timestamp_utc.hour(),
            self.timestamp_utc.minute(),
            self.brightness_magnitude
        )
    }
}

/// Summary of the first flare in `flares`, or [`NO_FLARE_SUMMARY`].
#[must_use]
pub fn flare_summary(flares: &[FlareEvent]) -> String {
    flares
        .first()
        .map_or_else(|| NO_FLARE_SUMMARY.to_string(), FlareEvent::summary)
}
