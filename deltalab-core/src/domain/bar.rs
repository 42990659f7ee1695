//! Bar: the per-call market data unit handed over by the host.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::profile::VolumeProfile;

/// One chart bar as supplied by the host runtime.
///
/// `timestamp` is the host's local wall-clock time for the bar; no timezone
/// conversion happens inside the core. Volume fields missing from the host
/// payload deserialize as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub high: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub bid_volume: f64,
    #[serde(default)]
    pub offer_volume: f64,
}

impl Bar {
    /// Total traded volume, with malformed values read as zero.
    pub fn total_volume(&self) -> f64 {
        non_negative(self.volume)
    }

    /// Aggressor-based delta: offer-side volume minus bid-side volume.
    ///
    /// Positive means net buying pressure.
    pub fn delta(&self) -> f64 {
        non_negative(self.offer_volume) - non_negative(self.bid_volume)
    }
}

/// Clamp a host-supplied volume: negative, NaN and infinite values become 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Everything the host hands a study for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEvent {
    pub bar: Bar,
    #[serde(default)]
    pub profile: VolumeProfile,
}

impl BarEvent {
    /// A bar without volume-profile data.
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            profile: VolumeProfile::Absent,
        }
    }

    pub fn with_profile(bar: Bar, profile: VolumeProfile) -> Self {
        Self { bar, profile }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bar() -> Bar {
        Bar {
            index: 3,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            high: 5012.25,
            volume: 1_250.0,
            bid_volume: 600.0,
            offer_volume: 650.0,
        }
    }

    #[test]
    fn delta_is_offer_minus_bid() {
        assert_eq!(sample_bar().delta(), 50.0);
    }

    #[test]
    fn malformed_volumes_read_as_zero() {
        let mut bar = sample_bar();
        bar.bid_volume = -10.0;
        bar.offer_volume = f64::NAN;
        bar.volume = f64::INFINITY;
        assert_eq!(bar.delta(), 0.0);
        assert_eq!(bar.total_volume(), 0.0);
    }

    #[test]
    fn missing_volumes_deserialize_as_zero() {
        let json = r#"{"index":0,"timestamp":"2024-03-04T09:30:00","high":100.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, 0.0);
        assert_eq!(bar.delta(), 0.0);
    }

    #[test]
    fn event_without_profile_is_absent() {
        let json = r#"{"bar":{"index":0,"timestamp":"2024-03-04T09:30:00","high":100.5}}"#;
        let event: BarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.profile, VolumeProfile::Absent);
    }
}
