//! Volume-profile levels attached to a bar by the host.

use serde::{Deserialize, Serialize};

/// Traded volume at one price level inside a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfileLevel {
    pub price: f64,
    #[serde(default)]
    pub vol: f64,
    #[serde(default)]
    pub bid_vol: f64,
    #[serde(default)]
    pub ask_vol: f64,
}

impl VolumeProfileLevel {
    pub fn new(price: f64, vol: f64, bid_vol: f64, ask_vol: f64) -> Self {
        Self {
            price,
            vol,
            bid_vol,
            ask_vol,
        }
    }
}

/// Per-bar volume profile.
///
/// `Absent` means the host did not supply profile data at all (feature not
/// enabled, or the chart type has no footprint). It is not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "levels", rename_all = "snake_case")]
pub enum VolumeProfile {
    #[default]
    Absent,
    Present(Vec<VolumeProfileLevel>),
}

impl VolumeProfile {
    /// Levels when present; `None` when the host supplied no profile.
    pub fn levels(&self) -> Option<&[VolumeProfileLevel]> {
        match self {
            VolumeProfile::Absent => None,
            VolumeProfile::Present(levels) => Some(levels),
        }
    }
}

impl From<Option<Vec<VolumeProfileLevel>>> for VolumeProfile {
    fn from(levels: Option<Vec<VolumeProfileLevel>>) -> Self {
        levels.map_or(VolumeProfile::Absent, VolumeProfile::Present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_maps_none_to_absent() {
        assert_eq!(VolumeProfile::from(None), VolumeProfile::Absent);
        let present = VolumeProfile::from(Some(vec![]));
        assert_eq!(present.levels(), Some(&[][..]));
    }

    #[test]
    fn tagged_json_shape() {
        let profile = VolumeProfile::Present(vec![VolumeProfileLevel::new(100.0, 5.0, 2.0, 3.0)]);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["status"], "present");
        assert_eq!(json["levels"][0]["bid_vol"], 2.0);

        let absent: VolumeProfile = serde_json::from_str(r#"{"status":"absent"}"#).unwrap();
        assert_eq!(absent, VolumeProfile::Absent);
    }
}
