//! Study configuration records, validated once at construction.
//!
//! Each study has a plain serde record with named fields and documented
//! ranges. A host (or the CLI) can build them in code or load a
//! [`StudyConfig`] from TOML:
//!
//! ```toml
//! kind = "point_of_control"
//! poc_color = "#FFD700"
//! opacity = 70
//! session_open_hour = 17
//! tick_size = 0.25
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::render::style::{default_poc_color, Color, DeltaPalette};
use crate::session::SessionOpenHour;

pub const FONT_SIZE_MIN: u32 = 8;
pub const LABEL_OFFSET_MIN: f64 = 2.0;
pub const OPACITY_MIN: u32 = 10;
pub const OPACITY_MAX: u32 = 100;
pub const TICK_SIZE_MIN: f64 = 0.01;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown study kind: {0:?}")]
    UnknownStudy(String),

    #[error("read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons and lands here too.
    if !(value >= min && value <= max) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_font_size(font_size: u32) -> Result<(), ConfigError> {
    check_range(
        "font_size",
        f64::from(font_size),
        f64::from(FONT_SIZE_MIN),
        f64::INFINITY,
    )
}

/// Separate-panel grid: volume, delta and cumulative delta rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaGridConfig {
    pub palette: DeltaPalette,
    /// Text size in points, at least 8.
    pub font_size: u32,
}

impl Default for DeltaGridConfig {
    fn default() -> Self {
        Self {
            palette: DeltaPalette::default(),
            font_size: 10,
        }
    }
}

impl DeltaGridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_font_size(self.font_size)
    }
}

/// Volume and delta labels stacked above each candle high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleDeltaConfig {
    pub palette: DeltaPalette,
    pub font_size: u32,
    /// Pixels between the candle high and the delta label, at least 2.
    pub label_offset: f64,
}

impl Default for CandleDeltaConfig {
    fn default() -> Self {
        Self {
            palette: DeltaPalette::default(),
            font_size: 10,
            label_offset: 8.0,
        }
    }
}

impl CandleDeltaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_font_size(self.font_size)?;
        check_range("label_offset", self.label_offset, LABEL_OFFSET_MIN, f64::INFINITY)
    }
}

/// Current-session POC boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOfControlConfig {
    pub poc_color: Color,
    /// Fill opacity in percent, `10..=100`.
    pub opacity: u32,
    pub session_open_hour: SessionOpenHour,
    /// Used when the host has no instrument tick size.
    pub tick_size: f64,
}

impl Default for PointOfControlConfig {
    fn default() -> Self {
        Self {
            poc_color: default_poc_color(),
            opacity: 70,
            session_open_hour: SessionOpenHour::GLOBEX,
            tick_size: 0.25,
        }
    }
}

impl PointOfControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "opacity",
            f64::from(self.opacity),
            f64::from(OPACITY_MIN),
            f64::from(OPACITY_MAX),
        )?;
        check_range("tick_size", self.tick_size, TICK_SIZE_MIN, f64::MAX)
    }
}

/// Which study to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyKind {
    DeltaGrid,
    CandleDelta,
    PointOfControl,
}

impl StudyKind {
    pub const ALL: [StudyKind; 3] = [
        StudyKind::DeltaGrid,
        StudyKind::CandleDelta,
        StudyKind::PointOfControl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StudyKind::DeltaGrid => "delta_grid",
            StudyKind::CandleDelta => "candle_delta",
            StudyKind::PointOfControl => "point_of_control",
        }
    }
}

impl fmt::Display for StudyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownStudy(s.to_string()))
    }
}

/// A study configuration tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyConfig {
    DeltaGrid(DeltaGridConfig),
    CandleDelta(CandleDeltaConfig),
    PointOfControl(PointOfControlConfig),
}

impl StudyConfig {
    /// Defaults for the given study.
    pub fn default_for(kind: StudyKind) -> Self {
        match kind {
            StudyKind::DeltaGrid => StudyConfig::DeltaGrid(DeltaGridConfig::default()),
            StudyKind::CandleDelta => StudyConfig::CandleDelta(CandleDeltaConfig::default()),
            StudyKind::PointOfControl => {
                StudyConfig::PointOfControl(PointOfControlConfig::default())
            }
        }
    }

    pub fn kind(&self) -> StudyKind {
        match self {
            StudyConfig::DeltaGrid(_) => StudyKind::DeltaGrid,
            StudyConfig::CandleDelta(_) => StudyKind::CandleDelta,
            StudyConfig::PointOfControl(_) => StudyKind::PointOfControl,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StudyConfig::DeltaGrid(c) => c.validate(),
            StudyConfig::CandleDelta(c) => c.validate(),
            StudyConfig::PointOfControl(c) => c.validate(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StudyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        for kind in StudyKind::ALL {
            let config = StudyConfig::default_for(kind);
            assert!(config.validate().is_ok(), "{kind} defaults should validate");
            assert_eq!(config.kind(), kind);
        }
    }

    #[test]
    fn font_size_below_minimum_rejected() {
        let config = DeltaGridConfig {
            font_size: 7,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "font_size", .. })
        ));
    }

    #[test]
    fn label_offset_nan_rejected() {
        let config = CandleDeltaConfig {
            label_offset: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn opacity_bounds() {
        let mut config = PointOfControlConfig::default();
        config.opacity = 10;
        assert!(config.validate().is_ok());
        config.opacity = 100;
        assert!(config.validate().is_ok());
        config.opacity = 9;
        assert!(config.validate().is_err());
        config.opacity = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn tick_size_minimum() {
        let config = PointOfControlConfig {
            tick_size: 0.001,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "tick_size", .. })
        ));
    }

    #[test]
    fn parses_minimal_toml() {
        let config = StudyConfig::from_toml(r#"kind = "delta_grid""#).unwrap();
        assert_eq!(config, StudyConfig::DeltaGrid(DeltaGridConfig::default()));
    }

    #[test]
    fn parses_full_poc_toml() {
        let toml = r##"
            kind = "point_of_control"
            poc_color = "#00ffff"
            opacity = 40
            session_open_hour = 8
            tick_size = 0.1
        "##;
        let StudyConfig::PointOfControl(config) = StudyConfig::from_toml(toml).unwrap() else {
            panic!("expected a point_of_control config");
        };
        assert_eq!(config.poc_color.as_str(), "#00ffff");
        assert_eq!(config.opacity, 40);
        assert_eq!(config.session_open_hour.hour(), 8);
        assert_eq!(config.tick_size, 0.1);
    }

    #[test]
    fn palette_table_overrides_single_color() {
        let toml = r##"
            kind = "candle_delta"
            label_offset = 12.0

            [palette]
            positive = "#00ff80"
        "##;
        let StudyConfig::CandleDelta(config) = StudyConfig::from_toml(toml).unwrap() else {
            panic!("expected a candle_delta config");
        };
        assert_eq!(config.palette.positive.as_str(), "#00ff80");
        assert_eq!(config.palette.negative, DeltaPalette::default().negative);
        assert_eq!(config.label_offset, 12.0);
    }

    #[test]
    fn out_of_range_hour_fails_to_parse() {
        let err = StudyConfig::from_toml("kind = \"point_of_control\"\nsession_open_hour = 24")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_color_fails_to_parse() {
        let err = StudyConfig::from_toml("kind = \"point_of_control\"\npoc_color = \"gold\"")
            .unwrap_err();
        assert!(err.to_string().contains("gold"));
    }

    #[test]
    fn study_kind_round_trips_through_str() {
        assert_eq!("candle_delta".parse::<StudyKind>().unwrap(), StudyKind::CandleDelta);
        assert!(matches!(
            "volume_bubbles".parse::<StudyKind>(),
            Err(ConfigError::UnknownStudy(_))
        ));
    }
}
