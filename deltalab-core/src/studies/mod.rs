//! Chart studies: the per-bar calculators a host drives.
//!
//! A study is created once from a validated config, reset at the start of
//! every redraw pass, and mapped over each bar in chronological order. The
//! output for a bar is either a full set of graphics or nothing at all.

pub mod candle_delta;
pub mod delta_grid;
pub mod point_of_control;

pub use candle_delta::CandleDelta;
pub use delta_grid::DeltaGrid;
pub use point_of_control::PointOfControl;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, StudyConfig};
use crate::domain::BarEvent;
use crate::render::Graphics;
use crate::session::{Clock, SystemClock};

/// Row spacing for stacked text: font size plus a fixed gap.
pub(crate) fn row_gap(font_size: u32) -> f64 {
    f64::from(font_size) + 4.0
}

/// `prefix_index`, the per-bar key the host diffs on.
pub(crate) fn item_key(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}")
}

/// What the study consumes from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Bars,
}

/// Where the study draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaChoice {
    /// Its own panel below the price chart.
    NewPane,
    /// Overlaid on the price chart.
    SamePane,
}

/// Data the host must supply beyond plain bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Requirements {
    pub volume_profiles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyTag {
    Volumes,
}

/// Static description of a study for host registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyManifest {
    pub name: &'static str,
    pub description: &'static str,
    pub input_type: InputType,
    pub area_choice: AreaChoice,
    pub requirements: Requirements,
    pub tags: Vec<StudyTag>,
}

/// Per-bar study output.
///
/// `lower`/`upper` are fixed plot bounds for studies that draw in their own
/// pane; `graphics` is `None` when nothing should be drawn for the bar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StudyOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics: Option<Graphics>,
}

impl StudyOutput {
    /// Draw nothing for this bar.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_graphics(graphics: Graphics) -> Self {
        Self {
            graphics: Some(graphics),
            ..Self::default()
        }
    }

    /// True when there are no graphics to draw.
    pub fn is_empty(&self) -> bool {
        self.graphics
            .as_ref()
            .map_or(true, |graphics| graphics.items.is_empty())
    }
}

/// A per-bar chart calculator.
pub trait Study: Send {
    fn manifest(&self) -> StudyManifest;

    /// Drop all running state; called before a host replays bars from the start.
    fn reset(&mut self);

    /// Compute the output for one bar. Bars arrive in chronological order.
    fn map(&mut self, event: &BarEvent) -> StudyOutput;
}

/// Host-provided context available when a study is created.
pub struct HostContext {
    /// Instrument tick size from the host's contract info, if it has one.
    pub instrument_tick_size: Option<f64>,
    pub clock: Box<dyn Clock>,
}

impl Default for HostContext {
    fn default() -> Self {
        Self {
            instrument_tick_size: None,
            clock: Box::new(SystemClock),
        }
    }
}

/// Validate `config` and build the matching study.
pub fn build_study(config: StudyConfig, host: HostContext) -> Result<Box<dyn Study>, ConfigError> {
    let study: Box<dyn Study> = match config {
        StudyConfig::DeltaGrid(config) => Box::new(DeltaGrid::new(config)?),
        StudyConfig::CandleDelta(config) => Box::new(CandleDelta::new(config)?),
        StudyConfig::PointOfControl(config) => Box::new(PointOfControl::new(
            config,
            host.instrument_tick_size,
            host.clock,
        )?),
    };
    tracing::info!(study = study.manifest().name, "study created");
    Ok(study)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{Bar, BarEvent};
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    pub fn event(index: usize, timestamp: NaiveDateTime, bid: f64, offer: f64) -> BarEvent {
        BarEvent::new(Bar {
            index,
            timestamp,
            high: 5000.0 + index as f64,
            volume: bid + offer,
            bid_volume: bid,
            offer_volume: offer,
        })
    }
}
