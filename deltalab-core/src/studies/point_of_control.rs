//! Point-of-control boxes for the current session only.
//!
//! Each bar inside the active session gets a one-tick-tall box at its POC
//! price, one bar wide. Bars from earlier sessions draw nothing so boxes do
//! not pile up across days.
//!
//! The session boundary comes from the wall clock, not from the bar
//! timestamps: when a host replays old bars after the clock has moved on,
//! those bars are treated as belonging to a past session.

use chrono::NaiveDateTime;

use crate::config::{ConfigError, PointOfControlConfig};
use crate::domain::BarEvent;
use crate::render::{
    FillStyle, Graphics, GraphicsItem, LineStyle, Point, ShapePrimitive,
};
use crate::session::{current_session_start, Clock};
use crate::volume_profile::find_point_of_control;

use super::{
    item_key, AreaChoice, InputType, Requirements, Study, StudyManifest, StudyOutput, StudyTag,
};

/// Border width in pixels; stays visible at any fill opacity.
const BORDER_WIDTH: u32 = 1;

pub struct PointOfControl {
    config: PointOfControlConfig,
    tick_size: f64,
    clock: Box<dyn Clock>,
}

impl PointOfControl {
    /// `instrument_tick_size` wins over the configured fallback when it is a
    /// usable positive number.
    pub fn new(
        config: PointOfControlConfig,
        instrument_tick_size: Option<f64>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tick_size = instrument_tick_size
            .filter(|tick| tick.is_finite() && *tick > 0.0)
            .unwrap_or(config.tick_size);
        Ok(Self {
            config,
            tick_size,
            clock,
        })
    }

    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    /// Start of the session that is live right now.
    pub fn session_start(&self) -> NaiveDateTime {
        current_session_start(self.clock.as_ref(), self.config.session_open_hour)
    }

    /// Corners in data units: half a bar either side of the index, one tick
    /// from the POC price upwards.
    fn corners(&self, index: usize, price: f64) -> Vec<Point> {
        let x = index as f64;
        let top = price + self.tick_size;
        vec![
            Point::data(x - 0.5, price),
            Point::data(x + 0.5, price),
            Point::data(x + 0.5, top),
            Point::data(x - 0.5, top),
        ]
    }
}

impl std::fmt::Debug for PointOfControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointOfControl")
            .field("config", &self.config)
            .field("tick_size", &self.tick_size)
            .finish_non_exhaustive()
    }
}

impl Study for PointOfControl {
    fn manifest(&self) -> StudyManifest {
        StudyManifest {
            name: "PointOfControl",
            description: "POC Boxes — Current Session Only",
            input_type: InputType::Bars,
            area_choice: AreaChoice::SamePane,
            requirements: Requirements {
                volume_profiles: true,
            },
            tags: vec![StudyTag::Volumes],
        }
    }

    fn reset(&mut self) {}

    fn map(&mut self, event: &BarEvent) -> StudyOutput {
        let bar = &event.bar;
        if bar.timestamp < self.session_start() {
            return StudyOutput::empty();
        }
        let Some(price) = find_point_of_control(&event.profile) else {
            return StudyOutput::empty();
        };

        let corners = self.corners(bar.index, price);
        let color = &self.config.poc_color;

        StudyOutput::with_graphics(Graphics::new(vec![
            GraphicsItem::Shapes {
                key: item_key("poc_fill", bar.index),
                primitives: vec![ShapePrimitive::Polygon {
                    points: corners.clone(),
                }],
                fill_style: FillStyle {
                    color: color.clone(),
                    opacity: f64::from(self.config.opacity) / 100.0,
                },
            },
            GraphicsItem::ContourShapes {
                key: item_key("poc_border", bar.index),
                primitives: vec![ShapePrimitive::Polygon { points: corners }],
                line_style: LineStyle {
                    color: color.clone(),
                    line_width: BORDER_WIDTH,
                },
            },
        ]))
    }
}
