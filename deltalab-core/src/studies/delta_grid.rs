//! Delta grid: a separate panel with three text rows per bar.
//!
//! Row 1: total volume (label color). Row 2: bar delta. Row 3: cumulative
//! delta for the day, reset whenever the bar's calendar day changes. Delta
//! rows take the positive/negative/neutral color of their sign.

use crate::aggregator::{day_key, process_bar, AggregatorState};
use crate::config::{ConfigError, DeltaGridConfig};
use crate::domain::BarEvent;
use crate::render::{
    display_integer, du, Color, FontWeight, Graphics, GraphicsItem, Point, TextAlignment,
    TextStyle,
};

use super::{
    item_key, row_gap, AreaChoice, InputType, Requirements, Study, StudyManifest, StudyOutput,
    StudyTag,
};

/// Fixed plot range for the grid's own pane; rows are centred on zero.
const PANE_LOWER: f64 = -1.0;
const PANE_UPPER: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct DeltaGrid {
    config: DeltaGridConfig,
    state: AggregatorState,
}

impl DeltaGrid {
    pub fn new(config: DeltaGridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AggregatorState::new(),
        })
    }

    pub fn state(&self) -> &AggregatorState {
        &self.state
    }

    fn text(&self, key: String, point: Point, value: f64, fill: &Color) -> GraphicsItem {
        GraphicsItem::Text {
            key,
            point,
            text: display_integer(value),
            style: TextStyle {
                font_size: self.config.font_size,
                font_weight: FontWeight::Normal,
                fill: fill.clone(),
            },
            text_alignment: TextAlignment::CenterMiddle,
        }
    }
}

impl Study for DeltaGrid {
    fn manifest(&self) -> StudyManifest {
        StudyManifest {
            name: "DeltaGrid",
            description: "Volume / Delta / Cumulative Delta Grid",
            input_type: InputType::Bars,
            area_choice: AreaChoice::NewPane,
            requirements: Requirements::default(),
            tags: vec![StudyTag::Volumes],
        }
    }

    fn reset(&mut self) {
        self.state = AggregatorState::new();
    }

    fn map(&mut self, event: &BarEvent) -> StudyOutput {
        let bar = &event.bar;
        let step = process_bar(&mut self.state, bar, day_key);

        let palette = &self.config.palette;
        let gap = row_gap(self.config.font_size);
        let x = bar.index as f64;

        let children = vec![
            self.text(
                item_key("vol", bar.index),
                Point::new(du(x), du(0.0).minus_px(gap)),
                bar.total_volume(),
                &palette.label,
            ),
            self.text(
                item_key("delta", bar.index),
                Point::new(du(x), du(0.0)),
                step.bar_delta,
                palette.for_value(step.bar_delta),
            ),
            self.text(
                item_key("cdelta", bar.index),
                Point::new(du(x), du(0.0).plus_px(gap)),
                step.cumulative_delta,
                palette.for_value(step.cumulative_delta),
            ),
        ];

        StudyOutput {
            lower: Some(PANE_LOWER),
            upper: Some(PANE_UPPER),
            graphics: Some(Graphics::new(vec![GraphicsItem::Container {
                key: item_key("grid", bar.index),
                children,
            }])),
        }
    }
}
