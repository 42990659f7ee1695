//! Candle delta labels: volume and delta stacked just above each candle high.
//!
//! Stateless: every bar is labelled independently.

use crate::config::{CandleDeltaConfig, ConfigError};
use crate::domain::BarEvent;
use crate::render::{
    display_integer, du, FontWeight, Graphics, GraphicsItem, Point, TextAlignment, TextStyle,
};

use super::{
    item_key, row_gap, AreaChoice, InputType, Requirements, Study, StudyManifest, StudyOutput,
    StudyTag,
};

#[derive(Debug, Clone)]
pub struct CandleDelta {
    config: CandleDeltaConfig,
}

impl CandleDelta {
    pub fn new(config: CandleDeltaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Study for CandleDelta {
    fn manifest(&self) -> StudyManifest {
        StudyManifest {
            name: "VolumeDeltaCandleInfo",
            description: "Volume Delta Candle Info",
            input_type: InputType::Bars,
            area_choice: AreaChoice::SamePane,
            requirements: Requirements::default(),
            tags: vec![StudyTag::Volumes],
        }
    }

    fn reset(&mut self) {}

    fn map(&mut self, event: &BarEvent) -> StudyOutput {
        let bar = &event.bar;
        let delta = bar.delta();
        let palette = &self.config.palette;
        let offset = self.config.label_offset;
        let x = du(bar.index as f64);

        // Delta sits closest to the high; volume one row above it.
        let delta_y = du(bar.high).minus_px(offset);
        let volume_y = du(bar.high).minus_px(offset + row_gap(self.config.font_size));

        let children = vec![
            GraphicsItem::Text {
                key: item_key("vol", bar.index),
                point: Point::new(x.clone(), volume_y),
                text: format!("V: {}", display_integer(bar.total_volume())),
                style: TextStyle {
                    font_size: self.config.font_size,
                    font_weight: FontWeight::Normal,
                    fill: palette.label.clone(),
                },
                text_alignment: TextAlignment::CenterMiddle,
            },
            GraphicsItem::Text {
                key: item_key("delta", bar.index),
                point: Point::new(x, delta_y),
                text: format!("D: {}", display_integer(delta)),
                style: TextStyle {
                    font_size: self.config.font_size,
                    font_weight: FontWeight::Bold,
                    fill: palette.for_value(delta).clone(),
                },
                text_alignment: TextAlignment::CenterMiddle,
            },
        ];

        StudyOutput::with_graphics(Graphics::new(vec![GraphicsItem::Container {
            key: item_key("grid", bar.index),
            children,
        }]))
    }
}
