//! Study engine: drives one study through host redraw passes.
//!
//! A redraw pass replays bars from the first one, so the study is reset
//! before mapping. Real-time bars that arrive between passes go through
//! [`StudyEngine::on_bar`] and continue from the current state.

use chrono::NaiveDateTime;

use crate::domain::BarEvent;
use crate::studies::{Study, StudyManifest, StudyOutput};

pub struct StudyEngine {
    study: Box<dyn Study>,
    last_seen: Option<(usize, NaiveDateTime)>,
}

impl StudyEngine {
    pub fn new(study: Box<dyn Study>) -> Self {
        Self {
            study,
            last_seen: None,
        }
    }

    pub fn manifest(&self) -> StudyManifest {
        self.study.manifest()
    }

    /// Reset the study and map every bar in order.
    pub fn redraw(&mut self, events: &[BarEvent]) -> Vec<StudyOutput> {
        self.study.reset();
        self.last_seen = None;

        let outputs: Vec<StudyOutput> = events.iter().map(|event| self.on_bar(event)).collect();
        tracing::debug!(
            study = self.study.manifest().name,
            bars = events.len(),
            drawn = outputs.iter().filter(|o| !o.is_empty()).count(),
            "redraw pass complete"
        );
        outputs
    }

    /// Map one bar on top of the current state.
    ///
    /// Bars are expected in non-decreasing index and timestamp order. A bar
    /// that goes backwards is still mapped, with a warning.
    pub fn on_bar(&mut self, event: &BarEvent) -> StudyOutput {
        let bar = &event.bar;
        if let Some((index, timestamp)) = self.last_seen {
            if bar.index < index || bar.timestamp < timestamp {
                tracing::warn!(
                    previous_index = index,
                    index = bar.index,
                    %timestamp,
                    bar_timestamp = %bar.timestamp,
                    "bar delivered out of order"
                );
            }
        }
        self.last_seen = Some((bar.index, bar.timestamp));
        self.study.map(event)
    }
}

impl std::fmt::Debug for StudyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyEngine")
            .field("study", &self.study.manifest().name)
            .field("last_seen", &self.last_seen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeltaGridConfig;
    use crate::render::GraphicsItem;
    use crate::studies::test_support::{event, ts};
    use crate::studies::DeltaGrid;

    fn cumulative_text(output: &StudyOutput, index: usize) -> String {
        let key = format!("cdelta_{index}");
        match output.graphics.as_ref().and_then(|g| g.find(&key)) {
            Some(GraphicsItem::Text { text, .. }) => text.clone(),
            other => panic!("expected {key}, got {other:?}"),
        }
    }

    #[test]
    fn redraw_is_repeatable() {
        let mut engine =
            StudyEngine::new(Box::new(DeltaGrid::new(DeltaGridConfig::default()).unwrap()));
        let bars = vec![
            event(0, ts(4, 9), 1.0, 4.0),
            event(1, ts(4, 10), 2.0, 5.0),
            event(2, ts(4, 11), 6.0, 1.0),
        ];
        let first = engine.redraw(&bars);
        let second = engine.redraw(&bars);
        assert_eq!(first, second);
        assert_eq!(cumulative_text(&first[2], 2), "1");
    }

    #[test]
    fn on_bar_continues_after_redraw() {
        let mut engine =
            StudyEngine::new(Box::new(DeltaGrid::new(DeltaGridConfig::default()).unwrap()));
        engine.redraw(&[event(0, ts(4, 9), 1.0, 4.0)]);
        let live = engine.on_bar(&event(1, ts(4, 10), 0.0, 2.0));
        assert_eq!(cumulative_text(&live, 1), "5");
    }

    #[test]
    fn out_of_order_bar_is_still_mapped() {
        let mut engine =
            StudyEngine::new(Box::new(DeltaGrid::new(DeltaGridConfig::default()).unwrap()));
        engine.on_bar(&event(5, ts(4, 10), 0.0, 1.0));
        let output = engine.on_bar(&event(4, ts(4, 9), 0.0, 1.0));
        assert!(!output.is_empty());
    }
}
