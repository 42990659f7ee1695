//! DeltaLab Core: per-bar volume/delta studies for a host charting runtime.
//!
//! This crate contains everything a chart host needs to turn a stream of bars
//! into declarative graphics:
//! - Domain types (bars, volume-profile levels, bar events)
//! - Session clock (start of the active trading session from wall-clock time)
//! - Delta aggregator with daily session-key resets
//! - Point-of-control reduction over a bar's volume profile
//! - Mixed data/pixel coordinate expressions and the graphics model
//! - Three studies (delta grid, candle delta labels, POC boxes) and the engine
//!   that drives them through a host redraw pass

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod engine;
pub mod render;
pub mod session;
pub mod studies;
pub mod volume_profile;

pub use aggregator::{day_key, process_bar, AggregatorState, DayKey, DeltaStep};
pub use config::{ConfigError, StudyConfig};
pub use domain::{Bar, BarEvent, VolumeProfile, VolumeProfileLevel};
pub use engine::StudyEngine;
pub use session::{current_session_start, Clock, FixedClock, SessionOpenHour, SystemClock};
pub use studies::{Study, StudyManifest, StudyOutput};
pub use volume_profile::find_point_of_control;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: studies and their inputs can move to a worker thread.
    ///
    /// Hosts drive a study from whichever thread owns the chart; a study that
    /// stops being `Send` breaks that hand-off, so the build should fail here.
    #[allow(dead_code)]
    fn assert_send() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarEvent>();
        require_sync::<domain::BarEvent>();
        require_send::<AggregatorState>();
        require_send::<StudyOutput>();
        require_sync::<StudyOutput>();

        require_send::<studies::DeltaGrid>();
        require_send::<studies::CandleDelta>();
        require_send::<studies::PointOfControl>();
        require_send::<Box<dyn Study>>();
        require_send::<StudyEngine>();
    }
}
