//! Delta aggregator: running session-cumulative delta with daily resets.
//!
//! The state is an explicit value owned by one study and passed by `&mut`
//! into [`process_bar`]; nothing is shared between studies.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Bar;

/// Calendar-day identity of a bar's local timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Default key function: the calendar day of the timestamp.
pub fn day_key(timestamp: NaiveDateTime) -> DayKey {
    DayKey {
        year: timestamp.year(),
        month: timestamp.month(),
        day: timestamp.day(),
    }
}

/// Running state of one aggregator.
///
/// Starts with no session key and zero cumulative delta.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorState<K = DayKey> {
    session_key: Option<K>,
    cumulative_delta: f64,
}

impl<K> AggregatorState<K> {
    pub fn new() -> Self {
        Self {
            session_key: None,
            cumulative_delta: 0.0,
        }
    }

    pub fn session_key(&self) -> Option<&K> {
        self.session_key.as_ref()
    }

    pub fn cumulative_delta(&self) -> f64 {
        self.cumulative_delta
    }
}

impl<K> Default for AggregatorState<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of folding one bar into the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaStep {
    pub bar_delta: f64,
    pub cumulative_delta: f64,
    /// True when this bar opened a new session key.
    pub session_reset: bool,
}

/// Fold one bar into `state`.
///
/// When the bar's key differs from the stored key (or none is stored yet) the
/// cumulative delta restarts at zero before this bar's delta is added, so the
/// first bar of a session reports its own delta as the cumulative value.
pub fn process_bar<K, F>(state: &mut AggregatorState<K>, bar: &Bar, key_fn: F) -> DeltaStep
where
    K: PartialEq + fmt::Debug,
    F: FnOnce(NaiveDateTime) -> K,
{
    let key = key_fn(bar.timestamp);
    let session_reset = state.session_key.as_ref() != Some(&key);
    if session_reset {
        tracing::debug!(
            bar = bar.index,
            previous = ?state.session_key,
            next = ?key,
            "session key changed, cumulative delta reset"
        );
        state.cumulative_delta = 0.0;
        state.session_key = Some(key);
    }

    let bar_delta = bar.delta();
    state.cumulative_delta += bar_delta;

    DeltaStep {
        bar_delta,
        cumulative_delta: state.cumulative_delta,
        session_reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(index: usize, day: u32, hour: u32, bid: f64, offer: f64) -> Bar {
        Bar {
            index,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            high: 100.0,
            volume: bid + offer,
            bid_volume: bid,
            offer_volume: offer,
        }
    }

    #[test]
    fn first_bar_starts_a_session() {
        let mut state = AggregatorState::new();
        let step = process_bar(&mut state, &bar(0, 4, 9, 10.0, 25.0), day_key);
        assert!(step.session_reset);
        assert_eq!(step.bar_delta, 15.0);
        assert_eq!(step.cumulative_delta, 15.0);
        assert_eq!(
            state.session_key(),
            Some(&DayKey {
                year: 2024,
                month: 3,
                day: 4
            })
        );
    }

    #[test]
    fn accumulates_within_a_day() {
        let mut state = AggregatorState::new();
        process_bar(&mut state, &bar(0, 4, 9, 10.0, 25.0), day_key);
        let step = process_bar(&mut state, &bar(1, 4, 10, 40.0, 5.0), day_key);
        assert!(!step.session_reset);
        assert_eq!(step.bar_delta, -35.0);
        assert_eq!(step.cumulative_delta, -20.0);
    }

    #[test]
    fn new_day_resets_then_accumulates() {
        let mut state = AggregatorState::new();
        process_bar(&mut state, &bar(0, 4, 22, 10.0, 25.0), day_key);
        process_bar(&mut state, &bar(1, 4, 23, 10.0, 25.0), day_key);
        let step = process_bar(&mut state, &bar(2, 5, 0, 7.0, 4.0), day_key);
        assert!(step.session_reset);
        assert_eq!(step.cumulative_delta, -3.0);
        assert_eq!(state.cumulative_delta(), -3.0);
    }

    #[test]
    fn custom_key_function() {
        // Constant key: never resets after the first bar.
        let mut state: AggregatorState<u8> = AggregatorState::new();
        process_bar(&mut state, &bar(0, 4, 9, 0.0, 1.0), |_| 0u8);
        let step = process_bar(&mut state, &bar(1, 9, 9, 0.0, 1.0), |_| 0u8);
        assert!(!step.session_reset);
        assert_eq!(step.cumulative_delta, 2.0);
    }

    #[test]
    fn day_key_display() {
        let key = day_key(
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(1, 2, 3)
                .unwrap(),
        );
        assert_eq!(key.to_string(), "2024-03-05");
    }
}
