//! Session clock: start of the currently active trading session.
//!
//! Sessions open at a configured local hour (17:00 for the CME Globex day).
//! The boundary is derived from the wall clock on every call so a long-running
//! host rolls into the next session without a restart.

use chrono::{Days, Local, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Source of "now" in the host's local time.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant, for replays and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Local hour-of-day at which a session opens, in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionOpenHour(u32);

impl SessionOpenHour {
    /// CME Globex open in Central time.
    pub const GLOBEX: SessionOpenHour = SessionOpenHour(17);

    pub fn new(hour: u32) -> Result<Self, ConfigError> {
        if hour > 23 {
            return Err(ConfigError::OutOfRange {
                field: "session_open_hour",
                value: f64::from(hour),
                min: 0.0,
                max: 23.0,
            });
        }
        Ok(Self(hour))
    }

    pub fn hour(self) -> u32 {
        self.0
    }
}

impl Default for SessionOpenHour {
    fn default() -> Self {
        Self::GLOBEX
    }
}

impl TryFrom<u32> for SessionOpenHour {
    type Error = ConfigError;

    fn try_from(hour: u32) -> Result<Self, Self::Error> {
        Self::new(hour)
    }
}

impl From<SessionOpenHour> for u32 {
    fn from(hour: SessionOpenHour) -> Self {
        hour.0
    }
}

/// Session start relative to a given local instant.
///
/// If `now` is before the open hour the session opened on the previous
/// calendar day. `now.hour() == open_hour` counts as already open.
pub fn session_start_at(now: NaiveDateTime, open_hour: SessionOpenHour) -> NaiveDateTime {
    let mut date = now.date();
    if now.hour() < open_hour.hour() {
        date = date.checked_sub_days(Days::new(1)).unwrap_or(date);
    }
    let open = NaiveTime::from_hms_opt(open_hour.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(open)
}

/// Session start for the clock's current time. Never cached.
pub fn current_session_start(clock: &dyn Clock, open_hour: SessionOpenHour) -> NaiveDateTime {
    session_start_at(clock.now(), open_hour)
}
