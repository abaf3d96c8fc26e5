//! Activity duration and slot granularity policy.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{add_within_day, TimeWindow};

/// Default length of a conference activity (minutes).
pub const DEFAULT_DURATION_MINUTES: i64 = 90;

/// Default step between candidate start times (minutes).
pub const DEFAULT_GRANULARITY_MINUTES: i64 = 15;

/// Fixed activity length and start-time quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPolicy {
    /// Length of every new activity (minutes).
    pub duration_minutes: i64,
    /// Step between candidate start times (minutes).
    pub granularity_minutes: i64,
}

impl SlotPolicy {
    /// Creates a policy.
    pub fn new(duration_minutes: i64, granularity_minutes: i64) -> Self {
        Self {
            duration_minutes,
            granularity_minutes,
        }
    }

    /// Activity length.
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }

    /// Start-time step.
    #[inline]
    pub fn granularity(&self) -> Duration {
        Duration::minutes(self.granularity_minutes)
    }

    /// End time of a new activity starting at `start`.
    ///
    /// Returns `None` if it would run past midnight.
    pub fn end_for(&self, start: NaiveTime) -> Option<NaiveTime> {
        add_within_day(start, self.duration())
    }

    /// Window a new activity starting at `start` would occupy.
    pub fn window_for(&self, start: NaiveTime) -> Option<TimeWindow> {
        TimeWindow::starting_at(start, self.duration())
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MINUTES, DEFAULT_GRANULARITY_MINUTES)
    }
}
