//! Time-of-day windows and interval arithmetic.
//!
//! Every activity and event in a conference day is described by a
//! half-open window `[start, end)` of wall-clock time. Windows never
//! cross midnight: arithmetic that would wrap past the end of the day
//! yields `None` instead of silently rolling over.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// A time-of-day interval [start, end).
///
/// Half-open interval: includes start, excludes end. A window is valid
/// iff `start < end`; [`TimeWindow::try_new`] enforces this, while
/// [`TimeWindow::new`] accepts whatever storage handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveTime,
    /// Interval end (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window without checking `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a window, returning `None` unless `start < end`.
    pub fn try_new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Creates a window from `hh:mm` pairs.
    ///
    /// Returns `None` for out-of-range components or an empty window.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start.0, start.1, 0)?;
        let end = NaiveTime::from_hms_opt(end.0, end.1, 0)?;
        Self::try_new(start, end)
    }

    /// Creates a window of `length` starting at `start`.
    ///
    /// Returns `None` if the window would cross midnight or is empty.
    pub fn starting_at(start: NaiveTime, length: Duration) -> Option<Self> {
        let end = add_within_day(start, length)?;
        Self::try_new(start, end)
    }

    /// Whether `start < end`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `other` lies entirely inside this window.
    pub fn encloses(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether two windows share no instant.
    ///
    /// `[s1, e1)` and `[s2, e2)` are disjoint iff `e1 <= s2 || e2 <= s1`.
    /// Touching windows (one ends where the other starts) are disjoint.
    #[inline]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.end <= other.start || other.end <= self.start
    }

    /// Whether two windows overlap (negation of [`is_disjoint`](Self::is_disjoint)).
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_disjoint(other)
    }
}

/// Adds `delta` to a time of day without wrapping past midnight.
///
/// Returns `None` when the result would land on the following day
/// (or, for negative deltas, the previous one).
pub fn add_within_day(time: NaiveTime, delta: Duration) -> Option<NaiveTime> {
    let (result, wrapped_secs) = time.overflowing_add_signed(delta);
    (wrapped_secs == 0).then_some(result)
}
