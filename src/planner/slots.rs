//! Free-slot enumeration.
//!
//! # Complexity
//! O(p log p + w / g) where p=placements, w=event window length,
//! g=granularity.

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::debug;

use super::SlotPolicy;
use crate::models::{add_within_day, ActivityPlacement, EventDay, TimeWindow};
use crate::store::{PlacementSource, StoreError};

/// Enumerates legal start times for a new activity.
///
/// Returns every start `t` such that `[t, t + duration)` lies inside
/// `event_window` and ends no later than the start of the next
/// placement. After each placement the search resumes at
/// `placement.end + granularity`, so a new activity never starts
/// directly on the heels of an existing one.
///
/// Degenerate input never fails; it produces an empty list:
/// - `event_window` is `None` or empty
/// - `duration` or `granularity` is not positive
/// - `duration` exceeds the window
///
/// Placements are sorted internally. Overlapping placements or
/// placements outside the window are not rejected; they only shrink
/// the result. The cursor never moves backwards, so the output is
/// strictly ascending.
pub fn plan_slots(
    event_window: Option<&TimeWindow>,
    placements: &[ActivityPlacement],
    duration: Duration,
    granularity: Duration,
) -> Vec<NaiveTime> {
    let Some(window) = event_window else {
        return Vec::new();
    };
    if !window.is_valid()
        || duration <= Duration::zero()
        || granularity <= Duration::zero()
        || duration > window.duration()
    {
        return Vec::new();
    }

    let mut sorted: Vec<&ActivityPlacement> = placements.iter().collect();
    sorted.sort_by_key(|p| p.window.start);

    let mut slots = Vec::new();
    let mut cursor = Some(window.start);

    for placement in sorted {
        while let Some(start) = cursor {
            let Some(end) = add_within_day(start, duration) else {
                cursor = None;
                break;
            };
            if end > placement.window.start {
                break;
            }
            if end <= window.end {
                slots.push(start);
            }
            cursor = add_within_day(start, granularity);
        }

        // One granularity step of buffer after every placement.
        let resume = add_within_day(placement.window.end, granularity);
        cursor = match (cursor, resume) {
            (Some(current), Some(resume)) => Some(current.max(resume)),
            _ => None,
        };
    }

    while let Some(start) = cursor {
        match add_within_day(start, duration) {
            Some(end) if end <= window.end => slots.push(start),
            _ => break,
        }
        cursor = add_within_day(start, granularity);
    }

    slots
}

/// Slot planner bound to a [`SlotPolicy`].
///
/// # Example
///
/// ```
/// use conf_schedule::models::{ActivityPlacement, EventDay, TimeWindow};
/// use conf_schedule::planner::SlotPlanner;
///
/// let day = EventDay::new(TimeWindow::from_hm((9, 0), (14, 0)).unwrap())
///     .with_placement(ActivityPlacement::new(
///         "keynote",
///         TimeWindow::from_hm((9, 0), (10, 30)).unwrap(),
///     ));
///
/// let slots = SlotPlanner::new().plan(&day);
/// // First start is one 15-minute step after the keynote ends.
/// assert_eq!(slots.first().map(|t| t.to_string()), Some("10:45:00".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotPlanner {
    policy: SlotPolicy,
}

impl SlotPlanner {
    /// Creates a planner with the default 90/15 minute policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active policy.
    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    /// Plans start times for an event day.
    pub fn plan(&self, day: &EventDay) -> Vec<NaiveTime> {
        let slots = plan_slots(
            day.event_window.as_ref(),
            &day.placements,
            self.policy.duration(),
            self.policy.granularity(),
        );
        debug!(
            placements = day.placements.len(),
            slots = slots.len(),
            "planned activity slots"
        );
        slots
    }

    /// Loads an event day's placements from storage and plans it.
    ///
    /// Storage errors propagate unchanged.
    pub fn plan_event<P>(
        &self,
        source: &P,
        event_id: &str,
        date: NaiveDate,
        event_window: Option<TimeWindow>,
    ) -> Result<Vec<NaiveTime>, StoreError>
    where
        P: PlacementSource + ?Sized,
    {
        let placements = source.list_placements(event_id, date)?;
        let day = EventDay {
            event_window,
            placements,
        };
        Ok(self.plan(&day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn w(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
        TimeWindow::from_hm(start, end).unwrap()
    }

    fn plan(window: Option<TimeWindow>, placements: &[ActivityPlacement]) -> Vec<NaiveTime> {
        plan_slots(
            window.as_ref(),
            placements,
            Duration::minutes(90),
            Duration::minutes(15),
        )
    }

    #[test]
    fn test_empty_day_fills_window() {
        let slots = plan(Some(w((9, 0), (12, 0))), &[]);
        assert_eq!(
            slots,
            vec![t(9, 0), t(9, 15), t(9, 30), t(9, 45), t(10, 0), t(10, 15), t(10, 30)]
        );
    }

    #[test]
    fn test_interior_placement_exhausts_short_window() {
        let placements = [ActivityPlacement::new("A1", w((10, 0), (10, 30)))];
        assert!(plan(Some(w((9, 0), (12, 0))), &placements).is_empty());
    }

    #[test]
    fn test_slot_may_end_at_placement_start() {
        let placements = [ActivityPlacement::new("A1", w((10, 30), (12, 0)))];
        let slots = plan(Some(w((9, 0), (12, 0))), &placements);
        assert_eq!(slots, vec![t(9, 0)]);
    }

    #[test]
    fn test_buffer_after_placement() {
        let placements = [ActivityPlacement::new("A1", w((9, 0), (10, 30)))];
        let slots = plan(Some(w((9, 0), (13, 0))), &placements);
        // Resumes at 10:45, not 10:30
        assert_eq!(slots, vec![t(10, 45), t(11, 0), t(11, 15), t(11, 30)]);
    }

    #[test]
    fn test_gap_between_placements() {
        let placements = [
            ActivityPlacement::new("B", w((13, 0), (14, 30))),
            ActivityPlacement::new("A", w((9, 0), (10, 30))),
        ];
        let slots = plan(Some(w((9, 0), (16, 0))), &placements);
        assert_eq!(
            slots,
            vec![
                t(10, 45),
                t(11, 0),
                t(11, 15),
                t(11, 30),
                // after B: 14:45 -> 16:15 does not fit
            ]
        );
    }

    #[test]
    fn test_missing_window_is_empty() {
        assert!(plan(None, &[]).is_empty());
    }

    #[test]
    fn test_invalid_inputs_are_empty() {
        let inverted = TimeWindow::new(t(12, 0), t(9, 0));
        assert!(plan(Some(inverted), &[]).is_empty());
        // Window shorter than one activity
        assert!(plan(Some(w((9, 0), (10, 0))), &[]).is_empty());

        let window = w((9, 0), (12, 0));
        assert!(plan_slots(Some(&window), &[], Duration::zero(), Duration::minutes(15)).is_empty());
        assert!(plan_slots(Some(&window), &[], Duration::minutes(90), Duration::zero()).is_empty());
    }

    #[test]
    fn test_window_exactly_one_activity() {
        assert_eq!(plan(Some(w((9, 0), (10, 30))), &[]), vec![t(9, 0)]);
    }

    #[test]
    fn test_late_window_does_not_wrap() {
        let slots = plan(Some(w((21, 0), (23, 45))), &[]);
        assert_eq!(slots.first(), Some(&t(21, 0)));
        assert_eq!(slots.last(), Some(&t(22, 15)));
    }

    #[test]
    fn test_placement_before_window_never_rewinds() {
        let placements = [ActivityPlacement::new("early", w((6, 0), (7, 0)))];
        let slots = plan(Some(w((9, 0), (11, 0))), &placements);
        assert_eq!(slots, vec![t(9, 0), t(9, 15), t(9, 30)]);
    }

    #[test]
    fn test_overlapping_placements_stay_ordered() {
        let placements = [
            ActivityPlacement::new("A", w((10, 0), (13, 0))),
            ActivityPlacement::new("B", w((11, 0), (12, 0))),
        ];
        let slots = plan(Some(w((8, 0), (16, 0))), &placements);
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(slots.first(), Some(&t(8, 0)));
        assert_eq!(slots.iter().find(|s| **s > t(10, 0)), Some(&t(13, 15)));
    }

    #[test]
    fn test_planner_uses_policy() {
        let day = EventDay::new(w((9, 0), (11, 0)));
        let planner = SlotPlanner::new().with_policy(SlotPolicy::new(60, 30));
        assert_eq!(planner.plan(&day), vec![t(9, 0), t(9, 30), t(10, 0)]);
    }
}
