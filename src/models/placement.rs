//! Activity placements within a single event day.
//!
//! An event day is the unit the slot planner works on: the event's
//! opening hours plus the activities already placed in them.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// An already-scheduled activity inside one event day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPlacement {
    /// Activity identifier.
    pub id: String,
    /// Occupied time of day.
    pub window: TimeWindow,
}

impl ActivityPlacement {
    /// Creates a new placement.
    pub fn new(id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            id: id.into(),
            window,
        }
    }
}

/// An event's time window and the activities already placed in it.
///
/// Placements may arrive in any order; consumers that need them ordered
/// use [`EventDay::sorted_placements`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDay {
    /// Event opening hours. `None` while the organizer has not set them.
    pub event_window: Option<TimeWindow>,
    /// Activities already placed on this day.
    pub placements: Vec<ActivityPlacement>,
}

impl EventDay {
    /// Creates an event day with the given opening hours and no placements.
    pub fn new(event_window: TimeWindow) -> Self {
        Self {
            event_window: Some(event_window),
            placements: Vec::new(),
        }
    }

    /// Creates an event day whose opening hours are not known yet.
    pub fn unscheduled() -> Self {
        Self::default()
    }

    /// Adds a placement.
    pub fn with_placement(mut self, placement: ActivityPlacement) -> Self {
        self.placements.push(placement);
        self
    }

    /// Adds several placements.
    pub fn with_placements(
        mut self,
        placements: impl IntoIterator<Item = ActivityPlacement>,
    ) -> Self {
        self.placements.extend(placements);
        self
    }

    /// Placements ordered by start time (stable for equal starts).
    pub fn sorted_placements(&self) -> Vec<&ActivityPlacement> {
        let mut sorted: Vec<&ActivityPlacement> = self.placements.iter().collect();
        sorted.sort_by_key(|p| p.window.start);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_placements() {
        let day = EventDay::new(TimeWindow::from_hm((9, 0), (18, 0)).unwrap())
            .with_placement(ActivityPlacement::new(
                "late",
                TimeWindow::from_hm((15, 0), (16, 30)).unwrap(),
            ))
            .with_placement(ActivityPlacement::new(
                "early",
                TimeWindow::from_hm((9, 0), (10, 30)).unwrap(),
            ));

        let ids: Vec<&str> = day.sorted_placements().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        // Input order untouched
        assert_eq!(day.placements[0].id, "late");
    }

    #[test]
    fn test_unscheduled_day() {
        let day = EventDay::unscheduled();
        assert!(day.event_window.is_none());
        assert!(day.placements.is_empty());
    }
}
