//! Storage-side records and the status adapter.
//!
//! Storage keeps two representations of "this moderator runs this
//! activity": a moderator id written directly on the activity row, and
//! an application row with its own status. Both collapse into a single
//! [`ApplicationStatus`] here, before the resolver sees anything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ActivityPlacement, ApplicationStatus, ModeratorCommitment, TimeWindow};

/// Status column of an application row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationRowStatus {
    Sent,
    Approved,
    /// Declined by the organizer; occupies no time.
    Rejected,
}

/// An activity as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Activity identifier.
    pub id: String,
    /// Owning event.
    pub event_id: String,
    /// Calendar date of the activity.
    pub date: NaiveDate,
    /// Time of day occupied.
    pub window: TimeWindow,
    /// Moderator assigned directly by the organizer, if any.
    pub moderator_id: Option<String>,
    /// Programme direction (track) the activity belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl ActivityRecord {
    /// Creates an activity without a direct moderator.
    pub fn new(
        id: impl Into<String>,
        event_id: impl Into<String>,
        date: NaiveDate,
        window: TimeWindow,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            date,
            window,
            moderator_id: None,
            direction: None,
        }
    }

    /// Sets the directly assigned moderator.
    pub fn with_moderator(mut self, moderator_id: impl Into<String>) -> Self {
        self.moderator_id = Some(moderator_id.into());
        self
    }

    /// Sets the programme direction.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Placement view for slot planning.
    pub fn placement(&self) -> ActivityPlacement {
        ActivityPlacement::new(self.id.clone(), self.window)
    }

    /// The moderator's view of this activity given their application row.
    pub fn commitment_for(
        &self,
        moderator_id: &str,
        row: Option<ApplicationRowStatus>,
    ) -> ModeratorCommitment {
        ModeratorCommitment::new(
            self.id.clone(),
            self.event_id.clone(),
            self.date,
            self.window,
            resolve_status(self, moderator_id, row),
        )
    }
}

/// Collapses the two storage representations into one status.
///
/// A direct assignment wins over any application row.
pub fn resolve_status(
    activity: &ActivityRecord,
    moderator_id: &str,
    row: Option<ApplicationRowStatus>,
) -> ApplicationStatus {
    if activity.moderator_id.as_deref() == Some(moderator_id) {
        return ApplicationStatus::Approved;
    }
    match row {
        Some(ApplicationRowStatus::Sent) => ApplicationStatus::Sent,
        Some(ApplicationRowStatus::Approved) => ApplicationStatus::Approved,
        Some(ApplicationRowStatus::Rejected) | None => ApplicationStatus::Available,
    }
}
