//! Moderator application status and commitments.
//!
//! # Status Model
//!
//! Each (activity, moderator) pairing is in exactly one state:
//!
//! | Status | Meaning |
//! |--------|---------|
//! | `Available` | no application and no direct assignment |
//! | `Sent` | moderator applied, organizer has not confirmed |
//! | `Approved` | organizer confirmed, or assigned the moderator directly |
//!
//! ```text
//! AVAILABLE --apply--> SENT --organizer approves--> APPROVED
//!     ^                  |
//!     +-----cancel-------+
//! ```
//!
//! `Approved` is terminal here: only an organizer can revoke it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// State of one (moderator, activity) pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// No relationship yet.
    #[default]
    Available,
    /// Pending self-application.
    Sent,
    /// Confirmed application or direct assignment.
    Approved,
}

impl ApplicationStatus {
    /// Whether this status occupies the moderator's time.
    #[inline]
    pub fn is_commitment(self) -> bool {
        matches!(self, Self::Sent | Self::Approved)
    }

    /// Whether a moderator may submit an application from this status.
    #[inline]
    pub fn can_submit(self) -> bool {
        self == Self::Available
    }
}

/// A moderator's view of one activity, across all events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorCommitment {
    /// Activity identifier.
    pub activity_id: String,
    /// Owning event identifier.
    pub event_id: String,
    /// Calendar date the activity takes place on.
    pub date: NaiveDate,
    /// Time of day occupied by the activity.
    pub window: TimeWindow,
    /// The moderator's status toward this activity.
    pub status: ApplicationStatus,
}

impl ModeratorCommitment {
    /// Creates a new commitment.
    pub fn new(
        activity_id: impl Into<String>,
        event_id: impl Into<String>,
        date: NaiveDate,
        window: TimeWindow,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            activity_id: activity_id.into(),
            event_id: event_id.into(),
            date,
            window,
            status,
        }
    }

    /// Whether this commitment collides with `window` on `date`.
    ///
    /// Only `Sent` and `Approved` commitments collide; commitments on
    /// different dates never do.
    pub fn collides_with(&self, date: NaiveDate, window: &TimeWindow) -> bool {
        self.status.is_commitment() && self.date == date && self.window.overlaps(window)
    }
}
