//! Overlap detection over a moderator's commitments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ApplicationStatus, ModeratorCommitment, TimeWindow};

/// Result of checking a candidate window against a moderator's commitments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Whether any commitment collides.
    pub conflict: bool,
    /// The colliding commitments, in the order storage returned them.
    pub conflicting: Vec<ModeratorCommitment>,
}

impl ConflictReport {
    /// Builds a report from the colliding commitments.
    pub fn from_conflicts(conflicting: Vec<ModeratorCommitment>) -> Self {
        Self {
            conflict: !conflicting.is_empty(),
            conflicting,
        }
    }

    /// Whether an approved commitment is among the collisions.
    ///
    /// Such a conflict cannot be resolved by cancelling pending applications.
    pub fn has_approved(&self) -> bool {
        self.conflicting
            .iter()
            .any(|c| c.status == ApplicationStatus::Approved)
    }

    /// Collisions that are still pending.
    pub fn pending(&self) -> impl Iterator<Item = &ModeratorCommitment> {
        self.conflicting
            .iter()
            .filter(|c| c.status == ApplicationStatus::Sent)
    }
}

/// Commitments that collide with `window` on `date`.
///
/// Only `Sent` and `Approved` commitments on the same date count.
pub fn find_conflicts<'a, I>(commitments: I, date: NaiveDate, window: &TimeWindow) -> ConflictReport
where
    I: IntoIterator<Item = &'a ModeratorCommitment>,
{
    let conflicting = commitments
        .into_iter()
        .filter(|c| c.collides_with(date, window))
        .cloned()
        .collect();
    ConflictReport::from_conflicts(conflicting)
}
