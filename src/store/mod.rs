//! Storage collaborator boundary.
//!
//! The planner and the conflict resolver never talk to a database
//! directly. They consume the traits below; adapters translate the
//! storage representation (activity rows carrying a direct moderator
//! assignment, separate application rows) into [`ApplicationStatus`]
//! via [`resolve_status`].
//!
//! # Atomicity
//!
//! Checking for a conflict and then inserting an application is a
//! check-then-act sequence. [`CommitmentStore::with_moderator`] is the
//! serialization point: implementations must run `op` exclusively per
//! moderator and commit the writes it staged only if it returns `Ok`.
//!
//! [`ApplicationStatus`]: crate::models::ApplicationStatus

mod memory;
mod records;

use chrono::NaiveDate;
use std::sync::Arc;

pub use crate::error::StoreError;
use crate::models::{ActivityPlacement, ModeratorCommitment};
pub use memory::InMemoryStore;
pub use records::{resolve_status, ActivityRecord, ApplicationRowStatus};

/// Read access to the activities already placed in an event day.
pub trait PlacementSource {
    /// Lists the activities of `event_id` taking place on `date`.
    ///
    /// Order is unspecified; the planner sorts.
    fn list_placements(
        &self,
        event_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivityPlacement>, StoreError>;
}

/// Narrows a moderator's board. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// Only activities of this event.
    pub event_id: Option<String>,
    /// Only activities of this programme direction.
    pub direction: Option<String>,
}

impl BoardFilter {
    /// Filter matching every activity.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching the activities of one event.
    pub fn for_event(event_id: impl Into<String>) -> Self {
        Self {
            event_id: Some(event_id.into()),
            direction: None,
        }
    }

    /// Restricts the filter to one programme direction.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Whether `activity` passes the filter.
    pub fn matches(&self, activity: &ActivityRecord) -> bool {
        self.event_id
            .as_deref()
            .map_or(true, |event| activity.event_id == event)
            && self
                .direction
                .as_deref()
                .map_or(true, |direction| activity.direction.as_deref() == Some(direction))
    }
}

/// One moderator's applications, seen inside an exclusive scope.
pub trait ModeratorLedger {
    /// Every activity passing `filter` with this moderator's status
    /// toward it, ordered by date then start time.
    fn board(&self, filter: &BoardFilter) -> Result<Vec<ModeratorCommitment>, StoreError>;

    /// A single activity with this moderator's status toward it.
    fn find_activity(&self, activity_id: &str) -> Result<Option<ModeratorCommitment>, StoreError>;

    /// Activities this moderator is committed to (`Sent` or `Approved`).
    fn list_commitments(&self) -> Result<Vec<ModeratorCommitment>, StoreError> {
        Ok(self
            .board(&BoardFilter::all())?
            .into_iter()
            .filter(|c| c.status.is_commitment())
            .collect())
    }

    /// Stages a new pending application for `activity_id`.
    fn insert_application(&mut self, activity_id: &str) -> Result<(), StoreError>;

    /// Stages removal of every pending application of this moderator.
    ///
    /// Approved applications and direct assignments are untouched.
    /// Returns the number of applications removed.
    fn delete_all_pending(&mut self) -> Result<usize, StoreError>;
}

/// Per-moderator transactional access to applications.
pub trait CommitmentStore {
    /// Runs `op` in an exclusive scope for `moderator_id`.
    ///
    /// Concurrent scopes for the same moderator are serialized. Writes
    /// staged through the ledger are committed atomically when `op`
    /// returns `Ok`, and discarded when it returns `Err`.
    fn with_moderator<R, E, F>(&self, moderator_id: &str, op: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn ModeratorLedger) -> Result<R, E>,
        E: From<StoreError>;
}

impl<S: CommitmentStore> CommitmentStore for &S {
    fn with_moderator<R, E, F>(&self, moderator_id: &str, op: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn ModeratorLedger) -> Result<R, E>,
        E: From<StoreError>,
    {
        (**self).with_moderator(moderator_id, op)
    }
}

impl<S: CommitmentStore> CommitmentStore for Arc<S> {
    fn with_moderator<R, E, F>(&self, moderator_id: &str, op: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn ModeratorLedger) -> Result<R, E>,
        E: From<StoreError>,
    {
        (**self).with_moderator(moderator_id, op)
    }
}

impl<P: PlacementSource> PlacementSource for Arc<P> {
    fn list_placements(
        &self,
        event_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivityPlacement>, StoreError> {
        (**self).list_placements(event_id, date)
    }
}
