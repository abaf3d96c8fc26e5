//! Application gatekeeping for moderators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{find_conflicts, ConflictReport};
use crate::error::{Result, StoreError};
use crate::models::{ApplicationStatus, ModeratorCommitment, TimeWindow};
use crate::store::{BoardFilter, CommitmentStore};

/// Operator's answer to a detected conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// No decision yet; a conflict is reported back for the operator.
    #[default]
    None,
    /// Withdraw every pending application of the moderator, then submit.
    CancelPendingAndProceed,
    /// Leave everything as it is and drop the new application.
    AbortSubmission,
}

/// What happened to a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// A pending application was stored.
    Submitted {
        /// Pending applications withdrawn to make room.
        cancelled_pending: usize,
    },
    /// The moderator already runs this activity.
    AlreadyApproved,
    /// The moderator's application is already awaiting confirmation.
    AlreadyPending,
    /// Overlaps pending applications only; the operator must choose.
    ConflictDetected(ConflictReport),
    /// Overlaps an approved commitment; cannot proceed.
    BlockedByApproved(ConflictReport),
    /// The operator declined to resolve the conflict.
    Aborted,
}

impl SubmissionOutcome {
    /// Whether a new application was stored.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

/// Decides whether a moderator's application may be stored.
///
/// Each operation runs inside one [`CommitmentStore::with_moderator`]
/// scope, so the conflict check and the writes that follow it cannot
/// interleave with another submission by the same moderator.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use conf_schedule::conflict::{ConflictResolver, Resolution, SubmissionOutcome};
/// use conf_schedule::models::TimeWindow;
/// use conf_schedule::store::{ActivityRecord, InMemoryStore};
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
/// let store = InMemoryStore::new().with_activity(ActivityRecord::new(
///     "A1",
///     "E1",
///     date,
///     TimeWindow::from_hm((10, 0), (11, 30)).unwrap(),
/// ));
///
/// let resolver = ConflictResolver::new(&store);
/// let outcome = resolver.submit_application("A1", "M1", Resolution::None).unwrap();
/// assert_eq!(outcome, SubmissionOutcome::Submitted { cancelled_pending: 0 });
/// ```
#[derive(Debug, Clone)]
pub struct ConflictResolver<S> {
    store: S,
}

impl<S: CommitmentStore> ConflictResolver<S> {
    /// Creates a resolver over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Checks `window` on `date` against the moderator's commitments.
    pub fn check_conflict(
        &self,
        moderator_id: &str,
        date: NaiveDate,
        window: &TimeWindow,
    ) -> Result<ConflictReport> {
        self.store.with_moderator(moderator_id, |ledger| -> Result<ConflictReport> {
            let commitments = ledger.list_commitments()?;
            Ok(find_conflicts(&commitments, date, window))
        })
    }

    /// Attempts to move the pairing from `Available` to `Sent`.
    ///
    /// With `CancelPendingAndProceed`, every pending application of the
    /// moderator (on any date, in any event) is withdrawn before the new
    /// one is stored. Both writes commit together or not at all.
    /// Approved commitments are never withdrawn; a collision with one
    /// blocks the submission whatever the resolution.
    ///
    /// # Errors
    /// [`StoreError::UnknownActivity`] if the activity does not exist;
    /// any other storage failure unchanged.
    pub fn submit_application(
        &self,
        activity_id: &str,
        moderator_id: &str,
        resolution: Resolution,
    ) -> Result<SubmissionOutcome> {
        self.store.with_moderator(moderator_id, |ledger| -> Result<SubmissionOutcome> {
            let activity = ledger
                .find_activity(activity_id)?
                .ok_or_else(|| StoreError::UnknownActivity {
                    activity_id: activity_id.to_string(),
                })?;

            if !activity.status.can_submit() {
                return Ok(match activity.status {
                    ApplicationStatus::Approved => SubmissionOutcome::AlreadyApproved,
                    _ => SubmissionOutcome::AlreadyPending,
                });
            }

            let commitments = ledger.list_commitments()?;
            let report = find_conflicts(&commitments, activity.date, &activity.window);

            let mut cancelled_pending = 0;
            if report.conflict {
                debug!(
                    activity_id,
                    moderator_id,
                    conflicts = report.conflicting.len(),
                    ?resolution,
                    "application collides with existing commitments"
                );
                match resolution {
                    Resolution::AbortSubmission => return Ok(SubmissionOutcome::Aborted),
                    _ if report.has_approved() => {
                        warn!(
                            activity_id,
                            moderator_id, "application blocked by an approved commitment"
                        );
                        return Ok(SubmissionOutcome::BlockedByApproved(report));
                    }
                    Resolution::None => return Ok(SubmissionOutcome::ConflictDetected(report)),
                    Resolution::CancelPendingAndProceed => {
                        cancelled_pending = ledger.delete_all_pending()?;
                        info!(
                            moderator_id,
                            cancelled_pending, "withdrew pending applications"
                        );
                    }
                }
            }

            ledger.insert_application(activity_id)?;
            info!(activity_id, moderator_id, "application submitted");
            Ok(SubmissionOutcome::Submitted { cancelled_pending })
        })
    }

    /// The moderator's approved activities, by date then start time.
    pub fn approved_activities(&self, moderator_id: &str) -> Result<Vec<ModeratorCommitment>> {
        let mut approved: Vec<ModeratorCommitment> = self
            .store
            .with_moderator(moderator_id, |ledger| ledger.list_commitments())?
            .into_iter()
            .filter(|c| c.status == ApplicationStatus::Approved)
            .collect();
        approved.sort_by(|a, b| (a.date, a.window.start).cmp(&(b.date, b.window.start)));
        Ok(approved)
    }

    /// Every activity passing `filter`, with the moderator's status toward it.
    pub fn board(
        &self,
        moderator_id: &str,
        filter: &BoardFilter,
    ) -> Result<Vec<ModeratorCommitment>> {
        Ok(self
            .store
            .with_moderator(moderator_id, |ledger| ledger.board(filter))?)
    }
}
