//! In-memory storage adapter.
//!
//! Keeps activities and application rows in ordered maps. Suitable for
//! tests and local development; it also documents the contract a
//! database-backed store has to honour:
//!
//! - one exclusive scope per moderator (a mutex per moderator id)
//! - writes staged inside a scope are replayed onto the live data in a
//!   single step at the end, or not at all

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use super::records::{ActivityRecord, ApplicationRowStatus};
use super::{BoardFilter, CommitmentStore, ModeratorLedger, PlacementSource, StoreError};
use crate::models::{ActivityPlacement, ApplicationStatus, ModeratorCommitment};

/// In-memory activity and application store.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use conf_schedule::models::{ApplicationStatus, TimeWindow};
/// use conf_schedule::store::{ActivityRecord, InMemoryStore};
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
/// let store = InMemoryStore::new().with_activity(ActivityRecord::new(
///     "A1",
///     "E1",
///     date,
///     TimeWindow::from_hm((10, 0), (11, 30)).unwrap(),
/// ));
/// assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Available);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
    scopes: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

#[derive(Debug, Clone)]
struct StoreData {
    activities: BTreeMap<String, ActivityRecord>,
    /// (activity_id, moderator_id) → row status.
    applications: BTreeMap<(String, String), ApplicationRowStatus>,
    healthy: bool,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            activities: BTreeMap::new(),
            applications: BTreeMap::new(),
            healthy: true,
        }
    }
}

impl StoreData {
    fn ensure_healthy(&self) -> Result<(), StoreError> {
        if self.healthy {
            Ok(())
        } else {
            Err(StoreError::unavailable("in-memory store is marked unhealthy"))
        }
    }

    fn activity(&self, activity_id: &str) -> Result<&ActivityRecord, StoreError> {
        self.activities
            .get(activity_id)
            .ok_or_else(|| StoreError::UnknownActivity {
                activity_id: activity_id.to_string(),
            })
    }

    fn row(&self, activity_id: &str, moderator_id: &str) -> Option<ApplicationRowStatus> {
        self.applications
            .get(&(activity_id.to_string(), moderator_id.to_string()))
            .copied()
    }

    fn commitment(&self, activity: &ActivityRecord, moderator_id: &str) -> ModeratorCommitment {
        activity.commitment_for(moderator_id, self.row(&activity.id, moderator_id))
    }

    fn insert_application(
        &mut self,
        activity_id: &str,
        moderator_id: &str,
    ) -> Result<(), StoreError> {
        self.activity(activity_id)?;
        let key = (activity_id.to_string(), moderator_id.to_string());
        // A rejected row is re-opened; live rows keep the pairing unique.
        match self.applications.get(&key) {
            Some(ApplicationRowStatus::Sent | ApplicationRowStatus::Approved) => {
                return Err(StoreError::DuplicateApplication {
                    activity_id: activity_id.to_string(),
                    moderator_id: moderator_id.to_string(),
                });
            }
            Some(ApplicationRowStatus::Rejected) | None => {}
        }
        self.applications.insert(key, ApplicationRowStatus::Sent);
        Ok(())
    }

    fn delete_pending(&mut self, moderator_id: &str) -> usize {
        let before = self.applications.len();
        self.applications.retain(|(_, moderator), status| {
            !(moderator == moderator_id && *status == ApplicationRowStatus::Sent)
        });
        before - self.applications.len()
    }

    fn apply(&mut self, moderator_id: &str, write: &StagedWrite) -> Result<(), StoreError> {
        match write {
            StagedWrite::Insert { activity_id } => {
                self.insert_application(activity_id, moderator_id)
            }
            StagedWrite::DeletePending => {
                self.delete_pending(moderator_id);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
enum StagedWrite {
    Insert { activity_id: String },
    DeletePending,
}

/// Ledger over a private snapshot; writes are recorded for replay.
struct StagedLedger {
    moderator_id: String,
    snapshot: StoreData,
    writes: Vec<StagedWrite>,
}

impl ModeratorLedger for StagedLedger {
    fn board(&self, filter: &BoardFilter) -> Result<Vec<ModeratorCommitment>, StoreError> {
        let mut board: Vec<ModeratorCommitment> = self
            .snapshot
            .activities
            .values()
            .filter(|a| filter.matches(a))
            .map(|a| self.snapshot.commitment(a, &self.moderator_id))
            .collect();
        board.sort_by(|a, b| (a.date, a.window.start).cmp(&(b.date, b.window.start)));
        Ok(board)
    }

    fn find_activity(&self, activity_id: &str) -> Result<Option<ModeratorCommitment>, StoreError> {
        Ok(self
            .snapshot
            .activities
            .get(activity_id)
            .map(|a| self.snapshot.commitment(a, &self.moderator_id)))
    }

    fn insert_application(&mut self, activity_id: &str) -> Result<(), StoreError> {
        self.snapshot
            .insert_application(activity_id, &self.moderator_id)?;
        self.writes.push(StagedWrite::Insert {
            activity_id: activity_id.to_string(),
        });
        Ok(())
    }

    fn delete_all_pending(&mut self) -> Result<usize, StoreError> {
        let removed = self.snapshot.delete_pending(&self.moderator_id);
        self.writes.push(StagedWrite::DeletePending);
        Ok(removed)
    }
}

impl InMemoryStore {
    /// Creates an empty, healthy store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an activity (builder form).
    pub fn with_activity(self, activity: ActivityRecord) -> Self {
        self.add_activity(activity);
        self
    }

    /// Adds or replaces an activity.
    pub fn add_activity(&self, activity: ActivityRecord) {
        self.data
            .write()
            .activities
            .insert(activity.id.clone(), activity);
    }

    /// Marks the store reachable or unreachable.
    ///
    /// While unhealthy every read and every commit fails with
    /// [`StoreError::Unavailable`].
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().healthy = healthy;
    }

    /// Organizer action: assigns a moderator directly on the activity.
    ///
    /// Holds the scopes of both the new and the displaced moderator,
    /// taken in id order, so neither commits against a stale view.
    pub fn assign_moderator(
        &self,
        activity_id: &str,
        moderator_id: &str,
    ) -> Result<(), StoreError> {
        loop {
            let previous = {
                let data = self.data.read();
                data.ensure_healthy()?;
                data.activity(activity_id)?.moderator_id.clone()
            };

            let mut ids = vec![moderator_id];
            if let Some(displaced) = previous.as_deref().filter(|id| *id != moderator_id) {
                ids.push(displaced);
            }
            ids.sort_unstable();
            let scopes: Vec<Arc<Mutex<()>>> = ids.iter().map(|id| self.scope(id)).collect();
            let _guards: Vec<_> = scopes.iter().map(|scope| scope.lock()).collect();

            let mut data = self.data.write();
            data.ensure_healthy()?;
            let activity = data.activities.get_mut(activity_id).ok_or_else(|| {
                StoreError::UnknownActivity {
                    activity_id: activity_id.to_string(),
                }
            })?;
            // Reassigned while we waited for the scopes.
            if activity.moderator_id != previous {
                continue;
            }
            activity.moderator_id = Some(moderator_id.to_string());
            debug!(activity_id, moderator_id, ?previous, "assigned moderator");
            return Ok(());
        }
    }

    /// Organizer action: confirms a pending application.
    pub fn approve(&self, activity_id: &str, moderator_id: &str) -> Result<(), StoreError> {
        self.decide(activity_id, moderator_id, ApplicationRowStatus::Approved)
    }

    /// Organizer action: declines a pending application.
    pub fn reject(&self, activity_id: &str, moderator_id: &str) -> Result<(), StoreError> {
        self.decide(activity_id, moderator_id, ApplicationRowStatus::Rejected)
    }

    /// Resolved status of a pairing, as the resolver would see it.
    pub fn status_of(
        &self,
        activity_id: &str,
        moderator_id: &str,
    ) -> Result<ApplicationStatus, StoreError> {
        let data = self.data.read();
        data.ensure_healthy()?;
        let activity = data.activity(activity_id)?;
        Ok(data.commitment(activity, moderator_id).status)
    }

    /// Raw application row, if one exists.
    pub fn application_row(
        &self,
        activity_id: &str,
        moderator_id: &str,
    ) -> Option<ApplicationRowStatus> {
        self.data.read().row(activity_id, moderator_id)
    }

    /// Number of application rows across all moderators.
    pub fn application_count(&self) -> usize {
        self.data.read().applications.len()
    }

    fn decide(
        &self,
        activity_id: &str,
        moderator_id: &str,
        decision: ApplicationRowStatus,
    ) -> Result<(), StoreError> {
        let scope = self.scope(moderator_id);
        let _guard = scope.lock();
        let mut data = self.data.write();
        data.ensure_healthy()?;
        let key = (activity_id.to_string(), moderator_id.to_string());
        match data.applications.get_mut(&key) {
            Some(status) if *status == ApplicationRowStatus::Sent => {
                *status = decision;
                Ok(())
            }
            _ => Err(StoreError::NoPendingApplication {
                activity_id: activity_id.to_string(),
                moderator_id: moderator_id.to_string(),
            }),
        }
    }

    fn scope(&self, moderator_id: &str) -> Arc<Mutex<()>> {
        self.scopes
            .lock()
            .entry(moderator_id.to_string())
            .or_default()
            .clone()
    }

    fn commit(&self, moderator_id: &str, writes: &[StagedWrite]) -> Result<(), StoreError> {
        let mut data = self.data.write();
        data.ensure_healthy()?;
        let mut next = data.clone();
        for write in writes {
            next.apply(moderator_id, write)?;
        }
        *data = next;
        debug!(moderator_id, writes = writes.len(), "committed moderator scope");
        Ok(())
    }
}

impl CommitmentStore for InMemoryStore {
    fn with_moderator<R, E, F>(&self, moderator_id: &str, op: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn ModeratorLedger) -> Result<R, E>,
        E: From<StoreError>,
    {
        let scope = self.scope(moderator_id);
        let _guard = scope.lock();

        let snapshot = {
            let data = self.data.read();
            data.ensure_healthy()?;
            data.clone()
        };
        let mut ledger = StagedLedger {
            moderator_id: moderator_id.to_string(),
            snapshot,
            writes: Vec::new(),
        };

        let result = op(&mut ledger)?;
        if !ledger.writes.is_empty() {
            self.commit(moderator_id, &ledger.writes)?;
        }
        Ok(result)
    }
}

impl PlacementSource for InMemoryStore {
    fn list_placements(
        &self,
        event_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivityPlacement>, StoreError> {
        let data = self.data.read();
        data.ensure_healthy()?;
        Ok(data
            .activities
            .values()
            .filter(|a| a.event_id == event_id && a.date == date)
            .map(ActivityRecord::placement)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_activity(ActivityRecord::new(
                "A1",
                "E1",
                date(),
                TimeWindow::from_hm((10, 0), (11, 30)).unwrap(),
            ))
            .with_activity(ActivityRecord::new(
                "A2",
                "E1",
                date(),
                TimeWindow::from_hm((9, 0), (10, 0)).unwrap(),
            ))
            .with_activity(ActivityRecord::new(
                "B1",
                "E2",
                date(),
                TimeWindow::from_hm((14, 0), (15, 30)).unwrap(),
            ))
    }

    #[test]
    fn test_insert_commits_on_ok() {
        let store = store();
        store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap();
        assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Sent);
        assert_eq!(store.status_of("A1", "M2").unwrap(), ApplicationStatus::Available);
    }

    #[test]
    fn test_writes_discarded_on_err() {
        let store = store();
        let result: Result<(), StoreError> = store.with_moderator("M1", |ledger| {
            ledger.insert_application("A1")?;
            ledger.insert_application("missing")
        });
        assert!(matches!(result, Err(StoreError::UnknownActivity { .. })));
        assert_eq!(store.application_count(), 0);
    }

    #[test]
    fn test_reads_see_staged_writes() {
        let store = store();
        store
            .with_moderator("M1", |ledger| {
                ledger.insert_application("A1")?;
                let commitments = ledger.list_commitments()?;
                assert_eq!(commitments.len(), 1);
                assert_eq!(ledger.delete_all_pending()?, 1);
                assert!(ledger.list_commitments()?.is_empty());
                Ok::<_, StoreError>(())
            })
            .unwrap();
        assert_eq!(store.application_count(), 0);
    }

    #[test]
    fn test_duplicate_application_rejected() {
        let store = store();
        store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap();
        let err = store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateApplication { .. }));
    }

    #[test]
    fn test_delete_pending_spares_approved_and_others() {
        let store = store();
        for activity in ["A1", "A2", "B1"] {
            store
                .with_moderator("M1", |ledger| ledger.insert_application(activity))
                .unwrap();
        }
        store
            .with_moderator("M2", |ledger| ledger.insert_application("A1"))
            .unwrap();
        store.approve("A2", "M1").unwrap();

        let removed = store
            .with_moderator("M1", |ledger| ledger.delete_all_pending())
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.status_of("A2", "M1").unwrap(), ApplicationStatus::Approved);
        assert_eq!(store.status_of("A1", "M2").unwrap(), ApplicationStatus::Sent);
    }

    #[test]
    fn test_board_sorted_and_filtered() {
        let store = store();
        let board = store
            .with_moderator("M1", |ledger| ledger.board(&BoardFilter::for_event("E1")))
            .unwrap();
        let ids: Vec<&str> = board.iter().map(|c| c.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["A2", "A1"]);
    }

    #[test]
    fn test_board_direction_filter() {
        let store = store();
        store.add_activity(
            ActivityRecord::new(
                "A3",
                "E1",
                date(),
                TimeWindow::from_hm((12, 0), (13, 0)).unwrap(),
            )
            .with_direction("Workshops"),
        );
        let filter = BoardFilter::for_event("E1").with_direction("Workshops");
        let board = store
            .with_moderator("M1", |ledger| ledger.board(&filter))
            .unwrap();
        let ids: Vec<&str> = board.iter().map(|c| c.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["A3"]);

        let none = BoardFilter::all().with_direction("Lectures");
        assert!(store
            .with_moderator("M1", |ledger| ledger.board(&none))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_direct_assignment_shows_approved() {
        let store = store();
        store.assign_moderator("B1", "M1").unwrap();
        let commitments = store
            .with_moderator("M1", |ledger| ledger.list_commitments())
            .unwrap();
        assert_eq!(commitments.len(), 1);
        assert_eq!(commitments[0].status, ApplicationStatus::Approved);
    }

    #[test]
    fn test_approve_requires_pending() {
        let store = store();
        let err = store.approve("A1", "M1").unwrap_err();
        assert!(matches!(err, StoreError::NoPendingApplication { .. }));
    }

    #[test]
    fn test_rejected_row_frees_pairing() {
        let store = store();
        store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap();
        store.reject("A1", "M1").unwrap();
        assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Available);
        assert_eq!(store.application_row("A1", "M1"), Some(ApplicationRowStatus::Rejected));

        store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap();
        assert_eq!(store.application_row("A1", "M1"), Some(ApplicationRowStatus::Sent));
        assert_eq!(store.application_count(), 1);
    }

    #[test]
    fn test_approved_row_stays_unique() {
        let store = store();
        store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap();
        store.approve("A1", "M1").unwrap();
        let err = store
            .with_moderator("M1", |ledger| ledger.insert_application("A1"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateApplication { .. }));
    }

    #[test]
    fn test_reassignment_releases_previous_moderator() {
        let store = store();
        store.assign_moderator("A1", "M1").unwrap();
        store.assign_moderator("A1", "M2").unwrap();
        assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Available);
        assert_eq!(store.status_of("A1", "M2").unwrap(), ApplicationStatus::Approved);

        // Reassigning to the current moderator takes a single scope.
        store.assign_moderator("A1", "M2").unwrap();
        assert_eq!(store.status_of("A1", "M2").unwrap(), ApplicationStatus::Approved);
    }

    #[test]
    fn test_reassignment_waits_for_displaced_scope() {
        use std::sync::mpsc;
        use std::thread;

        let store = Arc::new(store());
        store.assign_moderator("A1", "M1").unwrap();

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .with_moderator("M1", |ledger| {
                        entered_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                        Ok::<_, StoreError>(ledger.list_commitments()?.len())
                    })
                    .unwrap()
            })
        };
        entered_rx.recv().unwrap();

        let assigner = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.assign_moderator("A1", "M2").unwrap())
        };
        // M1's scope is still open, so the reassignment cannot land yet.
        thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Approved);

        release_tx.send(()).unwrap();
        assert_eq!(holder.join().unwrap(), 1);
        assigner.join().unwrap();
        assert_eq!(store.status_of("A1", "M2").unwrap(), ApplicationStatus::Approved);
    }

    #[test]
    fn test_unhealthy_store() {
        let store = store();
        store.set_healthy(false);
        let err = store
            .with_moderator("M1", |ledger| ledger.list_commitments())
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(store.list_placements("E1", date()).is_err());
    }

    #[test]
    fn test_failed_commit_applies_nothing() {
        let store = store();
        store
            .with_moderator("M1", |ledger| ledger.insert_application("A2"))
            .unwrap();
        let result = store.with_moderator("M1", |ledger| {
            ledger.delete_all_pending()?;
            ledger.insert_application("A1")?;
            store.set_healthy(false);
            Ok::<_, StoreError>(())
        });
        assert!(result.is_err());
        store.set_healthy(true);
        assert_eq!(store.status_of("A2", "M1").unwrap(), ApplicationStatus::Sent);
        assert_eq!(store.status_of("A1", "M1").unwrap(), ApplicationStatus::Available);
    }

    #[test]
    fn test_list_placements_by_event_and_date() {
        let store = store();
        let mut ids: Vec<String> = store
            .list_placements("E1", date())
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["A1", "A2"]);
        let other_day = date().succ_opt().unwrap();
        assert!(store.list_placements("E1", other_day).unwrap().is_empty());
    }
}
