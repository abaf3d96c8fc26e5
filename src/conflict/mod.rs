//! Moderator conflict detection and resolution.
//!
//! A moderator may hold many commitments across events, but two
//! commitments on the same date must not overlap. Before a new
//! application is stored the resolver checks the moderator's `Sent`
//! and `Approved` commitments and, when they collide, applies the
//! operator's choice:
//!
//! | Resolution | Pending conflicts only | An approved conflict |
//! |------------|------------------------|----------------------|
//! | `None` | `ConflictDetected` (ask) | `BlockedByApproved` |
//! | `CancelPendingAndProceed` | cancel all pending, submit | `BlockedByApproved` |
//! | `AbortSubmission` | `Aborted` | `Aborted` |
//!
//! Approved commitments are never cancelled here.

mod detect;
mod resolver;

pub use detect::{find_conflicts, ConflictReport};
pub use resolver::{ConflictResolver, Resolution, SubmissionOutcome};
