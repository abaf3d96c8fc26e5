//! Conference scheduling domain models.
//!
//! Plain data describing a conference day and a moderator's standing
//! toward its activities. Storage adapters build these; the planner
//! and the resolver only read them.
//!
//! # Domain Mappings
//!
//! | conf-schedule | Conference | Storage |
//! |---------------|-----------|---------|
//! | `TimeWindow` | opening hours / activity time | start/end time columns |
//! | `ActivityPlacement` | session already in the programme | activity row |
//! | `EventDay` | one day of an event | event + its activities |
//! | `ModeratorCommitment` | "I moderate / applied to this" | activity row + application row |

mod commitment;
mod placement;
mod window;

pub use commitment::{ApplicationStatus, ModeratorCommitment};
pub use placement::{ActivityPlacement, EventDay};
pub use window::{add_within_day, TimeWindow};
