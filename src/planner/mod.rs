//! Slot planning for new activities.
//!
//! Offers the start times at which a new fixed-duration activity fits
//! into an event day without touching the activities already there.
//!
//! # Algorithm
//!
//! A cursor walks the event window in granularity steps. Before each
//! placement (ascending by start) every cursor position whose activity
//! would end by the placement's start is offered; the cursor then
//! resumes one granularity step after the placement ends. After the
//! last placement the walk continues until the activity no longer
//! fits before the event closes.
//!
//! Planning is pure: no storage access, no shared state, safe to run
//! in parallel.

mod policy;
mod slots;

pub use policy::SlotPolicy;
pub use slots::{plan_slots, SlotPlanner};
