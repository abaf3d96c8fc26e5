//! Activity slot planning and moderator conflict resolution for
//! conference scheduling.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWindow`, `ActivityPlacement`,
//!   `EventDay`, `ApplicationStatus`, `ModeratorCommitment`
//! - **`planner`**: Free start times for a new fixed-duration activity
//! - **`conflict`**: Overlap detection and the moderator application gate
//! - **`store`**: Storage collaborator traits, status adapter, in-memory store
//! - **`validation`**: Event-day integrity checks (duplicate IDs, overlaps)
//! - **`config`**: TOML configuration for the slot policy
//!
//! # Architecture
//!
//! The planner is pure. The resolver performs its check-then-act
//! sequence inside a per-moderator scope supplied by the store, so two
//! concurrent applications by the same moderator cannot both slip past
//! the conflict check. Neither component touches UI or persistence
//! directly.

pub mod config;
pub mod conflict;
pub mod error;
pub mod models;
pub mod planner;
pub mod store;
pub mod validation;

pub use error::{Error, Result, StoreError};
