//! Error types.
//!
//! The taxonomy is deliberately small. Unusable windows never surface
//! here (the planner answers with an empty slot list) and a scheduling
//! conflict is an outcome, not an error. What remains is storage
//! failure, passed through untouched, and configuration problems.

use thiserror::Error;

/// Failure reported by a storage collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("unknown activity '{activity_id}'")]
    UnknownActivity { activity_id: String },

    #[error("moderator '{moderator_id}' already has an application for activity '{activity_id}'")]
    DuplicateApplication {
        activity_id: String,
        moderator_id: String,
    },

    #[error("no pending application from moderator '{moderator_id}' for activity '{activity_id}'")]
    NoPendingApplication {
        activity_id: String,
        moderator_id: String,
    },
}

impl StoreError {
    /// Creates an `Unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Crate-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
