use crate::{
    interaction::{BlockReason, InteractionKind},
    snapshot::Activity,
    types::Timestamp,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Interaction '{kind}' blocked ({reason}); current activity: {current_activity:?}")]
    InteractionBlocked {
        kind:             InteractionKind,
        reason:           BlockReason,
        current_activity: Option<Activity>,
    },

    #[error("Invalid elapsed time: last visited {last_visited}, now {now}")]
    InvalidElapsedTime { last_visited: Timestamp, now: Timestamp },

    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot { reason: reason.into() }
    }

    /// True for errors the host should surface as a denied action
    /// rather than a failure.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::InteractionBlocked { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
