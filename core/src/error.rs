use crate::types::{Event, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeasonError {
    #[error("Missing data: {what}")]
    MissingData { what: String },

    #[error("Ambiguous free-transfer state: reconstructed {reconstructed}, upstream reports {authoritative}")]
    AmbiguousState { reconstructed: u8, authoritative: u8 },

    #[error("Invalid input in {what}: {reason}")]
    InvalidInput { what: String, reason: String },

    #[error("Player catalogue unavailable for team {team_id}")]
    CatalogueMissing { team_id: TeamId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeasonError {
    pub fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput { what: what.into(), reason: reason.into() }
    }

    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData { what: what.into() }
    }

    /// True for the one condition that aborts a whole-team computation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CatalogueMissing { .. })
    }
}

pub type SeasonResult<T> = Result<T, SeasonError>;

/// Convenience for validators that reject a single record by event.
pub(crate) fn reject_event(event: Event, reason: impl Into<String>) -> SeasonError {
    SeasonError::invalid(format!("gameweek {event}"), reason)
}
