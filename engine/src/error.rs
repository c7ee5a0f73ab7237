use crate::roster::PlayerId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

/// Every failure the engine reports. All of them are recoverable: the state is
/// left exactly as it was before the failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Only {cap} players are allowed on the field.")]
    CapacityExceeded { cap: usize },

    #[error("{0}")]
    InvariantViolation(String),

    #[error("Nothing to undo!")]
    NothingToUndo,

    #[error("Storage error: {0}")]
    Persistence(String),

    #[error("Saved game rejected: {0}")]
    Validation(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("{0} is not on the field.")]
    NotOnField(String),

    #[error("Players can only be removed before the game starts.")]
    GameInProgress,

    #[error("Cannot {action} while the clock is {state}.")]
    ClockTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl GameError {
    pub fn goalie_immovable() -> Self {
        GameError::InvariantViolation("Goalie cannot be moved.".to_string())
    }
}
