use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Malformed coordinate")]
    MalformedCoordinate,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Action selector must be 1, 2, or 3")]
    InvalidActionSelector,
    #[error("No flags left")]
    FlagBudgetExhausted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
