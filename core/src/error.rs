use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Adjacent mine counts do not match the mine layout")]
    CorruptLayout,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game is not in progress")]
    NotPlaying,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
