use thiserror::Error;

use crate::{COLS, ROWS};

/// Errors produced by the board model and the search entry points
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid move, column {column} full")]
    IllegalMove { column: usize },

    #[error("Invalid move, column {column} out of range. Columns must be between 0 and {}", COLS - 1)]
    ColumnOutOfRange { column: usize },

    #[error("Invalid board: {0} (expected {} rows of {} cells)", ROWS, COLS)]
    InvalidBoard(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Move input aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, Error>;
