//! A move-selection engine for the board game 'Connect 4'
//!
//! The engine runs a depth-limited game tree search from the current position
//! and scores the positions at the search horizon with a sliding-window
//! heuristic. Two opponent models are available: a rational opponent
//! (alpha-beta pruned minimax) and a uniformly random one (expectimax).
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{board::{Board, Piece}, search::{SearchConfig, Searcher}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut searcher = Searcher::new(SearchConfig::default())?;
//! let column = searcher.choose_move_alphabeta(&Board::new(), Piece::PlayerOne)?;
//!
//! assert_eq!(column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod evaluation;

pub mod search;

pub mod player;

pub mod arena;

mod test;

pub use error::{Error, Result};

use board::{Board, Piece};
use search::{SearchConfig, Searcher};

/// The number of rows on the game board
pub const ROWS: usize = 6;

/// The number of columns on the game board
pub const COLS: usize = 7;

/// The number of pieces in a row needed to win, and the length of a scoring window
pub const WINDOW_LENGTH: usize = 4;

/// The default search depth in plies
pub const SEARCH_DEPTH: u32 = 4;

// the scoring windows must fit on the board in every direction
const_assert!(ROWS >= WINDOW_LENGTH && COLS >= WINDOW_LENGTH);
// the search window must stay outside anything the evaluation can reach
const_assert!(evaluation::WIN_SCORE * (evaluation::NUM_WINDOWS as i64) < search::SCORE_BOUND);

/// Chooses a column for `player_number` (1 or 2) against a rational opponent
///
/// `rows` is the grid with the top row first, `0` marking empty cells and
/// `1`/`2` the players' pieces.
pub fn choose_move_alphabeta<R: AsRef<[u8]>>(rows: &[R], player_number: u8) -> Result<usize> {
    let board = Board::from_rows(rows)?;
    let me = Piece::from_number(player_number)?;
    Searcher::new(SearchConfig::default())?.choose_move_alphabeta(&board, me)
}

/// Chooses a column for `player_number` (1 or 2) against a uniformly random opponent
///
/// Takes the same grid encoding as [`choose_move_alphabeta`].
pub fn choose_move_expectimax<R: AsRef<[u8]>>(rows: &[R], player_number: u8) -> Result<usize> {
    let board = Board::from_rows(rows)?;
    let me = Piece::from_number(player_number)?;
    Searcher::new(SearchConfig::default())?.choose_move_expectimax(&board, me)
}
