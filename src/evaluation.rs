//! Positional scoring of boards at the search horizon
//!
//! A board is scored by looking at every window of four adjacent cells
//! along rows, columns and both diagonals. Windows overlap, so a cell near the
//! centre of the board contributes to many more windows than a corner cell,
//! which is what gives central columns their higher value.

use crate::board::{Board, Cell, Piece, DIRECTIONS};
use crate::{COLS, ROWS, WINDOW_LENGTH};

/// Score of a window holding one of our pieces and nothing of the opponent's
pub const SINGLE_SCORE: i64 = 1;
/// Bonus for exactly two of our pieces in an open window
pub const PAIR_COUNT_SCORE: i64 = 30;
/// Bonus for a pair run (see [`consecutive_run`]) of 2
pub const PAIR_RUN_SCORE: i64 = 50;
/// Bonus for exactly three of our pieces in an open window
pub const TRIPLE_COUNT_SCORE: i64 = 100;
/// Bonus for a pair run of 3
pub const TRIPLE_RUN_SCORE: i64 = 200;
/// A completed four in a row
pub const WIN_SCORE: i64 = 100_000;
/// An opponent run of three with the fourth cell still open
pub const THREAT_SCORE: i64 = -800;

/// Number of windows on the board, used to size the search bounds
pub const NUM_WINDOWS: usize = ROWS * (COLS - WINDOW_LENGTH + 1)
    + COLS * (ROWS - WINDOW_LENGTH + 1)
    + 2 * (ROWS - WINDOW_LENGTH + 1) * (COLS - WINDOW_LENGTH + 1);

/// Counts the adjacent pairs in `window` that both hold `target`, plus one if there are any
///
/// A contiguous run of `k` pieces therefore counts as `k`, but two separate
/// pairs (`XX_XX` on a longer window) count as 3. The score constants are tuned
/// against this count, not against the longest run.
pub fn consecutive_run(window: &[Cell], target: Cell) -> usize {
    let pairs = window
        .windows(2)
        .filter(|pair| pair[0] == target && pair[1] == target)
        .count();
    if pairs > 0 {
        pairs + 1
    } else {
        0
    }
}

/// Scores a single window from `me`'s perspective
pub fn score_window(window: &[Cell; WINDOW_LENGTH], me: Piece) -> i64 {
    let mine = Cell::from(me);
    let theirs = Cell::from(me.opponent());

    let count = |target: Cell| window.iter().filter(|&&cell| cell == target).count();

    // any opponent piece blocks the window for us
    if count(theirs) > 0 {
        if consecutive_run(window, theirs) == 3 && count(Cell::Empty) == 1 {
            return THREAT_SCORE;
        }
        return 0;
    }

    let pieces = count(mine);
    let run = consecutive_run(window, mine);

    let mut score = 0;
    if pieces == 1 {
        score += SINGLE_SCORE;
    }
    if pieces == 2 {
        score += PAIR_COUNT_SCORE;
    }
    if run == 2 {
        score += PAIR_RUN_SCORE;
    }
    if pieces == 3 {
        score += TRIPLE_COUNT_SCORE;
    }
    if run == 3 {
        score += TRIPLE_RUN_SCORE;
    }
    if pieces == 4 {
        score += WIN_SCORE;
    }
    score
}

/// Scores `board` for `me`, higher is better
///
/// The score is always from `me`'s point of view, whichever side is to move.
pub fn evaluate(board: &Board, me: Piece) -> i64 {
    board
        .windows(&DIRECTIONS)
        .map(|window| score_window(&window, me))
        .sum()
}
