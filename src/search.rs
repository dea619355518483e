//! Depth-limited adversarial search over [`Board`]s
//!
//! Two opponent models are supported:
//! - a rational opponent, searched with alpha-beta pruned minimax
//! - a uniformly random opponent, searched with expectimax
//!
//! Both walk the game tree to a fixed depth, alternating between our moves and
//! the opponent's, and score the positions at the horizon with [`evaluate`].
//! Neither search stops early on a won position.

use rayon::prelude::*;
use tracing::{debug, trace};

use std::fmt::Debug;

use crate::board::{Board, Piece};
use crate::error::{Error, Result};
use crate::evaluation::evaluate;
use crate::{COLS, SEARCH_DEPTH};

/// Stands in for infinity in the alpha-beta window, well outside any reachable evaluation
pub const SCORE_BOUND: i64 = 100_000_000_000_001;

/// Which opponent model to search against
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Strategy {
    /// Rational opponent, alpha-beta pruned
    AlphaBeta,
    /// Uniformly random opponent
    Expectimax,
    /// Rational opponent, searched exhaustively without pruning
    Minimax,
}

/// Whose move a search node simulates
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Turn {
    /// Our move, the best child is kept
    Maximizing,
    /// The opponent's move, the worst child (or the average, for expectimax) is kept
    Minimizing,
}

impl Turn {
    fn next(self) -> Self {
        match self {
            Turn::Maximizing => Turn::Minimizing,
            Turn::Minimizing => Turn::Maximizing,
        }
    }

    /// The piece dropped at a node of this kind when we are playing `me`
    pub fn mover(self, me: Piece) -> Piece {
        match self {
            Turn::Maximizing => me,
            Turn::Minimizing => me.opponent(),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchConfig {
    /// Number of plies searched below the root
    pub depth: u32,
    /// Search the subtrees of the root moves on the rayon thread pool
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::Configuration(
                "search depth must be at least 1 ply".to_string(),
            ));
        }
        Ok(())
    }
}

/// A depth-limited game tree searcher
///
/// The searcher holds no game state: the board and the side we are playing are
/// passed to every call, so one searcher can serve both players.
#[derive(Clone, Debug)]
pub struct Searcher {
    config: SearchConfig,

    /// The number of nodes visited by the last root search (for diagnostics only)
    pub node_count: usize,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            node_count: 0,
        })
    }

    /// Picks a column for `me` to play, assuming a rational opponent
    pub fn choose_move_alphabeta(&mut self, board: &Board, me: Piece) -> Result<usize> {
        self.choose_move(board, me, Strategy::AlphaBeta)
    }

    /// Picks a column for `me` to play, assuming a uniformly random opponent
    pub fn choose_move_expectimax(&mut self, board: &Board, me: Piece) -> Result<usize> {
        self.choose_move(board, me, Strategy::Expectimax)
    }

    /// Picks a column for `me` to play with `strategy`
    ///
    /// Ties between columns are broken in favour of the lowest column index.
    pub fn choose_move(&mut self, board: &Board, me: Piece, strategy: Strategy) -> Result<usize> {
        if board.is_full() {
            return Err(Error::NoLegalMoves);
        }
        self.node_count = 0;

        let depth = self.config.depth;
        let (column, score) = if self.config.parallel {
            match strategy {
                Strategy::AlphaBeta => self.root_parallel(board, me, |searcher, child| {
                    searcher.alphabeta(child, depth - 1, -SCORE_BOUND, SCORE_BOUND, Turn::Minimizing, me).1 as f64
                }),
                Strategy::Expectimax => self.root_parallel(board, me, |searcher, child| {
                    searcher.expectimax(child, depth - 1, Turn::Minimizing, me).1
                }),
                Strategy::Minimax => self.root_parallel(board, me, |searcher, child| {
                    searcher.minimax(child, depth - 1, Turn::Minimizing, me).1 as f64
                }),
            }
        } else {
            match strategy {
                Strategy::AlphaBeta => {
                    let (column, score) =
                        self.alphabeta(board, depth, -SCORE_BOUND, SCORE_BOUND, Turn::Maximizing, me);
                    (column, score as f64)
                }
                Strategy::Expectimax => self.expectimax(board, depth, Turn::Maximizing, me),
                Strategy::Minimax => {
                    let (column, score) = self.minimax(board, depth, Turn::Maximizing, me);
                    (column, score as f64)
                }
            }
        };

        // a maximizing root with at least one legal move always picks a column
        let column = column.ok_or(Error::NoLegalMoves)?;
        debug!(
            ?strategy,
            ?me,
            column,
            score,
            nodes = self.node_count,
            "search complete"
        );
        Ok(column)
    }

    /// Alpha-beta pruned minimax
    ///
    /// `alpha` is the score we can already guarantee, `beta` the score the
    /// opponent can already hold us to. Returns the best column (`None` at the
    /// horizon or on a full board) and its score.
    pub fn alphabeta(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        turn: Turn,
        me: Piece,
    ) -> (Option<usize>, i64) {
        self.node_count += 1;

        if depth == 0 {
            return (None, evaluate(board, me));
        }
        if board.is_full() {
            return (None, 0);
        }

        let mut best_column = None;
        match turn {
            Turn::Maximizing => {
                let mut value = -SCORE_BOUND;
                for (column, child) in board.children(me) {
                    let (_, score) = self.alphabeta(&child, depth - 1, alpha, beta, turn.next(), me);
                    self.trace_root(depth, column, score);
                    if score > value {
                        value = score;
                        best_column = Some(column);
                    }
                    alpha = alpha.max(value);
                    // the opponent will never allow this line
                    if alpha >= beta {
                        break;
                    }
                }
                (best_column, value)
            }
            Turn::Minimizing => {
                let mut value = SCORE_BOUND;
                for (column, child) in board.children(me.opponent()) {
                    let (_, score) = self.alphabeta(&child, depth - 1, alpha, beta, turn.next(), me);
                    if score < value {
                        value = score;
                        best_column = Some(column);
                    }
                    beta = beta.min(value);
                    // we already have a better alternative elsewhere
                    if alpha >= beta {
                        break;
                    }
                }
                (best_column, value)
            }
        }
    }

    /// Plain minimax without pruning, visits every node to `depth`
    pub fn minimax(&mut self, board: &Board, depth: u32, turn: Turn, me: Piece) -> (Option<usize>, i64) {
        self.node_count += 1;

        if depth == 0 {
            return (None, evaluate(board, me));
        }
        if board.is_full() {
            return (None, 0);
        }

        let mut best: Option<(usize, i64)> = None;
        for (column, child) in board.children(turn.mover(me)) {
            let (_, score) = self.minimax(&child, depth - 1, turn.next(), me);
            self.trace_root(depth, column, score);
            let better = match (turn, best) {
                (_, None) => true,
                (Turn::Maximizing, Some((_, value))) => score > value,
                (Turn::Minimizing, Some((_, value))) => score < value,
            };
            if better {
                best = Some((column, score));
            }
        }
        match best {
            Some((column, value)) => (Some(column), value),
            None => (None, 0),
        }
    }

    /// Expectimax against an opponent that picks a column uniformly at random
    ///
    /// Opponent nodes are chance nodes: every child score is weighted by
    /// `1 / COLS` and the weighted scores are summed. The weight does not change
    /// when some columns are full. Chance nodes never report a column.
    pub fn expectimax(&mut self, board: &Board, depth: u32, turn: Turn, me: Piece) -> (Option<usize>, f64) {
        self.node_count += 1;

        if depth == 0 {
            return (None, evaluate(board, me) as f64);
        }
        if board.is_full() {
            return (None, 0.0);
        }

        match turn {
            Turn::Maximizing => {
                let mut value = f64::NEG_INFINITY;
                let mut best_column = None;
                for (column, child) in board.children(me) {
                    let (_, score) = self.expectimax(&child, depth - 1, turn.next(), me);
                    self.trace_root(depth, column, score);
                    if score > value {
                        value = score;
                        best_column = Some(column);
                    }
                }
                (best_column, value)
            }
            Turn::Minimizing => {
                let mut value = 0.0;
                for (_, child) in board.children(me.opponent()) {
                    let (_, score) = self.expectimax(&child, depth - 1, turn.next(), me);
                    value += score / COLS as f64;
                }
                (None, value)
            }
        }
    }

    /// Searches each root move on its own rayon worker and picks the best
    ///
    /// Every subtree gets a fresh searcher, so siblings share nothing. Results
    /// are collected in column order, which keeps the lowest-column tie break.
    fn root_parallel<F>(&mut self, board: &Board, me: Piece, search: F) -> (Option<usize>, f64)
    where
        F: Fn(&mut Searcher, &Board) -> f64 + Sync,
    {
        let config = self.config;
        let children: Vec<(usize, Board)> = board.children(me).collect();

        let scored: Vec<(usize, f64, usize)> = children
            .into_par_iter()
            .map(|(column, child)| {
                let mut searcher = Searcher {
                    config,
                    node_count: 0,
                };
                let score = search(&mut searcher, &child);
                (column, score, searcher.node_count)
            })
            .collect();

        self.node_count += 1;
        let mut best: Option<(usize, f64)> = None;
        for (column, score, nodes) in scored {
            self.node_count += nodes;
            trace!(column, score, "root move scored");
            if best.map_or(true, |(_, value)| score > value) {
                best = Some((column, score));
            }
        }
        match best {
            Some((column, score)) => (Some(column), score),
            None => (None, 0.0),
        }
    }

    fn trace_root<S: Debug>(&self, depth: u32, column: usize, score: S) {
        if depth == self.config.depth {
            trace!(column, ?score, "root move scored");
        }
    }
}
