//! Move sources for the game loop

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::board::{Board, Piece};
use crate::error::{Error, Result};
use crate::search::{SearchConfig, Searcher, Strategy};

/// Anything that can pick a column to play
pub trait Player {
    /// The side this player plays
    fn piece(&self) -> Piece;

    /// Display name, e.g. `Player 1:alphabeta`
    fn name(&self) -> String;

    /// Picks a column to play on `board`
    fn choose_move(&mut self, board: &Board) -> Result<usize>;
}

/// A search-backed player
pub struct SearchPlayer {
    piece: Piece,
    strategy: Strategy,
    searcher: Searcher,
}

impl SearchPlayer {
    pub fn new(piece: Piece, strategy: Strategy, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            piece,
            strategy,
            searcher: Searcher::new(config)?,
        })
    }

    /// Plays against a rational opponent
    pub fn alphabeta(piece: Piece, config: SearchConfig) -> Result<Self> {
        Self::new(piece, Strategy::AlphaBeta, config)
    }

    /// Plays against a uniformly random opponent
    pub fn expectimax(piece: Piece, config: SearchConfig) -> Result<Self> {
        Self::new(piece, Strategy::Expectimax, config)
    }
}

impl Player for SearchPlayer {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn name(&self) -> String {
        let kind = match self.strategy {
            Strategy::AlphaBeta => "alphabeta",
            Strategy::Expectimax => "expectimax",
            Strategy::Minimax => "minimax",
        };
        format!("Player {}:{}", self.piece.number(), kind)
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize> {
        self.searcher.choose_move(board, self.piece, self.strategy)
    }
}

/// Plays a uniformly random legal column
pub struct RandomPlayer {
    piece: Piece,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(piece: Piece) -> Self {
        Self {
            piece,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(piece: Piece, seed: u64) -> Self {
        Self {
            piece,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn name(&self) -> String {
        format!("Player {}:random", self.piece.number())
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize> {
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalMoves)
    }
}
