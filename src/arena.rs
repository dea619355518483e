//! Game orchestration: single games between two players and batches of games

use indicatif::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::board::{Board, Piece};
use crate::error::{Error, Result};
use crate::player::{Player, RandomPlayer, SearchPlayer};
use crate::search::SearchConfig;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Win(Piece),
    Draw,
}

impl GameState {
    /// State of `board` after `last` has just moved
    pub fn after_move(board: &Board, last: Piece) -> Self {
        if board.is_won_by(last) {
            GameState::Win(last)
        } else if board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        }
    }
}

/// Plays a game from the empty board until someone connects four or the board fills up
///
/// `first` must play [`Piece::PlayerOne`] and `second` [`Piece::PlayerTwo`].
/// `on_move` is called with the new board, the piece that moved and its column.
pub fn play_game<'a, F>(
    first: &'a mut dyn Player,
    second: &'a mut dyn Player,
    mut on_move: F,
) -> Result<(GameState, Board)>
where
    F: FnMut(&Board, Piece, usize),
{
    if first.piece() != Piece::PlayerOne || second.piece() != Piece::PlayerTwo {
        return Err(Error::Configuration(
            "the first player must play piece 1 and the second piece 2".to_string(),
        ));
    }

    let mut board = Board::new();
    let mut players = [first, second];
    let mut turn = 0;

    loop {
        let player = &mut players[turn % 2];
        let piece = player.piece();
        let column = player.choose_move(&board)?;
        board = board.apply(column, piece)?;
        debug!(player = %player.name(), column, "move played");
        on_move(&board, piece, column);

        let state = GameState::after_move(&board, piece);
        if state != GameState::Playing {
            return Ok((state, board));
        }
        turn += 1;
    }
}

/// The automated player kinds that can take part in batch matches
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PlayerKind {
    Random,
    AlphaBeta,
    Expectimax,
}

impl PlayerKind {
    /// Builds a player of this kind; `seed` makes a random player reproducible
    pub fn build(
        self,
        piece: Piece,
        config: SearchConfig,
        seed: Option<u64>,
    ) -> Result<Box<dyn Player + Send>> {
        Ok(match self {
            PlayerKind::Random => match seed {
                Some(seed) => Box::new(RandomPlayer::with_seed(piece, seed)),
                None => Box::new(RandomPlayer::new(piece)),
            },
            PlayerKind::AlphaBeta => Box::new(SearchPlayer::alphabeta(piece, config)?),
            PlayerKind::Expectimax => Box::new(SearchPlayer::expectimax(piece, config)?),
        })
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct MatchTally {
    pub player_one_wins: usize,
    pub player_two_wins: usize,
    pub draws: usize,
}

impl MatchTally {
    pub fn record(&mut self, state: GameState) {
        match state {
            GameState::Win(Piece::PlayerOne) => self.player_one_wins += 1,
            GameState::Win(Piece::PlayerTwo) => self.player_two_wins += 1,
            GameState::Draw => self.draws += 1,
            GameState::Playing => {}
        }
    }

    pub fn games(&self) -> usize {
        self.player_one_wins + self.player_two_wins + self.draws
    }
}

/// Settings for a batch of automated games
#[derive(Copy, Clone, Debug)]
pub struct MatchConfig {
    pub player_one: PlayerKind,
    pub player_two: PlayerKind,
    pub search: SearchConfig,
    pub games: usize,
    /// Base seed for the random players, each game derives its own seed from it
    pub seed: Option<u64>,
    /// Draw a progress bar on the terminal
    pub progress: bool,
}

/// Plays `config.games` independent games in parallel and tallies the results
pub fn run_matches(config: &MatchConfig) -> Result<MatchTally> {
    config.search.validate()?;

    let progress = if config.progress {
        ProgressBar::new(config.games as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let outcomes = (0..config.games)
        .into_par_iter()
        .map(|game| -> Result<GameState> {
            let seed = config.seed.map(|seed| seed.wrapping_add(2 * game as u64));
            let mut first = config
                .player_one
                .build(Piece::PlayerOne, config.search, seed)?;
            let mut second =
                config
                    .player_two
                    .build(Piece::PlayerTwo, config.search, seed.map(|s| s.wrapping_add(1)))?;

            let (state, _) = play_game(first.as_mut(), second.as_mut(), |_, _, _| {})?;
            progress.inc(1);
            Ok(state)
        })
        .collect::<Result<Vec<GameState>>>()?;
    progress.finish();

    let mut tally = MatchTally::default();
    for state in outcomes {
        tally.record(state);
    }
    info!(
        games = tally.games(),
        player_one_wins = tally.player_one_wins,
        player_two_wins = tally.player_two_wins,
        draws = tally.draws,
        "matches complete"
    );
    Ok(tally)
}
