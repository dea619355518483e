use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use std::io::{stdin, stdout, Write};

use connect4_search::arena::{self, GameState, MatchConfig, PlayerKind};
use connect4_search::board::{Board, Piece};
use connect4_search::player::Player;
use connect4_search::search::SearchConfig;
use connect4_search::{Error, COLS, SEARCH_DEPTH};

mod display;

/// Play Connect 4 against search-based AI players
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against search-based AI players")]
struct Cli {
    /// Who plays piece 1 (moves first)
    #[arg(long, value_enum, default_value = "human")]
    player_one: Controller,

    /// Who plays piece 2
    #[arg(long, value_enum, default_value = "alphabeta")]
    player_two: Controller,

    /// Search depth in plies for the AI players
    #[arg(long, default_value_t = SEARCH_DEPTH)]
    depth: u32,

    /// Search the root moves in parallel
    #[arg(long)]
    parallel: bool,

    /// Play this many games without drawing the board and report the results
    #[arg(long)]
    games: Option<usize>,

    /// Seed for the random players
    #[arg(long)]
    seed: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Controller {
    Human,
    Random,
    Alphabeta,
    Expectimax,
}

impl Controller {
    fn kind(self) -> Option<PlayerKind> {
        match self {
            Controller::Human => None,
            Controller::Random => Some(PlayerKind::Random),
            Controller::Alphabeta => Some(PlayerKind::AlphaBeta),
            Controller::Expectimax => Some(PlayerKind::Expectimax),
        }
    }

    fn build(self, piece: Piece, config: SearchConfig, seed: Option<u64>) -> Result<Box<dyn Player>> {
        match self.kind() {
            Some(kind) => Ok(kind.build(piece, config, seed)?),
            None => Ok(Box::new(HumanPlayer { piece })),
        }
    }
}

/// Reads moves from stdin, asking again until a playable column is given
struct HumanPlayer {
    piece: Piece,
}

impl Player for HumanPlayer {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn name(&self) -> String {
        format!("Player {}:human", self.piece.number())
    }

    fn choose_move(&mut self, board: &Board) -> connect4_search::Result<usize> {
        let valid_columns = board.legal_moves();
        let stdin = stdin();

        loop {
            print!("Move input > ");
            let _ = stdout().flush();
            let mut input_str = String::new();
            match stdin.read_line(&mut input_str) {
                Ok(0) => return Err(Error::Aborted("end of input".to_string())),
                Err(err) => return Err(Error::Aborted(err.to_string())),
                Ok(_) => {}
            }

            match input_str.trim().parse::<usize>() {
                Ok(column) if valid_columns.contains(&column) => return Ok(column),
                Ok(column) if column < COLS => {
                    println!("Column full, choose from: {:?}", valid_columns)
                }
                _ => println!("Invalid column: {}", input_str.trim()),
            }
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let search = SearchConfig {
        depth: cli.depth,
        parallel: cli.parallel,
    };
    search.validate()?;

    if let Some(games) = cli.games {
        let (player_one, player_two) = match (cli.player_one.kind(), cli.player_two.kind()) {
            (Some(one), Some(two)) => (one, two),
            _ => anyhow::bail!("batch games need two automated players"),
        };
        let tally = arena::run_matches(&MatchConfig {
            player_one,
            player_two,
            search,
            games,
            seed: cli.seed,
            progress: true,
        })?;
        println!(
            "{} games: player 1 won {}, player 2 won {}, {} drawn",
            tally.games(),
            tally.player_one_wins,
            tally.player_two_wins,
            tally.draws
        );
        return Ok(());
    }

    println!("Welcome to Connect 4\n");

    let mut first = cli
        .player_one
        .build(Piece::PlayerOne, search, cli.seed)
        .context("failed to set up player 1")?;
    let mut second = cli
        .player_two
        .build(Piece::PlayerTwo, search, cli.seed.map(|s| s.wrapping_add(1)))
        .context("failed to set up player 2")?;
    info!(player_one = %first.name(), player_two = %second.name(), "starting game");

    display::draw(&Board::new())?;
    let (state, board) = arena::play_game(first.as_mut(), second.as_mut(), |board, piece, column| {
        println!("Player {} plays column {}", piece.number(), column);
        display::draw(board).expect("Failed to draw board!");
    })?;

    match state {
        GameState::Win(piece) => println!("Player {} wins!", piece.number()),
        GameState::Draw => println!("Draw!"),
        GameState::Playing => unreachable!("game ended while still playing"),
    }
    info!(moves = board.num_moves(), "game over");
    Ok(())
}
