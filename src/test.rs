#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};

    use crate::arena::{play_game, run_matches, GameState, MatchConfig, PlayerKind};
    use crate::board::{Board, Cell, Piece, DIRECTIONS};
    use crate::evaluation::{evaluate, score_window, WIN_SCORE};
    use crate::player::{Player, RandomPlayer, SearchPlayer};
    use crate::search::{SearchConfig, Searcher, Strategy, Turn, SCORE_BOUND};
    use crate::{choose_move_alphabeta, choose_move_expectimax, Error, COLS, ROWS};

    const FULL_BOARD: &str = "111111222222333333444444555555666666777777";

    fn random_board(rng: &mut StdRng, max_moves: usize) -> Result<Board> {
        let mut board = Board::new();
        let mut piece = Piece::PlayerOne;
        for _ in 0..rng.random_range(0..=max_moves) {
            let column = match board.legal_moves().choose(rng) {
                Some(&column) => column,
                None => break,
            };
            board = board.apply(column, piece)?;
            piece = piece.opponent();
        }
        Ok(board)
    }

    fn searcher(depth: u32, parallel: bool) -> Result<Searcher> {
        Ok(Searcher::new(SearchConfig { depth, parallel })?)
    }

    #[test]
    pub fn legal_moves_ascending_and_playable() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let board = random_board(&mut rng, ROWS * COLS)?;
            let moves = board.legal_moves();

            assert!(moves.windows(2).all(|pair| pair[0] < pair[1]));
            for column in 0..COLS {
                let has_space = (0..ROWS).any(|row| board.get(row, column).is_empty());
                assert_eq!(moves.contains(&column), has_space);
            }
        }
        Ok(())
    }

    #[test]
    pub fn apply_returns_new_board() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let board = random_board(&mut rng, 30)?;
            let before = board;
            for column in board.legal_moves() {
                let next = board.apply(column, Piece::PlayerTwo)?;
                assert_eq!(board, before);

                let landing = board.height(column);
                for row in 0..ROWS {
                    for c in 0..COLS {
                        if (row, c) == (landing, column) {
                            assert_eq!(board.get(row, c), Cell::Empty);
                            assert_eq!(next.get(row, c), Cell::PlayerTwo);
                        } else {
                            assert_eq!(next.get(row, c), board.get(row, c));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn apply_full_column() -> Result<()> {
        let board = Board::from_moves("444444")?;
        assert_eq!(
            board.apply(3, Piece::PlayerOne),
            Err(Error::IllegalMove { column: 3 })
        );
        assert_eq!(
            board.apply(COLS, Piece::PlayerOne),
            Err(Error::ColumnOutOfRange { column: COLS })
        );
        for column in (0..COLS).filter(|&c| c != 3) {
            board.apply(column, Piece::PlayerOne)?;
        }
        assert!(!board.legal_moves().contains(&3));
        Ok(())
    }

    #[test]
    pub fn top_row_is_playable() -> Result<()> {
        let board = Board::from_moves("11111")?;
        let next = board.apply(0, Piece::PlayerTwo)?;
        assert_eq!(next.get(ROWS - 1, 0), Cell::PlayerTwo);
        assert!(!next.playable(0));
        Ok(())
    }

    #[test]
    pub fn board_from_rows() -> Result<()> {
        let rows: [[u8; COLS]; ROWS] = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 0, 0, 0],
            [0, 0, 2, 1, 0, 0, 0],
        ];
        let board = Board::from_rows(&rows)?;
        assert_eq!(board, Board::from_moves("434")?);
        assert_eq!(board.num_moves(), 3);
        Ok(())
    }

    #[test]
    pub fn invalid_boards() {
        let short_row = vec![vec![0u8; COLS]; ROWS - 1];
        assert!(matches!(Board::from_rows(&short_row), Err(Error::InvalidBoard(_))));

        let mut wide = vec![vec![0u8; COLS]; ROWS];
        wide[2].push(0);
        assert!(matches!(Board::from_rows(&wide), Err(Error::InvalidBoard(_))));
        assert!(matches!(choose_move_alphabeta(&wide, 1), Err(Error::InvalidBoard(_))));
        assert!(matches!(choose_move_expectimax(&wide, 1), Err(Error::InvalidBoard(_))));

        let mut floating = vec![vec![0u8; COLS]; ROWS];
        floating[ROWS - 2][4] = 1;
        assert!(matches!(Board::from_rows(&floating), Err(Error::InvalidBoard(_))));

        let mut unknown = vec![vec![0u8; COLS]; ROWS];
        unknown[ROWS - 1][0] = 3;
        assert!(matches!(Board::from_rows(&unknown), Err(Error::InvalidBoard(_))));

        assert!(matches!(Board::from_moves("12a"), Err(Error::InvalidBoard(_))));
        assert!(matches!(Board::from_moves("8"), Err(Error::InvalidBoard(_))));
        assert_eq!(
            Board::from_moves("1111111"),
            Err(Error::IllegalMove { column: 0 })
        );
    }

    #[test]
    pub fn invalid_configuration() -> Result<()> {
        assert!(matches!(
            Searcher::new(SearchConfig { depth: 0, parallel: false }),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(Piece::from_number(0), Err(Error::Configuration(_))));
        let empty = vec![vec![0u8; COLS]; ROWS];
        assert!(matches!(choose_move_alphabeta(&empty, 3), Err(Error::Configuration(_))));

        let full = Board::from_moves(FULL_BOARD)?;
        assert_eq!(
            searcher(4, false)?.choose_move_alphabeta(&full, Piece::PlayerOne),
            Err(Error::NoLegalMoves)
        );
        Ok(())
    }

    #[test]
    pub fn four_in_a_row() -> Result<()> {
        // bottom row 0..=3 for player one
        let horizontal = Board::from_moves("1627374")?;
        assert!(horizontal.is_terminal_for(Piece::PlayerOne));
        assert!(!horizontal.is_terminal_for(Piece::PlayerTwo));
        assert!(horizontal
            .windows(&DIRECTIONS)
            .any(|window| score_window(&window, Piece::PlayerOne) == WIN_SCORE));
        assert!(evaluate(&horizontal, Piece::PlayerOne) >= WIN_SCORE);

        let vertical = Board::from_moves("1212121")?;
        assert!(vertical.is_terminal_for(Piece::PlayerOne));
        assert!(vertical.is_won_by(Piece::PlayerOne));

        let three = Board::from_moves("11223")?;
        assert!(!three.is_terminal_for(Piece::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn diagonal_only_seen_by_full_win_check() -> Result<()> {
        // player one on (0,0) (1,1) (2,2) (3,3)
        let diagonal = Board::from_moves("12233434454")?;
        assert_eq!(diagonal.get(3, 3), Cell::PlayerOne);
        assert!(diagonal.is_won_by(Piece::PlayerOne));
        assert!(!diagonal.is_terminal_for(Piece::PlayerOne));
        Ok(())
    }

    #[test]
    pub fn evaluation_is_symmetric() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let board = random_board(&mut rng, 30)?;
            assert_eq!(
                evaluate(&board, Piece::PlayerOne),
                evaluate(&board.swapped(), Piece::PlayerTwo)
            );
        }
        Ok(())
    }

    #[test]
    pub fn empty_board_prefers_centre() -> Result<()> {
        let board = Board::new();
        assert_eq!(searcher(4, false)?.choose_move_alphabeta(&board, Piece::PlayerOne)?, 3);

        let empty = vec![vec![0u8; COLS]; ROWS];
        assert_eq!(choose_move_alphabeta(&empty, 1)?, 3);
        assert_eq!(choose_move_expectimax(&empty, 1)?, 3);
        Ok(())
    }

    #[test]
    pub fn blocks_open_three() -> Result<()> {
        let rows: [[u8; COLS]; ROWS] = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [2, 2, 2, 0, 0, 0, 0],
        ];
        assert_eq!(choose_move_alphabeta(&rows, 1)?, 3);
        Ok(())
    }

    #[test]
    pub fn expectimax_takes_the_win() -> Result<()> {
        let left: [[u8; COLS]; ROWS] = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [2, 2, 2, 0, 0, 0, 0],
            [1, 1, 1, 0, 0, 0, 0],
        ];
        assert_eq!(choose_move_expectimax(&left, 1)?, 3);

        let right: [[u8; COLS]; ROWS] = [
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 2, 2, 2],
            [0, 0, 0, 0, 1, 1, 1],
        ];
        assert_eq!(choose_move_expectimax(&right, 1)?, 3);
        Ok(())
    }

    #[test]
    pub fn chance_nodes_weight_by_board_width() -> Result<()> {
        let board = Board::from_moves("111111")?;
        let me = Piece::PlayerOne;
        let (column, value) = searcher(4, false)?.expectimax(&board, 1, Turn::Minimizing, me);

        let mut expected = 0.0;
        for (_, child) in board.children(me.opponent()) {
            expected += evaluate(&child, me) as f64 / COLS as f64;
        }
        assert_eq!(column, None);
        assert_eq!(value, expected);
        assert_eq!(board.legal_moves().len(), COLS - 1);
        Ok(())
    }

    #[test]
    pub fn search_base_cases() -> Result<()> {
        let mut searcher = searcher(4, false)?;
        let me = Piece::PlayerTwo;

        let board = Board::from_moves("4455")?;
        assert_eq!(
            searcher.alphabeta(&board, 0, -SCORE_BOUND, SCORE_BOUND, Turn::Maximizing, me),
            (None, evaluate(&board, me))
        );

        // a full board is scored as a draw, not evaluated
        let full = Board::from_moves(FULL_BOARD)?;
        assert_eq!(
            searcher.alphabeta(&full, 3, -SCORE_BOUND, SCORE_BOUND, Turn::Maximizing, me),
            (None, 0)
        );
        assert_eq!(searcher.minimax(&full, 3, Turn::Minimizing, me), (None, 0));
        assert_eq!(searcher.expectimax(&full, 3, Turn::Maximizing, me), (None, 0.0));
        Ok(())
    }

    #[test]
    pub fn alphabeta_is_deterministic() -> Result<()> {
        let board = Board::from_moves("4453")?;
        let first = searcher(4, false)?.choose_move_alphabeta(&board, Piece::PlayerOne)?;
        let mut repeat = searcher(4, false)?;
        for _ in 0..5 {
            assert_eq!(repeat.choose_move_alphabeta(&board, Piece::PlayerOne)?, first);
        }
        Ok(())
    }

    #[test]
    pub fn pruning_never_changes_the_result() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut searcher = searcher(4, false)?;
        for _ in 0..60 {
            let board = random_board(&mut rng, 36)?;
            if board.is_full() {
                continue;
            }
            for &me in &[Piece::PlayerOne, Piece::PlayerTwo] {
                for depth in 1..=3 {
                    let pruned =
                        searcher.alphabeta(&board, depth, -SCORE_BOUND, SCORE_BOUND, Turn::Maximizing, me);
                    let full = searcher.minimax(&board, depth, Turn::Maximizing, me);
                    assert_eq!(pruned, full, "depth {} on {:?}", depth, board);
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn pruning_visits_fewer_nodes() -> Result<()> {
        let board = Board::new();
        let mut pruned = searcher(4, false)?;
        let mut full = searcher(4, false)?;
        let a = pruned.choose_move(&board, Piece::PlayerOne, Strategy::AlphaBeta)?;
        let b = full.choose_move(&board, Piece::PlayerOne, Strategy::Minimax)?;

        assert_eq!(a, b);
        // every node of a 7-wide tree to depth 4
        assert_eq!(full.node_count, 1 + 7 + 49 + 343 + 2401);
        assert!(pruned.node_count < full.node_count);
        Ok(())
    }

    #[test]
    pub fn parallel_root_matches_sequential() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sequential = searcher(3, false)?;
        let mut parallel = searcher(3, true)?;
        for _ in 0..20 {
            let board = random_board(&mut rng, 30)?;
            if board.is_full() {
                continue;
            }
            for &strategy in &[Strategy::AlphaBeta, Strategy::Expectimax, Strategy::Minimax] {
                assert_eq!(
                    sequential.choose_move(&board, Piece::PlayerTwo, strategy)?,
                    parallel.choose_move(&board, Piece::PlayerTwo, strategy)?
                );
            }
        }
        Ok(())
    }

    #[test]
    pub fn random_player_picks_legal_columns() -> Result<()> {
        let board = Board::from_moves("444444111111")?;
        let mut player = RandomPlayer::with_seed(Piece::PlayerOne, 9);
        for _ in 0..50 {
            let column = player.choose_move(&board)?;
            assert!(board.legal_moves().contains(&column));
        }

        let full = Board::from_moves(FULL_BOARD)?;
        assert_eq!(player.choose_move(&full), Err(Error::NoLegalMoves));
        Ok(())
    }

    #[test]
    pub fn games_end_in_a_consistent_state() -> Result<()> {
        for seed in 0..5 {
            let mut first = SearchPlayer::expectimax(Piece::PlayerOne, SearchConfig { depth: 2, parallel: false })?;
            let mut second = RandomPlayer::with_seed(Piece::PlayerTwo, seed);
            let mut moves = 0;
            let (state, board) = play_game(&mut first, &mut second, |_, _, _| moves += 1)?;

            assert_eq!(board.num_moves(), moves);
            match state {
                GameState::Win(piece) => assert!(board.is_won_by(piece)),
                GameState::Draw => assert!(board.is_full()),
                GameState::Playing => return Err(anyhow!("game returned while still playing")),
            }
        }
        Ok(())
    }

    #[test]
    pub fn players_must_take_their_own_piece() -> Result<()> {
        let mut first = RandomPlayer::with_seed(Piece::PlayerTwo, 1);
        let mut second = SearchPlayer::alphabeta(Piece::PlayerOne, SearchConfig::default())?;
        assert_eq!(second.name(), "Player 1:alphabeta");
        assert!(matches!(
            play_game(&mut first, &mut second, |_, _, _| {}),
            Err(Error::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    pub fn seeded_matches_are_reproducible() -> Result<()> {
        let config = MatchConfig {
            player_one: PlayerKind::Random,
            player_two: PlayerKind::Random,
            search: SearchConfig::default(),
            games: 16,
            seed: Some(2024),
            progress: false,
        };
        let first = run_matches(&config)?;
        let second = run_matches(&config)?;

        assert_eq!(first.games(), 16);
        assert_eq!(first, second);
        Ok(())
    }
}
