//! The game grid and the moves that can be made on it

use std::fmt;

use crate::error::{Error, Result};
use crate::{COLS, ROWS, WINDOW_LENGTH};

/// One of the two sides in a game
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Piece {
    PlayerOne,
    PlayerTwo,
}

impl Piece {
    /// Resolves a player number (1 or 2) to a piece
    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Piece::PlayerOne),
            2 => Ok(Piece::PlayerTwo),
            _ => Err(Error::Configuration(format!(
                "player number must be 1 or 2, got {}",
                number
            ))),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Piece::PlayerOne => 1,
            Piece::PlayerTwo => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Piece::PlayerOne => Piece::PlayerTwo,
            Piece::PlayerTwo => Piece::PlayerOne,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(Cell::Empty),
            1 => Some(Cell::PlayerOne),
            2 => Some(Cell::PlayerTwo),
            _ => None,
        }
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::PlayerOne => Cell::PlayerOne,
            Piece::PlayerTwo => Cell::PlayerTwo,
        }
    }
}

/// Row and column steps of the four line directions: horizontal, vertical and both diagonals
pub(crate) const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
const ORTHOGONAL: [(isize, isize); 2] = [(0, 1), (1, 0)];

/// A fixed `ROWS` x `COLS` Connect 4 grid
///
/// Boards are small `Copy` values. [`Board::apply`] never mutates the board it is
/// called on, so a search can hand every child position its own copy and never
/// needs to undo a move.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; COLS * ROWS], // cells are stored left-to-right, bottom-to-top
    heights: [usize; COLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; COLS * ROWS],
            heights: [0; COLS],
        }
    }

    /// Builds a board from rows of cell values, top row first
    ///
    /// `0` is an empty cell, `1` and `2` are the two players' pieces. Every row
    /// must have exactly `COLS` cells and pieces must rest on the bottom or on
    /// another piece.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != ROWS {
            return Err(Error::InvalidBoard(format!("found {} rows", rows.len())));
        }

        let mut board = Self::new();
        // walk from the bottom row upwards so that gravity can be checked per column
        for (row, values) in rows.iter().rev().enumerate() {
            let values = values.as_ref();
            if values.len() != COLS {
                return Err(Error::InvalidBoard(format!(
                    "row {} has {} cells",
                    ROWS - 1 - row,
                    values.len()
                )));
            }
            for (column, &value) in values.iter().enumerate() {
                let cell = Cell::from_number(value).ok_or_else(|| {
                    Error::InvalidBoard(format!("unknown cell value {}", value))
                })?;
                if cell.is_empty() {
                    continue;
                }
                if board.heights[column] != row {
                    return Err(Error::InvalidBoard(format!(
                        "piece floating above an empty cell in column {}",
                        column
                    )));
                }
                board.cells[column + COLS * row] = cell;
                board.heights[column] += 1;
            }
        }
        Ok(board)
    }

    /// Builds a board from a string of 1-indexed column digits, starting with player one
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut piece = Piece::PlayerOne;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=COLS) => {
                    board = board.apply(column - 1, piece)?;
                    piece = piece.opponent();
                }
                _ => {
                    return Err(Error::InvalidBoard(format!(
                        "could not parse '{}' as a valid move",
                        column_char
                    )))
                }
            }
        }
        Ok(board)
    }

    /// Returns the cell at `row` (0 is the bottom) and `column`
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[column + COLS * row]
    }

    /// Number of pieces in `column`
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn num_moves(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < COLS && self.heights[column] < ROWS
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == ROWS)
    }

    /// Every column with at least one empty cell, in ascending order
    ///
    /// The order is significant: searches try moves in this order and keep the
    /// first move that reaches the best score.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&column| self.playable(column)).collect()
    }

    /// Returns a new board with `piece` dropped into `column`
    pub fn apply(&self, column: usize, piece: Piece) -> Result<Self> {
        if column >= COLS {
            return Err(Error::ColumnOutOfRange { column });
        }
        if !self.playable(column) {
            return Err(Error::IllegalMove { column });
        }
        let mut next = *self;
        next.cells[column + COLS * next.heights[column]] = piece.into();
        next.heights[column] += 1;
        Ok(next)
    }

    /// Every position reachable by `piece` in one move, paired with the column played
    pub fn children(&self, piece: Piece) -> impl Iterator<Item = (usize, Board)> + '_ {
        self.legal_moves()
            .into_iter()
            .filter_map(move |column| self.apply(column, piece).ok().map(|next| (column, next)))
    }

    /// True if `piece` has four in a row horizontally or vertically
    ///
    /// Diagonal lines are not considered here, see [`Board::is_won_by`].
    pub fn is_terminal_for(&self, piece: Piece) -> bool {
        self.has_line(piece, &ORTHOGONAL)
    }

    /// True if `piece` has four in a row in any direction
    pub fn is_won_by(&self, piece: Piece) -> bool {
        self.has_line(piece, &DIRECTIONS)
    }

    /// The same position with every piece swapped for the opponent's
    pub fn swapped(&self) -> Self {
        let mut swapped = *self;
        for cell in swapped.cells.iter_mut() {
            *cell = match *cell {
                Cell::PlayerOne => Cell::PlayerTwo,
                Cell::PlayerTwo => Cell::PlayerOne,
                Cell::Empty => Cell::Empty,
            };
        }
        swapped
    }

    /// Every window of `WINDOW_LENGTH` adjacent cells along `directions`
    pub(crate) fn windows<'a>(
        &'a self,
        directions: &'a [(isize, isize)],
    ) -> impl Iterator<Item = [Cell; WINDOW_LENGTH]> + 'a {
        directions.iter().flat_map(move |&(dr, dc)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |column| self.window_at(row, column, dr, dc))
            })
        })
    }

    fn window_at(&self, row: usize, column: usize, dr: isize, dc: isize) -> Option<[Cell; WINDOW_LENGTH]> {
        let end_row = row as isize + dr * (WINDOW_LENGTH as isize - 1);
        let end_column = column as isize + dc * (WINDOW_LENGTH as isize - 1);
        if end_row < 0 || end_row >= ROWS as isize || end_column < 0 || end_column >= COLS as isize {
            return None;
        }

        let mut window = [Cell::Empty; WINDOW_LENGTH];
        for (k, cell) in window.iter_mut().enumerate() {
            let r = (row as isize + dr * k as isize) as usize;
            let c = (column as isize + dc * k as isize) as usize;
            *cell = self.get(r, c);
        }
        Some(window)
    }

    fn has_line(&self, piece: Piece, directions: &[(isize, isize)]) -> bool {
        let target = Cell::from(piece);
        self.windows(directions)
            .any(|window| window.iter().all(|&cell| cell == target))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for column in 0..COLS {
                let symbol = match self.get(row, column) {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}
