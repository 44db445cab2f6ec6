//! Board shapes and the winning windows they contain.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Directions a winning window can run in: right, down, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Shape parameters of a game variant.
///
/// Every rule in this crate is written against a `Geometry` rather than a
/// concrete game, so tic-tac-toe and connect-four share one implementation
/// of reconstruction, legality and win detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    rows: usize,
    cols: usize,
    win_length: usize,
    gravity: bool,
}

impl Geometry {
    /// 3×3 board, three in a row, pieces stay where they are placed.
    pub const TIC_TAC_TOE: Self = Self::new(3, 3, 3, false);

    /// 6×7 board, four in a row, pieces fall to the lowest empty row.
    pub const CONNECT_FOUR: Self = Self::new(6, 7, 4, true);

    /// Creates a new geometry.
    pub const fn new(rows: usize, cols: usize, win_length: usize, gravity: bool) -> Self {
        Self {
            rows,
            cols,
            win_length,
            gravity,
        }
    }

    /// Number of rows.
    pub const fn rows(self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(self) -> usize {
        self.cols
    }

    /// Number of same-player cells in a line needed to win.
    pub const fn win_length(self) -> usize {
        self.win_length
    }

    /// Whether moves name a column and fall to the lowest empty row.
    pub const fn gravity(self) -> bool {
        self.gravity
    }

    /// Total number of cells.
    pub const fn cell_count(self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if the position lies on the board.
    pub fn contains(self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major index of a position, or `None` if it is off the board.
    pub fn index(self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    /// All positions in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.cell_count()).map(move |i| Position::new(i / cols, i % cols))
    }

    /// All winning windows: horizontal first, then vertical, then both diagonals.
    ///
    /// For a 3×3 board with win length 3 this yields exactly the eight
    /// tic-tac-toe lines (three rows, three columns, two diagonals).
    pub fn windows(self) -> impl Iterator<Item = Window> {
        DIRECTIONS.into_iter().flat_map(move |step| {
            self.positions()
                .map(move |start| Window {
                    start,
                    step,
                    len: self.win_length,
                })
                .filter(move |window| window.fits(self))
        })
    }
}

/// A run of `win_length` cells in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    start: Position,
    step: (isize, isize),
    len: usize,
}

impl Window {
    /// First cell of the window.
    pub fn start(&self) -> Position {
        self.start
    }

    /// The cells covered by this window, from `start` outward.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        (0..self.len).map(move |i| {
            let (row, col) = self.offset(i as isize);
            Position::new(row as usize, col as usize)
        })
    }

    fn offset(&self, i: isize) -> (isize, isize) {
        (
            self.start.row as isize + self.step.0 * i,
            self.start.col as isize + self.step.1 * i,
        )
    }

    fn fits(&self, geometry: Geometry) -> bool {
        if self.len == 0 {
            return false;
        }
        let (row, col) = self.offset(self.len as isize - 1);
        (0..geometry.rows as isize).contains(&row) && (0..geometry.cols as isize).contains(&col)
    }
}
