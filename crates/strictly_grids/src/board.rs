//! Grid snapshot derived from a move log.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::{Geometry, MoveError, Player, Position};

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// A grid of squares shaped by a [`Geometry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    geometry: Geometry,
    /// Squares in row-major order.
    squares: Vec<Square>,
}

impl Board {
    /// Creates a new empty board.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            squares: vec![Square::Empty; geometry.cell_count()],
        }
    }

    /// Returns the board shape.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Gets the square at the given position, or `None` if it is off the board.
    pub fn get(&self, pos: Position) -> Option<Square> {
        self.geometry.index(pos).map(|i| self.squares[i])
    }

    /// Checks if a square is on the board and empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) -> Result<(), MoveError> {
        let i = self.geometry.index(pos).ok_or(MoveError::OutOfBounds(pos))?;
        self.squares[i] = square;
        Ok(())
    }

    /// Writes a square the caller already knows is on the board.
    pub(crate) fn put(&mut self, pos: Position, square: Square) {
        if let Some(i) = self.geometry.index(pos) {
            self.squares[i] = square;
        }
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Lowest empty row in a column, where a dropped piece would land.
    ///
    /// Returns `None` if the column is full or off the board.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.geometry.cols() {
            return None;
        }
        (0..self.geometry.rows())
            .rev()
            .find(|&row| self.is_empty(Position::new(row, col)))
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.geometry.positions().filter(|&pos| self.is_empty(pos))
    }

    /// Formats the board as a diagnostic text grid.
    ///
    /// The first line lists column indices; each following line starts with
    /// the row index, then `.` for an empty square or the player letter.
    pub fn render(&self) -> String {
        let mut out = String::from(" ");
        for col in 0..self.geometry.cols() {
            let _ = write!(out, " {}", col);
        }
        out.push('\n');
        for row in 0..self.geometry.rows() {
            let _ = write!(out, "{}", row);
            for col in 0..self.geometry.cols() {
                let symbol = match self.get(Position::new(row, col)) {
                    Some(Square::Occupied(player)) => player.to_string(),
                    _ => ".".to_string(),
                };
                let _ = write!(out, " {}", symbol);
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(Geometry::CONNECT_FOUR);
        assert_eq!(board.squares().len(), 42);
        assert_eq!(board.occupied(), 0);
        assert_eq!(board.empty_positions().count(), 42);
    }

    #[test]
    fn test_set_out_of_bounds_fails() {
        let mut board = Board::new(Geometry::TIC_TAC_TOE);
        let pos = Position::new(3, 0);
        assert_eq!(
            board.set(pos, Square::Occupied(Player::X)),
            Err(MoveError::OutOfBounds(pos))
        );
    }

    #[test]
    fn test_landing_row_respects_gravity() {
        let mut board = Board::new(Geometry::CONNECT_FOUR);
        assert_eq!(board.landing_row(2), Some(5));
        board.set(Position::new(5, 2), Square::Occupied(Player::X)).unwrap();
        assert_eq!(board.landing_row(2), Some(4));
        for row in 0..5 {
            board.set(Position::new(row, 2), Square::Occupied(Player::O)).unwrap();
        }
        assert_eq!(board.landing_row(2), None);
        assert_eq!(board.landing_row(7), None);
    }

    #[test]
    fn test_render_tic_tac_toe() {
        let mut board = Board::new(Geometry::TIC_TAC_TOE);
        board.set(Position::new(0, 0), Square::Occupied(Player::X)).unwrap();
        board.set(Position::new(1, 1), Square::Occupied(Player::O)).unwrap();
        assert_eq!(board.render(), "  0 1 2\n0 X . .\n1 . O .\n2 . . .\n");
    }
}
