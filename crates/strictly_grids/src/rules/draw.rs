//! Draw detection.

use crate::{Board, Square};

use super::win::winner;

/// Checks if the board is full (all squares occupied).
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winner is a tie.
pub fn is_tie(board: &Board) -> bool {
    is_full(board) && winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Outcome, Player, Position, evaluate};

    fn fill(rows: &[&str]) -> Board {
        let mut board = Board::new(Geometry::TIC_TAC_TOE);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let player = match ch {
                    'X' => Player::X,
                    'O' => Player::O,
                    _ => continue,
                };
                board
                    .set(Position::new(row, col), Square::Occupied(player))
                    .expect("on board");
            }
        }
        board
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new(Geometry::TIC_TAC_TOE)));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = fill(&["X..", ".O.", "..."]);
        assert!(!is_full(&board));
        assert!(!is_tie(&board));
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        // X O X / O X X / O X O
        let board = fill(&["XOX", "OXX", "OXO"]);
        assert!(is_tie(&board));
        assert_eq!(evaluate(&board), Some(Outcome::Tie));
    }

    #[test]
    fn test_full_board_with_line_is_not_tie() {
        let board = fill(&["XXX", "OOX", "XOO"]);
        assert!(is_full(&board));
        assert!(!is_tie(&board));
        assert_eq!(evaluate(&board), Some(Outcome::Winner(Player::X)));
    }
}
