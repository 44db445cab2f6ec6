//! Move legality against the current board and turn.

use tracing::{debug, instrument};

use crate::{Board, MoveError, Player, Position, Target};

/// Validates a move and resolves the cell it would write.
///
/// A move is legal only if the acting player equals the expected next
/// mover. Then, on a board without gravity, the target must be an
/// on-board empty cell. On a gravity board the target names a column that
/// must exist and have room; the row is the lowest empty one. A cell target
/// on a gravity board is accepted only when it is exactly that landing cell.
///
/// # Errors
///
/// Returns the first [`MoveError`] that applies. Nothing is mutated.
#[instrument(skip(board), fields(geometry = ?board.geometry()))]
pub fn check_move(
    board: &Board,
    player: Player,
    target: Target,
    expected: Player,
) -> Result<Position, MoveError> {
    if player != expected {
        debug!(%player, %expected, "Out of turn");
        return Err(MoveError::WrongPlayer { player, expected });
    }

    let geometry = board.geometry();
    match (target, geometry.gravity()) {
        (Target::Cell(pos), false) => {
            if !geometry.contains(pos) {
                return Err(MoveError::OutOfBounds(pos));
            }
            if !board.is_empty(pos) {
                return Err(MoveError::SquareOccupied(pos));
            }
            Ok(pos)
        }
        (Target::Column(col), true) => {
            if col >= geometry.cols() {
                return Err(MoveError::ColumnOutOfBounds(col));
            }
            let row = board.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
            Ok(Position::new(row, col))
        }
        (Target::Cell(pos), true) => {
            if !geometry.contains(pos) {
                return Err(MoveError::OutOfBounds(pos));
            }
            match board.landing_row(pos.col) {
                None => Err(MoveError::ColumnFull(pos.col)),
                Some(row) if row == pos.row => Ok(pos),
                Some(_) if !board.is_empty(pos) => Err(MoveError::SquareOccupied(pos)),
                Some(_) => Err(MoveError::NotLanding(pos)),
            }
        }
        (Target::Column(_), false) => Err(MoveError::WrongTarget(target)),
    }
}

/// Returns true if [`check_move`] would accept the move.
pub fn is_legal(board: &Board, player: Player, target: Target, expected: Player) -> bool {
    check_move(board, player, target, expected).is_ok()
}
