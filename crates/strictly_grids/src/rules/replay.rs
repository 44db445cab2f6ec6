//! Board reconstruction from an ordered move log.

use tracing::{instrument, warn};

use crate::{Board, Geometry, Move, Player, Square};

/// Folds an ordered move log onto an empty board.
///
/// Each move writes its player into its position if that cell is empty.
/// A move aimed at an occupied or off-board cell is skipped, so the first
/// write to a cell wins. The result depends only on the input.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn reconstruct(moves: &[Move], geometry: Geometry) -> Board {
    let mut board = Board::new(geometry);

    for mv in moves {
        let pos = *mv.position();
        match board.get(pos) {
            Some(Square::Empty) => board.put(pos, Square::Occupied(*mv.player())),
            Some(Square::Occupied(existing)) => {
                warn!(move_id = %mv.id(), %pos, ?existing, "Skipping move onto occupied square");
            }
            None => {
                warn!(move_id = %mv.id(), %pos, "Skipping move off the board");
            }
        }
    }

    board
}

/// Returns the player expected to move after the given log.
pub fn next_player(moves: &[Move]) -> Player {
    Player::to_move_after(moves.len())
}
