//! Win detection over sliding windows.

use crate::{Board, Outcome, Player, Square, Window};

use super::draw::is_full;

/// Checks if a player fills any winning window.
///
/// Windows are scanned horizontal, vertical, then diagonal; when several
/// are complete (impossible under legal play) the first found is reported.
pub fn winner(board: &Board) -> Option<Player> {
    winning_window(board).map(|(player, _)| player)
}

/// Returns the first complete window and who owns it.
pub fn winning_window(board: &Board) -> Option<(Player, Window)> {
    board.geometry().windows().find_map(|window| {
        let mut cells = window.cells().map(|pos| board.get(pos));
        let first = match cells.next() {
            Some(Some(Square::Occupied(player))) => player,
            _ => return None,
        };
        cells
            .all(|sq| sq == Some(Square::Occupied(first)))
            .then_some((first, window))
    })
}

/// Evaluates the board: a winner, a tie on a full board, or `None` while in progress.
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(player) = winner(board) {
        return Some(Outcome::Winner(player));
    }
    is_full(board).then_some(Outcome::Tie)
}
