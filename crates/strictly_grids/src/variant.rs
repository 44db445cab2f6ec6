//! The capability contract every game variant provides.
//!
//! Variants are thin: all shared behaviour is written once against
//! [`Geometry`] in the default methods below, and each concrete variant only
//! supplies its identity and how a player types a move.

use tracing::instrument;

use crate::{
    Board, GameKind, Geometry, Minimax, Move, MoveError, Outcome, Player, Position, SearchLimits,
    Target, rules,
};

/// Rules of one grid game: reconstruction, legality, evaluation and search.
pub trait Variant: std::fmt::Debug + Send + Sync {
    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Parses a move typed by a player, e.g. `"1 2"` or `"4"`.
    fn parse_target(&self, input: &str) -> Option<Target>;

    /// Short description of the expected input, for prompts.
    fn input_hint(&self) -> &'static str;

    /// Board shape.
    fn geometry(&self) -> Geometry {
        self.kind().geometry()
    }

    /// A fresh empty board.
    fn new_board(&self) -> Board {
        Board::new(self.geometry())
    }

    /// Rebuilds the board from an ordered move log.
    fn reconstruct(&self, moves: &[Move]) -> Board {
        rules::reconstruct(moves, self.geometry())
    }

    /// Validates a move and returns the cell it writes.
    fn check_move(
        &self,
        board: &Board,
        player: Player,
        target: Target,
        expected: Player,
    ) -> Result<Position, MoveError> {
        rules::check_move(board, player, target, expected)
    }

    /// Returns true if the move is legal.
    fn is_legal(&self, board: &Board, player: Player, target: Target, expected: Player) -> bool {
        rules::is_legal(board, player, target, expected)
    }

    /// Winner, tie, or `None` while the game is in progress.
    fn evaluate(&self, board: &Board) -> Option<Outcome> {
        rules::evaluate(board)
    }

    /// The computer's move, or `None` if the board has no legal move.
    #[instrument(skip(self, board), fields(kind = %self.kind()))]
    fn best_move(
        &self,
        board: &Board,
        ai: Player,
        human: Player,
        limits: SearchLimits,
    ) -> Option<Position> {
        Minimax::with_limits(ai, human, limits).best_move(board)
    }

    /// Diagnostic text dump of the board.
    fn render(&self, board: &Board) -> String {
        board.render()
    }

    /// The target a player would submit to occupy `position`.
    fn target_for(&self, position: Position) -> Target {
        if self.geometry().gravity() {
            Target::Column(position.col)
        } else {
            Target::Cell(position)
        }
    }
}

/// 3×3 tic-tac-toe. Moves name a cell as `row col`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicTacToe;

impl Variant for TicTacToe {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn parse_target(&self, input: &str) -> Option<Target> {
        let mut parts = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty());
        let row = parts.next()?.parse().ok()?;
        let col = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Target::Cell(Position::new(row, col)))
    }

    fn input_hint(&self) -> &'static str {
        "row col"
    }
}

/// 6×7 connect-four. Moves name a column; the piece falls to the lowest empty row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectFour;

impl Variant for ConnectFour {
    fn kind(&self) -> GameKind {
        GameKind::Connect4
    }

    fn parse_target(&self, input: &str) -> Option<Target> {
        input.trim().parse().ok().map(Target::Column)
    }

    fn input_hint(&self) -> &'static str {
        "column"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_map_to_variants() {
        assert_eq!(GameKind::TicTacToe.variant().kind(), GameKind::TicTacToe);
        assert_eq!(GameKind::Connect4.variant().kind(), GameKind::Connect4);
        assert_eq!(ConnectFour.geometry(), Geometry::CONNECT_FOUR);
    }

    #[test]
    fn test_parse_tic_tac_toe_input() {
        assert_eq!(
            TicTacToe.parse_target("1 2"),
            Some(Target::Cell(Position::new(1, 2)))
        );
        assert_eq!(
            TicTacToe.parse_target("0,1"),
            Some(Target::Cell(Position::new(0, 1)))
        );
        assert_eq!(TicTacToe.parse_target("1"), None);
        assert_eq!(TicTacToe.parse_target("1 2 3"), None);
    }

    #[test]
    fn test_parse_connect_four_input() {
        assert_eq!(ConnectFour.parse_target(" 4 "), Some(Target::Column(4)));
        assert_eq!(ConnectFour.parse_target("four"), None);
    }

    #[test]
    fn test_target_for_uses_gravity() {
        let pos = Position::new(5, 3);
        assert_eq!(ConnectFour.target_for(pos), Target::Column(3));
        assert_eq!(TicTacToe.target_for(Position::new(1, 1)), Target::Cell(Position::new(1, 1)));
    }
}
