//! Move records and move targets.
//!
//! A [`Move`] is an immutable entry in a game's append-only log. A
//! [`Target`] is what a player asks for before the move exists: a cell for
//! tic-tac-toe, a column for connect-four.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Player, Position};

/// Identifier of a game, as issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct GameId(Uuid);

impl GameId {
    /// Generates a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for GameId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Identifier of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct MoveId(Uuid);

impl MoveId {
    /// Generates a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for MoveId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for MoveId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A committed move: a player's mark written at a position.
///
/// Moves are never edited or deleted. A game's log is totally ordered by
/// the order in which the store accepted them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Move {
    id: MoveId,
    game_id: GameId,
    player: Player,
    position: Position,
    timestamp: NaiveDateTime,
}

impl Move {
    /// Creates a new move record.
    pub fn new(
        id: MoveId,
        game_id: GameId,
        player: Player,
        position: Position,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            game_id,
            player,
            position,
            timestamp,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position)
    }
}

/// Where a player wants to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Target {
    /// An explicit cell.
    #[display("cell {_0}")]
    Cell(Position),
    /// A column; the row is decided by gravity.
    #[display("column {_0}")]
    Column(usize),
}

/// Reason a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// It's not this player's turn.
    #[display("It's not {player}'s turn, {expected} is to move")]
    WrongPlayer {
        /// The player who tried to move.
        player: Player,
        /// The player whose turn it is.
        expected: Player,
    },

    /// The position is off the board.
    #[display("Position {_0} is off the board")]
    OutOfBounds(Position),

    /// The column is off the board.
    #[display("Column {_0} is off the board")]
    ColumnOutOfBounds(usize),

    /// The square at the position is already occupied.
    #[display("Square {_0} is already occupied")]
    SquareOccupied(Position),

    /// The column has no empty row left.
    #[display("Column {_0} is full")]
    ColumnFull(usize),

    /// A dropped piece would not come to rest at this cell.
    #[display("A piece dropped in column {} would not land at {}", _0.col, _0)]
    NotLanding(Position),

    /// The target form does not fit this board, such as a column on a board without gravity.
    #[display("{_0} is not a valid move on this board")]
    WrongTarget(Target),
}

impl std::error::Error for MoveError {}
