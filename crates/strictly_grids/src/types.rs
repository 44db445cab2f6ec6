//! Core domain types shared by every grid game.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString};

use crate::{Geometry, variant::{ConnectFour, TicTacToe, Variant}};

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the player expected to move once `ply` moves have been played.
    ///
    /// X always opens, so an even ply count means X is to move.
    pub fn to_move_after(ply: usize) -> Self {
        if ply % 2 == 0 { Player::X } else { Player::O }
    }
}

/// A cell on the grid, addressed by row (0 is the top row) and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("({row}, {col})")]
pub struct Position {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl Position {
    /// Creates a new position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Outcome {
    /// A player completed a line.
    Winner(Player),
    /// The board filled up with no line completed.
    Tie,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Tie => None,
        }
    }

    /// Returns true if the game was a tie.
    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie)
    }

    /// Converts the outcome to the text stored by game services (`X`, `O` or `Tie`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Winner(Player::X) => "X",
            Outcome::Winner(Player::O) => "O",
            Outcome::Tie => "Tie",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}

/// Error returned when text is not one of `X`, `O` or `Tie`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Winner must be one of 'X', 'O', or 'Tie', got '{}'", value)]
pub struct ParseOutcomeError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Outcome::Winner(Player::X)),
            "O" => Ok(Outcome::Winner(Player::O)),
            "Tie" => Ok(Outcome::Tie),
            other => Err(ParseOutcomeError {
                value: other.to_string(),
            }),
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.as_str().to_string()
    }
}

impl TryFrom<String> for Outcome {
    type Error = ParseOutcomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which game is being played.
///
/// The text form matches what game services store: `TicTacToe` or `Connect4`.
/// Parsing is case-insensitive and also accepts `connect-four`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GameKind {
    /// 3×3 tic-tac-toe.
    #[strum(to_string = "TicTacToe", serialize = "tic-tac-toe")]
    TicTacToe,
    /// 6×7 connect-four with gravity.
    #[strum(to_string = "Connect4", serialize = "connect-four")]
    Connect4,
}

impl GameKind {
    /// Returns the board shape for this game.
    pub fn geometry(self) -> Geometry {
        match self {
            GameKind::TicTacToe => Geometry::TIC_TAC_TOE,
            GameKind::Connect4 => Geometry::CONNECT_FOUR,
        }
    }

    /// Returns the rules implementation for this game.
    pub fn variant(self) -> &'static dyn Variant {
        match self {
            GameKind::TicTacToe => &TicTacToe,
            GameKind::Connect4 => &ConnectFour,
        }
    }
}
