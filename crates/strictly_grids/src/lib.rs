//! Strictly Grids - pure game logic for two-player grid games.
//!
//! This crate knows nothing about storage or transport. It turns an ordered
//! move log into a board, decides whether a proposed move is legal, detects
//! wins and ties, and searches for the computer's best reply.
//!
//! # Architecture
//!
//! - **Geometry**: shape of a variant (rows, columns, win length, gravity)
//! - **Rules**: reconstruction, legality, win and draw detection over any geometry
//! - **Search**: exhaustive minimax with scoped board simulation
//! - **Variant**: the shared capability trait, implemented by [`TicTacToe`] and [`ConnectFour`]
//!
//! # Example
//!
//! ```
//! use strictly_grids::{GameKind, Player, Position, Target};
//!
//! let variant = GameKind::TicTacToe.variant();
//! let board = variant.new_board();
//! let cell = variant
//!     .check_move(&board, Player::X, Target::Cell(Position::new(1, 1)), Player::X)
//!     .expect("center is open");
//! assert_eq!(cell, Position::new(1, 1));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod geometry;
mod rules;
mod search;
mod types;
mod variant;

pub use action::{GameId, Move, MoveError, MoveId, Target};
pub use board::{Board, Square};
pub use geometry::{Geometry, Window};
pub use rules::{check_move, evaluate, is_full, is_legal, is_tie, next_player, reconstruct, winner};
pub use search::{Minimax, SearchLimits, SearchStats, best_move};
pub use types::{GameKind, Outcome, ParseOutcomeError, Player, Position};
pub use variant::{ConnectFour, TicTacToe, Variant};
