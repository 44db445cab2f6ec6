//! Game rules over any [`Geometry`](crate::Geometry).
//!
//! This module contains pure functions for evaluating game state.
//! Rules are separated from board storage so every variant and the
//! search can compose them.

pub mod draw;
pub mod legality;
pub mod replay;
pub mod win;

pub use draw::{is_full, is_tie};
pub use legality::{check_move, is_legal};
pub use replay::{next_player, reconstruct};
pub use win::{evaluate, winner};
