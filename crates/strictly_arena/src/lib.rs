//! Strictly Arena - play grid games against a minimax opponent.
//!
//! The game logic lives in [`strictly_grids`]; this crate binds it to a
//! persistence collaborator that owns games and their append-only move logs.
//!
//! # Architecture
//!
//! - **Store**: the [`GameStore`] trait, with in-memory, SQLite and REST backends
//! - **Session**: [`GameSession`] validates, records and answers moves for one game
//! - **Config**: [`ArenaConfig`] picks a backend and the players' sides
//!
//! # Example
//!
//! ```
//! use strictly_arena::{GameSession, InMemoryStore, SessionSettings, SubmitOutcome};
//! use strictly_grids::{GameKind, Player, Position, Target};
//!
//! # fn main() -> Result<(), strictly_arena::SessionError> {
//! let store = InMemoryStore::new();
//! let mut session = GameSession::open(&store, GameKind::TicTacToe, SessionSettings::default())?;
//! let reply = session.submit_move(Player::X, Target::Cell(Position::new(1, 1)))?;
//! assert!(matches!(reply, SubmitOutcome::AiResponded { .. }));
//! println!("{}", session.render_board());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod session;
mod store;

pub use config::{ArenaConfig, ConfigError, StoreKind};
pub use error::{SessionError, StoreError, TransportError};
pub use session::{GameSession, SessionManager, SessionSettings, SessionState, SubmitOutcome};
pub use store::{
    GameRead, GameRecord, GameStore, InMemoryStore, MoveCreate, MoveRead, PositionBody, RestStore,
    SqliteStore, UpdateWinnerRequest,
};
