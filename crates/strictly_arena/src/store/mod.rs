//! The persistence collaborator that owns games and their move logs.
//!
//! Every call is synchronous and acquires its own resource (a database
//! connection or an HTTP request) for the duration of the call. Nothing is
//! retried.

mod memory;
mod rest;
mod sqlite;

pub use memory::InMemoryStore;
pub use rest::{GameRead, MoveCreate, MoveRead, PositionBody, RestStore, UpdateWinnerRequest};
pub use sqlite::SqliteStore;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_grids::{GameId, GameKind, Move, Outcome, Player, Position};

use crate::StoreError;

/// A game as the store knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GameRecord {
    id: GameId,
    kind: GameKind,
    created_at: NaiveDateTime,
    winner: Option<Outcome>,
}

/// Operations on remotely held games.
pub trait GameStore {
    /// Creates a new game with no moves and no winner.
    fn create_game(&self, kind: GameKind) -> Result<GameRecord, StoreError>;

    /// Fetches a game.
    fn get_game(&self, id: GameId) -> Result<GameRecord, StoreError>;

    /// Returns the game's moves in the order they were accepted.
    fn list_moves(&self, id: GameId) -> Result<Vec<Move>, StoreError>;

    /// Appends one move to the game's log.
    fn append_move(
        &self,
        id: GameId,
        player: Player,
        position: Position,
    ) -> Result<Move, StoreError>;

    /// Records the game's result and returns the updated game.
    fn set_winner(&self, id: GameId, outcome: Outcome) -> Result<GameRecord, StoreError>;

    /// Deletes the game and its moves.
    fn delete_game(&self, id: GameId) -> Result<(), StoreError>;
}

macro_rules! forward_game_store {
    ($($ty:ty),+) => {$(
        impl<T: GameStore + ?Sized> GameStore for $ty {
            fn create_game(&self, kind: GameKind) -> Result<GameRecord, StoreError> {
                (**self).create_game(kind)
            }

            fn get_game(&self, id: GameId) -> Result<GameRecord, StoreError> {
                (**self).get_game(id)
            }

            fn list_moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
                (**self).list_moves(id)
            }

            fn append_move(
                &self,
                id: GameId,
                player: Player,
                position: Position,
            ) -> Result<Move, StoreError> {
                (**self).append_move(id, player, position)
            }

            fn set_winner(&self, id: GameId, outcome: Outcome) -> Result<GameRecord, StoreError> {
                (**self).set_winner(id, outcome)
            }

            fn delete_game(&self, id: GameId) -> Result<(), StoreError> {
                (**self).delete_game(id)
            }
        }
    )+};
}

forward_game_store!(&T, Arc<T>, Box<T>);
