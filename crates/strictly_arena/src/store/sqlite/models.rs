//! Row types and their conversion into domain records.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use strictly_grids::{GameId, GameKind, Move, MoveId, Outcome, Player, Position};
use tracing::instrument;

use crate::{GameRecord, StoreError};

use super::schema;

/// Game row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: String,
    game_type: String,
    created_at: NaiveDateTime,
    winner: Option<String>,
}

impl GameRow {
    /// Decodes the stored text columns into a [`GameRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if a column holds a value the
    /// domain types do not accept.
    #[instrument(skip(self), fields(id = %self.id))]
    pub fn into_record(self) -> Result<GameRecord, StoreError> {
        let id: GameId = self.id.parse().map_err(|e| {
            StoreError::transport("decode_game", format!("Invalid game id '{}': {}", self.id, e))
        })?;
        let kind: GameKind = self.game_type.parse().map_err(|_| {
            StoreError::transport("decode_game", format!("Invalid game type '{}'", self.game_type))
        })?;
        let winner = self
            .winner
            .as_deref()
            .map(str::parse::<Outcome>)
            .transpose()
            .map_err(|e| StoreError::transport("decode_game", e))?;
        Ok(GameRecord::new(id, kind, self.created_at, winner))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    id: String,
    game_type: String,
    created_at: NaiveDateTime,
}

/// Move row. `ply` is the move's index in its game's log.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::moves)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MoveRow {
    id: String,
    game_id: String,
    ply: i32,
    player: String,
    row_index: i32,
    col_index: i32,
    created_at: NaiveDateTime,
}

impl MoveRow {
    /// Decodes the stored columns into a [`Move`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if a column holds a value the
    /// domain types do not accept.
    #[instrument(skip(self), fields(id = %self.id, ply = self.ply))]
    pub fn into_move(self) -> Result<Move, StoreError> {
        let decode = |what: &str, value: &dyn std::fmt::Display| {
            StoreError::transport("decode_move", format!("Invalid {} '{}'", what, value))
        };
        let id: MoveId = self.id.parse().map_err(|_| decode("move id", &self.id))?;
        let game_id: GameId = self
            .game_id
            .parse()
            .map_err(|_| decode("game id", &self.game_id))?;
        let player: Player = self
            .player
            .parse()
            .map_err(|_| decode("player", &self.player))?;
        let row = usize::try_from(self.row_index).map_err(|_| decode("row", &self.row_index))?;
        let col = usize::try_from(self.col_index).map_err(|_| decode("column", &self.col_index))?;
        Ok(Move::new(
            id,
            game_id,
            player,
            Position::new(row, col),
            self.created_at,
        ))
    }
}

/// Insertable move row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRow {
    id: String,
    game_id: String,
    ply: i32,
    player: String,
    row_index: i32,
    col_index: i32,
    created_at: NaiveDateTime,
}
