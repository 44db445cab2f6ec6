//! Diesel-backed [`GameStore`].

use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use strictly_grids::{GameId, GameKind, Move, MoveId, Outcome, Player, Position};
use tracing::{debug, info, instrument};

use crate::{GameRecord, GameStore, StoreError};

use super::models::{GameRow, MoveRow, NewGameRow, NewMoveRow};
use super::schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Games and moves in a SQLite database file.
///
/// A connection is opened for each operation and dropped when it returns.
/// The `moves` table carries `UNIQUE(game_id, ply)`, so two writers racing
/// to append the same ply cannot both succeed.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Creates a store for the database at `db_path` without touching it.
    ///
    /// Use [`SqliteStore::open`] unless the schema is already in place.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating SqliteStore");
        Self { db_path }
    }

    /// Creates a store and applies any pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        let store = Self::new(db_path);
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::transport("migrate", e))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::transport(
                "connect",
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    fn ensure_game(conn: &mut SqliteConnection, id: GameId) -> Result<(), StoreError> {
        let found = schema::games::table
            .find(id.to_string())
            .select(schema::games::id)
            .first::<String>(conn)
            .optional()?;
        found.map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self))]
    fn create_game(&self, kind: GameKind) -> Result<GameRecord, StoreError> {
        debug!("Creating game");
        let mut conn = self.connection()?;

        let new_game = NewGameRow::new(
            GameId::new_v4().to_string(),
            kind.to_string(),
            Utc::now().naive_utc(),
        );

        let row = diesel::insert_into(schema::games::table)
            .values(&new_game)
            .returning(GameRow::as_returning())
            .get_result::<GameRow>(&mut conn)?;

        info!(game_id = %row.id(), game_type = %row.game_type(), "Game created");
        row.into_record()
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn get_game(&self, id: GameId) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;

        schema::games::table
            .find(id.to_string())
            .first::<GameRow>(&mut conn)
            .optional()?
            .ok_or(StoreError::NotFound(id))?
            .into_record()
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn list_moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
        let mut conn = self.connection()?;
        Self::ensure_game(&mut conn, id)?;

        let rows = schema::moves::table
            .filter(schema::moves::game_id.eq(id.to_string()))
            .order(schema::moves::ply.asc())
            .load::<MoveRow>(&mut conn)?;

        debug!(count = rows.len(), "Moves loaded");
        rows.into_iter().map(MoveRow::into_move).collect()
    }

    #[instrument(skip(self), fields(game_id = %id, %player, %position))]
    fn append_move(
        &self,
        id: GameId,
        player: Player,
        position: Position,
    ) -> Result<Move, StoreError> {
        let row_index = i32::try_from(position.row)
            .map_err(|_| StoreError::BadRequest(format!("Row {} out of range", position.row)))?;
        let col_index = i32::try_from(position.col)
            .map_err(|_| StoreError::BadRequest(format!("Column {} out of range", position.col)))?;
        let mut conn = self.connection()?;

        let row = conn.transaction::<_, StoreError, _>(|conn| {
            Self::ensure_game(conn, id)?;

            let count: i64 = schema::moves::table
                .filter(schema::moves::game_id.eq(id.to_string()))
                .count()
                .get_result(conn)?;
            let ply = i32::try_from(count)
                .map_err(|e| StoreError::transport("append_move", e))?;

            let new_move = NewMoveRow::new(
                MoveId::new_v4().to_string(),
                id.to_string(),
                ply,
                player.to_string(),
                row_index,
                col_index,
                Utc::now().naive_utc(),
            );

            diesel::insert_into(schema::moves::table)
                .values(&new_move)
                .returning(MoveRow::as_returning())
                .get_result::<MoveRow>(conn)
                .map_err(|e| StoreError::transport("append_move", e))
        })?;

        info!(move_id = %row.id(), ply = row.ply(), "Move appended");
        row.into_move()
    }

    #[instrument(skip(self), fields(game_id = %id, %outcome))]
    fn set_winner(&self, id: GameId, outcome: Outcome) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;

        let row = diesel::update(schema::games::table.find(id.to_string()))
            .set(schema::games::winner.eq(Some(outcome.as_str())))
            .returning(GameRow::as_returning())
            .get_result::<GameRow>(&mut conn)
            .optional()?
            .ok_or(StoreError::NotFound(id))?;

        info!(winner = %outcome, "Winner recorded");
        row.into_record()
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn delete_game(&self, id: GameId) -> Result<(), StoreError> {
        let mut conn = self.connection()?;

        let deleted = conn.transaction::<_, StoreError, _>(|conn| {
            let moves = diesel::delete(
                schema::moves::table.filter(schema::moves::game_id.eq(id.to_string())),
            )
            .execute(conn)?;
            let games = diesel::delete(schema::games::table.find(id.to_string())).execute(conn)?;
            debug!(moves, games, "Rows deleted");
            Ok(games)
        })?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("Game deleted");
        Ok(())
    }
}
