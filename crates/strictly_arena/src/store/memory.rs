//! Process-local store for tests and offline play.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use strictly_grids::{GameId, GameKind, Move, MoveId, Outcome, Player, Position};
use tracing::{debug, info, instrument};

use crate::{GameRecord, GameStore, StoreError};

#[derive(Debug)]
struct StoredGame {
    record: GameRecord,
    moves: Vec<Move>,
}

/// Keeps games in a mutex-guarded map. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: Mutex<HashMap<GameId, StoredGame>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of games currently held.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.games("len")?.len())
    }

    /// True if the store holds no games.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn games(
        &self,
        operation: &'static str,
    ) -> Result<MutexGuard<'_, HashMap<GameId, StoredGame>>, StoreError> {
        self.games.lock().map_err(|e| {
            StoreError::transport(operation, format!("Store lock poisoned: {}", e))
        })
    }
}

impl GameStore for InMemoryStore {
    #[instrument(skip(self))]
    fn create_game(&self, kind: GameKind) -> Result<GameRecord, StoreError> {
        let record = GameRecord::new(GameId::new_v4(), kind, Utc::now().naive_utc(), None);
        self.games("create_game")?.insert(
            *record.id(),
            StoredGame {
                record: record.clone(),
                moves: Vec::new(),
            },
        );
        info!(game_id = %record.id(), "Game created");
        Ok(record)
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn get_game(&self, id: GameId) -> Result<GameRecord, StoreError> {
        self.games("get_game")?
            .get(&id)
            .map(|game| game.record.clone())
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn list_moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
        let moves = self
            .games("list_moves")?
            .get(&id)
            .map(|game| game.moves.clone())
            .ok_or(StoreError::NotFound(id))?;
        debug!(count = moves.len(), "Moves loaded");
        Ok(moves)
    }

    #[instrument(skip(self), fields(game_id = %id, %player, %position))]
    fn append_move(
        &self,
        id: GameId,
        player: Player,
        position: Position,
    ) -> Result<Move, StoreError> {
        let mut games = self.games("append_move")?;
        let game = games.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let mv = Move::new(MoveId::new_v4(), id, player, position, Utc::now().naive_utc());
        game.moves.push(mv.clone());
        debug!(ply = game.moves.len() - 1, "Move appended");
        Ok(mv)
    }

    #[instrument(skip(self), fields(game_id = %id, %outcome))]
    fn set_winner(&self, id: GameId, outcome: Outcome) -> Result<GameRecord, StoreError> {
        let mut games = self.games("set_winner")?;
        let game = games.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        game.record = GameRecord::new(
            *game.record.id(),
            *game.record.kind(),
            *game.record.created_at(),
            Some(outcome),
        );
        info!("Winner recorded");
        Ok(game.record.clone())
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn delete_game(&self, id: GameId) -> Result<(), StoreError> {
        self.games("delete_game")?
            .remove(&id)
            .map(|_| info!("Game deleted"))
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_moves_keep_append_order() {
        let store = InMemoryStore::new();
        let game = store.create_game(GameKind::TicTacToe).expect("create");
        let id = *game.id();
        store
            .append_move(id, Player::X, Position::new(1, 1))
            .expect("append");
        store
            .append_move(id, Player::O, Position::new(0, 0))
            .expect("append");

        let moves = store.list_moves(id).expect("list");
        assert_eq!(moves.len(), 2);
        assert_eq!(*moves[0].player(), Player::X);
        assert_eq!(*moves[1].position(), Position::new(0, 0));
    }

    #[test]
    fn test_unknown_game_is_not_found() {
        let store = InMemoryStore::new();
        let id = GameId::new_v4();
        assert!(matches!(store.get_game(id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.list_moves(id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_game(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_game() {
        let store = InMemoryStore::new();
        let game = store.create_game(GameKind::Connect4).expect("create");
        store.delete_game(*game.id()).expect("delete");
        assert!(store.is_empty().expect("len"));
    }

    #[test]
    fn test_poisoned_lock_is_transport_error() {
        let store = Arc::new(InMemoryStore::new());
        let holder = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _games = holder.games.lock().expect("lock");
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Transport(_))));
        assert!(matches!(
            store.create_game(GameKind::TicTacToe),
            Err(StoreError::Transport(_))
        ));
    }
}
