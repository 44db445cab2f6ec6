//! Tests for the SQLite game store.

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use tempfile::NamedTempFile;

use strictly_arena::{
    GameSession, GameStore, SessionSettings, SqliteStore, StoreError, SubmitOutcome,
};
use strictly_grids::{GameId, GameKind, Outcome, Player, Position, Target};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_create_and_get_game() {
    let (_db, store) = setup_test_db();
    let game = store.create_game(GameKind::Connect4).expect("Create failed");
    assert_eq!(*game.kind(), GameKind::Connect4);
    assert_eq!(*game.winner(), None);

    let fetched = store.get_game(*game.id()).expect("Get failed");
    assert_eq!(fetched.id(), game.id());
    assert_eq!(fetched.kind(), game.kind());
}

#[test]
fn test_open_is_idempotent() {
    let (db, store) = setup_test_db();
    let game = store.create_game(GameKind::TicTacToe).expect("Create failed");

    let reopened = SqliteStore::open(store.db_path().to_string()).expect("Reopen failed");
    assert!(reopened.get_game(*game.id()).is_ok());
    drop(db);
}

#[test]
fn test_moves_listed_in_append_order() {
    let (_db, store) = setup_test_db();
    let id = *store.create_game(GameKind::TicTacToe).expect("Create failed").id();

    let cells = [(Player::X, 2, 2), (Player::O, 0, 0), (Player::X, 1, 2)];
    for (player, row, col) in cells {
        let mv = store
            .append_move(id, player, Position::new(row, col))
            .expect("Append failed");
        assert_eq!(*mv.game_id(), id);
    }

    let moves = store.list_moves(id).expect("List failed");
    let listed: Vec<_> = moves
        .iter()
        .map(|mv| (*mv.player(), mv.position().row, mv.position().col))
        .collect();
    assert_eq!(listed, cells);
}

#[test]
fn test_list_moves_empty_game() {
    let (_db, store) = setup_test_db();
    let id = *store.create_game(GameKind::TicTacToe).expect("Create failed").id();
    assert!(store.list_moves(id).expect("List failed").is_empty());
}

#[test]
fn test_set_winner() {
    let (_db, store) = setup_test_db();
    let id = *store.create_game(GameKind::TicTacToe).expect("Create failed").id();

    let updated = store
        .set_winner(id, Outcome::Winner(Player::O))
        .expect("Update failed");
    assert_eq!(*updated.winner(), Some(Outcome::Winner(Player::O)));

    let fetched = store.get_game(id).expect("Get failed");
    assert_eq!(*fetched.winner(), Some(Outcome::Winner(Player::O)));
}

#[test]
fn test_delete_game_removes_moves() {
    let (db, store) = setup_test_db();
    let id = *store.create_game(GameKind::Connect4).expect("Create failed").id();
    store
        .append_move(id, Player::X, Position::new(5, 0))
        .expect("Append failed");

    store.delete_game(id).expect("Delete failed");
    assert!(matches!(store.get_game(id), Err(StoreError::NotFound(_))));
    assert!(matches!(store.list_moves(id), Err(StoreError::NotFound(_))));

    let mut conn =
        SqliteConnection::establish(db.path().to_str().expect("Invalid path")).expect("Connect");
    let remaining: i64 = diesel::select(diesel::dsl::sql::<diesel::sql_types::BigInt>(
        "(SELECT COUNT(*) FROM moves)",
    ))
    .get_result(&mut conn)
    .expect("Count failed");
    assert_eq!(remaining, 0);
}

#[test]
fn test_unknown_game_is_not_found() {
    let (_db, store) = setup_test_db();
    let id = GameId::new_v4();
    assert!(matches!(store.get_game(id), Err(StoreError::NotFound(missing)) if missing == id));
    assert!(matches!(store.list_moves(id), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.append_move(id, Player::X, Position::new(0, 0)),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.set_winner(id, Outcome::Tie),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete_game(id), Err(StoreError::NotFound(_))));
}

#[test]
fn test_duplicate_ply_is_rejected() {
    let (db, store) = setup_test_db();
    let id = *store.create_game(GameKind::TicTacToe).expect("Create failed").id();
    store
        .append_move(id, Player::X, Position::new(1, 1))
        .expect("Append failed");

    let mut conn =
        SqliteConnection::establish(db.path().to_str().expect("Invalid path")).expect("Connect");
    let stale = diesel::sql_query(format!(
        "INSERT INTO moves (id, game_id, ply, player, row_index, col_index) \
         VALUES ('{}', '{}', 0, 'O', 0, 0)",
        GameId::new_v4(),
        id
    ))
    .execute(&mut conn);
    assert!(stale.is_err(), "Second write to ply 0 should fail");
    assert_eq!(store.list_moves(id).expect("List failed").len(), 1);
}

#[test]
fn test_session_over_sqlite_survives_reopen() {
    let (_db, store) = setup_test_db();
    let mut session =
        GameSession::open(&store, GameKind::TicTacToe, SessionSettings::default()).expect("Open");
    let reply = session
        .submit_move(Player::X, Target::Cell(Position::new(0, 0)))
        .expect("Move failed");
    assert!(matches!(reply, SubmitOutcome::AiResponded { .. }));
    let id = session.id();
    let board = session.board().clone();

    let resumed =
        GameSession::resume(&store, id, SessionSettings::default()).expect("Resume failed");
    assert_eq!(resumed.board(), &board);
    assert_eq!(resumed.next_player(), Player::X);
    assert_eq!(resumed.moves().len(), 2);
}
