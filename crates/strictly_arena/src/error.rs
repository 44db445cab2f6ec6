//! Error types for stores and sessions.

use derive_more::{Display, Error};
use strictly_grids::{GameId, MoveError, Outcome};
use tracing::instrument;

/// A store call failed for reasons outside the game: I/O, HTTP, database or decoding.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error in {}: {} at {}:{}", operation, message, file, line)]
pub struct TransportError {
    /// Store operation that failed, e.g. `append_move`.
    pub operation: &'static str,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            operation,
            status: None,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Attaches the HTTP status that caused the failure.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Failure reported by a [`GameStore`](crate::GameStore).
#[derive(Debug, Clone, Display, Error)]
pub enum StoreError {
    /// The game does not exist.
    #[display("Game {_0} not found")]
    NotFound(#[error(not(source))] GameId),
    /// The store refused the request as malformed, e.g. an invalid winner value.
    #[display("Bad request: {_0}")]
    BadRequest(#[error(not(source))] String),
    /// The store could not be reached or answered unexpectedly.
    #[display("{_0}")]
    Transport(TransportError),
}

impl StoreError {
    /// Wraps a lower-level failure as a transport error for `operation`.
    #[track_caller]
    pub fn transport(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Transport(TransportError::new(operation, err.to_string()))
    }
}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::transport("sqlite", format!("Diesel error: {}", err))
    }
}

/// Failure of a [`GameSession`](crate::GameSession) operation.
#[derive(Debug, Clone, Display, Error)]
pub enum SessionError {
    /// The move broke the rules; nothing was written.
    #[display("Illegal move: {_0}")]
    IllegalMove(MoveError),
    /// The game already ended.
    #[display("Game is over: {_0}")]
    GameOver(#[error(not(source))] Outcome),
    /// The computer is to move; retry its move with
    /// [`GameSession::advance`](crate::GameSession::advance).
    #[display("The computer is to move")]
    AwaitingComputer,
    /// The game does not exist in the store.
    #[display("Game {_0} not found")]
    NotFound(#[error(not(source))] GameId),
    /// The store rejected a request as malformed.
    #[display("Store rejected request: {_0}")]
    BadRequest(#[error(not(source))] String),
    /// The store failed; local turn state is unchanged.
    #[display("{_0}")]
    Transport(TransportError),
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::IllegalMove(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::BadRequest(message) => Self::BadRequest(message),
            StoreError::Transport(transport) => Self::Transport(transport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_records_location() {
        let err = TransportError::new("get_game", "connection refused");
        assert_eq!(err.operation, "get_game");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_wrapped_failures_name_their_operation() {
        match StoreError::transport("migrate", "no such table: games") {
            StoreError::Transport(err) => {
                assert_eq!(err.operation, "migrate");
                assert!(err.message.contains("no such table"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match StoreError::from(diesel::result::Error::NotFound) {
            StoreError::Transport(err) => assert_eq!(err.operation, "sqlite"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_store_errors_map_to_session_errors() {
        let id = GameId::new_v4();
        assert!(matches!(
            SessionError::from(StoreError::NotFound(id)),
            SessionError::NotFound(found) if found == id
        ));
        let transport = TransportError::new("append_move", "boom").with_status(500);
        match SessionError::from(StoreError::from(transport)) {
            SessionError::Transport(err) => assert_eq!(err.status, Some(500)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
