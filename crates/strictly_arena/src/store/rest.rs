//! Blocking HTTP client for a REST game service.
//!
//! The service exposes:
//!
//! | Method | Path                   | Body                              |
//! |--------|------------------------|-----------------------------------|
//! | POST   | `/games/`              | `{"game_type": "TicTacToe"}`      |
//! | GET    | `/games/{id}`          |                                   |
//! | PUT    | `/games/{id}`          | `{"winner": "X"}`                 |
//! | DELETE | `/games/{id}`          |                                   |
//! | GET    | `/games/{id}/moves`    |                                   |
//! | POST   | `/games/{id}/moves`    | `{"player": "X", "position": {"row": 0, "col": 2}}` |
//!
//! 404 means the game is unknown, 400 and 422 mean the body was rejected.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strictly_grids::{GameId, GameKind, Move, MoveId, Outcome, Player, Position};
use tracing::{debug, info, instrument, warn};

use crate::{GameRecord, GameStore, StoreError, TransportError};

/// Game as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct GameRead {
    id: GameId,
    createdat: NaiveDateTime,
    #[serde(default)]
    winner: Option<Outcome>,
    game_type: GameKind,
    #[serde(default)]
    moves: Vec<MoveRead>,
}

impl From<GameRead> for GameRecord {
    fn from(game: GameRead) -> Self {
        GameRecord::new(game.id, game.game_type, game.createdat, game.winner)
    }
}

/// Move as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MoveRead {
    id: MoveId,
    game_id: GameId,
    player: Player,
    row: usize,
    col: usize,
    timestamp: NaiveDateTime,
}

impl From<MoveRead> for Move {
    fn from(mv: MoveRead) -> Self {
        Move::new(
            mv.id,
            mv.game_id,
            mv.player,
            Position::new(mv.row, mv.col),
            mv.timestamp,
        )
    }
}

/// Wire form of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct PositionBody {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl From<Position> for PositionBody {
    fn from(pos: Position) -> Self {
        Self::new(pos.row, pos.col)
    }
}

/// Body of `POST /games/{id}/moves`.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct MoveCreate {
    /// The moving player.
    pub player: Player,
    /// The cell written.
    pub position: PositionBody,
}

/// Body of `PUT /games/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct UpdateWinnerRequest {
    /// The result to record.
    pub winner: Outcome,
}

#[derive(Debug, Serialize)]
struct GameCreate {
    game_type: GameKind,
}

/// [`GameStore`] speaking to a remote game service.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    client: Client,
}

impl RestStore {
    /// Creates a client for the service at `base_url`, e.g. `http://localhost:8000`.
    #[instrument(skip(base_url), fields(base_url = %base_url))]
    pub fn new(base_url: String) -> Self {
        info!("Creating RestStore");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn game_url(&self, id: GameId) -> String {
        format!("{}/games/{}", self.base_url, id)
    }

    fn moves_url(&self, id: GameId) -> String {
        format!("{}/games/{}/moves", self.base_url, id)
    }

    /// Sends a request and maps error statuses onto [`StoreError`].
    fn send(
        operation: &'static str,
        id: Option<GameId>,
        request: RequestBuilder,
    ) -> Result<Response, StoreError> {
        let response = request
            .send()
            .map_err(|e| StoreError::transport(operation, e))?;
        let status = response.status();
        debug!(operation, status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        warn!(operation, status = status.as_u16(), body = %body, "Request failed");
        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(StoreError::NotFound(id)),
            (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
                Err(StoreError::BadRequest(body))
            }
            _ => Err(TransportError::new(operation, body)
                .with_status(status.as_u16())
                .into()),
        }
    }

    fn json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, StoreError> {
        response.json().map_err(|e| {
            StoreError::transport(operation, format!("Invalid response body: {}", e))
        })
    }
}

impl GameStore for RestStore {
    #[instrument(skip(self))]
    fn create_game(&self, kind: GameKind) -> Result<GameRecord, StoreError> {
        let request = self
            .client
            .post(format!("{}/games/", self.base_url))
            .json(&GameCreate { game_type: kind });
        let game: GameRead = Self::json("create_game", Self::send("create_game", None, request)?)?;
        info!(game_id = %game.id, "Game created");
        Ok(game.into())
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn get_game(&self, id: GameId) -> Result<GameRecord, StoreError> {
        let request = self.client.get(self.game_url(id));
        let game: GameRead = Self::json("get_game", Self::send("get_game", Some(id), request)?)?;
        Ok(game.into())
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn list_moves(&self, id: GameId) -> Result<Vec<Move>, StoreError> {
        let request = self.client.get(self.moves_url(id));
        let moves: Vec<MoveRead> =
            Self::json("list_moves", Self::send("list_moves", Some(id), request)?)?;
        debug!(count = moves.len(), "Moves loaded");
        Ok(moves.into_iter().map(Move::from).collect())
    }

    #[instrument(skip(self), fields(game_id = %id, %player, %position))]
    fn append_move(
        &self,
        id: GameId,
        player: Player,
        position: Position,
    ) -> Result<Move, StoreError> {
        let request = self
            .client
            .post(self.moves_url(id))
            .json(&MoveCreate::new(player, position.into()));
        let response = Self::send("append_move", Some(id), request)?;
        let mv: MoveRead = Self::json("append_move", response)?;
        info!(move_id = %mv.id, "Move appended");
        Ok(mv.into())
    }

    #[instrument(skip(self), fields(game_id = %id, %outcome))]
    fn set_winner(&self, id: GameId, outcome: Outcome) -> Result<GameRecord, StoreError> {
        let request = self
            .client
            .put(self.game_url(id))
            .json(&UpdateWinnerRequest::new(outcome));
        let response = Self::send("set_winner", Some(id), request)?;
        let game: GameRead = Self::json("set_winner", response)?;
        info!("Winner recorded");
        Ok(game.into())
    }

    #[instrument(skip(self), fields(game_id = %id))]
    fn delete_game(&self, id: GameId) -> Result<(), StoreError> {
        let request = self.client.delete(self.game_url(id));
        Self::send("delete_game", Some(id), request)?;
        info!("Game deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_read_parses_service_payload() {
        let json = r#"{
            "id": "5f0c6c1e-3a8e-4d3b-9a57-2f3c1b7d9e10",
            "createdat": "2024-06-01T12:30:00.123456",
            "winner": null,
            "game_type": "Connect4",
            "moves": [{
                "id": "0b9d7c4e-8f1a-4e2b-b3c5-6d7e8f9a0b1c",
                "game_id": "5f0c6c1e-3a8e-4d3b-9a57-2f3c1b7d9e10",
                "player": "X",
                "row": 5,
                "col": 3,
                "timestamp": "2024-06-01T12:31:00"
            }]
        }"#;
        let game: GameRead = serde_json::from_str(json).expect("valid payload");
        assert_eq!(*game.game_type(), GameKind::Connect4);
        assert_eq!(game.moves().len(), 1);

        let mv = Move::from(game.moves()[0].clone());
        assert_eq!(*mv.position(), Position::new(5, 3));

        let record = GameRecord::from(game);
        assert_eq!(*record.winner(), None);
        assert_eq!(
            record.id().to_string(),
            "5f0c6c1e-3a8e-4d3b-9a57-2f3c1b7d9e10"
        );
    }

    #[test]
    fn test_winner_payload_round_trip_text() {
        let json = r#"{
            "id": "5f0c6c1e-3a8e-4d3b-9a57-2f3c1b7d9e10",
            "createdat": "2024-06-01T12:30:00",
            "winner": "Tie",
            "game_type": "TicTacToe"
        }"#;
        let game: GameRead = serde_json::from_str(json).expect("valid payload");
        assert_eq!(*game.winner(), Some(Outcome::Tie));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_request_bodies_match_service_shapes() {
        let body = serde_json::to_value(MoveCreate::new(
            Player::O,
            Position::new(2, 1).into(),
        ))
        .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"player": "O", "position": {"row": 2, "col": 1}})
        );

        let body = serde_json::to_value(UpdateWinnerRequest::new(Outcome::Winner(Player::X)))
            .expect("serialize");
        assert_eq!(body, serde_json::json!({"winner": "X"}));

        let body = serde_json::to_value(GameCreate {
            game_type: GameKind::TicTacToe,
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({"game_type": "TicTacToe"}));
    }
}
