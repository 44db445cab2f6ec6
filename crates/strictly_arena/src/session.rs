//! Game sessions: one human against the minimax opponent, moves kept by a store.
//!
//! A [`GameSession`] is an explicit value bound to one game. Every move is
//! validated against the board rebuilt from the store's log, appended once,
//! and only then reflected in the session's turn state. When the human's
//! move does not end the game, the computer's reply goes through the same
//! path before [`GameSession::submit_move`] returns.

use derive_getters::Getters;
use derive_new::new;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use strictly_grids::{
    Board, GameId, GameKind, Move, MoveError, Outcome, Player, SearchLimits, Square, Target,
    Variant, next_player,
};
use tracing::{debug, info, instrument, warn};

use crate::{GameRecord, GameStore, SessionError, TransportError};

/// Who plays which side, and how hard the computer searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct SessionSettings {
    /// The human's mark. The computer plays the other one.
    human: Player,
    /// Search bounds for the computer's moves.
    limits: SearchLimits,
}

impl SessionSettings {
    /// The computer's mark.
    pub fn ai(&self) -> Player {
        self.human.opponent()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(Player::X, SearchLimits::EXACT)
    }
}

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the human to submit a move.
    AwaitingHumanMove,
    /// The computer is to move.
    ComputingAiMove,
    /// The game is over; no further moves are accepted.
    Terminal(Outcome),
}

impl SessionState {
    /// Returns the outcome if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            SessionState::Terminal(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// What an accepted move led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The move was recorded and the computer is not to move.
    Continues {
        /// The recorded move.
        human: Move,
    },
    /// The move was recorded and the computer replied.
    AiResponded {
        /// The recorded move.
        human: Move,
        /// The computer's reply.
        ai: Move,
    },
    /// The game ended, either on the submitted move or on the computer's reply.
    Finished {
        /// The recorded move.
        human: Move,
        /// The computer's reply, if it made one.
        ai: Option<Move>,
        /// The final result.
        outcome: Outcome,
    },
}

/// One game in progress, bound to the store that owns it.
#[derive(Debug)]
pub struct GameSession<S> {
    store: S,
    variant: &'static dyn Variant,
    settings: SessionSettings,
    game: GameRecord,
    moves: Vec<Move>,
    board: Board,
    next: Player,
    state: SessionState,
}

impl<S: GameStore> GameSession<S> {
    /// Creates a new game in the store and opens a session on it.
    ///
    /// If the computer plays X, its opening move is made before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the store fails.
    #[instrument(skip(store))]
    pub fn open(store: S, kind: GameKind, settings: SessionSettings) -> Result<Self, SessionError> {
        let game = store.create_game(kind)?;
        info!(game_id = %game.id(), "Opened new game");
        let variant = kind.variant();
        let mut session = Self {
            store,
            variant,
            settings,
            game,
            moves: Vec::new(),
            board: variant.new_board(),
            next: Player::X,
            state: SessionState::AwaitingHumanMove,
        };
        session.advance()?;
        Ok(session)
    }

    /// Opens a session on an existing game.
    ///
    /// The next player is derived from the log: X opens, then turns
    /// alternate. A game whose board is decided but whose result was never
    /// recorded has the result recorded now. If the computer is to move, it
    /// moves before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if the game does not exist, or
    /// [`SessionError::Transport`] if the store fails.
    #[instrument(skip(store), fields(game_id = %id))]
    pub fn resume(store: S, id: GameId, settings: SessionSettings) -> Result<Self, SessionError> {
        let game = store.get_game(id)?;
        let moves = store.list_moves(id)?;
        let variant = game.kind().variant();
        let board = variant.reconstruct(&moves);
        let next = next_player(&moves);
        let state = match game.winner() {
            Some(outcome) => SessionState::Terminal(*outcome),
            None => SessionState::AwaitingHumanMove,
        };
        info!(moves = moves.len(), %next, ?state, "Resumed game");

        let mut session = Self {
            store,
            variant,
            settings,
            game,
            moves,
            board,
            next,
            state,
        };
        if session.state.outcome().is_none() {
            if let Some(outcome) = session.variant.evaluate(&session.board) {
                warn!(%outcome, "Board is decided but no result was recorded");
                session.finish(outcome)?;
            }
        }
        session.advance()?;
        Ok(session)
    }

    /// Submits a move and, if the game goes on, plays the computer's reply.
    ///
    /// # Errors
    ///
    /// - [`SessionError::GameOver`] if the game has ended; the store is not called.
    /// - [`SessionError::AwaitingComputer`] if the computer's last move was not
    ///   recorded; call [`advance`](Self::advance) to retry it.
    /// - [`SessionError::IllegalMove`] with [`MoveError::WrongPlayer`] if `player`
    ///   is not the human's mark.
    /// - [`SessionError::IllegalMove`] if the move breaks the rules; nothing is written.
    /// - [`SessionError::NotFound`] or [`SessionError::Transport`] if the store fails.
    ///   A failed append leaves the turn state unchanged.
    #[instrument(skip(self), fields(game_id = %self.game.id(), %player, %target))]
    pub fn submit_move(
        &mut self,
        player: Player,
        target: Target,
    ) -> Result<SubmitOutcome, SessionError> {
        match self.state {
            SessionState::Terminal(outcome) => {
                warn!(%outcome, "Move submitted after game over");
                return Err(SessionError::GameOver(outcome));
            }
            SessionState::ComputingAiMove => {
                warn!("Move submitted while the computer is to move");
                return Err(SessionError::AwaitingComputer);
            }
            SessionState::AwaitingHumanMove => {}
        }
        if player != self.settings.human {
            let err = MoveError::WrongPlayer {
                player,
                expected: self.settings.human,
            };
            warn!(error = %err, "Move submitted for the computer's mark");
            return Err(err.into());
        }

        let human = self.commit(player, target)?;
        if let Some(outcome) = self.state.outcome() {
            return Ok(SubmitOutcome::Finished {
                human,
                ai: None,
                outcome,
            });
        }

        match self.advance()? {
            None => Ok(SubmitOutcome::Continues { human }),
            Some(ai) => Ok(match self.state.outcome() {
                Some(outcome) => SubmitOutcome::Finished {
                    human,
                    ai: Some(ai),
                    outcome,
                },
                None => SubmitOutcome::AiResponded { human, ai },
            }),
        }
    }

    /// Plays the computer's move if it is the computer's turn.
    ///
    /// Called by [`open`](Self::open), [`resume`](Self::resume) and
    /// [`submit_move`](Self::submit_move). Call it directly to retry after
    /// the store failed while recording the computer's move.
    ///
    /// # Errors
    ///
    /// Same as [`submit_move`](Self::submit_move).
    #[instrument(skip(self), fields(game_id = %self.game.id()))]
    pub fn advance(&mut self) -> Result<Option<Move>, SessionError> {
        if self.state.outcome().is_some() || self.next != self.settings.ai() {
            return Ok(None);
        }

        let ai = self.settings.ai();
        let Some(position) = self.variant.best_move(
            &self.board,
            ai,
            self.settings.human,
            self.settings.limits,
        ) else {
            warn!("Computer has no move on an undecided board");
            return Ok(None);
        };
        debug!(%position, "Computer chose move");
        self.state = SessionState::ComputingAiMove;

        let mv = self.commit(ai, self.variant.target_for(position))?;
        Ok(Some(mv))
    }

    /// Validates and records one move, then evaluates the board.
    fn commit(&mut self, player: Player, target: Target) -> Result<Move, SessionError> {
        let id = *self.game.id();
        let mut moves = self.store.list_moves(id)?;
        let mut board = self.variant.reconstruct(&moves);

        let expected = next_player(&moves);
        if expected != self.next {
            warn!(local = %self.next, log = %expected, "Turn state out of step with the log");
        }

        if let Some(outcome) = self.variant.evaluate(&board) {
            self.moves = moves;
            self.board = board;
            self.next = expected;
            self.finish(outcome)?;
            return Err(SessionError::GameOver(outcome));
        }

        let position = self
            .variant
            .check_move(&board, player, target, expected)
            .inspect_err(|e| warn!(error = %e, "Rejected move"))?;

        let mv = self.store.append_move(id, player, position)?;
        board.set(position, Square::Occupied(player))?;
        moves.push(mv.clone());
        self.moves = moves;
        self.board = board;
        self.next = player.opponent();
        self.state = if self.next == self.settings.ai() {
            SessionState::ComputingAiMove
        } else {
            SessionState::AwaitingHumanMove
        };
        info!(%player, %position, ply = self.moves.len() - 1, "Move committed");

        if let Some(outcome) = self.variant.evaluate(&self.board) {
            self.finish(outcome)?;
        }
        Ok(mv)
    }

    /// Records the result in the store and enters the terminal state.
    fn finish(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        self.game = self.store.set_winner(*self.game.id(), outcome)?;
        self.state = SessionState::Terminal(outcome);
        info!(game_id = %self.game.id(), %outcome, "Game finished");
        Ok(())
    }

    /// Deletes the game from the store, ending the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] or [`SessionError::Transport`] if the store fails.
    #[instrument(skip(self), fields(game_id = %self.game.id()))]
    pub fn delete(self) -> Result<(), SessionError> {
        self.store.delete_game(*self.game.id())?;
        info!("Game deleted");
        Ok(())
    }

    /// Diagnostic text dump of the current board.
    pub fn render_board(&self) -> String {
        self.variant.render(&self.board)
    }

    /// The game's identifier.
    pub fn id(&self) -> GameId {
        *self.game.id()
    }

    /// Cached copy of the store's game record.
    pub fn game(&self) -> &GameRecord {
        &self.game
    }

    /// Board as of the last committed move.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves in log order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Player expected to move next.
    pub fn next_player(&self) -> Player {
        self.next
    }

    /// Current turn state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The rules in play.
    pub fn variant(&self) -> &'static dyn Variant {
        self.variant
    }

    /// Sides and search bounds.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }
}

/// Shared registry of sessions, one per game.
///
/// Each session sits behind its own mutex, so all moves for a game pass
/// through a single point while different games proceed independently.
#[derive(Debug)]
pub struct SessionManager<S> {
    sessions: Arc<Mutex<HashMap<GameId, Arc<Mutex<GameSession<S>>>>>>,
}

impl<S: GameStore> SessionManager<S> {
    /// Creates an empty manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn registry(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<GameId, Arc<Mutex<GameSession<S>>>>>, SessionError> {
        self.sessions.lock().map_err(|e| {
            SessionError::Transport(TransportError::new(
                "session_registry",
                format!("Session registry lock poisoned: {}", e),
            ))
        })
    }

    /// Registers a session and returns its game id.
    ///
    /// A session already registered for the same game is replaced.
    #[instrument(skip(self, session), fields(game_id = %session.id()))]
    pub fn insert(&self, session: GameSession<S>) -> Result<GameId, SessionError> {
        let id = session.id();
        if self
            .registry()?
            .insert(id, Arc::new(Mutex::new(session)))
            .is_some()
        {
            warn!("Replaced existing session");
        }
        debug!("Session registered");
        Ok(id)
    }

    /// Opens a new game and registers its session.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::open`].
    #[instrument(skip(self, store))]
    pub fn open(
        &self,
        store: S,
        kind: GameKind,
        settings: SessionSettings,
    ) -> Result<GameId, SessionError> {
        self.insert(GameSession::open(store, kind, settings)?)
    }

    /// Gets a session by game id.
    #[instrument(skip(self), fields(game_id = %id))]
    pub fn get(&self, id: GameId) -> Result<Option<Arc<Mutex<GameSession<S>>>>, SessionError> {
        let session = self.registry()?.get(&id).cloned();
        if session.is_none() {
            debug!("Session not found");
        }
        Ok(session)
    }

    /// Submits a move to a registered game while holding that game's lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if no session is registered for
    /// `id`, otherwise whatever [`GameSession::submit_move`] returns.
    #[instrument(skip(self), fields(game_id = %id, %player, %target))]
    pub fn submit_move(
        &self,
        id: GameId,
        player: Player,
        target: Target,
    ) -> Result<SubmitOutcome, SessionError> {
        let session = self.get(id)?.ok_or(SessionError::NotFound(id))?;
        let mut session = session.lock().map_err(|e| {
            SessionError::Transport(TransportError::new(
                "session_lock",
                format!("Session lock poisoned: {}", e),
            ))
        })?;
        session.submit_move(player, target)
    }

    /// Removes a session without touching the store.
    #[instrument(skip(self), fields(game_id = %id))]
    pub fn remove(&self, id: GameId) -> Result<bool, SessionError> {
        Ok(self.registry()?.remove(&id).is_some())
    }

    /// Lists the ids of all registered games.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<GameId>, SessionError> {
        let ids: Vec<_> = self.registry()?.keys().copied().collect();
        info!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }
}

impl<S> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S: GameStore> Default for SessionManager<S> {
    fn default() -> Self {
        Self::new()
    }
}
