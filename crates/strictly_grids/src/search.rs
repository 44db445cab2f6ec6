//! Exhaustive minimax search for the computer's move.
//!
//! The search explores every legal continuation from the given board,
//! scoring terminal positions +1 (computer won), -1 (human won) or 0 (tie).
//! There is no pruning and no transposition cache. With the default
//! [`SearchLimits`] there is no depth cutoff either, which is exact and
//! fast for tic-tac-toe but impractical on a near-empty connect-four board.

use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

use crate::{Board, Outcome, Player, Position, Square, rules};

/// Bounds on the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum plies to look ahead. `None` searches to the end of the game.
    pub max_depth: Option<usize>,
}

impl SearchLimits {
    /// Searches every line to a terminal position.
    pub const EXACT: Self = Self { max_depth: None };

    /// Stops after `max_depth` plies and scores the horizon as a tie.
    pub const fn depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, including terminal ones.
    pub nodes: u64,
    /// Positions cut off by the depth limit.
    pub horizon: u64,
}

/// Minimax searcher playing `ai` against `human`.
#[derive(Debug, Clone)]
pub struct Minimax {
    ai: Player,
    human: Player,
    limits: SearchLimits,
    stats: SearchStats,
}

impl Minimax {
    /// Creates an exact searcher.
    pub fn new(ai: Player, human: Player) -> Self {
        Self::with_limits(ai, human, SearchLimits::EXACT)
    }

    /// Creates a searcher with explicit limits.
    pub fn with_limits(ai: Player, human: Player, limits: SearchLimits) -> Self {
        Self {
            ai,
            human,
            limits,
            stats: SearchStats::default(),
        }
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Picks the computer's move, or `None` if there is no legal move.
    ///
    /// Candidates are tried in enumeration order (row-major for free
    /// placement, ascending column under gravity). The first candidate whose
    /// score strictly beats the best so far is kept, so ties go to the
    /// earliest candidate. The given board is never modified.
    #[instrument(skip(self, board), fields(ai = %self.ai, occupied = board.occupied()))]
    pub fn best_move(&mut self, board: &Board) -> Option<Position> {
        self.stats = SearchStats::default();
        let mut scratch = board.clone();
        let mut best: Option<(Position, i32)> = None;

        for candidate in candidates(&scratch) {
            let score = {
                let mut placed = Placement::new(&mut scratch, candidate, self.ai);
                self.score(&mut placed, self.human, 1)
            };
            debug!(%candidate, score, "Scored candidate");
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if better {
                best = Some((candidate, score));
            }
        }

        debug!(
            chosen = ?best.map(|(pos, _)| pos),
            score = ?best.map(|(_, score)| score),
            nodes = self.stats.nodes,
            horizon = self.stats.horizon,
            "Search finished"
        );
        best.map(|(pos, _)| pos)
    }

    fn score(&mut self, board: &mut Board, to_move: Player, depth: usize) -> i32 {
        self.stats.nodes += 1;

        if let Some(outcome) = rules::evaluate(board) {
            return self.terminal_score(outcome);
        }
        if self.limits.max_depth.is_some_and(|max| depth >= max) {
            self.stats.horizon += 1;
            return 0;
        }

        let maximizing = to_move == self.ai;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for candidate in candidates(board) {
            let mut placed = Placement::new(board, candidate, to_move);
            let score = self.score(&mut placed, to_move.opponent(), depth + 1);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }

    fn terminal_score(&self, outcome: Outcome) -> i32 {
        match outcome.winner() {
            Some(player) if player == self.ai => 1,
            Some(player) if player == self.human => -1,
            _ => 0,
        }
    }
}

/// Picks the computer's move with an exact search.
pub fn best_move(board: &Board, ai: Player, human: Player) -> Option<Position> {
    Minimax::new(ai, human).best_move(board)
}

/// Legal cells in enumeration order.
fn candidates(board: &Board) -> Vec<Position> {
    let geometry = board.geometry();
    if geometry.gravity() {
        (0..geometry.cols())
            .filter_map(|col| board.landing_row(col).map(|row| Position::new(row, col)))
            .collect()
    } else {
        board.empty_positions().collect()
    }
}

/// A simulated mark that is erased when the guard goes out of scope.
///
/// Every placement is undone on every exit path, so simulated state can
/// never leak into the board the caller sees.
struct Placement<'a> {
    board: &'a mut Board,
    position: Position,
}

impl<'a> Placement<'a> {
    fn new(board: &'a mut Board, position: Position, player: Player) -> Self {
        board.put(position, Square::Occupied(player));
        Self { board, position }
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.put(self.position, Square::Empty);
    }
}
