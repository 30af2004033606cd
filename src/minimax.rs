//! Depth-limited minimax search with alpha-beta pruning.
//!
//! The search scores every node from the point of view of the player to move
//! at the root (`me`):
//! - Won positions score `WIN_SCORE - depth`, lost ones `depth - WIN_SCORE`,
//!   so quicker wins and slower losses are preferred
//! - Positions at the depth limit are scored by [`evaluate`]
//! - Max layers (our turn) and min layers (their turn) alternate below the root
//!
//! Every branch works on its own copy of the board, so sibling branches
//! never see each other's moves.

use tracing::debug;

use crate::agent::Agent;
use crate::constants::{DEFAULT_DEPTH, MAX_SCORE, MIN_SCORE, WIN_SCORE};
use crate::error::GameError;
use crate::eval::evaluate;
use crate::position::{Move, Player, Position, check_winner, legal_moves, play_move};

/// Search limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies to look ahead; the root's children sit at depth 1.
    pub max_depth: usize,
    /// Optional node budget. Once spent, remaining nodes are scored
    /// heuristically instead of being expanded.
    pub max_nodes: Option<u64>,
}

impl SearchConfig {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            max_nodes: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

/// Best move found by a search, with its value and the work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// Minimax value of `best_move` from the mover's point of view.
    pub score: i32,
    /// Nodes visited below the root.
    pub nodes: u64,
}

struct Search {
    me: Player,
    max_depth: usize,
    max_nodes: Option<u64>,
    nodes: u64,
}

/// Search `pos` to `max_depth` plies and return the best move.
///
/// Returns `None` only if the player to move has no legal move.
pub fn best_move(pos: &Position, max_depth: usize) -> Option<SearchResult> {
    search(pos, &SearchConfig::new(max_depth))
}

/// Run the search with explicit limits.
///
/// `pos` must not be a finished game; check [`check_winner`] first.
pub fn search(pos: &Position, config: &SearchConfig) -> Option<SearchResult> {
    debug_assert!(
        check_winner(pos).is_none(),
        "search called on a finished game"
    );

    let mut s = Search {
        me: pos.to_move(),
        max_depth: config.max_depth.max(1),
        max_nodes: config.max_nodes,
        nodes: 0,
    };

    let mut alpha = MIN_SCORE;
    let mut best: Option<(Move, i32)> = None;

    for mv in legal_moves(pos) {
        let Some(child) = successor(pos, mv) else {
            continue;
        };
        let value = s.min_value(&child, alpha, MAX_SCORE, 1);
        if best.is_none_or(|(_, v)| value > v) {
            best = Some((mv, value));
        }
        alpha = alpha.max(value);
    }

    let (best_move, score) = best?;
    debug!(%best_move, score, nodes = s.nodes, depth = s.max_depth, "search finished");
    Some(SearchResult {
        best_move,
        score,
        nodes: s.nodes,
    })
}

/// The position after `mv`, with the turn passed.
#[inline]
fn successor(pos: &Position, mv: Move) -> Option<Position> {
    let mut child = *pos;
    play_move(&mut child, mv).ok()?;
    Some(child)
}

impl Search {
    /// Score a node without expanding it, if it is terminal, at the
    /// horizon, or past the node budget.
    fn leaf_value(&self, pos: &Position, depth: usize) -> Option<i32> {
        if let Some(winner) = check_winner(pos) {
            let depth = depth as i32;
            return Some(if winner == self.me {
                WIN_SCORE - depth
            } else {
                depth - WIN_SCORE
            });
        }
        let out_of_budget = self.max_nodes.is_some_and(|max| self.nodes >= max);
        if depth >= self.max_depth || out_of_budget {
            return Some(evaluate(pos, self.me));
        }
        None
    }

    /// Opponent to move: minimize.
    fn min_value(&mut self, pos: &Position, alpha: i32, mut beta: i32, depth: usize) -> i32 {
        self.nodes += 1;
        if let Some(v) = self.leaf_value(pos, depth) {
            return v;
        }

        let moves = legal_moves(pos);
        if moves.is_empty() {
            return evaluate(pos, self.me);
        }

        let mut value = MAX_SCORE;
        for mv in moves {
            let Some(child) = successor(pos, mv) else {
                continue;
            };
            value = value.min(self.max_value(&child, alpha, beta, depth + 1));
            if value <= alpha {
                return value;
            }
            beta = beta.min(value);
        }
        value
    }

    /// Our turn: maximize.
    fn max_value(&mut self, pos: &Position, mut alpha: i32, beta: i32, depth: usize) -> i32 {
        self.nodes += 1;
        if let Some(v) = self.leaf_value(pos, depth) {
            return v;
        }

        let moves = legal_moves(pos);
        if moves.is_empty() {
            return evaluate(pos, self.me);
        }

        let mut value = MIN_SCORE;
        for mv in moves {
            let Some(child) = successor(pos, mv) else {
                continue;
            };
            value = value.max(self.min_value(&child, alpha, beta, depth + 1));
            if value >= beta {
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }
}

/// Agent that plays the minimax choice at a fixed depth.
pub struct MinimaxAgent {
    name: String,
    config: SearchConfig,
}

impl MinimaxAgent {
    pub fn new(max_depth: usize) -> Self {
        Self::with_config(SearchConfig::new(max_depth))
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            name: format!("minimax(d={})", config.max_depth),
            config,
        }
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, pos: &Position, legal: &[Move]) -> Result<Move, GameError> {
        match search(pos, &self.config) {
            Some(result) => Ok(result.best_move),
            None => legal
                .first()
                .copied()
                .ok_or(GameError::NoLegalMoves(pos.to_move())),
        }
    }
}
