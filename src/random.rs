//! Uniformly random play.
//!
//! Used as a baseline opponent for testing and as the sparring partner
//! for training learners.

use crate::agent::Agent;
use crate::error::GameError;
use crate::position::{Move, Position};

/// Agent that picks uniformly among the legal moves.
pub struct RandomAgent {
    rng: fastrand::Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Reproducible agent for tests and benchmarks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, pos: &Position, legal: &[Move]) -> Result<Move, GameError> {
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves(pos.to_move()));
        }
        Ok(legal[self.rng.usize(..legal.len())])
    }
}
