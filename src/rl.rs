//! Tabular reinforcement learning.
//!
//! The agent keeps a value for every board it has produced, keyed by
//! [`Position::hash_key`]. During a game it records the key of each board
//! its moves lead to; when the game ends the reward is propagated backwards
//! through that path:
//!
//! ```text
//! v(s) += lr * (gamma * r - v(s));  r = v(s)
//! ```
//!
//! Policies are stored on disk as a bincode-encoded key/value table.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::{Agent, Outcome};
use crate::constants::{DECAY_GAMMA, EXPLORATION_RATE, LEARNING_RATE, REWARD_LOSS, REWARD_WIN};
use crate::error::GameError;
use crate::position::{BoardKey, Move, Player, Position, play_move};

/// On-disk form of a learned policy.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Policy {
    values: HashMap<BoardKey, f64>,
}

/// Agent choosing the move whose resulting board has the highest learned value.
pub struct RlAgent {
    name: String,
    values: HashMap<BoardKey, f64>,
    /// Keys of the boards produced by this agent in the current game.
    states: Vec<BoardKey>,
    learning_rate: f64,
    decay_gamma: f64,
    exploration_rate: f64,
    training: bool,
    rng: fastrand::Rng,
}

impl RlAgent {
    pub fn new(name: &str) -> Self {
        Self::with_rng(name, fastrand::Rng::new())
    }

    /// Reproducible agent for tests.
    pub fn with_seed(name: &str, seed: u64) -> Self {
        Self::with_rng(name, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(name: &str, rng: fastrand::Rng) -> Self {
        Self {
            name: name.to_string(),
            values: HashMap::new(),
            states: Vec::new(),
            learning_rate: LEARNING_RATE,
            decay_gamma: DECAY_GAMMA,
            exploration_rate: EXPLORATION_RATE,
            training: true,
            rng,
        }
    }

    /// Probability of a random move while training, clamped to `[0, 1]`.
    pub fn set_exploration_rate(&mut self, rate: f64) {
        self.exploration_rate = rate.clamp(0.0, 1.0);
    }

    /// Learned value of a board, if it has been seen.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Number of boards with a learned value.
    pub fn known_states(&self) -> usize {
        self.values.len()
    }

    /// Boards recorded in the current game, oldest first.
    pub fn states(&self) -> &[BoardKey] {
        &self.states
    }

    /// Propagate `reward` backwards through the boards of the current game.
    pub fn feed_reward(&mut self, mut reward: f64) {
        for key in self.states.iter().rev() {
            let v = self.values.entry(key.clone()).or_insert(0.0);
            *v += self.learning_rate * (self.decay_gamma * reward - *v);
            reward = *v;
        }
    }

    /// Forget the path of the current game.
    pub fn reset_states(&mut self) {
        self.states.clear();
    }

    /// Write the value table to `path`.
    pub fn save_policy(&self, path: &Path) -> Result<(), GameError> {
        let file = File::create(path).map_err(|source| GameError::PolicyWrite {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Policy {
            values: self.values.clone(),
        };
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &policy)?;
        writer.flush().map_err(|source| GameError::PolicyWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), states = self.values.len(), "saved policy");
        Ok(())
    }

    /// Replace the value table with the one stored at `path`.
    pub fn load_policy(&mut self, path: &Path) -> Result<(), GameError> {
        let file = File::open(path).map_err(|source| GameError::PolicyRead {
            path: path.to_path_buf(),
            source,
        })?;
        let policy: Policy = bincode::deserialize_from(BufReader::new(file))?;
        self.values = policy.values;
        info!(path = %path.display(), states = self.values.len(), "loaded policy");
        Ok(())
    }

    fn exploring(&mut self) -> bool {
        self.training && self.rng.f64() < self.exploration_rate
    }
}

impl Agent for RlAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, pos: &Position, legal: &[Move]) -> Result<Move, GameError> {
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves(pos.to_move()));
        }

        let mut choice: Option<(Move, BoardKey, f64)> = None;
        if self.exploring() {
            let mv = legal[self.rng.usize(..legal.len())];
            let mut next = *pos;
            if play_move(&mut next, mv).is_ok() {
                choice = Some((mv, next.hash_key(), 0.0));
            }
        } else {
            for &mv in legal {
                let mut next = *pos;
                if play_move(&mut next, mv).is_err() {
                    continue;
                }
                let key = next.hash_key();
                let value = self.value(&key).unwrap_or(0.0);
                // later moves win ties
                if choice.as_ref().is_none_or(|(_, _, best)| value >= *best) {
                    choice = Some((mv, key, value));
                }
            }
        }

        let (mv, key, value) = choice.ok_or(GameError::NoLegalMoves(pos.to_move()))?;
        debug!(agent = %self.name, %mv, value, "rl move");
        self.states.push(key);
        Ok(mv)
    }

    fn end_game(&mut self, outcome: Outcome, seat: Player) {
        if self.training {
            let reward = match outcome {
                Outcome::Winner(p) if p == seat => REWARD_WIN,
                _ => REWARD_LOSS,
            };
            self.feed_reward(reward);
        }
        self.reset_states();
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Coord, Slide, legal_moves};

    #[test]
    fn test_feed_reward_walks_backwards() {
        let mut agent = RlAgent::with_seed("rl", 3);
        agent.states = vec!["a".to_string(), "b".to_string()];
        agent.feed_reward(1.0);

        // b: 0 + 0.2 * (0.9 * 1.0 - 0) = 0.18
        let b = agent.value("b").unwrap();
        assert!((b - 0.18).abs() < 1e-12);
        // a: 0 + 0.2 * (0.9 * 0.18 - 0) = 0.0324
        let a = agent.value("a").unwrap();
        assert!((a - 0.0324).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_choice_follows_values() {
        let mut agent = RlAgent::with_seed("rl", 3);
        agent.set_training(false);

        let pos = Position::new();
        let target = Move::new(Coord::new(2, 0), Slide::Right);
        let mut next = pos;
        play_move(&mut next, target).unwrap();
        agent.values.insert(next.hash_key(), 5.0);

        let mv = agent.choose_move(&pos, &legal_moves(&pos)).unwrap();
        assert_eq!(mv, target);
        assert_eq!(agent.states(), &[next.hash_key()]);
    }

    #[test]
    fn test_end_game_rewards_winner_only_while_training() {
        let mut agent = RlAgent::with_seed("rl", 9);
        let pos = Position::new();
        agent.choose_move(&pos, &legal_moves(&pos)).unwrap();
        agent.end_game(Outcome::Winner(Player::X), Player::X);
        assert_eq!(agent.known_states(), 1);
        assert!(agent.states().is_empty());

        agent.set_training(false);
        agent.choose_move(&pos, &legal_moves(&pos)).unwrap();
        agent.end_game(Outcome::Winner(Player::X), Player::X);
        assert!(agent.states().is_empty());
    }

    #[test]
    fn test_policy_roundtrip() {
        let mut agent = RlAgent::with_seed("rl", 1);
        agent.values.insert("X".repeat(25), 0.5);
        agent.values.insert(".".repeat(25), -0.25);

        let path = std::env::temp_dir().join(format!("quixo-policy-{}.bin", std::process::id()));
        agent.save_policy(&path).unwrap();

        let mut loaded = RlAgent::with_seed("rl2", 1);
        loaded.load_policy(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.known_states(), 2);
        assert_eq!(loaded.value(&"X".repeat(25)), Some(0.5));
    }

    #[test]
    fn test_zero_exploration_stays_greedy_while_training() {
        let mut agent = RlAgent::with_seed("rl", 21);
        agent.set_exploration_rate(0.0);

        let pos = Position::new();
        let target = Move::new(Coord::new(4, 2), Slide::Left);
        let mut next = pos;
        play_move(&mut next, target).unwrap();
        agent.values.insert(next.hash_key(), 1.0);

        let legal = legal_moves(&pos);
        for _ in 0..50 {
            assert_eq!(agent.choose_move(&pos, &legal).unwrap(), target);
        }
    }

    #[test]
    fn test_exploration_rate_is_clamped() {
        let mut agent = RlAgent::with_seed("rl", 2);
        agent.set_exploration_rate(3.0);
        assert_eq!(agent.exploration_rate, 1.0);
        agent.set_exploration_rate(-1.0);
        assert_eq!(agent.exploration_rate, 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_policy_reports_failed_write() {
        let mut agent = RlAgent::with_seed("rl", 4);
        agent.values.insert(".".repeat(25), 0.1);
        let err = agent.save_policy(Path::new("/dev/full"));
        assert!(matches!(err, Err(GameError::PolicyWrite { .. })), "{err:?}");
    }

    #[test]
    fn test_missing_policy_file() {
        let mut agent = RlAgent::new("rl");
        let err = agent.load_policy(Path::new("/nonexistent/quixo/policy.bin"));
        assert!(matches!(err, Err(GameError::PolicyRead { .. })));
    }
}
