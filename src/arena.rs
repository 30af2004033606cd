//! Repeated matches between two agents.
//!
//! [`train`] lets learning agents update after every game; [`evaluate`]
//! switches them to pure exploitation first. Both report win rates.

use std::fmt;

use tracing::info;

use crate::agent::{Agent, Outcome};
use crate::constants::REPORT_PERIOD;
use crate::error::GameError;
use crate::game::play_game;
use crate::position::Player;

/// Aggregated results of a series of games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub games: usize,
    /// Wins indexed by seat (`Player::index`).
    pub wins: [usize; 2],
    /// Games stopped at the ply limit.
    pub unfinished: usize,
}

impl MatchStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::Winner(p) => self.wins[p.index()] += 1,
            Outcome::Unfinished => self.unfinished += 1,
        }
    }

    /// Percentage of games won by `player`.
    pub fn win_rate(&self, player: Player) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins[player.index()] as f64 * 100.0 / self.games as f64
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: X won {} ({:.2}%), O won {} ({:.2}%), {} unfinished",
            self.games,
            self.wins[0],
            self.win_rate(Player::X),
            self.wins[1],
            self.win_rate(Player::O),
            self.unfinished
        )
    }
}

/// Play `rounds` games, telling both agents every outcome.
pub fn run_matches(
    [x, o]: [&mut dyn Agent; 2],
    rounds: usize,
) -> Result<MatchStats, GameError> {
    let mut stats = MatchStats::default();
    for round in 1..=rounds {
        let record = play_game([&mut *x, &mut *o], false)?;
        x.end_game(record.outcome, Player::X);
        o.end_game(record.outcome, Player::O);
        stats.record(record.outcome);

        if round % REPORT_PERIOD == 0 {
            info!(round, rounds, x_win_rate = stats.win_rate(Player::X), "progress");
        }
    }
    Ok(stats)
}

/// Play `rounds` training games; learners explore and update.
pub fn train(seats: [&mut dyn Agent; 2], rounds: usize) -> Result<MatchStats, GameError> {
    play_series(seats, rounds, true)
}

/// Play `rounds` games with learning and exploration switched off.
pub fn evaluate(seats: [&mut dyn Agent; 2], rounds: usize) -> Result<MatchStats, GameError> {
    play_series(seats, rounds, false)
}

fn play_series(
    mut seats: [&mut dyn Agent; 2],
    rounds: usize,
    training: bool,
) -> Result<MatchStats, GameError> {
    for agent in seats.iter_mut() {
        agent.set_training(training);
    }
    let names = [seats[0].name().to_string(), seats[1].name().to_string()];
    let stats = run_matches(seats, rounds)?;
    info!(x = %names[0], o = %names[1], training, "{stats}");
    Ok(stats)
}
