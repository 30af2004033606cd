//! Quixo-Rust command line.
//!
//! ## Usage
//!
//! - `quixo-rust` - Show a demo (minimax against random)
//! - `quixo-rust play --x human --o minimax` - Play a single rendered game
//! - `quixo-rust test --x minimax --o random --rounds 100` - Report win rates
//! - `quixo-rust train --rounds 5000 --policy policy.bin` - Train a learner
//! - `quixo-rust train --opponent rl --policy a.bin --opponent-policy b.bin` - Self-play
//!
//! Logging goes to stderr and is filtered with `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use quixo_rust::agent::Agent;
use quixo_rust::arena;
use quixo_rust::arena::MatchStats;
use quixo_rust::constants::{DEFAULT_DEPTH, EXPLORATION_RATE, TEST_ROUNDS, TRAIN_ROUNDS};
use quixo_rust::game::play_game;
use quixo_rust::human::HumanAgent;
use quixo_rust::minimax::MinimaxAgent;
use quixo_rust::position::Player;
use quixo_rust::random::RandomAgent;
use quixo_rust::rl::RlAgent;

/// Quixo-Rust: Quixo engine with minimax and learning players
#[derive(Parser)]
#[command(name = "quixo-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch minimax play against a random opponent
    Demo {
        /// Search depth for the minimax player
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,
    },
    /// Play a single game, printing the board after every move
    Play {
        #[command(flatten)]
        players: Players,
    },
    /// Play many games without learning and report win rates
    Test {
        #[command(flatten)]
        players: Players,
        /// Number of games
        #[arg(long, default_value_t = TEST_ROUNDS)]
        rounds: usize,
    },
    /// Train a learning agent and save its policy
    Train {
        /// Where to write the learned policy
        #[arg(long)]
        policy: PathBuf,
        /// Continue from an existing policy
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Seat of the learner
        #[arg(long, value_enum, default_value_t = Seat::X)]
        seat: Seat,
        /// Kind of the sparring partner
        #[arg(long, value_enum, default_value_t = Kind::Random)]
        opponent: Kind,
        /// Where to write the opponent's policy when it also learns
        #[arg(long)]
        opponent_policy: Option<PathBuf>,
        /// Search depth if the opponent is minimax
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,
        /// Probability of a random move for learning agents
        #[arg(long, default_value_t = EXPLORATION_RATE)]
        exploration: f64,
        /// Number of games
        #[arg(long, default_value_t = TRAIN_ROUNDS)]
        rounds: usize,
    },
}

#[derive(clap::Args)]
struct Players {
    /// Kind of the first player (X)
    #[arg(long, value_enum, default_value_t = Kind::Minimax)]
    x: Kind,
    /// Kind of the second player (O)
    #[arg(long, value_enum, default_value_t = Kind::Random)]
    o: Kind,
    /// Search depth for minimax players
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,
    /// Policy file for X when it is a learning agent
    #[arg(long)]
    policy_x: Option<PathBuf>,
    /// Policy file for O when it is a learning agent
    #[arg(long)]
    policy_o: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Kind {
    Random,
    Human,
    Rl,
    Minimax,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Seat {
    X,
    O,
}

impl From<Seat> for Player {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::X => Player::X,
            Seat::O => Player::O,
        }
    }
}

fn build_agent(
    kind: Kind,
    name: &str,
    depth: usize,
    policy: Option<&Path>,
) -> Result<Box<dyn Agent>> {
    Ok(match kind {
        Kind::Random => Box::new(RandomAgent::new()),
        Kind::Human => Box::new(HumanAgent::stdio(name)),
        Kind::Minimax => Box::new(MinimaxAgent::new(depth)),
        Kind::Rl => {
            let mut agent = RlAgent::new(name);
            if let Some(path) = policy {
                agent
                    .load_policy(path)
                    .with_context(|| format!("loading policy for {name}"))?;
            }
            Box::new(agent)
        }
    })
}

impl Players {
    fn build(&self) -> Result<[Box<dyn Agent>; 2]> {
        Ok([
            build_agent(self.x, "player1", self.depth, self.policy_x.as_deref())?,
            build_agent(self.o, "player2", self.depth, self.policy_o.as_deref())?,
        ])
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { players }) => {
            let [mut x, mut o] = players.build()?;
            play_game([x.as_mut(), o.as_mut()], true)?;
        }
        Some(Commands::Test { players, rounds }) => {
            let [mut x, mut o] = players.build()?;
            let stats = arena::evaluate([x.as_mut(), o.as_mut()], rounds)?;
            println!(
                "The results of the match {} vs {} are shown here:",
                x.name(),
                o.name()
            );
            println!(
                "The win rate for the player1 is {:.2}% on a total of {} matches",
                stats.win_rate(Player::X),
                stats.games
            );
            println!("{stats}");
        }
        Some(Commands::Train {
            policy,
            resume,
            seat,
            opponent,
            opponent_policy,
            depth,
            exploration,
            rounds,
        }) => {
            let plan = TrainingPlan {
                policy,
                resume,
                seat: seat.into(),
                opponent,
                opponent_policy,
                depth,
                exploration,
                rounds,
            };
            run_training(&plan)?;
        }
        Some(Commands::Demo { depth }) => run_demo(depth)?,
        None => run_demo(DEFAULT_DEPTH)?,
    }
    Ok(())
}

fn run_demo(depth: usize) -> Result<()> {
    println!("Quixo-Rust: minimax (X) against random (O)\n");
    let mut x = MinimaxAgent::new(depth);
    let mut o = RandomAgent::new();
    play_game([&mut x, &mut o], true)?;
    Ok(())
}

/// Everything the `train` subcommand needs.
struct TrainingPlan {
    policy: PathBuf,
    resume: Option<PathBuf>,
    seat: Player,
    opponent: Kind,
    /// Save target for an opponent that learns too.
    opponent_policy: Option<PathBuf>,
    depth: usize,
    exploration: f64,
    rounds: usize,
}

/// Train with the learner in `seat`, the sparring partner in the other.
fn train_in_seat(
    learner: &mut dyn Agent,
    other: &mut dyn Agent,
    seat: Player,
    rounds: usize,
) -> Result<MatchStats> {
    let stats = match seat {
        Player::X => arena::train([learner, other], rounds)?,
        Player::O => arena::train([other, learner], rounds)?,
    };
    Ok(stats)
}

fn run_training(plan: &TrainingPlan) -> Result<()> {
    anyhow::ensure!(plan.opponent != Kind::Human, "cannot train against a human");
    anyhow::ensure!(
        plan.opponent_policy.is_none() || plan.opponent == Kind::Rl,
        "--opponent-policy only applies to an rl opponent"
    );

    let mut learner = RlAgent::new("learner");
    learner.set_exploration_rate(plan.exploration);
    if let Some(path) = &plan.resume {
        learner
            .load_policy(path)
            .context("loading policy to resume from")?;
    }

    let stats = if plan.opponent == Kind::Rl {
        // both seats learn in self-play
        let mut rival = RlAgent::new("sparring");
        rival.set_exploration_rate(plan.exploration);
        let stats = train_in_seat(&mut learner, &mut rival, plan.seat, plan.rounds)?;
        match &plan.opponent_policy {
            Some(path) => rival
                .save_policy(path)
                .with_context(|| format!("saving opponent policy to {}", path.display()))?,
            None => tracing::warn!(
                states = rival.known_states(),
                "opponent policy discarded; pass --opponent-policy to keep it"
            ),
        }
        stats
    } else {
        let mut other = build_agent(plan.opponent, "sparring", plan.depth, None)?;
        train_in_seat(&mut learner, other.as_mut(), plan.seat, plan.rounds)?
    };

    println!("{stats}");
    println!(
        "Learner ({}) won {:.2}% and knows {} boards",
        plan.seat,
        stats.win_rate(plan.seat),
        learner.known_states()
    );

    learner
        .save_policy(&plan.policy)
        .with_context(|| format!("saving policy to {}", plan.policy.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str, opponent: Kind) -> TrainingPlan {
        let dir = std::env::temp_dir();
        let tag = format!("{}-{}", std::process::id(), name);
        TrainingPlan {
            policy: dir.join(format!("quixo-learner-{tag}.bin")),
            resume: None,
            seat: Player::O,
            opponent,
            opponent_policy: Some(dir.join(format!("quixo-rival-{tag}.bin"))),
            depth: 1,
            exploration: EXPLORATION_RATE,
            rounds: 3,
        }
    }

    #[test]
    fn test_self_play_saves_both_policies() {
        let plan = plan("self-play", Kind::Rl);
        run_training(&plan).unwrap();

        let rival_path = plan.opponent_policy.as_ref().unwrap();
        for path in [&plan.policy, rival_path] {
            let mut loaded = RlAgent::new("check");
            loaded.load_policy(path).unwrap();
            std::fs::remove_file(path).unwrap();
            assert!(loaded.known_states() > 0, "{} is empty", path.display());
        }
    }

    #[test]
    fn test_opponent_policy_needs_rl_opponent() {
        let plan = plan("random-rival", Kind::Random);
        assert!(run_training(&plan).is_err());
        assert!(!plan.policy.exists());
    }

    #[test]
    fn test_cli_parses_training_flags() {
        let cli = Cli::try_parse_from([
            "quixo-rust",
            "train",
            "--policy",
            "p.bin",
            "--opponent",
            "rl",
            "--opponent-policy",
            "q.bin",
            "--exploration",
            "0.1",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Train {
                opponent,
                opponent_policy,
                exploration,
                ..
            }) => {
                assert!(opponent == Kind::Rl);
                assert_eq!(opponent_policy, Some(PathBuf::from("q.bin")));
                assert_eq!(exploration, 0.1);
            }
            _ => panic!("expected the train subcommand"),
        }
    }
}
