//! Quixo-Rust: a Quixo rules engine with minimax and learning players.
//!
//! Quixo is played on a 5x5 board of cubes. On each turn a player takes a
//! blank or own cube from the edge, marks it, and pushes it back in at the
//! end of its row or column. Five marks in a row, column, or diagonal win.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, search bounds, weights and rates
//! - [`position`] - Board state, move legality, move generation, win detection
//! - [`eval`] - Heuristic evaluation at the search horizon
//! - [`minimax`] - Alpha-beta search and the minimax player
//! - [`agent`] - The interface every player implements
//! - [`random`], [`human`], [`rl`] - The other players
//! - [`game`] - Plays one game between two agents
//! - [`arena`] - Repeated matches, win rates and training
//!
//! ## Example
//!
//! ```
//! use quixo_rust::minimax::best_move;
//! use quixo_rust::position::{check_winner, play_move, Position};
//!
//! let mut pos = Position::new();
//! let result = best_move(&pos, 2).unwrap();
//! play_move(&mut pos, result.best_move).unwrap();
//! assert_eq!(check_winner(&pos), None);
//! println!("{pos}");
//! ```

pub mod agent;
pub mod arena;
pub mod constants;
pub mod error;
pub mod eval;
pub mod game;
pub mod human;
pub mod minimax;
pub mod position;
pub mod random;
pub mod rl;

pub use error::GameError;
