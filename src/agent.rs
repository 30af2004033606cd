//! The move-producing interface shared by every kind of player.

use crate::error::GameError;
use crate::position::{Move, Player, Position};

/// How a finished game ended, as reported to each agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    /// The game hit the ply cap without a completed line.
    Unfinished,
}

/// Anything that can pick a move for the player to move.
pub trait Agent {
    /// Display name, used in logs and reports.
    fn name(&self) -> &str;

    /// Pick one of `legal` for the player to move in `pos`.
    ///
    /// `legal` is never empty. Returning a move outside it is reported by
    /// the driver as [`GameError::IllegalMove`].
    fn choose_move(&mut self, pos: &Position, legal: &[Move]) -> Result<Move, GameError>;

    /// Whether a person is watching; the driver renders the board if so.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Called once per game after it ends, with the seat this agent played.
    fn end_game(&mut self, _outcome: Outcome, _seat: Player) {}

    /// Switch between training (learn, explore) and evaluation play.
    fn set_training(&mut self, _training: bool) {}
}
