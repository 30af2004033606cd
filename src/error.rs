use std::path::PathBuf;

use crate::position::{IllegalMove, Move, Player};

/// Errors raised while driving games, talking to agents, or persisting
/// learned policies.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{agent} played illegal move {mv}: {source}")]
    IllegalMove {
        agent: String,
        mv: Move,
        source: IllegalMove,
    },

    #[error("no legal moves for {0}")]
    NoLegalMoves(Player),

    #[error("input closed before a move was entered")]
    InputClosed,

    #[error("failed to read policy from {path}: {source}")]
    PolicyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write policy to {path}: {source}")]
    PolicyWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid policy data: {0}")]
    PolicyFormat(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
