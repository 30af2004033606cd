//! Constants for board geometry, search bounds, evaluator weights and
//! learning parameters.
//!
//! The board is stored as a flat row-major array of `N * N` cells, so cell
//! `(row, col)` lives at index `row * N + col`.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Quixo is always played on 5x5.
pub const N: usize = 5;

/// Total number of cells.
pub const NUM_CELLS: usize = N * N;

/// Number of lines that can win: N rows, N columns and the two diagonals.
pub const NUM_LINES: usize = 2 * N + 2;

/// Upper bound on legal moves in any position (4 corners x 2 + 12 edges x 3).
pub const MAX_MOVES: usize = 44;

/// Maximum game length in plies. Quixo has no draw rule, so games that
/// shuffle forever are cut off here and reported without a winner.
pub const MAX_GAME_LEN: usize = 400;

// =============================================================================
// Search Parameters
// =============================================================================

/// Score of a won position before the depth penalty is applied.
pub const WIN_SCORE: i32 = 1200;

/// Lower bound for alpha-beta windows.
pub const MIN_SCORE: i32 = -10_000;

/// Upper bound for alpha-beta windows.
pub const MAX_SCORE: i32 = 10_000;

/// Default search depth for the minimax agent.
pub const DEFAULT_DEPTH: usize = 3;

// =============================================================================
// Evaluator Weights
// =============================================================================

/// Positional weight of each cell: corners 2, other edge cells 3, interior 1.
#[rustfmt::skip]
pub const CELL_WORTH: [i32; NUM_CELLS] = [
    2, 3, 3, 3, 2,
    3, 1, 1, 1, 3,
    3, 1, 1, 1, 3,
    3, 1, 1, 1, 3,
    2, 3, 3, 3, 2,
];

/// Bonus for three consecutive cells of one owner inside a line.
pub const BONUS_THREE: i32 = 1;

/// Bonus for four consecutive cells of one owner inside a line.
pub const BONUS_FOUR: i32 = 3;

// =============================================================================
// Reinforcement Learning Parameters
// =============================================================================

/// Step size of the backward value update.
pub const LEARNING_RATE: f64 = 0.2;

/// Discount applied to the reward as it flows back through a game.
pub const DECAY_GAMMA: f64 = 0.9;

/// Probability of playing a random move while training.
pub const EXPLORATION_RATE: f64 = 0.3;

/// Reward fed to a learner after a won game.
pub const REWARD_WIN: f64 = 1.0;

/// Reward fed to a learner after a lost or unfinished game.
pub const REWARD_LOSS: f64 = 0.0;

// =============================================================================
// Match Harness
// =============================================================================

/// Default number of games for `test`.
pub const TEST_ROUNDS: usize = 100;

/// Default number of games for `train`.
pub const TRAIN_ROUNDS: usize = 5000;

/// Progress report period (number of games between reports).
pub const REPORT_PERIOD: usize = 500;
