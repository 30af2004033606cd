//! Static evaluation used at the search horizon.
//!
//! The score is the sum of two symmetric terms, both positive when they
//! favor `me`:
//! - ownership: every owned cell counts its positional weight
//! - line progress: every run of three or four equal marks inside a line

use crate::constants::{BONUS_FOUR, BONUS_THREE, CELL_WORTH};
use crate::position::{LINES, Player, Position, run_owner};

/// Evaluate `pos` from the point of view of `me`.
pub fn evaluate(pos: &Position, me: Player) -> i32 {
    ownership_score(pos, me) + line_score(pos, me)
}

/// Weighted cell count: own cells add their weight, opponent cells subtract it.
pub fn ownership_score(pos: &Position, me: Player) -> i32 {
    pos.cells()
        .iter()
        .zip(CELL_WORTH)
        .map(|(cell, worth)| match cell {
            Some(p) if *p == me => worth,
            Some(_) => -worth,
            None => 0,
        })
        .sum()
}

/// Bonus for every 3- and 4-cell window of a line held by a single owner.
pub fn line_score(pos: &Position, me: Player) -> i32 {
    let mut score = 0;
    for line in &LINES {
        for (len, bonus) in [(3, BONUS_THREE), (4, BONUS_FOUR)] {
            for window in line.windows(len) {
                match run_owner(pos, window) {
                    Some(p) if p == me => score += bonus,
                    Some(_) => score -= bonus,
                    None => {}
                }
            }
        }
    }
    score
}
