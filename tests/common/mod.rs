//! Helpers shared by the integration test files.

#![allow(dead_code)]

use quixo_rust::constants::{N, WIN_SCORE};
use quixo_rust::eval::evaluate;
use quixo_rust::position::{Move, Player, Position, check_winner, legal_moves, play_move};

pub fn layout(rows: [&str; N], to_move: Player) -> Position {
    Position::from_rows(rows, to_move).expect("valid layout")
}

/// Play a sequence of moves from the empty board, panicking on illegal ones.
pub fn setup_position(moves: &[Move]) -> Position {
    let mut pos = Position::new();
    for &mv in moves {
        play_move(&mut pos, mv).unwrap_or_else(|e| panic!("setup move {mv}: {e}"));
    }
    pos
}

/// Follow `choices` from the empty board, each one picking a legal move by
/// index modulo the number of moves. Stops early once the game is won.
pub fn reachable_position(choices: &[usize]) -> Position {
    let mut pos = Position::new();
    for &choice in choices {
        if check_winner(&pos).is_some() {
            break;
        }
        let moves = legal_moves(&pos);
        play_move(&mut pos, moves[choice % moves.len()]).unwrap();
    }
    pos
}

/// Minimax without pruning, scored the same way as the real search.
pub fn plain_minimax(pos: &Position, me: Player, depth: usize, max_depth: usize) -> i32 {
    if let Some(winner) = check_winner(pos) {
        let depth = depth as i32;
        return if winner == me {
            WIN_SCORE - depth
        } else {
            depth - WIN_SCORE
        };
    }
    if depth >= max_depth {
        return evaluate(pos, me);
    }
    let values = legal_moves(pos).into_iter().map(|mv| {
        let mut child = *pos;
        play_move(&mut child, mv).unwrap();
        plain_minimax(&child, me, depth + 1, max_depth)
    });
    let best = if pos.to_move() == me {
        values.max()
    } else {
        values.min()
    };
    best.expect("non-terminal positions have moves")
}

/// Root value and first best move of the unpruned search.
pub fn plain_best(pos: &Position, max_depth: usize) -> (Move, i32) {
    let me = pos.to_move();
    let mut best: Option<(Move, i32)> = None;
    for mv in legal_moves(pos) {
        let mut child = *pos;
        play_move(&mut child, mv).unwrap();
        let value = plain_minimax(&child, me, 1, max_depth);
        if best.is_none_or(|(_, v)| value > v) {
            best = Some((mv, value));
        }
    }
    best.expect("root has moves")
}
