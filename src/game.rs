//! Game driver: two agents alternate on one shared board.

use tracing::{debug, info};

use crate::agent::{Agent, Outcome};
use crate::constants::MAX_GAME_LEN;
use crate::error::GameError;
use crate::position::{Move, Player, Position, check_winner, legal_moves, play_move};

/// Summary of a finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Moves in the order they were played; `X` moved first.
    pub moves: Vec<Move>,
    pub final_position: Position,
}

impl GameRecord {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Outcome::Winner(p) => Some(p),
            Outcome::Unfinished => None,
        }
    }
}

/// Play one game from the empty board. `seats[0]` plays `X`, `seats[1]`
/// plays `O`.
///
/// The board is printed after every move when `render` is set or either
/// agent is interactive. Agents are not told the outcome; see
/// [`crate::arena`] for that.
///
/// # Errors
/// Fails if an agent errors or answers with an illegal move.
pub fn play_game(mut seats: [&mut dyn Agent; 2], render: bool) -> Result<GameRecord, GameError> {
    let render = render || seats.iter().any(|a| a.is_interactive());

    let mut pos = Position::new();
    let mut moves = Vec::new();
    if render {
        println!("{pos}\n");
    }

    let outcome = loop {
        if let Some(winner) = check_winner(&pos) {
            break Outcome::Winner(winner);
        }
        if pos.ply() >= MAX_GAME_LEN {
            break Outcome::Unfinished;
        }

        let player = pos.to_move();
        let agent = &mut seats[player.index()];
        let legal = legal_moves(&pos);
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves(player));
        }

        let mv = agent.choose_move(&pos, &legal)?;
        play_move(&mut pos, mv).map_err(|source| GameError::IllegalMove {
            agent: agent.name().to_string(),
            mv,
            source,
        })?;
        debug!(ply = pos.ply(), %player, %mv, "move played");
        moves.push(mv);

        if render {
            println!("{} plays {mv}\n{pos}\n", agent.name());
        }
    };

    match outcome {
        Outcome::Winner(p) => {
            info!(winner = %p, agent = seats[p.index()].name(), plies = pos.ply(), "game over")
        }
        Outcome::Unfinished => info!(plies = pos.ply(), "game stopped at the ply limit"),
    }
    if render {
        match outcome {
            Outcome::Winner(p) => println!("{} ({p}) has won!", seats[p.index()].name()),
            Outcome::Unfinished => println!("No winner after {} moves.", pos.ply()),
        }
    }

    Ok(GameRecord {
        outcome,
        moves,
        final_position: pos,
    })
}
