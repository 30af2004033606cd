//! Console input for a human player.
//!
//! Moves are typed as `row col slide`, one per line, for example `0 4 left`
//! or `2,0,t`. Directions may be given by name, initial, or number
//! (0 top, 1 bottom, 2 left, 3 right). Empty lines and lines starting with
//! `#` are ignored; unparsable or illegal moves are rejected and the player
//! is asked again.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::agent::Agent;
use crate::error::GameError;
use crate::position::{Move, Position, parse_move};

/// Agent that reads moves from `input` and writes prompts to `output`.
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanAgent<io::StdinLock<'static>, io::Stdout> {
    /// A human at the terminal.
    pub fn stdio(name: &str) -> Self {
        Self::new(name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(name: &str, input: R, output: W) -> Self {
        Self {
            name: name.to_string(),
            input,
            output,
        }
    }

    /// Read the next non-empty, non-comment line.
    fn read_line(&mut self) -> Result<String, GameError> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(GameError::InputClosed);
            }
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                return Ok(line.to_string());
            }
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, pos: &Position, legal: &[Move]) -> Result<Move, GameError> {
        loop {
            write!(
                self.output,
                "{} ({}), enter move as `row col slide`: ",
                self.name,
                pos.to_move()
            )?;
            self.output.flush()?;

            let line = self.read_line()?;
            match parse_move(&line) {
                Some(mv) if legal.contains(&mv) => return Ok(mv),
                Some(mv) => {
                    warn!(%mv, "rejected illegal move");
                    writeln!(self.output, "That's an invalid move, please reenter your move.")?;
                }
                None => {
                    warn!(input = %line, "could not parse move");
                    writeln!(
                        self.output,
                        "Could not read `{line}`; expected e.g. `0 4 left`."
                    )?;
                }
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
