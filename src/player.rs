//! Anything that can produce the next move for a position.

use crate::errors::{EngineError, Result};
use crate::game::GameState;
use crate::selector::{MoveChoice, MoveSelector};
use chess::ChessMove;
use std::io::{BufRead, Write};

pub trait Player {
    /// Produce a legal move for the side to move in `state`
    fn next_move(&mut self, state: &GameState) -> Result<ChessMove>;
}

/// Computer player backed by the opening book and search
pub struct EnginePlayer {
    selector: MoveSelector,
    last_choice: Option<MoveChoice>,
}

impl EnginePlayer {
    pub fn new(selector: MoveSelector) -> Self {
        Self {
            selector,
            last_choice: None,
        }
    }

    /// How the previous move was found, for display
    pub fn last_choice(&self) -> Option<&MoveChoice> {
        self.last_choice.as_ref()
    }
}

impl Player for EnginePlayer {
    fn next_move(&mut self, state: &GameState) -> Result<ChessMove> {
        let mut scratch = state.clone();
        let choice = self.selector.select(&mut scratch)?;
        let mv = choice.chess_move();
        self.last_choice = Some(choice);
        Ok(mv)
    }
}

/// Player typing moves on a line-based input
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    /// Prompt until a legal move in SAN or coordinate notation is entered
    fn next_move(&mut self, state: &GameState) -> Result<ChessMove> {
        loop {
            write!(self.output, "Enter a move (SAN or e2e4 style): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(EngineError::InputClosed);
            }
            if line.trim().is_empty() {
                continue;
            }

            match state.parse_move(&line) {
                Ok(mv) => return Ok(mv),
                Err(_) => writeln!(self.output, "Not a valid move.")?,
            }
        }
    }
}
