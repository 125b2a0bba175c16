//! Per-turn move selection: opening book first, search once the book runs dry.

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::evaluation::Evaluator;
use crate::game::GameState;
use crate::opening_book::OpeningBook;
use crate::search::{SearchResult, Searcher};
use chess::ChessMove;
use log::{info, warn};
use std::sync::Arc;

/// Game phase as seen by the selector. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Opening,
    MiddleGame,
}

/// Move chosen for one turn and how it was found
#[derive(Debug, Clone)]
pub enum MoveChoice {
    Book { mv: ChessMove, opening: String },
    Search(SearchResult),
}

impl MoveChoice {
    pub fn chess_move(&self) -> ChessMove {
        match self {
            MoveChoice::Book { mv, .. } => *mv,
            MoveChoice::Search(result) => result.best_move,
        }
    }
}

pub struct MoveSelector {
    book: Arc<OpeningBook>,
    searcher: Searcher,
    phase: Phase,
}

impl MoveSelector {
    pub fn new(book: Arc<OpeningBook>, searcher: Searcher) -> Self {
        Self {
            book,
            searcher,
            phase: Phase::Opening,
        }
    }

    /// Build the book and searcher described by `config`.
    ///
    /// A configured opening file that is missing or malformed is fatal.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let book = match &config.openings_path {
            Some(path) => OpeningBook::load(path)?,
            None => OpeningBook::with_standard_openings(),
        };
        let searcher = Searcher::new(config.search.clone(), Evaluator::new(config.piece_values))?;
        Ok(Self::new(Arc::new(book), searcher))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Choose a move for the side to move in `state`.
    ///
    /// `state` is used as scratch space by the search and is restored
    /// before this returns.
    pub fn select(&mut self, state: &mut GameState) -> Result<MoveChoice> {
        if self.phase == Phase::Opening {
            if let Some(choice) = self.book_move(state) {
                return Ok(choice);
            }
            self.phase = Phase::MiddleGame;
            info!(
                "Leaving the opening book after {} half-moves",
                state.history().len()
            );
        }

        let result = self.searcher.search(state)?;
        info!("Search: {}", result);
        Ok(MoveChoice::Search(result))
    }

    fn book_move(&mut self, state: &GameState) -> Option<MoveChoice> {
        let history = state.history_notation();
        let suggestion = self.book.suggest(&history, self.searcher.rng())?;

        match state.parse_move(&suggestion.notation) {
            Ok(mv) => {
                info!("{}: {}", suggestion.opening, suggestion.notation);
                Some(MoveChoice::Book {
                    mv,
                    opening: suggestion.opening,
                })
            }
            Err(_) => {
                warn!(
                    "Book move {} from '{}' is not legal here",
                    suggestion.notation, suggestion.opening
                );
                None
            }
        }
    }
}
