//! # Chess Search Engine
//!
//! Move selection for an automated chess player: an opening book of named
//! lines, a material plus piece-square evaluator, and a game-tree search
//! (minimax, alpha-beta, time-bounded and root-parallel) measured in
//! half-plies.
//!
//! Board representation, move generation and game-end detection come from
//! the [`chess`] crate through [`GameState`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chess_search_engine::{EngineConfig, GameState, MoveSelector};
//!
//! let mut selector = MoveSelector::from_config(&EngineConfig::fast())?;
//! let mut state = GameState::new();
//!
//! let choice = selector.select(&mut state)?;
//! state.play(choice.chess_move())?;
//! println!("played {}", state.history_notation().join(" "));
//! # Ok::<(), chess_search_engine::EngineError>(())
//! ```

pub mod config;
pub mod errors;
pub mod evaluation;
pub mod game;
pub mod opening_book;
pub mod piece_square_tables;
pub mod player;
pub mod search;
pub mod selector;

pub use config::EngineConfig;
pub use errors::{EngineError, Result};
pub use evaluation::{mirror_index, Evaluator, PieceValues, DRAW_SCORE, WIN_SCORE};
pub use game::{GameState, Outcome};
pub use opening_book::{BookMove, OpeningBook, OpeningBookStats, OpeningEntry};
pub use player::{EnginePlayer, HumanPlayer, Player};
pub use search::{Depth, SearchConfig, SearchMode, SearchResult, SearchStats, Searcher};
pub use selector::{MoveChoice, MoveSelector, Phase};
