//! Opening book: named lines loaded from JSON, matched against the moves played so far.

use crate::errors::{EngineError, Result};
use crate::game::GameState;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named line of moves in coordinate notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpeningEntry {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "m")]
    pub moves: Vec<String>,
}

/// Book continuation for the current game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub opening: String,
    pub notation: String,
}

/// Moves as stored on disk: either a list or one space-separated string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMoves {
    List(Vec<String>),
    Line(String),
}

#[derive(Deserialize)]
struct RawOpening {
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "m")]
    moves: RawMoves,
}

const STANDARD_OPENINGS: &[(&str, &str)] = &[
    ("King's Pawn Game", "e2e4"),
    ("English Opening", "c2c4"),
    ("Open Game", "e2e4 e7e5"),
    ("Sicilian Defense", "e2e4 c7c5"),
    ("Queen's Pawn Game", "d2d4 d7d5"),
    ("Reti Opening", "g1f3 d7d5"),
    ("Queen's Gambit", "d2d4 d7d5 c2c4"),
    ("French Defense", "e2e4 e7e6 d2d4 d7d5"),
    ("Caro-Kann Defense", "e2e4 c7c6 d2d4 d7d5"),
    ("Queen's Gambit Declined", "d2d4 d7d5 c2c4 e7e6"),
    ("Slav Defense", "d2d4 d7d5 c2c4 c7c6"),
    ("Italian Game", "e2e4 e7e5 g1f3 b8c6 f1c4"),
    ("Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5"),
    ("King's Indian Defense", "d2d4 g8f6 c2c4 g7g6 b1c3 f8g7"),
    ("Nimzo-Indian Defense", "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4"),
    ("Sicilian Defense: Open", "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4"),
    (
        "Sicilian Defense: Najdorf Variation",
        "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 a7a6",
    ),
];

/// Opening book of named move sequences, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<OpeningEntry>,
}

impl OpeningBook {
    /// Create an empty opening book
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in book of common openings
    pub fn with_standard_openings() -> Self {
        let entries = STANDARD_OPENINGS
            .iter()
            .map(|(name, line)| OpeningEntry {
                name: name.to_string(),
                moves: line.split_whitespace().map(str::to_string).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Load a JSON list of `{ "n": name, "m": moves }` records.
    ///
    /// Every line is replayed from the start position; an unreadable file,
    /// malformed JSON or an illegal move fails the whole load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::OpeningFile {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_json(&text)?;
        debug!(
            "Loaded {} opening lines from {}",
            book.entries.len(),
            path.display()
        );
        Ok(book)
    }

    /// Parse and validate book JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Vec<RawOpening> = serde_json::from_str(text)?;
        let entries = raw
            .into_iter()
            .map(|opening| {
                let moves = match opening.moves {
                    RawMoves::List(moves) => moves,
                    RawMoves::Line(line) => line.split_whitespace().map(str::to_string).collect(),
                };
                validate_line(&opening.name, &moves).map(|moves| OpeningEntry {
                    name: opening.name,
                    moves,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[OpeningEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Propose the next move for a game whose moves so far are `history`.
    ///
    /// Candidates are lines that start with `history` and continue past it.
    /// The shortest candidates win; ties are broken uniformly at random.
    pub fn suggest<R: Rng + ?Sized>(&self, history: &[String], rng: &mut R) -> Option<BookMove> {
        let mut candidates: Vec<&OpeningEntry> = self
            .entries
            .iter()
            .filter(|entry| is_candidate(entry, history))
            .collect();
        candidates.shuffle(rng);

        let fewest_moves = candidates.iter().map(|entry| entry.moves.len()).min()?;
        let closest: Vec<&OpeningEntry> = candidates
            .into_iter()
            .filter(|entry| entry.moves.len() == fewest_moves)
            .collect();

        closest.choose(rng).map(|entry| BookMove {
            opening: entry.name.clone(),
            notation: entry.moves[history.len()].clone(),
        })
    }

    /// Get opening book statistics
    pub fn statistics(&self) -> OpeningBookStats {
        let total_lines = self.entries.len();
        let longest_line = self
            .entries
            .iter()
            .map(|entry| entry.moves.len())
            .max()
            .unwrap_or(0);
        let average_line_length = if total_lines > 0 {
            self.entries
                .iter()
                .map(|entry| entry.moves.len())
                .sum::<usize>() as f32
                / total_lines as f32
        } else {
            0.0
        };

        OpeningBookStats {
            total_lines,
            longest_line,
            average_line_length,
        }
    }
}

/// Statistics about the opening book coverage
#[derive(Debug, Clone)]
pub struct OpeningBookStats {
    pub total_lines: usize,
    pub longest_line: usize,
    pub average_line_length: f32,
}

fn is_candidate(entry: &OpeningEntry, history: &[String]) -> bool {
    entry.moves.len() > history.len() && entry.moves[..history.len()] == *history
}

/// Replay a line from the start position, returning its moves in canonical
/// coordinate notation.
fn validate_line(name: &str, moves: &[String]) -> Result<Vec<String>> {
    if moves.is_empty() {
        return Err(EngineError::InvalidOpeningLine {
            name: name.to_string(),
            reason: "line has no moves".to_string(),
        });
    }

    let mut state = GameState::new();
    let mut canonical = Vec::with_capacity(moves.len());
    for (ply, text) in moves.iter().enumerate() {
        let mv = state
            .parse_move(text)
            .map_err(|_| EngineError::InvalidOpeningLine {
                name: name.to_string(),
                reason: format!("move {} '{}' is not legal", ply + 1, text),
            })?;
        canonical.push(state.to_notation(mv));
        state.push(mv);
    }
    Ok(canonical)
}
