use std::path::PathBuf;

/// Errors raised by the engine.
///
/// Loading problems (`OpeningFile`, `OpeningFormat`, `InvalidOpeningLine`,
/// `Config`) are fatal at startup. `NoLegalMoves` and `EmptyHistory` are
/// contract violations by the caller and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Opening file could not be read
    #[error("failed to read opening file {path}: {source}")]
    OpeningFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening file is not a list of `{ "n": ..., "m": ... }` records
    #[error("malformed opening data: {0}")]
    OpeningFormat(#[from] serde_json::Error),

    /// A book line that cannot be replayed from the start position
    #[error("invalid opening line '{name}': {reason}")]
    InvalidOpeningLine { name: String, reason: String },

    /// FEN text rejected by the rules engine
    #[error("invalid position '{0}'")]
    InvalidPosition(String),

    /// Move text that is unparsable or illegal in the current position
    #[error("invalid move '{0}'")]
    InvalidMove(String),

    /// Search was asked to pick a move where none exists
    #[error("no legal moves in position {fen}")]
    NoLegalMoves { fen: String },

    /// `undo` without a matching prior apply
    #[error("cannot undo: no move has been played")]
    EmptyHistory,

    /// Worker pool for parallel root search could not be started
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration file missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Interactive input ended before a legal move was entered
    #[error("input closed before a move was entered")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
