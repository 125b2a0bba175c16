//! Engine configuration loaded from JSON.

use crate::errors::{EngineError, Result};
use crate::evaluation::PieceValues;
use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "search": { "mode": "parallel", "depth": 1.5 }, "openings_path": "data/openings.json" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub piece_values: PieceValues,
    /// Opening book file; the built-in book is used when unset
    pub openings_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| EngineError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Quick replies for interactive play
    pub fn fast() -> Self {
        Self {
            search: SearchConfig::fast(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchMode;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "search": { "mode": "minimax", "depth": 1.5 } }"#).unwrap();
        assert_eq!(config.search.mode, SearchMode::Minimax);
        assert_eq!(config.search.depth, 1.5);
        assert_eq!(config.search.time_limit_secs, 15.0);
        assert_eq!(config.piece_values, PieceValues::default());
        assert!(config.openings_path.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "piece_values": {{ "bishop": 3.0 }}, "openings_path": "book.json" }}"#
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.piece_values.bishop, 3.0);
        assert_eq!(config.piece_values.knight, 3.0);
        assert_eq!(config.openings_path, Some(PathBuf::from("book.json")));
    }

    #[test]
    fn test_bad_config_is_reported() {
        assert!(matches!(
            EngineConfig::from_file("/nonexistent/engine.json"),
            Err(EngineError::Config(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "search": {{ "mode": "bogus" }} }}"#).unwrap();
        assert!(matches!(
            EngineConfig::from_file(file.path()),
            Err(EngineError::Config(_))
        ));
    }
}
