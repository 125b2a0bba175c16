//! Loading opening books and engine configs from disk.

use chess_search_engine::{
    EngineConfig, EngineError, GameState, MoveChoice, MoveSelector, OpeningBook, SearchMode,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_lists_and_space_separated_lines() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "openings.json",
        r#"[
            {"n": "Ruy Lopez", "m": ["e4", "e5", "Nf3", "Nc6", "Bb5"]},
            {"n": "Queen's Gambit", "m": "d2d4 d7d5 c2c4"}
        ]"#,
    );

    let book = OpeningBook::load(&path).unwrap();
    assert_eq!(book.entries().len(), 2);
    // SAN is stored in coordinate notation after replay
    assert_eq!(
        book.entries()[0].moves,
        vec!["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]
    );

    let stats = book.statistics();
    assert_eq!(stats.total_lines, 2);
    assert_eq!(stats.longest_line, 5);
}

#[test]
fn missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = OpeningBook::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(EngineError::OpeningFile { .. })));
}

#[test]
fn malformed_json_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", r#"[{"n": "Unclosed", "m": ["e2e4"]"#);
    assert!(matches!(
        OpeningBook::load(&path),
        Err(EngineError::OpeningFormat(_))
    ));
}

#[test]
fn illegal_line_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "illegal.json", r#"[{"n": "Nonsense", "m": "e2e4 e2e4"}]"#);
    assert!(matches!(
        OpeningBook::load(&path),
        Err(EngineError::InvalidOpeningLine { .. })
    ));
}

#[test]
fn suggestion_follows_the_played_prefix() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "openings.json",
        r#"[
            {"n": "French Defense", "m": "e2e4 e7e6 d2d4 d7d5"},
            {"n": "Sicilian Defense", "m": "e2e4 c7c5"}
        ]"#,
    );
    let book = OpeningBook::load(&path).unwrap();
    let mut rng = StdRng::seed_from_u64(4);

    let history = vec!["e2e4".to_string(), "e7e6".to_string()];
    let suggestion = book.suggest(&history, &mut rng).unwrap();
    assert_eq!(suggestion.opening, "French Defense");
    assert_eq!(suggestion.notation, "d2d4");

    let finished = vec!["e2e4".to_string(), "c7c5".to_string()];
    assert!(book.suggest(&finished, &mut rng).is_none());
}

#[test]
fn config_file_drives_the_selector() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", r#"[{"n": "English Opening", "m": ["c2c4"]}]"#);
    let config = write(
        &dir,
        "engine.json",
        &format!(
            r#"{{"search": {{"mode": "alpha-beta", "depth": 0.5, "seed": 12}}, "openings_path": {}}}"#,
            serde_json::to_string(&book).unwrap()
        ),
    );

    let config = EngineConfig::from_file(&config).unwrap();
    assert_eq!(config.search.mode, SearchMode::AlphaBeta);

    let mut selector = MoveSelector::from_config(&config).unwrap();
    let mut state = GameState::new();
    match selector.select(&mut state).unwrap() {
        MoveChoice::Book { opening, .. } => assert_eq!(opening, "English Opening"),
        other => panic!("expected the book move, got {other:?}"),
    }
}

#[test]
fn unreadable_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "engine.json", "{ not json");
    assert!(matches!(
        EngineConfig::from_file(&path),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn bundled_book_replays_cleanly() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/openings.json");
    let book = OpeningBook::load(path).unwrap();

    assert_eq!(book.statistics().total_lines, 18);
    let morphy = book
        .entries()
        .iter()
        .find(|entry| entry.name == "Ruy Lopez: Morphy Defense")
        .unwrap();
    assert_eq!(morphy.moves.last().map(String::as_str), Some("e1g1"));
}
