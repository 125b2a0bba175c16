//! Game state adapter over the `chess` crate.
//!
//! `chess::Board` is copy-make and keeps no history, so `GameState` stacks
//! the previous boards to provide apply/undo, remembers the moves played for
//! the opening book, and tracks the halfmove clock and position hashes the
//! draw rules need.

use crate::errors::{EngineError, Result};
use chess::{BitBoard, Board, BoardStatus, ChessMove, Color, MoveGen, Piece, ALL_SQUARES, EMPTY};
use std::fmt;
use std::str::FromStr;

/// Dark squares, a1 included.
const DARK_SQUARES: u64 = 0xAA55_AA55_AA55_AA55;

/// Reversible half-moves after which the game is drawn outright.
const SEVENTY_FIVE_MOVE_LIMIT: u32 = 150;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Color),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    board: Board,
    halfmove_clock: u32,
}

/// Full position plus the history needed for undo and draw detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    halfmove_clock: u32,
    moves: Vec<ChessMove>,
    undo_stack: Vec<Snapshot>,
    /// Hash of every position reached, current one last
    position_hashes: Vec<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_board(Board::default(), 0)
    }

    /// Position from FEN. The move history starts empty.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board =
            Board::from_str(fen).map_err(|_| EngineError::InvalidPosition(fen.to_string()))?;
        let halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        Ok(Self::from_board(board, halfmove_clock))
    }

    fn from_board(board: Board, halfmove_clock: u32) -> Self {
        Self {
            board,
            halfmove_clock,
            moves: Vec::new(),
            undo_stack: Vec::new(),
            position_hashes: vec![board.get_hash()],
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        self.board.legal(mv)
    }

    /// Apply `mv` in place. The move must come from `legal_moves`.
    pub fn push(&mut self, mv: ChessMove) {
        let irreversible = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();

        self.undo_stack.push(Snapshot {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
        });
        self.board = self.board.make_move_new(mv);
        self.halfmove_clock = if irreversible {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.moves.push(mv);
        self.position_hashes.push(self.board.get_hash());
    }

    /// Apply `mv` after checking it against the legal-move set
    pub fn play(&mut self, mv: ChessMove) -> Result<()> {
        if !self.is_legal(mv) {
            return Err(EngineError::InvalidMove(mv.to_string()));
        }
        self.push(mv);
        Ok(())
    }

    /// Reverse the most recent `push`
    pub fn undo(&mut self) -> Result<ChessMove> {
        self.retract().ok_or(EngineError::EmptyHistory)
    }

    fn retract(&mut self) -> Option<ChessMove> {
        let snapshot = self.undo_stack.pop()?;
        self.board = snapshot.board;
        self.halfmove_clock = snapshot.halfmove_clock;
        self.position_hashes.pop();
        self.moves.pop()
    }

    /// Run `f` with `mv` applied, then restore the previous position.
    pub fn with_move<R>(&mut self, mv: ChessMove, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(mv);
        let result = f(self);
        self.retract();
        result
    }

    pub fn history(&self) -> &[ChessMove] {
        &self.moves
    }

    /// Moves played so far in the notation used by opening lines
    pub fn history_notation(&self) -> Vec<String> {
        self.moves.iter().map(|mv| self.to_notation(*mv)).collect()
    }

    /// Coordinate notation: `e2e4`, `e7e8q`
    pub fn to_notation(&self, mv: ChessMove) -> String {
        mv.to_string()
    }

    /// Parse SAN (`Nf3`) or coordinate notation (`g1f3`) into a legal move
    pub fn parse_move(&self, text: &str) -> Result<ChessMove> {
        let text = text.trim();
        let parsed = ChessMove::from_san(&self.board, text)
            .ok()
            .or_else(|| ChessMove::from_str(text).ok());

        match parsed {
            Some(mv) if self.is_legal(mv) => Ok(mv),
            _ => Err(EngineError::InvalidMove(text.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Result of the game, or `None` while it is still in progress
    pub fn outcome(&self) -> Option<Outcome> {
        match self.board.status() {
            BoardStatus::Checkmate => Some(Outcome::Winner(!self.board.side_to_move())),
            BoardStatus::Stalemate => Some(Outcome::Draw),
            BoardStatus::Ongoing => {
                if self.is_insufficient_material()
                    || self.is_threefold_repetition()
                    || self.halfmove_clock >= SEVENTY_FIVE_MOVE_LIMIT
                {
                    Some(Outcome::Draw)
                } else {
                    None
                }
            }
        }
    }

    /// Neither side can deliver mate: bare kings, one minor piece, or
    /// bishops that all stand on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let mating_material =
            *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if mating_material != EMPTY {
            return false;
        }

        let knights = board.pieces(Piece::Knight).popcnt();
        let bishops = *board.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }

        let dark = BitBoard::new(DARK_SQUARES);
        knights == 0 && ((bishops & dark) == EMPTY || (bishops & !dark) == EMPTY)
    }

    /// Current position has occurred at least three times since the last
    /// pawn move or capture.
    pub fn is_threefold_repetition(&self) -> bool {
        let Some(&current) = self.position_hashes.last() else {
            return false;
        };
        let window = (self.halfmove_clock as usize + 1).min(self.position_hashes.len());
        let start = self.position_hashes.len() - window;
        self.position_hashes[start..]
            .iter()
            .filter(|&&hash| hash == current)
            .count()
            >= 3
    }
}

fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let row: Vec<String> = (0..8)
                .map(|file| {
                    let square = ALL_SQUARES[rank * 8 + file];
                    match (self.board.piece_on(square), self.board.color_on(square)) {
                        (Some(piece), Some(color)) => piece_char(piece, color).to_string(),
                        _ => ".".to_string(),
                    }
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(text: &str) -> ChessMove {
        ChessMove::from_str(text).unwrap()
    }

    #[test]
    fn test_push_and_undo_restore_state() {
        let mut state = GameState::new();
        let original = state.clone();

        state.push(mv("e2e4"));
        state.push(mv("e7e5"));
        assert_eq!(state.history_notation(), vec!["e2e4", "e7e5"]);
        assert_eq!(state.side_to_move(), Color::White);

        assert_eq!(state.undo().unwrap(), mv("e7e5"));
        assert_eq!(state.undo().unwrap(), mv("e2e4"));
        assert_eq!(state, original);
    }

    #[test]
    fn test_undo_without_history_is_an_error() {
        let mut state = GameState::new();
        assert!(matches!(state.undo(), Err(EngineError::EmptyHistory)));
    }

    #[test]
    fn test_with_move_restores_after_closure() {
        let mut state = GameState::new();
        let before = state.clone();
        let replies = state.with_move(mv("g1f3"), |inner| inner.legal_moves().len());
        assert_eq!(replies, 20);
        assert_eq!(state, before);
    }

    #[test]
    fn test_parse_move_accepts_san_and_coordinates() {
        let state = GameState::new();
        assert_eq!(state.parse_move("Nf3").unwrap(), mv("g1f3"));
        assert_eq!(state.parse_move("e2e4").unwrap(), mv("e2e4"));
        assert!(state.parse_move("e2e5").is_err());
        assert!(state.parse_move("Qh5").is_err());
        assert!(state.parse_move("garbage").is_err());
    }

    #[test]
    fn test_play_rejects_illegal_moves() {
        let mut state = GameState::new();
        assert!(state.play(mv("e2e5")).is_err());
        assert!(state.history().is_empty());
        state.play(mv("e2e4")).unwrap();
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_checkmate_outcome() {
        // Fool's mate
        let mut state = GameState::new();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            state.play(mv(text)).unwrap();
        }
        assert_eq!(state.outcome(), Some(Outcome::Winner(Color::Black)));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_stalemate_is_draw() {
        let state = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(state.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_insufficient_material() {
        let kings = GameState::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert!(kings.is_insufficient_material());
        assert!(kings.is_terminal());

        let knight = GameState::from_fen("8/8/4k3/8/8/3K4/5N2/8 w - - 0 1").unwrap();
        assert!(knight.is_insufficient_material());

        // c1 and f4 are both dark squares
        let same_colour = GameState::from_fen("8/8/4k3/8/5b2/3K4/8/2B5 w - - 0 1").unwrap();
        assert!(same_colour.is_insufficient_material());

        let opposite_colour = GameState::from_fen("8/8/4k3/8/4b3/3K4/8/2B5 w - - 0 1").unwrap();
        assert!(!opposite_colour.is_insufficient_material());

        let rook = GameState::from_fen("8/8/4k3/8/8/3K4/8/R7 w - - 0 1").unwrap();
        assert!(!rook.is_insufficient_material());
    }

    #[test]
    fn test_threefold_repetition() {
        let mut state = GameState::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for text in shuffle {
            state.play(mv(text)).unwrap();
        }
        assert!(!state.is_threefold_repetition());
        for text in shuffle {
            state.play(mv(text)).unwrap();
        }
        assert!(state.is_threefold_repetition());
        assert_eq!(state.outcome(), Some(Outcome::Draw));

        state.undo().unwrap();
        assert!(!state.is_threefold_repetition());
    }

    #[test]
    fn test_halfmove_clock_from_fen_and_reset() {
        let mut state =
            GameState::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 149 90").unwrap();
        assert_eq!(state.halfmove_clock(), 149);
        assert!(!state.is_terminal());

        state.push(mv("a1a2"));
        assert_eq!(state.halfmove_clock(), 150);
        assert_eq!(state.outcome(), Some(Outcome::Draw));
        state.undo().unwrap();

        state.push(mv("e2e4"));
        assert_eq!(state.halfmove_clock(), 0);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(
            GameState::from_fen("not a position"),
            Err(EngineError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_display_start_position() {
        let rendered = GameState::new().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "r n b q k b n r");
        assert_eq!(lines[7], "R N B Q K B N R");
    }
}
