/// Static position evaluation
///
/// Material plus piece-square bonuses, scored from one side's point of view.
/// Terminal positions resolve to a fixed win, loss or draw score.
use crate::game::{GameState, Outcome};
use crate::piece_square_tables::square_bonus;
use chess::{Color, Piece};
use serde::{Deserialize, Serialize};

/// Score of a position won by the evaluating side
pub const WIN_SCORE: f32 = 999.0;
/// Score of any drawn position
pub const DRAW_SCORE: f32 = 0.0;

/// Material value of each piece kind, in pawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceValues {
    pub pawn: f32,
    pub knight: f32,
    pub bishop: f32,
    pub rook: f32,
    pub queen: f32,
    /// Sentinel, kings are never traded
    pub king: f32,
}

impl Default for PieceValues {
    fn default() -> Self {
        Self {
            pawn: 1.0,
            knight: 3.0,
            bishop: 3.2,
            rook: 5.0,
            queen: 9.0,
            king: 200.0,
        }
    }
}

impl PieceValues {
    pub fn value(&self, piece: Piece) -> f32 {
        match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        }
    }
}

/// Rotate a square index by 180 degrees: `(7 - row) * 8 + (7 - col)`
pub fn mirror_index(index: usize) -> usize {
    let row = index / 8;
    let col = index % 8;
    (7 - row) * 8 + (7 - col)
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    piece_values: PieceValues,
}

impl Evaluator {
    pub fn new(piece_values: PieceValues) -> Self {
        Self { piece_values }
    }

    pub fn piece_values(&self) -> &PieceValues {
        &self.piece_values
    }

    /// Score `state` for `perspective`. Pure: no mutation, no memory.
    pub fn evaluate(&self, state: &GameState, perspective: Color) -> f32 {
        match state.outcome() {
            Some(Outcome::Winner(winner)) if winner == perspective => WIN_SCORE,
            Some(Outcome::Winner(_)) => -WIN_SCORE,
            Some(Outcome::Draw) => DRAW_SCORE,
            None => self.side_total(state, perspective) - self.side_total(state, !perspective),
        }
    }

    /// Sum of material and square bonuses for every piece `color` owns
    pub fn side_total(&self, state: &GameState, color: Color) -> f32 {
        let board = state.board();
        let mut total = 0.0;

        for square in *board.color_combined(color) {
            let Some(piece) = board.piece_on(square) else {
                continue;
            };
            let index = match color {
                Color::White => square.to_index(),
                Color::Black => mirror_index(square.to_index()),
            };
            total += self.piece_values.value(piece) + square_bonus(piece, index);
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_index() {
        assert_eq!(mirror_index(0), 63);
        assert_eq!(mirror_index(63), 0);
        assert_eq!(mirror_index(25), 38);
        for index in 0..64 {
            assert_eq!(mirror_index(mirror_index(index)), index);
        }
    }

    #[test]
    fn test_start_position_is_balanced() {
        let evaluator = Evaluator::default();
        let state = GameState::new();
        let white = evaluator.side_total(&state, Color::White);
        let black = evaluator.side_total(&state, Color::Black);
        assert!((white - black).abs() < 1e-4);
        assert!(evaluator.evaluate(&state, Color::White).abs() < 1e-4);
    }

    #[test]
    fn test_material_advantage() {
        let evaluator = Evaluator::default();
        // Black is missing the queen
        let state =
            GameState::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let score = evaluator.evaluate(&state, Color::White);
        assert!(score > 8.0 && score < 10.0, "score was {score}");
        assert!(evaluator.evaluate(&state, Color::Black) < -8.0);
    }

    #[test]
    fn test_antisymmetry() {
        let evaluator = Evaluator::default();
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "r1bq1rk1/ppp2ppp/2np1n2/2b1p3/2B1P3/2NP1N2/PPP2PPP/R1BQ1RK1 w - - 0 7",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let state = GameState::from_fen(fen).unwrap();
            let white = evaluator.evaluate(&state, Color::White);
            let black = evaluator.evaluate(&state, Color::Black);
            assert!((white + black).abs() < 1e-4, "{fen}: {white} vs {black}");
        }
    }

    #[test]
    fn test_terminal_scores() {
        let evaluator = Evaluator::default();
        // Black to move, mated by the queen on g7
        let mated = GameState::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(evaluator.evaluate(&mated, Color::White), WIN_SCORE);
        assert_eq!(evaluator.evaluate(&mated, Color::Black), -WIN_SCORE);

        let stalemate = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(evaluator.evaluate(&stalemate, Color::White), DRAW_SCORE);
    }

    #[test]
    fn test_custom_piece_values() {
        let values = PieceValues {
            bishop: 3.0,
            ..PieceValues::default()
        };
        let evaluator = Evaluator::new(values);
        assert_eq!(evaluator.piece_values().value(Piece::Bishop), 3.0);
        assert_eq!(evaluator.piece_values().value(Piece::King), 200.0);
    }
}
