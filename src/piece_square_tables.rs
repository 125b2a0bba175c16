//! Positional bonuses in pawn units.
//!
//! Each table is written the way the board looks from the first mover's
//! side: the first row is rank 8, the last row rank 1. Board square `i`
//! (a1 = 0) is therefore found at `63 - i`.

use chess::Piece;

#[rustfmt::skip]
pub const PAWN: [f32; 64] = [
     0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,
     0.5,  0.5,  0.5,  0.5,  0.5,  0.5,  0.5,  0.5,
     0.1,  0.1,  0.2,  0.3,  0.3,  0.2,  0.1,  0.1,
    0.05, 0.05,  0.1, 0.25, 0.25,  0.1, 0.05, 0.05,
     0.0,  0.0,  0.0,  0.2,  0.2,  0.0,  0.0,  0.0,
    0.05,-0.05, -0.1,  0.0,  0.0, -0.1,-0.05, 0.05,
    0.05,  0.1,  0.1, -0.2, -0.2,  0.1,  0.1, 0.05,
     0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,
];

#[rustfmt::skip]
pub const KNIGHT: [f32; 64] = [
    -0.5, -0.4, -0.3, -0.3, -0.3, -0.3, -0.4, -0.5,
    -0.4, -0.2,  0.0,  0.0,  0.0,  0.0, -0.2, -0.4,
    -0.3,  0.0,  0.1, 0.15, 0.15,  0.1,  0.0, -0.3,
    -0.3, 0.05, 0.15,  0.2,  0.2, 0.15, 0.05, -0.3,
    -0.3,  0.0, 0.15,  0.2,  0.2, 0.15,  0.0, -0.3,
    -0.3, 0.05,  0.1, 0.15, 0.15,  0.1, 0.05, -0.3,
    -0.4, -0.2,  0.0, 0.05, 0.05,  0.0, -0.2, -0.4,
    -0.5, -0.4, -0.3, -0.3, -0.3, -0.3, -0.4, -0.5,
];

#[rustfmt::skip]
pub const BISHOP: [f32; 64] = [
    -0.2, -0.1, -0.1, -0.1, -0.1, -0.1, -0.1, -0.2,
    -0.1,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0, -0.1,
    -0.1,  0.0, 0.05,  0.1,  0.1, 0.05,  0.0, -0.1,
    -0.1, 0.05, 0.05,  0.1,  0.1, 0.05, 0.05, -0.1,
    -0.1,  0.0,  0.1,  0.1,  0.1,  0.1,  0.0, -0.1,
    -0.1,  0.1,  0.1,  0.1,  0.1,  0.1,  0.1, -0.1,
    -0.1, 0.05,  0.0,  0.0,  0.0,  0.0, 0.05, -0.1,
    -0.2, -0.1, -0.1, -0.1, -0.1, -0.1, -0.1, -0.2,
];

#[rustfmt::skip]
pub const ROOK: [f32; 64] = [
     0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,
    0.05,  0.1,  0.1,  0.1,  0.1,  0.1,  0.1, 0.05,
   -0.05,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,-0.05,
   -0.05,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,-0.05,
   -0.05,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,-0.05,
   -0.05,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,-0.05,
   -0.05,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,-0.05,
     0.0,  0.0,  0.0, 0.05, 0.05,  0.0,  0.0,  0.0,
];

#[rustfmt::skip]
pub const QUEEN: [f32; 64] = [
    -0.2, -0.1, -0.1,-0.05,-0.05, -0.1, -0.1, -0.2,
    -0.1,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0, -0.1,
    -0.1,  0.0, 0.05, 0.05, 0.05, 0.05,  0.0, -0.1,
   -0.05,  0.0, 0.05, 0.05, 0.05, 0.05,  0.0,-0.05,
     0.0,  0.0, 0.05, 0.05, 0.05, 0.05,  0.0,-0.05,
    -0.1, 0.05, 0.05, 0.05, 0.05, 0.05,  0.0, -0.1,
    -0.1,  0.0, 0.05,  0.0,  0.0,  0.0,  0.0, -0.1,
    -0.2, -0.1, -0.1,-0.05,-0.05, -0.1, -0.1, -0.2,
];

#[rustfmt::skip]
pub const KING: [f32; 64] = [
    -0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3,
    -0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3,
    -0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3,
    -0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3,
    -0.2, -0.3, -0.3, -0.4, -0.4, -0.3, -0.3, -0.1,
    -0.1, -0.2, -0.2, -0.2, -0.2, -0.2, -0.2, -0.1,
     0.2,  0.2,  0.0,  0.0,  0.0,  0.0,  0.2,  0.2,
     0.2,  0.3,  0.1,  0.0,  0.0,  0.1,  0.3,  0.2,
];

pub fn table_for(piece: Piece) -> &'static [f32; 64] {
    match piece {
        Piece::Pawn => &PAWN,
        Piece::Knight => &KNIGHT,
        Piece::Bishop => &BISHOP,
        Piece::Rook => &ROOK,
        Piece::Queen => &QUEEN,
        Piece::King => &KING,
    }
}

/// Bonus for `piece` on square `index` as seen from the first mover
pub fn square_bonus(piece: Piece, index: usize) -> f32 {
    table_for(piece)[63 - index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mover_orientation() {
        // Pawns on the seventh rank are about to promote
        assert_eq!(square_bonus(Piece::Pawn, 52), 0.5); // e7
        // Central pawns on their start squares are discouraged
        assert_eq!(square_bonus(Piece::Pawn, 11), -0.2); // d2
        assert_eq!(square_bonus(Piece::Pawn, 12), -0.2); // e2
        // Castled king
        assert_eq!(square_bonus(Piece::King, 6), 0.3); // g1
    }

    #[test]
    fn test_knights_prefer_the_centre() {
        assert!(square_bonus(Piece::Knight, 27) > square_bonus(Piece::Knight, 0));
    }
}
