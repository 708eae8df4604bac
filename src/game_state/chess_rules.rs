//! Canonical chess-rule constants.
//!
//! Starting position plus the fixed squares castling works with. Squares are
//! indexed `0 == a1`; every table is indexed by `Color::index()` first and
//! `CastlingSide::index()` second.

use crate::game_state::chess_types::Square;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

/// Home square of each king.
pub const KING_HOME: [Square; 2] = [E1, E8];

/// King destination after castling.
pub const CASTLING_KING_TARGET: [[Square; 2]; 2] = [[G1, C1], [G8, C8]];

/// Rook origin (the corner square) for each castling.
pub const CASTLING_ROOK_ORIGIN: [[Square; 2]; 2] = [[H1, A1], [H8, A8]];

/// Rook destination after castling.
pub const CASTLING_ROOK_TARGET: [[Square; 2]; 2] = [[F1, D1], [F8, D8]];

/// Squares between king and rook that must be empty.
pub const CASTLING_EMPTY_SQUARES: [[&[Square]; 2]; 2] = [
    [&[F1, G1], &[B1, C1, D1]],
    [&[F8, G8], &[B8, C8, D8]],
];

/// Squares the king crosses or lands on; none may be attacked.
/// The queenside b-file square only has to be empty.
pub const CASTLING_TRANSIT_SQUARES: [[&[Square]; 2]; 2] = [
    [&[F1, G1], &[D1, C1]],
    [&[F8, G8], &[D8, C8]],
];

/// Squares an enemy knight would have to stand on to attack the king's
/// home square or any transit square.
pub const CASTLING_KNIGHT_WATCH: [[&[Square]; 2]; 2] = [
    [
        // d2 e3 g3 h2 e2 f3 h3
        &[11, 20, 22, 15, 12, 21, 23],
        // b3 c3 d3 e3 a2 b2 e2 f2
        &[17, 18, 19, 20, 8, 9, 12, 13],
    ],
    [
        // d7 e6 g6 h7 e7 f6 h6
        &[51, 44, 46, 55, 52, 45, 47],
        // b6 c6 d6 e6 a7 b7 e7 f7
        &[41, 42, 43, 44, 48, 49, 52, 53],
    ],
];
