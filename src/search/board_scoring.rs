//! Pluggable board evaluation interfaces and the baseline implementation.
//!
//! Search delegates static position scoring to [`BoardScorer`], so alternate
//! heuristics can be swapped in without touching search code.

use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::position::Position;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;

pub trait BoardScorer: Send + Sync {
    /// Score from light's point of view: positive favours light.
    fn score(&self, position: &Position) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Centipawns per legal move of difference between the sides.
    pub mobility_weight: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { mobility_weight: 2 }
    }
}

/// Material plus piece-square tables plus mobility.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer {
    pub weights: ScoringWeights,
}

impl PieceSquareScorer {
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    /// Base value plus table bonus for one piece, always positive-is-good for
    /// its owner.
    #[inline]
    pub fn piece_square_value(piece: PieceKind, color: Color, square: Square) -> i32 {
        Self::piece_value(piece) + piece_square_bonus(piece, color, square)
    }

    fn material_light_minus_dark(position: &Position) -> i32 {
        (0..64u8)
            .filter_map(|square| position.piece_at(square).map(|piece| (square, piece)))
            .map(|(square, piece)| piece.color.sign() * Self::piece_square_value(piece.kind, piece.color, square))
            .sum()
    }

    fn mobility_light_minus_dark(position: &Position) -> i32 {
        let generator = LegalMoveGenerator;
        let light = generator.count_legal_moves(&position.for_side(Color::Light)) as i32;
        let dark = generator.count_legal_moves(&position.for_side(Color::Dark)) as i32;
        light - dark
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, position: &Position) -> i32 {
        Self::material_light_minus_dark(position) + self.weights.mobility_weight * Self::mobility_light_minus_dark(position)
    }
}

/// Table bonus, tables laid out from a1 (`[0]`) to h8 (`[63]`) for light and
/// flipped rank-wise for dark.
#[inline]
fn piece_square_bonus(piece: PieceKind, color: Color, square: Square) -> i32 {
    let index = match color {
        Color::Light => square as usize,
        Color::Dark => (square ^ 56) as usize,
    };
    match piece {
        PieceKind::Pawn => PAWN_TABLE[index],
        PieceKind::Knight => KNIGHT_TABLE[index],
        PieceKind::Bishop => BISHOP_TABLE[index],
        PieceKind::Rook => ROOK_TABLE[index],
        PieceKind::Queen => QUEEN_TABLE[index],
        PieceKind::King => KING_TABLE[index],
    }
}

// Pawns: shelter in front of a castled king, centre pawns wanted on d4/e4 and
// beyond, growing bonus from the sixth rank on.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,   0,   0,   0,   0,  0,  0,
     5, 10,  10, -20, -20,  10, 10,  5,
     5, -5, -10,   0,   0, -10, -5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5,  5,  10,  25,  25,  10,  5,  5,
    10, 10,  20,  30,  30,  20, 10, 10,
    50, 50,  50,  50,  50,  50, 50, 50,
     0,  0,   0,   0,   0,   0,  0,  0,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
      0,   0,   5,  5,  5,   5,   0,  -5,
     -5,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

// King: stay behind the pawn shelter. No separate endgame table.
#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn pawn_tables_mirror_between_colours() {
        let light = PieceSquareScorer::piece_square_value(PieceKind::Pawn, Color::Light, sq("c2"))
            + PieceSquareScorer::piece_square_value(PieceKind::Pawn, Color::Light, sq("d4"));
        let dark = PieceSquareScorer::piece_square_value(PieceKind::Pawn, Color::Dark, sq("c7"))
            + PieceSquareScorer::piece_square_value(PieceKind::Pawn, Color::Dark, sq("d5"));
        assert_eq!(light, 230);
        assert_eq!(dark, 230);
    }

    #[test]
    fn queen_table_values() {
        assert_eq!(PieceSquareScorer::piece_square_value(PieceKind::Queen, Color::Light, sq("c2")), 905);
        assert_eq!(PieceSquareScorer::piece_square_value(PieceKind::Queen, Color::Dark, sq("a6")), 890);
    }

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(PieceSquareScorer::default().score(&Position::starting()), 0);
        assert_eq!(Position::starting().evaluate(), 0);
    }

    #[test]
    fn extra_material_favours_its_owner() {
        let light_up = parse_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("fen");
        let dark_up = parse_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1").expect("fen");
        let scorer = PieceSquareScorer::default();
        assert!(scorer.score(&light_up) > 800);
        assert!(scorer.score(&dark_up) < -800);
        // score does not depend on who is to move
        assert_eq!(scorer.score(&dark_up), -scorer.score(&light_up));
    }

    #[test]
    fn mobility_weight_scales_the_move_difference() {
        let position = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("fen");
        let without = PieceSquareScorer::new(ScoringWeights { mobility_weight: 0 }).score(&position);
        let with = PieceSquareScorer::default().score(&position);
        let light = LegalMoveGenerator.count_legal_moves(&position.for_side(Color::Light)) as i32;
        let dark = LegalMoveGenerator.count_legal_moves(&position.for_side(Color::Dark)) as i32;
        assert_eq!(with - without, 2 * (light - dark));
    }

    #[test]
    fn en_passant_only_counts_for_the_mover() {
        let position = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("fen");
        let dark_view = position.for_side(Color::Dark);
        assert_eq!(dark_view.en_passant_square(), None);
        // scoring does not disturb the position it was given
        let _ = PieceSquareScorer::default().score(&position);
        assert_eq!(position.en_passant_square(), Some(sq("d6")));
    }
}
