//! Move value type produced by the generator.
//!
//! A `Move` is immutable once produced. The generator may attach a
//! [`Checkers`] annotation naming the pieces that will give check once the
//! move is played; the annotation does not take part in equality, hashing or
//! the plain textual form.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::game_state::chess_rules::{CASTLING_KING_TARGET, KING_HOME};
use crate::game_state::chess_types::{CastlingSide, Color, PieceKind, Square};
use crate::geometry::rays::Direction;
use crate::utils::algebraic::square_name;

/// A piece attacking a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckingPiece {
    pub kind: PieceKind,
    pub square: Square,
    /// Direction from the checker towards the king, for sliders.
    pub ray: Option<Direction>,
}

/// Up to two checking pieces (the most a legal position can have).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Checkers {
    pieces: [Option<CheckingPiece>; 2],
}

impl Checkers {
    pub const NONE: Checkers = Checkers { pieces: [None, None] };

    pub fn single(checker: CheckingPiece) -> Self {
        Self {
            pieces: [Some(checker), None],
        }
    }

    /// Adds a checker. Returns `false` once two are already recorded.
    pub fn push(&mut self, checker: CheckingPiece) -> bool {
        for slot in self.pieces.iter_mut() {
            if slot.is_none() {
                *slot = Some(checker);
                return true;
            }
        }
        false
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_some()).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces[0].is_none()
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        self.pieces[1].is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckingPiece> {
        self.pieces.iter().flatten()
    }

    pub fn contains_square(&self, square: Square) -> bool {
        self.iter().any(|c| c.square == square)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Kind of the moving piece (a pawn for promotions).
    pub piece: PieceKind,
    pub capture: bool,
    pub promotion: Option<PieceKind>,
    /// Square of the pawn removed by an en-passant capture.
    pub en_passant_square: Option<Square>,
    pub castling: Option<CastlingSide>,
    checks: Checkers,
}

impl Move {
    pub const fn quiet(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            piece,
            capture: false,
            promotion: None,
            en_passant_square: None,
            castling: None,
            checks: Checkers::NONE,
        }
    }

    pub const fn capture(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            capture: true,
            ..Self::quiet(from, to, piece)
        }
    }

    pub const fn promotion(from: Square, to: Square, promoted: PieceKind, capture: bool) -> Self {
        Self {
            capture,
            promotion: Some(promoted),
            ..Self::quiet(from, to, PieceKind::Pawn)
        }
    }

    pub const fn en_passant(from: Square, to: Square, captured_pawn: Square) -> Self {
        Self {
            capture: true,
            en_passant_square: Some(captured_pawn),
            ..Self::quiet(from, to, PieceKind::Pawn)
        }
    }

    pub const fn castle(color: Color, side: CastlingSide) -> Self {
        Self {
            castling: Some(side),
            ..Self::quiet(
                KING_HOME[color.index()],
                CASTLING_KING_TARGET[color.index()][side.index()],
                PieceKind::King,
            )
        }
    }

    /// Same move, annotated with the pieces it checks with.
    #[inline]
    pub fn with_checks(self, checks: Checkers) -> Self {
        Self { checks, ..self }
    }

    #[inline]
    pub fn checks(&self) -> &Checkers {
        &self.checks
    }

    #[inline]
    pub fn gives_check(&self) -> bool {
        !self.checks.is_empty()
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.en_passant_square.is_some()
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        self.castling.is_some()
    }

    /// Piece kind standing on the target square after the move.
    #[inline]
    pub fn landing_kind(&self) -> PieceKind {
        self.promotion.unwrap_or(self.piece)
    }

    /// Coordinate form used by UCI front ends, e.g. `e7e8q`.
    pub fn to_long_algebraic(&self) -> String {
        let mut out = square_name(self.from);
        out.push_str(&square_name(self.to));
        if let Some(promoted) = self.promotion {
            out.push(promoted.letter().to_ascii_lowercase());
        }
        out
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.piece == other.piece
            && self.capture == other.capture
            && self.promotion == other.promotion
            && self.en_passant_square == other.en_passant_square
            && self.castling == other.castling
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.piece.hash(state);
        self.capture.hash(state);
        self.promotion.hash(state);
        self.en_passant_square.hash(state);
        self.castling.hash(state);
    }
}

/// Descriptive form: `Rh1-h8`, `e5xd6 ep`, `b7xa8=Q`, `O-O`.
/// The alternate flag (`{:#}`) appends `+` for checking moves.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castling {
            Some(CastlingSide::Kingside) => f.write_str("O-O")?,
            Some(CastlingSide::Queenside) => f.write_str("O-O-O")?,
            None => {
                if self.piece != PieceKind::Pawn {
                    write!(f, "{}", self.piece.letter())?;
                }
                let sep = if self.capture { 'x' } else { '-' };
                write!(f, "{}{}{}", square_name(self.from), sep, square_name(self.to))?;
                if let Some(promoted) = self.promotion {
                    write!(f, "={}", promoted.letter())?;
                }
                if self.is_en_passant() {
                    f.write_str(" ep")?;
                }
            }
        }
        if f.alternate() && self.gives_check() {
            f.write_str("+")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_annotation_does_not_change_identity() {
        let base = Move::quiet(7, 63, PieceKind::Rook);
        let checking = base.with_checks(Checkers::single(CheckingPiece {
            kind: PieceKind::Rook,
            square: 63,
            ray: Some(Direction::West),
        }));

        assert_eq!(base, checking);
        assert!(checking.gives_check());
        assert!(!base.gives_check());
        assert_eq!(base.to_string(), checking.to_string());
        assert_eq!(format!("{checking:#}"), "Rh1-h8+");
        assert_eq!(format!("{base:#}"), "Rh1-h8");
    }

    #[test]
    fn descriptive_text_covers_special_moves() {
        assert_eq!(Move::en_passant(38, 45, 37).to_string(), "g5xf6 ep");
        assert_eq!(Move::promotion(49, 56, PieceKind::Queen, true).to_string(), "b7xa8=Q");
        assert_eq!(Move::castle(Color::Dark, CastlingSide::Queenside).to_string(), "O-O-O");
        assert_eq!(Move::quiet(12, 28, PieceKind::Pawn).to_string(), "e2-e4");
    }

    #[test]
    fn long_algebraic_text() {
        assert_eq!(Move::castle(Color::Light, CastlingSide::Kingside).to_long_algebraic(), "e1g1");
        assert_eq!(Move::promotion(52, 60, PieceKind::Knight, false).to_long_algebraic(), "e7e8n");
    }

    #[test]
    fn checkers_hold_at_most_two() {
        let piece = |square| CheckingPiece {
            kind: PieceKind::Knight,
            square,
            ray: None,
        };
        let mut checkers = Checkers::NONE;
        assert!(checkers.is_empty());
        assert!(checkers.push(piece(1)));
        assert!(!checkers.is_double());
        assert!(checkers.push(piece(2)));
        assert!(checkers.is_double());
        assert!(!checkers.push(piece(3)));
        assert_eq!(checkers.len(), 2);
        assert!(checkers.contains_square(2));
        assert!(!checkers.contains_square(3));
    }
}
