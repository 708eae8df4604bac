//! "Gives check" detection for freshly generated moves.
//!
//! A [`CheckDetector`] lives for one generator call. It caches, per square,
//! what lies between that square and the enemy king on the pre-move board,
//! and per origin square, which of our sliders a vacated origin would unmask.
//! Nothing survives the call, so a detector can never answer for a stale
//! position.

use crate::game_state::chess_types::{square_bit, Color, Piece, PieceKind, Square};
use crate::game_state::position::{attacks_along, Position};
use crate::geometry::move_templates::{knight_attacks, pawn_attacks};
use crate::geometry::rays::{direction_between, ray, Direction};
use crate::move_generation::chess_move::{Checkers, CheckingPiece, Move};

/// What separates a square from the enemy king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineToKing {
    Unknown,
    /// The square does not share a rank, file or diagonal with the king.
    NoRay,
    /// Nothing between the square and the king; the direction leads to it.
    ClearPath(Direction),
    Blocked {
        direction: Direction,
        first_blocker: Square,
        more_blockers: bool,
    },
}

pub struct CheckDetector<'a> {
    position: &'a Position,
    us: Color,
    enemy_king: Square,
    lines: [LineToKing; 64],
    discovered: [Option<Option<CheckingPiece>>; 64],
}

impl<'a> CheckDetector<'a> {
    /// Detector for moves of the side to move in `position`.
    pub fn new(position: &'a Position) -> Self {
        let us = position.side_to_move();
        Self {
            position,
            us,
            enemy_king: position.king_square(us.opposite()),
            lines: [LineToKing::Unknown; 64],
            discovered: [None; 64],
        }
    }

    /// Pieces that check the enemy king once `mv` is played.
    pub fn checks_for(&mut self, mv: &Move) -> Checkers {
        if mv.is_castling() || mv.is_en_passant() {
            // two pieces move or two squares empty: replay the move instead
            let after = self.position.apply(mv);
            return after.is_king_in_check(self.enemy_king, self.us.opposite());
        }

        let mut checkers = Checkers::NONE;
        if let Some(direct) = self.direct_check(mv) {
            checkers.push(direct);
        }
        if let Some(discovered) = self.discovered_check(mv) {
            checkers.push(discovered);
        }
        checkers
    }

    /// Cached line status from `square` towards the enemy king.
    pub fn line_to_king(&mut self, square: Square) -> LineToKing {
        let slot = square as usize;
        if self.lines[slot] == LineToKing::Unknown {
            self.lines[slot] = self.scan_line(square);
        }
        self.lines[slot]
    }

    fn scan_line(&self, square: Square) -> LineToKing {
        let Some(direction) = direction_between(square, self.enemy_king) else {
            return LineToKing::NoRay;
        };
        let mut first_blocker = None;
        for &step in ray(square, direction) {
            if step == self.enemy_king {
                break;
            }
            if self.position.square_is_empty(step) {
                continue;
            }
            if let Some(first_blocker) = first_blocker {
                return LineToKing::Blocked {
                    direction,
                    first_blocker,
                    more_blockers: true,
                };
            }
            first_blocker = Some(step);
        }
        match first_blocker {
            None => LineToKing::ClearPath(direction),
            Some(first_blocker) => LineToKing::Blocked {
                direction,
                first_blocker,
                more_blockers: false,
            },
        }
    }

    fn direct_check(&mut self, mv: &Move) -> Option<CheckingPiece> {
        let kind = mv.landing_kind();
        let king_bit = square_bit(self.enemy_king);
        let jump = |kind| CheckingPiece {
            kind,
            square: mv.to,
            ray: None,
        };
        match kind {
            PieceKind::Pawn => (pawn_attacks(self.us, mv.to) & king_bit != 0).then(|| jump(kind)),
            PieceKind::Knight => (knight_attacks(mv.to) & king_bit != 0).then(|| jump(kind)),
            PieceKind::King => None,
            _ => {
                let direction = match self.line_to_king(mv.to) {
                    LineToKing::ClearPath(direction) => direction,
                    LineToKing::Blocked {
                        direction,
                        first_blocker,
                        more_blockers: false,
                    } if first_blocker == mv.from => direction,
                    _ => return None,
                };
                attacks_along(kind, direction).then_some(CheckingPiece {
                    kind,
                    square: mv.to,
                    ray: Some(direction),
                })
            }
        }
    }

    fn discovered_check(&mut self, mv: &Move) -> Option<CheckingPiece> {
        let LineToKing::ClearPath(direction) = self.line_to_king(mv.from) else {
            return None;
        };
        // staying on the line keeps it closed
        if direction_between(self.enemy_king, mv.to) == Some(direction.opposite()) {
            return None;
        }
        let slot = mv.from as usize;
        if let Some(cached) = self.discovered[slot] {
            return cached;
        }
        let unmasked = self.slider_behind(mv.from, direction);
        self.discovered[slot] = Some(unmasked);
        unmasked
    }

    /// Our slider directly behind `origin` that attacks along `direction`.
    fn slider_behind(&self, origin: Square, direction: Direction) -> Option<CheckingPiece> {
        let piece_square = ray(origin, direction.opposite())
            .iter()
            .copied()
            .find(|&sq| !self.position.square_is_empty(sq))?;
        match self.position.piece_at(piece_square) {
            Some(Piece { color, kind }) if color == self.us && attacks_along(kind, direction) => Some(CheckingPiece {
                kind,
                square: piece_square,
                ray: Some(direction),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::CastlingSide;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn line_status_records_first_blocker() {
        // black king e8, a white pawn on e4 sits on the e-file
        let position = parse_fen("4k3/8/8/8/4P3/8/8/4K2R w - - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);
        assert_eq!(
            detector.line_to_king(sq("e1")),
            LineToKing::Blocked {
                direction: Direction::North,
                first_blocker: sq("e4"),
                more_blockers: false,
            }
        );
        assert_eq!(detector.line_to_king(sq("e5")), LineToKing::ClearPath(Direction::North));
        assert_eq!(detector.line_to_king(sq("b1")), LineToKing::NoRay);
        assert_eq!(detector.line_to_king(sq("h5")), LineToKing::ClearPath(Direction::NorthWest));
    }

    #[test]
    fn direct_checks_by_each_piece_kind() {
        let position = parse_fen("4k3/8/8/8/8/8/3P4/R3K1NB w - - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);

        let rook = detector.checks_for(&Move::quiet(sq("a1"), sq("a8"), PieceKind::Rook));
        assert_eq!(rook.len(), 1);
        assert_eq!(
            rook.iter().next().map(|c| (c.square, c.ray)),
            Some((sq("a8"), Some(Direction::East)))
        );

        assert!(detector
            .checks_for(&Move::quiet(sq("g1"), sq("f3"), PieceKind::Knight))
            .is_empty());
        assert!(!detector
            .checks_for(&Move::quiet(sq("h1"), sq("c6"), PieceKind::Bishop))
            .is_empty());
        assert!(detector
            .checks_for(&Move::quiet(sq("d2"), sq("d4"), PieceKind::Pawn))
            .is_empty());
    }

    #[test]
    fn promoted_piece_checks_through_the_vacated_origin() {
        // b7xa8=B sees c6 through b7, which the pawn has just left
        let position = parse_fen("n1n5/PPP5/2k5/8/8/8/4Kppp/5N1N w - - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);
        let bishop = detector.checks_for(&Move::promotion(sq("b7"), sq("a8"), PieceKind::Bishop, true));
        assert_eq!(bishop.len(), 1);
        assert!(bishop.iter().all(|c| c.ray == Some(Direction::SouthEast)));
        assert!(detector
            .checks_for(&Move::promotion(sq("b7"), sq("a8"), PieceKind::Knight, true))
            .is_empty());
        assert!(!detector
            .checks_for(&Move::promotion(sq("b7"), sq("b8"), PieceKind::Knight, false))
            .is_empty());
    }

    #[test]
    fn discovered_check_unmasks_a_slider() {
        // rook e1 behind knight e4 on the e-file towards the king on e8
        let position = parse_fen("4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);
        let checks = detector.checks_for(&Move::quiet(sq("e4"), sq("c5"), PieceKind::Knight));
        assert_eq!(checks.len(), 1);
        assert!(checks.contains_square(sq("e1")));

        // a knight landing on f6 checks too: double check
        let double = detector.checks_for(&Move::quiet(sq("e4"), sq("f6"), PieceKind::Knight));
        assert!(double.is_double());
    }

    #[test]
    fn moving_along_the_line_does_not_discover() {
        let position = parse_fen("4k3/8/8/8/4R3/8/8/K3R3 w - - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);
        let checks = detector.checks_for(&Move::quiet(sq("e4"), sq("e6"), PieceKind::Rook));
        assert_eq!(checks.len(), 1);
        assert!(checks.contains_square(sq("e6")));
        assert!(!checks.contains_square(sq("e1")));
    }

    #[test]
    fn castling_rook_gives_check() {
        let position = parse_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").expect("fen");
        let mut detector = CheckDetector::new(&position);
        let checks = detector.checks_for(&Move::castle(Color::Light, CastlingSide::Kingside));
        assert!(checks.contains_square(sq("f1")));
    }
}
