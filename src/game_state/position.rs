//! Immutable-per-ply position snapshot.
//!
//! A `Position` is never changed once built: [`Position::apply`] returns a new
//! snapshot. The board array is copied on every apply; the castling-rights
//! matrix and the king-square pair are reference counted and only replaced
//! when a move actually changes them, so consecutive snapshots share them.

use std::fmt;
use std::sync::Arc;

use crate::errors::{PositionError, PositionResult};
use crate::game_state::chess_rules::{
    CASTLING_ROOK_ORIGIN, CASTLING_ROOK_TARGET, KING_HOME,
};
use crate::game_state::chess_types::*;
use crate::geometry::move_templates::{knight_attacks, pawn_attackers};
use crate::geometry::rays::{ray, squares_in, Direction};
use crate::move_generation::chess_move::{Checkers, CheckingPiece, Move};
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};
use crate::utils::fen_generator::generate_fen;
use crate::utils::render_game_state::render_position;

/// Result of walking a ray from some origin square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayOccupant {
    /// Reached the board edge without meeting a piece.
    Nothing,
    /// First piece met belongs to the side the walk was made for.
    Blocker(Square),
    /// First piece met is an opponent's.
    Opponent(PieceKind, Square),
}

/// Squares of pin rays from a king: from next to the king up to and
/// including the pinning piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinMasks {
    pub orthogonal: u64,
    pub diagonal: u64,
}

/// `true` if a piece of `kind` attacks along rays of `direction`'s orientation.
#[inline]
pub fn attacks_along(kind: PieceKind, direction: Direction) -> bool {
    if direction.is_diagonal() {
        kind.slides_diagonally()
    } else {
        kind.slides_orthogonally()
    }
}

#[derive(Debug, Clone)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling_rights: Arc<CastlingRights>,
    kings: Arc<[Square; 2]>,
    en_passant_square: Option<Square>,
    checkers: Checkers,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl Position {
    /// Kings only, no castling rights, light to move.
    pub fn with_kings(light_king: Square, dark_king: Square) -> Self {
        Self::with_castling_rights(NO_CASTLING_RIGHTS, light_king, dark_king)
    }

    pub fn with_castling_rights(rights: CastlingRights, light_king: Square, dark_king: Square) -> Self {
        let mut board = [None; 64];
        board[light_king as usize] = Some(Piece::new(Color::Light, PieceKind::King));
        board[dark_king as usize] = Some(Piece::new(Color::Dark, PieceKind::King));
        Self {
            board,
            side_to_move: Color::Light,
            castling_rights: Arc::new(rights),
            kings: Arc::new([light_king, dark_king]),
            en_passant_square: None,
            checkers: Checkers::NONE,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut position = Self::with_castling_rights(ALL_CASTLING_RIGHTS, KING_HOME[0], KING_HOME[1]);
        for file in 0..8u8 {
            let kind = BACK_RANK[file as usize];
            position.board[square_at(file, 0) as usize] = Some(Piece::new(Color::Light, kind));
            position.board[square_at(file, 1) as usize] = Some(Piece::new(Color::Light, PieceKind::Pawn));
            position.board[square_at(file, 6) as usize] = Some(Piece::new(Color::Dark, PieceKind::Pawn));
            position.board[square_at(file, 7) as usize] = Some(Piece::new(Color::Dark, kind));
        }
        position
    }

    /// Places a piece during setup. A second king of the same colour is
    /// rejected, as is covering a king with another piece.
    pub fn add_piece(&mut self, color: Color, kind: PieceKind, square: Square) -> PositionResult<()> {
        if let Some(existing) = self.board[square as usize] {
            if existing.kind == PieceKind::King && existing != Piece::new(color, kind) {
                return Err(PositionError::SquareHoldsKing { square });
            }
        }
        if kind == PieceKind::King {
            let current = self.kings[color.index()];
            if current != square && self.board[current as usize] == Some(Piece::new(color, PieceKind::King)) {
                return Err(PositionError::DuplicateKing { color, square });
            }
            Arc::make_mut(&mut self.kings)[color.index()] = square;
        }
        self.board[square as usize] = Some(Piece::new(color, kind));
        Ok(())
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.en_passant_square = square;
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = Arc::new(rights);
    }

    pub fn set_move_counters(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    /// Recomputes the check state of the side to move from the board.
    /// Needed after setup, when no move annotation is available.
    pub fn refresh_check_state(&mut self) {
        let king = self.king_square(self.side_to_move);
        self.checkers = self.is_king_in_check(king, self.side_to_move);
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn square_is_empty(&self, square: Square) -> bool {
        self.board[square as usize].is_none()
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.board[square as usize].map(|p| p.color)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    #[inline]
    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.castling_rights[color.index()][side.index()]
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Pieces checking the side to move.
    #[inline]
    pub fn checkers(&self) -> &Checkers {
        &self.checkers
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Occupied squares of one colour.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(move |(sq, cell)| match cell {
                Some(piece) if piece.color == color => Some((sq as Square, *piece)),
                _ => None,
            })
    }

    /// `true` when both snapshots share the same castling-rights allocation.
    pub fn shares_castling_rights_with(&self, other: &Position) -> bool {
        Arc::ptr_eq(&self.castling_rights, &other.castling_rights)
    }

    /// `true` when both snapshots share the same king-square allocation.
    pub fn shares_king_squares_with(&self, other: &Position) -> bool {
        Arc::ptr_eq(&self.kings, &other.kings)
    }

    /// Copy of this position with `color` to move, for counting that side's
    /// moves. En passant is dropped unless `color` is already the mover, and
    /// the check state is recomputed for that side.
    pub fn for_side(&self, color: Color) -> Position {
        if color == self.side_to_move {
            return self.clone();
        }
        let mut view = self.clone();
        view.side_to_move = color;
        view.en_passant_square = None;
        view.refresh_check_state();
        view
    }

    /// Produces the position after `mv`. The move must come from the generator
    /// for this position; nothing is validated here (see [`Position::try_apply`]).
    pub fn apply(&self, mv: &Move) -> Position {
        let mover = self.side_to_move;
        let mut board = self.board;

        let moving = board[mv.from as usize]
            .take()
            .unwrap_or(Piece::new(mover, mv.piece));
        board[mv.to as usize] = Some(match mv.promotion {
            Some(promoted) => Piece::new(mover, promoted),
            None => moving,
        });

        if let Some(captured_pawn) = mv.en_passant_square {
            board[captured_pawn as usize] = None;
        }

        if let Some(side) = mv.castling {
            let rook_from = CASTLING_ROOK_ORIGIN[mover.index()][side.index()];
            let rook_to = CASTLING_ROOK_TARGET[mover.index()][side.index()];
            board[rook_to as usize] = board[rook_from as usize].take();
        }

        let kings = if moving.kind == PieceKind::King {
            let mut squares = *self.kings;
            squares[mover.index()] = mv.to;
            Arc::new(squares)
        } else {
            Arc::clone(&self.kings)
        };

        let castling_rights = match self.castling_rights_after(mover, moving.kind, mv) {
            Some(rights) => Arc::new(rights),
            None => Arc::clone(&self.castling_rights),
        };

        let en_passant_square = if moving.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };

        let halfmove_clock = if moving.kind == PieceKind::Pawn || mv.capture {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_number = match mover {
            Color::Light => self.fullmove_number,
            Color::Dark => self.fullmove_number.saturating_add(1),
        };

        Position {
            board,
            side_to_move: mover.opposite(),
            castling_rights,
            kings,
            en_passant_square,
            checkers: *mv.checks(),
            halfmove_clock,
            fullmove_number,
        }
    }

    /// New castling rights, or `None` when `mv` leaves them untouched.
    fn castling_rights_after(&self, mover: Color, moving: PieceKind, mv: &Move) -> Option<CastlingRights> {
        let mut rights = *self.castling_rights;
        let us = mover.index();
        let them = mover.opposite().index();

        if moving == PieceKind::King {
            rights[us] = [false, false];
        }
        for side in CastlingSide::BOTH {
            if mv.from == CASTLING_ROOK_ORIGIN[us][side.index()] {
                rights[us][side.index()] = false;
            }
            if mv.to == CASTLING_ROOK_ORIGIN[them][side.index()] {
                rights[them][side.index()] = false;
            }
        }

        (rights != *self.castling_rights).then_some(rights)
    }

    /// [`Position::apply`] preceded by structural validation of the move.
    pub fn try_apply(&self, mv: &Move) -> PositionResult<Position> {
        self.validate_move(mv)?;
        Ok(self.apply(mv))
    }

    fn validate_move(&self, mv: &Move) -> PositionResult<()> {
        let mover = self.side_to_move;
        let piece = self
            .piece_at(mv.from)
            .ok_or(PositionError::EmptyOrigin { square: mv.from })?;
        if piece.color != mover {
            return Err(PositionError::WrongColor {
                square: mv.from,
                expected: mover,
                found: piece.color,
            });
        }

        match (mv.capture, mv.en_passant_square, self.piece_at(mv.to)) {
            (true, None, None) => {
                return Err(PositionError::CaptureIntoEmptySquare { square: mv.to });
            }
            (true, None, Some(target)) if target.color == mover => {
                return Err(PositionError::CaptureOfOwnPiece { square: mv.to });
            }
            (true, Some(captured_pawn), _) => {
                if self.piece_at(captured_pawn) != Some(Piece::new(mover.opposite(), PieceKind::Pawn)) {
                    return Err(PositionError::CaptureIntoEmptySquare { square: captured_pawn });
                }
            }
            (false, _, Some(_)) => {
                return Err(PositionError::QuietMoveIntoOccupiedSquare { square: mv.to });
            }
            _ => {}
        }

        if let Some(side) = mv.castling {
            if !self.can_castle(mover, side) {
                return Err(PositionError::CastlingNotAllowed { color: mover, side });
            }
            let rook_square = CASTLING_ROOK_ORIGIN[mover.index()][side.index()];
            if self.piece_at(rook_square) != Some(Piece::new(mover, PieceKind::Rook)) {
                return Err(PositionError::CastlingWithoutRook {
                    color: mover,
                    side,
                    square: rook_square,
                });
            }
        }
        Ok(())
    }

    /// Pieces of the opposite colour attacking `king_square`, scanned from the
    /// board alone. Used when no move annotation is available.
    pub fn is_king_in_check(&self, king_square: Square, king_color: Color) -> Checkers {
        let enemy = king_color.opposite();
        let mut checkers = Checkers::NONE;

        for square in squares_in(pawn_attackers(enemy, king_square)) {
            if self.piece_at(square) == Some(Piece::new(enemy, PieceKind::Pawn)) {
                checkers.push(CheckingPiece {
                    kind: PieceKind::Pawn,
                    square,
                    ray: None,
                });
            }
        }
        for square in squares_in(knight_attacks(king_square)) {
            if self.piece_at(square) == Some(Piece::new(enemy, PieceKind::Knight)) {
                checkers.push(CheckingPiece {
                    kind: PieceKind::Knight,
                    square,
                    ray: None,
                });
            }
        }
        for direction in Direction::ALL {
            if let RayOccupant::Opponent(kind, square) =
                self.opponents_piece_on_ray(king_color, king_square, direction, None)
            {
                if attacks_along(kind, direction) {
                    checkers.push(CheckingPiece {
                        kind,
                        square,
                        ray: Some(direction.opposite()),
                    });
                }
            }
        }
        checkers
    }

    /// First occupied square walking from `origin` along `direction`, skipping
    /// `ignore` as if it were empty. `color` decides friend from foe.
    pub fn opponents_piece_on_ray(
        &self,
        color: Color,
        origin: Square,
        direction: Direction,
        ignore: Option<Square>,
    ) -> RayOccupant {
        for &square in ray(origin, direction) {
            if Some(square) == ignore {
                continue;
            }
            if let Some(piece) = self.piece_at(square) {
                return if piece.color == color {
                    RayOccupant::Blocker(square)
                } else {
                    RayOccupant::Opponent(piece.kind, square)
                };
            }
        }
        RayOccupant::Nothing
    }

    /// Pin rays around the king of `color` on `king_square`. A ray counts only
    /// when exactly one friendly piece stands between the king and an enemy
    /// slider able to attack along it.
    pub fn create_pin_info(&self, king_square: Square, color: Color) -> PinMasks {
        let mut pins = PinMasks::default();
        for direction in Direction::ALL {
            let mut path = 0u64;
            let mut friendly_seen = false;
            for &square in ray(king_square, direction) {
                path |= square_bit(square);
                let Some(piece) = self.piece_at(square) else {
                    continue;
                };
                if piece.color == color {
                    if friendly_seen {
                        break;
                    }
                    friendly_seen = true;
                    continue;
                }
                if friendly_seen && attacks_along(piece.kind, direction) {
                    if direction.is_diagonal() {
                        pins.diagonal |= path;
                    } else {
                        pins.orthogonal |= path;
                    }
                }
                break;
            }
        }
        pins
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        LegalMoveGenerator.generate_legal_moves(self)
    }

    /// Static score, light minus dark.
    pub fn evaluate(&self) -> i32 {
        PieceSquareScorer::default().score(self)
    }

    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_position(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::{E1, E8, F1, G1, H1};
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    fn mask(names: &[&str]) -> u64 {
        names.iter().fold(0, |acc, n| acc | square_bit(sq(n)))
    }

    #[test]
    fn empty_board_except_kings() {
        let position = Position::with_kings(E1, E8);
        let occupied = (0..64).filter(|s| !position.square_is_empty(*s)).count();
        assert_eq!(occupied, 2);
        assert_eq!(position.color_at(E8), Some(Color::Dark));
        assert_eq!(position.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn add_piece_rejects_second_king() {
        let mut position = Position::with_kings(E1, E8);
        position
            .add_piece(Color::Light, PieceKind::Rook, sq("b3"))
            .expect("rook placement");
        assert_eq!(position.piece_at(sq("b3")), Some(Piece::new(Color::Light, PieceKind::Rook)));
        let err = position
            .add_piece(Color::Light, PieceKind::King, sq("a1"))
            .expect_err("duplicate king");
        assert_eq!(err, PositionError::DuplicateKing { color: Color::Light, square: sq("a1") });
    }

    #[test]
    fn add_piece_refuses_to_cover_a_king() {
        let mut position = Position::with_kings(E1, E8);
        let err = position
            .add_piece(Color::Dark, PieceKind::Rook, E1)
            .expect_err("rook onto king");
        assert_eq!(err, PositionError::SquareHoldsKing { square: E1 });
        assert_eq!(
            position.add_piece(Color::Light, PieceKind::Queen, E8),
            Err(PositionError::SquareHoldsKing { square: E8 })
        );
        assert_eq!(position.piece_at(E1), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(position.piece_at(E8), Some(Piece::new(Color::Dark, PieceKind::King)));
    }

    #[test]
    fn quiet_move_shares_unchanged_substructures() {
        let mut position = Position::with_kings(E1, E8);
        position
            .add_piece(Color::Light, PieceKind::Rook, sq("b3"))
            .expect("rook placement");

        let after = position.apply(&Move::quiet(sq("b3"), sq("b5"), PieceKind::Rook));
        assert_eq!(after.to_fen(), "4k3/8/8/1R6/8/8/8/4K3 b - - 1 1");
        assert!(position.shares_castling_rights_with(&after));
        assert!(position.shares_king_squares_with(&after));
        // the earlier snapshot is untouched
        assert_eq!(position.piece_at(sq("b3")).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(position.square_is_empty(sq("b5")));
    }

    #[test]
    fn check_state_comes_from_the_move_annotation() {
        let mut position = Position::with_kings(E1, E8);
        position
            .add_piece(Color::Light, PieceKind::Rook, sq("b3"))
            .expect("rook placement");
        let mv = Move::quiet(sq("b3"), sq("b8"), PieceKind::Rook).with_checks(Checkers::single(CheckingPiece {
            kind: PieceKind::Rook,
            square: sq("b8"),
            ray: Some(Direction::East),
        }));

        let after = position.apply(&mv);
        assert_eq!(after.to_fen(), "1R2k3/8/8/8/8/8/8/4K3 b - - 1 1");
        assert!(after.is_in_check());
        assert_eq!(after.is_king_in_check(E8, Color::Dark).len(), 1);
    }

    #[test]
    fn capture_replaces_target() {
        let position = parse_fen("4k3/8/8/3q4/8/1B6/8/4K3 w - - 0 1").expect("fen");
        let after = position.apply(&Move::capture(sq("b3"), sq("d5"), PieceKind::Bishop));
        assert_eq!(after.to_fen(), "4k3/8/8/3B4/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn rook_moves_clear_one_castling_right_each() {
        let position = parse_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("fen");
        let after_h = position.apply(&Move::quiet(H1, sq("h2"), PieceKind::Rook));
        assert!(!after_h.can_castle(Color::Light, CastlingSide::Kingside));
        assert!(after_h.can_castle(Color::Light, CastlingSide::Queenside));
        assert!(!position.shares_castling_rights_with(&after_h));
        assert!(position.can_castle(Color::Light, CastlingSide::Kingside));

        let black_reply = after_h.apply(&Move::quiet(E8, sq("d8"), PieceKind::King));
        let after_a = black_reply.apply(&Move::quiet(sq("a1"), sq("a2"), PieceKind::Rook));
        assert_eq!(after_a.castling_rights(), &[[false, false], [false, false]]);
    }

    #[test]
    fn castling_relocates_king_and_rook() {
        let position = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("fen");
        let after = position.apply(&Move::castle(Color::Light, CastlingSide::Kingside));
        assert_eq!(after.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
        assert_eq!(after.king_square(Color::Light), G1);
        assert_eq!(after.king_square(Color::Dark), E8);
        assert_eq!(after.piece_at(F1).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(after.square_is_empty(E1) && after.square_is_empty(H1));
        assert!(!position.shares_king_squares_with(&after));
    }

    #[test]
    fn capturing_a_corner_rook_removes_opponents_right() {
        let position = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("fen");
        let after = position.apply(&Move::capture(sq("h1"), sq("h8"), PieceKind::Rook));
        assert_eq!(after.castling_rights(), &[[false, true], [false, true]]);
    }

    #[test]
    fn double_push_sets_en_passant_for_one_ply() {
        let position = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("fen");
        let after = position.apply(&Move::quiet(sq("e2"), sq("e4"), PieceKind::Pawn));
        assert_eq!(after.en_passant_square(), Some(sq("e3")));
        let next = after.apply(&Move::quiet(E8, sq("d8"), PieceKind::King));
        assert_eq!(next.en_passant_square(), None);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let position = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("fen");
        let after = position.apply(&Move::en_passant(sq("e5"), sq("d6"), sq("d5")));
        assert!(after.square_is_empty(sq("d5")));
        assert!(after.square_is_empty(sq("e5")));
        assert_eq!(after.piece_at(sq("d6")), Some(Piece::new(Color::Light, PieceKind::Pawn)));
    }

    #[test]
    fn try_apply_reports_structural_violations() {
        let position = parse_fen("4k3/8/8/3q4/8/1B6/8/R3K3 w Q - 0 1").expect("fen");
        assert_eq!(
            position.try_apply(&Move::quiet(sq("c3"), sq("c4"), PieceKind::Knight)).err(),
            Some(PositionError::EmptyOrigin { square: sq("c3") })
        );
        assert_eq!(
            position.try_apply(&Move::capture(sq("b3"), sq("c4"), PieceKind::Bishop)).err(),
            Some(PositionError::CaptureIntoEmptySquare { square: sq("c4") })
        );
        assert_eq!(
            position.try_apply(&Move::quiet(sq("b3"), sq("d5"), PieceKind::Bishop)).err(),
            Some(PositionError::QuietMoveIntoOccupiedSquare { square: sq("d5") })
        );
        assert!(matches!(
            position.try_apply(&Move::quiet(sq("d5"), sq("d4"), PieceKind::Queen)),
            Err(PositionError::WrongColor { .. })
        ));
        assert!(matches!(
            position.try_apply(&Move::castle(Color::Light, CastlingSide::Kingside)),
            Err(PositionError::CastlingNotAllowed { .. })
        ));
        assert!(position
            .try_apply(&Move::castle(Color::Light, CastlingSide::Queenside))
            .is_ok());
    }

    #[test]
    fn castling_without_rook_is_reported() {
        let position = parse_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").expect("fen");
        assert!(matches!(
            position.try_apply(&Move::castle(Color::Light, CastlingSide::Kingside)),
            Err(PositionError::CastlingWithoutRook { square: 7, .. })
        ));
    }

    #[test]
    fn scan_finds_slider_and_knight_checkers() {
        let position = parse_fen("3r4/4k3/8/R7/4P3/3K4/1BN1P3/8 w - - 10 10").expect("fen");
        assert!(position.is_in_check());
        let checkers = position.is_king_in_check(sq("d3"), Color::Light);
        assert_eq!(checkers.len(), 1);
        assert!(checkers.contains_square(sq("d8")));

        let forked = parse_fen("4k3/8/8/8/8/5n2/8/r3K3 w - - 0 1").expect("fen");
        assert!(forked.checkers().is_double());
    }

    #[test]
    fn opponents_piece_on_ray_honours_ignored_square() {
        let position = parse_fen("4k3/8/8/8/r2PK3/8/8/8 w - - 0 1").expect("fen");
        let e4 = sq("e4");
        assert_eq!(
            position.opponents_piece_on_ray(Color::Light, e4, Direction::West, None),
            RayOccupant::Blocker(sq("d4"))
        );
        assert_eq!(
            position.opponents_piece_on_ray(Color::Light, e4, Direction::West, Some(sq("d4"))),
            RayOccupant::Opponent(PieceKind::Rook, sq("a4"))
        );
        assert_eq!(
            position.opponents_piece_on_ray(Color::Light, e4, Direction::South, None),
            RayOccupant::Nothing
        );
    }

    #[test]
    fn simple_pin_covers_path_to_pinner() {
        let mut position = Position::with_kings(sq("e2"), sq("g8"));
        position.add_piece(Color::Light, PieceKind::Pawn, sq("d2")).expect("pawn");
        position.add_piece(Color::Dark, PieceKind::Rook, sq("b2")).expect("rook");
        let pins = position.create_pin_info(sq("e2"), Color::Light);
        assert_eq!(pins.diagonal, 0);
        assert_eq!(pins.orthogonal, mask(&["b2", "c2", "d2"]));
    }

    #[test]
    fn no_pin_without_suitable_enemy_slider() {
        let mut position = Position::with_kings(sq("e2"), sq("g8"));
        position.add_piece(Color::Light, PieceKind::Pawn, sq("d2")).expect("pawn");
        position.add_piece(Color::Light, PieceKind::Rook, sq("c2")).expect("rook");
        assert_eq!(position.create_pin_info(sq("e2"), Color::Light), PinMasks::default());

        position.add_piece(Color::Dark, PieceKind::Rook, sq("a2")).expect("rook");
        assert_eq!(position.create_pin_info(sq("e2"), Color::Light), PinMasks::default());

        let mut bishop_file = Position::with_kings(sq("e2"), sq("g8"));
        bishop_file.add_piece(Color::Light, PieceKind::Rook, sq("e4")).expect("rook");
        bishop_file.add_piece(Color::Dark, PieceKind::Bishop, sq("e7")).expect("bishop");
        assert_eq!(bishop_file.create_pin_info(sq("e2"), Color::Light), PinMasks::default());
    }

    #[test]
    fn pins_from_all_sides() {
        let position = parse_fen("3r4/4k3/b7/1R1Q1b2/4P3/q1PKR2r/1BNNP3/1b1r1qq1 w - - 10 10").expect("fen");
        let pins = position.create_pin_info(sq("d3"), Color::Light);
        assert_eq!(
            pins.diagonal,
            mask(&["a6", "b5", "c4", "b1", "c2", "e4", "f5", "f1", "e2"])
        );
        assert_eq!(
            pins.orthogonal,
            mask(&["d1", "d2", "a3", "b3", "c3", "e3", "f3", "g3", "h3", "d8", "d7", "d6", "d5", "d4"])
        );
    }

    #[test]
    fn pinned_queen_masks() {
        let position = parse_fen("5K2/4Q3/8/2b1pQ2/8/8/k4r2/8 w - - 0 1").expect("fen");
        let pins = position.create_pin_info(sq("f8"), Color::Light);
        assert_eq!(pins.diagonal, mask(&["e7", "d6", "c5"]));
        assert_eq!(pins.orthogonal, mask(&["f7", "f6", "f5", "f4", "f3", "f2"]));
    }

    #[test]
    fn side_view_drops_en_passant_for_the_other_colour() {
        let position = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("fen");
        let view = position.for_side(Color::Dark);
        assert_eq!(view.side_to_move(), Color::Dark);
        assert_eq!(view.en_passant_square(), None);
        assert_eq!(position.en_passant_square(), Some(sq("d6")));
        assert_eq!(position.for_side(Color::Light).en_passant_square(), Some(sq("d6")));
    }
}
