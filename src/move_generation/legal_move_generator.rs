//! Full legal move generation pipeline.
//!
//! Moves are produced legal directly: the check mask restricts targets while in
//! check, the pin cache restricts pieces standing on a ray from their king,
//! and king moves are validated against the attackers of their target square.
//! Only en passant is confirmed by replaying the capture. A final pass marks
//! which moves give check.

use crate::game_state::chess_types::{rank_of, square_bit, Color, Piece, PieceKind, Square};
use crate::game_state::position::{attacks_along, Position, RayOccupant};
use crate::geometry::move_templates::{king_attacks, knight_attacks, pawn_attackers, templates, MoveNode};
use crate::geometry::rays::{between_mask, direction_between, on_mask, ray_mask, squares_in, Direction};
use crate::move_generation::castling::generate_castling_moves;
use crate::move_generation::check_detection::CheckDetector;
use crate::move_generation::chess_move::{Checkers, Move};
use crate::move_generation::move_generator::MoveGenerator;
use crate::move_generation::pin_info::PinCache;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, position: &Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.collect_moves(position, &mut moves);

        let mut detector = CheckDetector::new(position);
        for mv in moves.iter_mut() {
            let checks = detector.checks_for(mv);
            if !checks.is_empty() {
                *mv = mv.with_checks(checks);
            }
        }
        moves
    }

    /// Same moves without the gives-check pass.
    fn count_legal_moves(&self, position: &Position) -> usize {
        let mut moves = Vec::with_capacity(64);
        self.collect_moves(position, &mut moves);
        moves.len()
    }
}

impl LegalMoveGenerator {
    fn collect_moves(&self, position: &Position, moves: &mut Vec<Move>) {
        let us = position.side_to_move();
        let king = position.king_square(us);
        let checkers = position.checkers();

        generate_king_moves(position, us, king, checkers, moves);
        if checkers.is_double() {
            return;
        }

        let check_mask = check_mask(king, checkers);
        let mut pins = PinCache::new(position, king, us);
        for (from, piece) in position.squares_of(us) {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Pawn => {
                    let tables = templates();
                    walk_pawn_pushes(position, tables.pawn_push_chain(us, from), check_mask, &mut pins, from, moves);
                    walk_pawn_captures(position, us, tables.pawn_capture_chain(us, from), check_mask, &mut pins, from, moves);
                }
                kind => walk_chain(position, us, templates().piece_chain(kind, from), check_mask, &mut pins, from, moves),
            }
        }

        if checkers.is_empty() {
            generate_castling_moves(position, moves);
        }
        generate_en_passant(position, us, king, moves);
    }
}

/// Squares a non-king move may land on. Everything when not in check.
fn check_mask(king: Square, checkers: &Checkers) -> u64 {
    if checkers.is_empty() {
        return !0;
    }
    checkers.iter().fold(0, |mask, checker| {
        let blocking = if checker.ray.is_some() {
            between_mask(king, checker.square)
        } else {
            0
        };
        mask | square_bit(checker.square) | blocking
    })
}

/// Squares the king may never step on: next to the enemy king, or further
/// along a checking slider's ray.
fn king_forbidden_mask(position: &Position, us: Color, king: Square, checkers: &Checkers) -> u64 {
    let mut forbidden = king_attacks(position.king_square(us.opposite()));
    for checker in checkers.iter() {
        if let Some(ray) = checker.ray {
            forbidden |= ray_mask(king, ray);
        }
    }
    forbidden
}

fn generate_king_moves(position: &Position, us: Color, king: Square, checkers: &Checkers, moves: &mut Vec<Move>) {
    let forbidden = king_forbidden_mask(position, us, king, checkers);
    let in_check = !checkers.is_empty();

    for node in templates().piece_chain(PieceKind::King, king) {
        if on_mask(forbidden, node.target) {
            continue;
        }
        let mv = match position.color_at(node.target) {
            None => node.quiet,
            Some(color) if color != us => node.capture,
            Some(_) => continue,
        };
        if king_target_is_safe(position, us, &mv, in_check) {
            moves.push(mv);
        }
    }
}

/// `true` if no enemy piece attacks the king's target square once the king
/// has left its origin.
fn king_target_is_safe(position: &Position, us: Color, mv: &Move, in_check: bool) -> bool {
    let them = us.opposite();
    let target = mv.to;

    let enemy_pawn = Some(Piece::new(them, PieceKind::Pawn));
    if squares_in(pawn_attackers(them, target)).any(|sq| position.piece_at(sq) == enemy_pawn) {
        return false;
    }
    let enemy_knight = Some(Piece::new(them, PieceKind::Knight));
    if squares_in(knight_attacks(target)).any(|sq| position.piece_at(sq) == enemy_knight) {
        return false;
    }

    // a quiet step along a line that held no attacker cannot open one
    let vacated = (!in_check && !mv.capture)
        .then(|| direction_between(target, mv.from))
        .flatten();

    Direction::ALL.iter().all(|&direction| {
        if vacated.is_some_and(|v| v.same_line(direction)) {
            return true;
        }
        !matches!(
            position.opponents_piece_on_ray(us, target, direction, Some(mv.from)),
            RayOccupant::Opponent(kind, _) if attacks_along(kind, direction)
        )
    })
}

fn keep(mv: Move, check_mask: u64, pins: &mut PinCache<'_>, moves: &mut Vec<Move>) {
    if on_mask(check_mask, mv.to) && pins.allows(mv.from, mv.to) {
        moves.push(mv);
    }
}

/// Walks a slider or jumper chain: empty squares continue the ray, any piece
/// ends it, enemy pieces are captured first.
fn walk_chain(
    position: &Position,
    us: Color,
    chain: &[MoveNode],
    check_mask: u64,
    pins: &mut PinCache<'_>,
    from: Square,
    moves: &mut Vec<Move>,
) {
    debug_assert!(chain.iter().all(|n| n.quiet.from == from));
    let mut index = 0usize;
    while index < chain.len() {
        let node = &chain[index];
        match position.color_at(node.target) {
            None => {
                keep(node.quiet, check_mask, pins, moves);
                index = node.continue_ray as usize;
            }
            Some(color) => {
                if color != us {
                    keep(node.capture, check_mask, pins, moves);
                }
                index = node.next_ray as usize;
            }
        }
    }
}

fn walk_pawn_pushes(
    position: &Position,
    chain: &[MoveNode],
    check_mask: u64,
    pins: &mut PinCache<'_>,
    from: Square,
    moves: &mut Vec<Move>,
) {
    debug_assert!(chain.iter().all(|n| n.quiet.from == from));
    let mut index = 0usize;
    while index < chain.len() {
        let node = &chain[index];
        if !position.square_is_empty(node.target) {
            break;
        }
        keep(node.quiet, check_mask, pins, moves);
        index = node.continue_ray as usize;
    }
}

fn walk_pawn_captures(
    position: &Position,
    us: Color,
    chain: &[MoveNode],
    check_mask: u64,
    pins: &mut PinCache<'_>,
    from: Square,
    moves: &mut Vec<Move>,
) {
    debug_assert!(chain.iter().all(|n| n.capture.from == from));
    let mut index = 0usize;
    while index < chain.len() {
        let node = &chain[index];
        if position.color_at(node.target) == Some(us.opposite()) {
            keep(node.capture, check_mask, pins, moves);
            index = node.continue_ray as usize;
        } else {
            index = node.next_ray as usize;
        }
    }
}

/// En-passant captures, confirmed by replaying them: removing two pawns from
/// one rank can expose the king in ways the pin cache does not see.
fn generate_en_passant(position: &Position, us: Color, king: Square, moves: &mut Vec<Move>) {
    let Some(target) = position.en_passant_square() else {
        return;
    };
    let capture_rank = match us {
        Color::Light => 5,
        Color::Dark => 2,
    };
    if rank_of(target) != capture_rank {
        return;
    }

    let our_pawn = Some(Piece::new(us, PieceKind::Pawn));
    let their_pawn = Some(Piece::new(us.opposite(), PieceKind::Pawn));
    for entry in templates().en_passant_captures(target) {
        let mv = entry.capture;
        if position.piece_at(entry.attacker) != our_pawn {
            continue;
        }
        if mv.en_passant_square.map(|sq| position.piece_at(sq)) != Some(their_pawn) {
            continue;
        }
        if position.apply(&mv).is_king_in_check(king, us).is_empty() {
            moves.push(mv);
        }
    }
}
