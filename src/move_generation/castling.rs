//! Castling legality.
//!
//! Only consulted when the mover is not in check. Checks the rights, the king
//! on its home square and the rook on its corner, empty squares between king
//! and rook, then that no transit square is attacked: knights via fixed watch
//! squares, sliders by walking the rays from each transit square, pawns and
//! the enemy king by adjacency.

use crate::game_state::chess_rules::{
    CASTLING_EMPTY_SQUARES, CASTLING_KNIGHT_WATCH, CASTLING_ROOK_ORIGIN, CASTLING_TRANSIT_SQUARES, KING_HOME,
};
use crate::game_state::chess_types::{CastlingSide, Color, Piece, PieceKind, Square};
use crate::game_state::position::{attacks_along, Position, RayOccupant};
use crate::geometry::move_templates::{king_attacks, pawn_attackers};
use crate::geometry::rays::{squares_in, Direction};
use crate::move_generation::chess_move::Move;

/// Appends every legal castling move for the side to move.
pub fn generate_castling_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move();
    for side in CastlingSide::BOTH {
        if can_castle(position, us, side) {
            moves.push(Move::castle(us, side));
        }
    }
}

pub fn can_castle(position: &Position, us: Color, side: CastlingSide) -> bool {
    let (c, s) = (us.index(), side.index());
    if !position.can_castle(us, side) {
        return false;
    }
    // rights read from FEN are not checked against the board
    if position.piece_at(KING_HOME[c]) != Some(Piece::new(us, PieceKind::King)) {
        return false;
    }
    if position.piece_at(CASTLING_ROOK_ORIGIN[c][s]) != Some(Piece::new(us, PieceKind::Rook)) {
        return false;
    }
    if !CASTLING_EMPTY_SQUARES[c][s]
        .iter()
        .all(|&sq| position.square_is_empty(sq))
    {
        return false;
    }

    let enemy_knight = Some(Piece::new(us.opposite(), PieceKind::Knight));
    if CASTLING_KNIGHT_WATCH[c][s]
        .iter()
        .any(|&sq| position.piece_at(sq) == enemy_knight)
    {
        return false;
    }

    !CASTLING_TRANSIT_SQUARES[c][s]
        .iter()
        .any(|&sq| transit_square_attacked(position, us, sq))
}

fn transit_square_attacked(position: &Position, us: Color, square: Square) -> bool {
    let them = us.opposite();

    let enemy_pawn = Some(Piece::new(them, PieceKind::Pawn));
    if squares_in(pawn_attackers(them, square)).any(|sq| position.piece_at(sq) == enemy_pawn) {
        return true;
    }
    if squares_in(king_attacks(square)).any(|sq| position.piece_at(sq) == Some(Piece::new(them, PieceKind::King))) {
        return true;
    }

    Direction::ALL.iter().any(|&direction| {
        matches!(
            position.opponents_piece_on_ray(us, square, direction, None),
            RayOccupant::Opponent(kind, _) if attacks_along(kind, direction)
        )
    })
}
