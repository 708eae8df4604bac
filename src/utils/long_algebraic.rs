//! Long algebraic move text (`e2e4`, `e7e8q`, `e1g1`) to generator moves.
//!
//! The origin square is checked for a piece of the side to move before the
//! text is matched against the legal moves, so a front end can tell "no such
//! piece" apart from "illegal move".

use crate::errors::{NotationError, NotationResult};
use crate::game_state::chess_types::PieceKind;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

/// The legal move in `position` written as `text`, with its check annotation.
pub fn resolve_move(text: &str, position: &Position) -> NotationResult<Move> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(NotationError::InvalidMoveText(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text.as_bytes().get(4) {
        Some(&ch) => Some(char_to_promotion(ch as char).ok_or_else(|| NotationError::InvalidMoveText(text.to_owned()))?),
        None => None,
    };

    let piece = position
        .piece_at(from)
        .ok_or_else(|| NotationError::NoPieceAtOrigin(text[0..2].to_owned()))?;
    if piece.color != position.side_to_move() {
        return Err(NotationError::WrongColorAtOrigin(text[0..2].to_owned()));
    }

    position
        .legal_moves()
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| NotationError::IllegalMove(text.to_owned()))
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
