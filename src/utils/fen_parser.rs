//! FEN-to-Position parser.
//!
//! Board layout and side to move are required. Castling rights, en-passant
//! square and the two move counters may be left off; they default to `-`, `-`,
//! `0` and `1`. The check state of the side to move is derived from the board.

use crate::errors::{NotationError, NotationResult, PositionError};
use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> NotationResult<Position> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().unwrap_or("-");
    let en_passant_part = parts.next().unwrap_or("-");
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("FEN has extra trailing fields"));
    }

    let placements = parse_board(board_part)?;
    let light_king = find_king(&placements, Color::Light)?;
    let dark_king = find_king(&placements, Color::Dark)?;

    let mut position = Position::with_kings(light_king, dark_king);
    for &(square, piece) in placements.iter().filter(|(_, piece)| piece.kind != PieceKind::King) {
        position.add_piece(piece.color, piece.kind, square)?;
    }

    position.set_side_to_move(parse_side_to_move(side_part)?);
    position.set_castling_rights(parse_castling_rights(castling_part)?);
    position.set_en_passant_square(parse_en_passant_square(en_passant_part)?);

    let halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid halfmove clock: {halfmove_part}")))?;
    let fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid fullmove number: {fullmove_part}")))?;
    position.set_move_counters(halfmove_clock, fullmove_number);

    position.refresh_check_state();
    Ok(position)
}

fn invalid(reason: &str) -> NotationError {
    NotationError::InvalidFen(reason.to_owned())
}

fn parse_board(board_part: &str) -> NotationResult<Vec<(Square, Piece)>> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    let mut placements = Vec::with_capacity(32);
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}' in board layout")))?;
            if file >= 8 {
                return Err(invalid("board rank has too many files"));
            }
            placements.push((square_at(file, board_rank), piece));
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(placements)
}

fn find_king(placements: &[(Square, Piece)], color: Color) -> NotationResult<Square> {
    let king = Piece::new(color, PieceKind::King);
    let mut squares = placements.iter().filter(|(_, piece)| *piece == king).map(|(sq, _)| *sq);
    let first = squares.next().ok_or(PositionError::MissingKing { color })?;
    if let Some(square) = squares.next() {
        return Err(PositionError::DuplicateKing { color, square }.into());
    }
    Ok(first)
}

fn parse_side_to_move(side_part: &str) -> NotationResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(&format!("invalid side to move: {side_part}"))),
    }
}

/// Rights are taken as written; a right whose rook is missing is kept and
/// simply never produces a castling move.
fn parse_castling_rights(castling_part: &str) -> NotationResult<CastlingRights> {
    let mut rights = NO_CASTLING_RIGHTS;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        let (color, side) = match ch {
            'K' => (Color::Light, CastlingSide::Kingside),
            'Q' => (Color::Light, CastlingSide::Queenside),
            'k' => (Color::Dark, CastlingSide::Kingside),
            'q' => (Color::Dark, CastlingSide::Queenside),
            _ => return Err(invalid(&format!("invalid castling rights character '{ch}'"))),
        };
        rights[color.index()][side.index()] = true;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> NotationResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    let square = algebraic_to_square(en_passant_part)?;
    match rank_of(square) {
        2 | 5 => Ok(Some(square)),
        _ => Err(invalid(&format!("en-passant square {en_passant_part} is not on rank 3 or 6"))),
    }
}
