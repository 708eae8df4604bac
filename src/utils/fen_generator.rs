//! Position-to-FEN writer, the inverse of [`crate::utils::fen_parser::parse_fen`].

use crate::game_state::chess_types::*;
use crate::game_state::position::Position;
use crate::utils::algebraic::square_name;

pub fn generate_fen(position: &Position) -> String {
    let board = generate_board_field(position);
    let side_to_move = match position.side_to_move() {
        Color::Light => "w",
        Color::Dark => "b",
    };
    let castling = generate_castling_field(position.castling_rights());
    let en_passant = position
        .en_passant_square()
        .map_or_else(|| "-".to_owned(), square_name);

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        position.halfmove_clock(),
        position.fullmove_number()
    )
}

fn generate_board_field(position: &Position) -> String {
    (0..8u8)
        .rev()
        .map(|rank| rank_field(position, rank))
        .collect::<Vec<_>>()
        .join("/")
}

/// One rank of the placement field, runs of empty squares as digits.
fn rank_field(position: &Position, rank: u8) -> String {
    let mut field = String::with_capacity(8);
    let mut gap = 0u8;
    for file in 0..8u8 {
        let Some(piece) = position.piece_at(square_at(file, rank)) else {
            gap += 1;
            continue;
        };
        if gap > 0 {
            field.push(char::from(b'0' + gap));
            gap = 0;
        }
        field.push(piece.fen_char());
    }
    if gap > 0 {
        field.push(char::from(b'0' + gap));
    }
    field
}

fn generate_castling_field(rights: &CastlingRights) -> String {
    let mut out = String::new();
    for (color, side, ch) in [
        (Color::Light, CastlingSide::Kingside, 'K'),
        (Color::Light, CastlingSide::Queenside, 'Q'),
        (Color::Dark, CastlingSide::Kingside, 'k'),
        (Color::Dark, CastlingSide::Queenside, 'q'),
    ] {
        if rights[color.index()][side.index()] {
            out.push(ch);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_matches_standard_fen() {
        assert_eq!(generate_fen(&Position::starting()), STARTING_POSITION_FEN);
    }

    #[test]
    fn fields_survive_a_parse() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 7",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "r3k3/8/8/8/8/8/8/4K3 b q - 12 40",
        ] {
            let position = parse_fen(fen).expect("fen");
            assert_eq!(generate_fen(&position), fen);
        }
    }

    #[test]
    fn short_input_gains_default_fields() {
        let position = parse_fen("4k3/8/8/8/8/8/8/4K3 b").expect("fen");
        assert_eq!(generate_fen(&position), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }
}
