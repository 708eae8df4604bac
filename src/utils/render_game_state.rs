//! Unicode board diagram for terminals.
//!
//! Used by the `Display` impl of [`Position`] and by the console binaries.

use crate::game_state::chess_types::{square_at, Color, Piece};
use crate::game_state::position::Position;

const FILE_LEGEND: &str = "  a b c d e f g h";
const EMPTY_SQUARE: char = '·';

/// Glyphs indexed by `[color][kind]`, kinds in `PieceKind::ALL` order.
const GLYPHS: [[char; 6]; 2] = [
    ['♙', '♘', '♗', '♖', '♕', '♔'],
    ['♟', '♞', '♝', '♜', '♛', '♚'],
];

fn glyph(piece: Piece) -> char {
    GLYPHS[piece.color.index()][piece.kind.index()]
}

/// Rank 8 on top, file letters above and below, then a status line naming
/// the side to move.
pub fn render_position(position: &Position) -> String {
    let mut lines = Vec::with_capacity(11);
    lines.push(FILE_LEGEND.to_owned());
    for rank in (0..8u8).rev() {
        let label = char::from(b'1' + rank);
        let cells: Vec<String> = (0..8u8)
            .map(|file| {
                position
                    .piece_at(square_at(file, rank))
                    .map_or(EMPTY_SQUARE, glyph)
                    .to_string()
            })
            .collect();
        lines.push(format!("{label} {} {label}", cells.join(" ")));
    }
    lines.push(FILE_LEGEND.to_owned());

    let mover = match position.side_to_move() {
        Color::Light => "light",
        Color::Dark => "dark",
    };
    let check = if position.is_in_check() { ", in check" } else { "" };
    lines.push(format!("{mover} to move{check}"));
    lines.join("\n")
}
