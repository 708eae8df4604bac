//! Error types for the engine.
//!
//! Three families, one per boundary: structural violations detected while
//! applying a move in validating mode, malformed notation handed in by a front
//! end, and failures surfaced by a search. A position without legal moves is
//! never an error; it is a terminal state reported through normal results.

use thiserror::Error;

use crate::game_state::chess_types::{CastlingSide, Color, Square};
use crate::utils::algebraic::square_name;

/// Structural invariant violations. Only raised by the validating apply path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("a {color:?} king is already on the board, cannot add another on {}", sq(.square))]
    DuplicateKing { color: Color, square: Square },

    #[error("no {color:?} king on the board")]
    MissingKing { color: Color },

    #[error("square {} holds a king", sq(.square))]
    SquareHoldsKing { square: Square },

    #[error("no piece on origin square {}", sq(.square))]
    EmptyOrigin { square: Square },

    #[error("piece on {} belongs to {found:?}, but {expected:?} is to move", sq(.square))]
    WrongColor {
        square: Square,
        expected: Color,
        found: Color,
    },

    #[error("capture into empty square {}", sq(.square))]
    CaptureIntoEmptySquare { square: Square },

    #[error("non-capture into occupied square {}", sq(.square))]
    QuietMoveIntoOccupiedSquare { square: Square },

    #[error("capture of own piece on {}", sq(.square))]
    CaptureOfOwnPiece { square: Square },

    #[error("{color:?} cannot castle {side:?}: no rook on {}", sq(.square))]
    CastlingWithoutRook {
        color: Color,
        side: CastlingSide,
        square: Square,
    },

    #[error("{color:?} has lost the right to castle {side:?}")]
    CastlingNotAllowed { color: Color, side: CastlingSide },
}

/// Malformed or unmatched text handed in by a notation front end.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    #[error("no piece at origin square {0}")]
    NoPieceAtOrigin(String),

    #[error("piece at origin square {0} is the wrong colour")]
    WrongColorAtOrigin(String),

    #[error("{0} is not a legal move in this position")]
    IllegalMove(String),

    #[error(transparent)]
    Position(#[from] PositionError),
}

/// Failures surfaced by a search strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search aborted: {0}")]
    Position(#[from] PositionError),

    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u32),
}

fn sq(square: &Square) -> String {
    square_name(*square)
}

pub type PositionResult<T> = Result<T, PositionError>;
pub type NotationResult<T> = Result<T, NotationError>;
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_squares_algebraically() {
        let err = PositionError::CaptureIntoEmptySquare { square: 12 };
        assert_eq!(err.to_string(), "capture into empty square e2");

        let err = PositionError::CastlingWithoutRook {
            color: Color::Light,
            side: CastlingSide::Kingside,
            square: 7,
        };
        assert_eq!(err.to_string(), "Light cannot castle Kingside: no rook on h1");
    }

    #[test]
    fn position_errors_convert_into_search_errors() {
        let err: SearchError = PositionError::MissingKing { color: Color::Dark }.into();
        assert!(matches!(err, SearchError::Position(_)));
    }
}
