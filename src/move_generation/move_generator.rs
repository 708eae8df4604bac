use crate::errors::PositionResult;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;

/// Produces the fully legal moves of the side to move.
///
/// An empty result is a terminal position, not an error: checkmate when the
/// side to move is in check, stalemate otherwise. Telling them apart is left
/// to the caller.
pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, position: &Position) -> Vec<Move>;

    fn count_legal_moves(&self, position: &Position) -> usize {
        self.generate_legal_moves(position).len()
    }
}

/// Outcome of a position with no legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Checkmate,
    Stalemate,
}

/// Classifies `position` if the side to move has no legal moves.
pub fn terminal_state<G: MoveGenerator + ?Sized>(generator: &G, position: &Position) -> Option<TerminalState> {
    if generator.count_legal_moves(position) > 0 {
        None
    } else if position.is_in_check() {
        Some(TerminalState::Checkmate)
    } else {
        Some(TerminalState::Stalemate)
    }
}

/// Plays a generator-produced move. With the `validate-moves` feature the move
/// is checked against the board first and violations surface as errors.
#[inline]
pub fn play_generated(position: &Position, mv: &Move) -> PositionResult<Position> {
    #[cfg(feature = "validate-moves")]
    {
        position.try_apply(mv)
    }
    #[cfg(not(feature = "validate-moves"))]
    {
        Ok(position.apply(mv))
    }
}
