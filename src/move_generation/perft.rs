use crate::errors::PositionResult;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;
use crate::move_generation::move_generator::{play_generated, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub discovery_checks: usize,
    pub double_checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.discovery_checks += rhs.discovery_checks;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
    }

    fn count_leaf<G: MoveGenerator + ?Sized>(&mut self, generator: &G, mv: &Move, after: &Position) {
        self.nodes += 1;
        if mv.capture {
            self.captures += 1;
        }
        if mv.is_en_passant() {
            self.en_passant += 1;
        }
        if mv.is_castling() {
            self.castles += 1;
        }
        if mv.promotion.is_some() {
            self.promotions += 1;
        }
        if !mv.gives_check() {
            return;
        }
        self.checks += 1;
        let checks = mv.checks();
        if checks.is_double() {
            self.double_checks += 1;
        } else if !mv.is_castling() && !checks.contains_square(mv.to) {
            self.discovery_checks += 1;
        }
        if generator.count_legal_moves(after) == 0 {
            self.checkmates += 1;
        }
    }
}

/// Leaf statistics of the move tree below `position`, `depth` plies deep.
pub fn perft<G: MoveGenerator + ?Sized>(generator: &G, position: &Position, depth: u8) -> PositionResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(generator, position, depth, &mut total)?;
    Ok(total)
}

/// Leaf node counts per root move, keyed by long algebraic text and sorted.
pub fn perft_divide<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &Position,
    depth: u8,
) -> PositionResult<Vec<(String, usize)>> {
    let mut divided = Vec::new();
    if depth == 0 {
        return Ok(divided);
    }
    for mv in generator.generate_legal_moves(position) {
        let after = play_generated(position, &mv)?;
        let counts = perft(generator, &after, depth - 1)?;
        divided.push((mv.to_long_algebraic(), counts.nodes));
    }
    divided.sort();
    Ok(divided)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &Position,
    depth: u8,
    counts: &mut PerftCounts,
) -> PositionResult<()> {
    for mv in generator.generate_legal_moves(position) {
        let after = play_generated(position, &mv)?;
        if depth == 1 {
            counts.count_leaf(generator, &mv, &after);
        } else {
            let mut below = PerftCounts::default();
            perft_recurse(generator, &after, depth - 1, &mut below)?;
            counts.merge(below);
        }
    }
    Ok(())
}
