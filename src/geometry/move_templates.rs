//! Precomputed move templates.
//!
//! Jump targets (knight, king, pawn attacks) are `const` bitmask tables. Move
//! chains are flat per-square arrays of [`MoveNode`]s addressed by index: each
//! node carries the quiet and capture move to its target plus two links, one
//! to follow while the path stays open and one to skip to the next ray.
//! Chains are built once on first use and never change afterwards.

use std::sync::LazyLock;

use crate::game_state::chess_types::{
    file_of, rank_of, Color, PieceKind, Square, PROMOTION_PIECES,
};
use crate::geometry::rays::{ray, Direction};
use crate::move_generation::chess_move::Move;

pub const KNIGHT_ATTACKS: [u64; 64] = generate_jump_table(&KNIGHT_STEPS);
pub const KING_ATTACKS: [u64; 64] = generate_jump_table(&KING_STEPS);
/// `PAWN_ATTACKS[color][square]`: squares a pawn of `color` on `square` attacks.
pub const PAWN_ATTACKS: [[u64; 64]; 2] = [
    generate_jump_table(&[(-1, 1), (1, 1)]),
    generate_jump_table(&[(-1, -1), (1, -1)]),
];

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[color.index()][square as usize]
}

/// Squares holding a pawn of `pawn_color` that would attack `square`.
#[inline]
pub const fn pawn_attackers(pawn_color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[pawn_color.opposite().index()][square as usize]
}

const fn generate_jump_table(steps: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;
        while i < steps.len() {
            attacks |= set_if_valid(file + steps[i].0, rank + steps[i].1);
            i += 1;
        }
        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << ((rank as usize) * 8 + (file as usize))
}

/// One step of a move chain.
///
/// For pawn chains only one of `quiet`/`capture` is meaningful (pushes never
/// capture, diagonal steps always do); both hold the same move.
#[derive(Debug, Clone, Copy)]
pub struct MoveNode {
    pub target: Square,
    pub quiet: Move,
    pub capture: Move,
    /// Index of the node to visit while the path stays open.
    pub continue_ray: u8,
    /// Index of the first node of the next ray. The chain length ends the walk.
    pub next_ray: u8,
}

/// A ready-made en-passant capture for one attacker square.
#[derive(Debug, Clone, Copy)]
pub struct EnPassantCapture {
    pub attacker: Square,
    pub capture: Move,
}

pub struct MoveTemplates {
    /// `[slot * 64 + square]` where slot is knight, bishop, rook, queen, king.
    piece_chains: Vec<Vec<MoveNode>>,
    /// `[color * 64 + square]`
    pawn_pushes: Vec<Vec<MoveNode>>,
    /// `[color * 64 + square]`
    pawn_captures: Vec<Vec<MoveNode>>,
    /// `[en-passant target square]`
    en_passant: Vec<Vec<EnPassantCapture>>,
}

static TEMPLATES: LazyLock<MoveTemplates> = LazyLock::new(MoveTemplates::build);

/// Shared template tables, built on first access.
#[inline]
pub fn templates() -> &'static MoveTemplates {
    &TEMPLATES
}

const fn chain_slot(kind: PieceKind) -> Option<usize> {
    match kind {
        PieceKind::Pawn => None,
        PieceKind::Knight => Some(0),
        PieceKind::Bishop => Some(1),
        PieceKind::Rook => Some(2),
        PieceKind::Queen => Some(3),
        PieceKind::King => Some(4),
    }
}

impl MoveTemplates {
    /// Move chain for a non-pawn piece. Empty for pawns.
    #[inline]
    pub fn piece_chain(&self, kind: PieceKind, square: Square) -> &[MoveNode] {
        match chain_slot(kind) {
            Some(slot) => &self.piece_chains[slot * 64 + square as usize],
            None => &[],
        }
    }

    #[inline]
    pub fn pawn_push_chain(&self, color: Color, square: Square) -> &[MoveNode] {
        &self.pawn_pushes[color.index() * 64 + square as usize]
    }

    #[inline]
    pub fn pawn_capture_chain(&self, color: Color, square: Square) -> &[MoveNode] {
        &self.pawn_captures[color.index() * 64 + square as usize]
    }

    /// En-passant captures onto `target`. The capturing colour is implied by
    /// the target's rank.
    #[inline]
    pub fn en_passant_captures(&self, target: Square) -> &[EnPassantCapture] {
        &self.en_passant[target as usize]
    }

    fn build() -> Self {
        let mut piece_chains = Vec::with_capacity(5 * 64);
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            for square in 0..64u8 {
                let chain = match kind {
                    PieceKind::Knight => jump_chain(square, kind, KNIGHT_ATTACKS[square as usize]),
                    PieceKind::King => jump_chain(square, kind, KING_ATTACKS[square as usize]),
                    PieceKind::Bishop => slider_chain(square, kind, &Direction::DIAGONAL),
                    PieceKind::Rook => slider_chain(square, kind, &Direction::ORTHOGONAL),
                    _ => slider_chain(square, kind, &Direction::ALL),
                };
                piece_chains.push(chain);
            }
        }

        let mut pawn_pushes = Vec::with_capacity(128);
        let mut pawn_captures = Vec::with_capacity(128);
        for color in [Color::Light, Color::Dark] {
            for square in 0..64u8 {
                pawn_pushes.push(pawn_push_chain(color, square));
                pawn_captures.push(pawn_capture_chain(color, square));
            }
        }

        let en_passant = (0..64u8).map(en_passant_entry).collect();

        Self {
            piece_chains,
            pawn_pushes,
            pawn_captures,
            en_passant,
        }
    }
}

fn node(from: Square, target: Square, kind: PieceKind) -> MoveNode {
    MoveNode {
        target,
        quiet: Move::quiet(from, target, kind),
        capture: Move::capture(from, target, kind),
        continue_ray: 0,
        next_ray: 0,
    }
}

fn jump_chain(from: Square, kind: PieceKind, targets: u64) -> Vec<MoveNode> {
    let mut chain = Vec::new();
    let mut remaining = targets;
    while remaining != 0 {
        let target = remaining.trailing_zeros() as Square;
        remaining &= remaining - 1;
        let next = (chain.len() + 1) as u8;
        chain.push(MoveNode {
            continue_ray: next,
            next_ray: next,
            ..node(from, target, kind)
        });
    }
    chain
}

fn slider_chain(from: Square, kind: PieceKind, directions: &[Direction]) -> Vec<MoveNode> {
    let mut chain = Vec::new();
    for &direction in directions {
        let squares = ray(from, direction);
        let next_ray = (chain.len() + squares.len()) as u8;
        for &target in squares {
            let continue_ray = (chain.len() + 1) as u8;
            chain.push(MoveNode {
                continue_ray,
                next_ray,
                ..node(from, target, kind)
            });
        }
    }
    chain
}

fn pawn_push_chain(color: Color, from: Square) -> Vec<MoveNode> {
    let rank = rank_of(from);
    if rank == 0 || rank == 7 {
        return Vec::new();
    }
    let mut chain = Vec::new();
    let one = (from as i8 + color.pawn_push_offset()) as Square;
    if rank_of(one) == color.promotion_rank() {
        for promoted in PROMOTION_PIECES {
            let mv = Move::promotion(from, one, promoted, false);
            chain.push(MoveNode {
                target: one,
                quiet: mv,
                capture: mv,
                continue_ray: (chain.len() + 1) as u8,
                next_ray: 0,
            });
        }
    } else {
        let single = Move::quiet(from, one, PieceKind::Pawn);
        chain.push(MoveNode {
            target: one,
            quiet: single,
            capture: single,
            continue_ray: 1,
            next_ray: 0,
        });
        if rank == color.pawn_start_rank() {
            let two = (one as i8 + color.pawn_push_offset()) as Square;
            let double = Move::quiet(from, two, PieceKind::Pawn);
            chain.push(MoveNode {
                target: two,
                quiet: double,
                capture: double,
                continue_ray: 2,
                next_ray: 0,
            });
        }
    }
    // a blocked push ends the whole chain
    let end = chain.len() as u8;
    for n in chain.iter_mut() {
        n.next_ray = end;
    }
    chain
}

fn pawn_capture_chain(color: Color, from: Square) -> Vec<MoveNode> {
    let rank = rank_of(from);
    if rank == 0 || rank == 7 {
        return Vec::new();
    }
    let mut chain: Vec<MoveNode> = Vec::new();
    let mut targets = PAWN_ATTACKS[color.index()][from as usize];
    while targets != 0 {
        let target = targets.trailing_zeros() as Square;
        targets &= targets - 1;
        let group_start = chain.len();
        if rank_of(target) == color.promotion_rank() {
            for promoted in PROMOTION_PIECES {
                let mv = Move::promotion(from, target, promoted, true);
                chain.push(MoveNode {
                    target,
                    quiet: mv,
                    capture: mv,
                    continue_ray: (chain.len() + 1) as u8,
                    next_ray: 0,
                });
            }
        } else {
            let mv = Move::capture(from, target, PieceKind::Pawn);
            chain.push(MoveNode {
                target,
                quiet: mv,
                capture: mv,
                continue_ray: (chain.len() + 1) as u8,
                next_ray: 0,
            });
        }
        let next_group = chain.len() as u8;
        for n in chain[group_start..].iter_mut() {
            n.next_ray = next_group;
        }
    }
    chain
}

fn en_passant_entry(target: Square) -> Vec<EnPassantCapture> {
    let (capturer, captured) = match rank_of(target) {
        5 => (Color::Light, target - 8),
        2 => (Color::Dark, target + 8),
        _ => return Vec::new(),
    };
    let mut attackers = PAWN_ATTACKS[capturer.opposite().index()][target as usize];
    let mut entry = Vec::with_capacity(2);
    while attackers != 0 {
        let attacker = attackers.trailing_zeros() as Square;
        attackers &= attackers - 1;
        debug_assert_eq!(rank_of(attacker), rank_of(captured));
        debug_assert!(file_of(attacker).abs_diff(file_of(target)) == 1);
        entry.push(EnPassantCapture {
            attacker,
            capture: Move::en_passant(attacker, target, captured),
        });
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    const A1: Square = 0;
    const D4: Square = 27;
    const E2: Square = 12;
    const E4: Square = 28;
    const F6: Square = 45;
    const H1: Square = 7;

    #[test]
    fn jump_tables_have_expected_targets() {
        assert_eq!(knight_attacks(D4).count_ones(), 8);
        assert_eq!(knight_attacks(A1).count_ones(), 2);
        assert_eq!(king_attacks(D4).count_ones(), 8);
        assert_eq!(king_attacks(H1).count_ones(), 3);
        assert_eq!(pawn_attacks(Color::Light, E4), (1 << 35) | (1 << 37));
        assert_eq!(pawn_attackers(Color::Dark, E4), (1 << 35) | (1 << 37));
        assert_eq!(pawn_attackers(Color::Light, E4), (1 << 19) | (1 << 21));
    }

    #[test]
    fn slider_chain_links_skip_to_next_ray() {
        let chain = templates().piece_chain(PieceKind::Rook, A1);
        assert_eq!(chain.len(), 14);
        // north ray a2..a8 first, then east b1..h1
        assert_eq!(chain[0].target, 8);
        assert_eq!(chain[0].continue_ray, 1);
        assert_eq!(chain[0].next_ray, 7);
        assert_eq!(chain[7].target, 1);
        assert_eq!(chain[13].next_ray as usize, chain.len());
        assert!(chain[3].capture.capture);
        assert!(!chain[3].quiet.capture);
    }

    #[test]
    fn jump_chain_links_both_point_to_next_node() {
        let chain = templates().piece_chain(PieceKind::Knight, D4);
        assert_eq!(chain.len(), 8);
        for (i, n) in chain.iter().enumerate() {
            assert_eq!(n.continue_ray as usize, i + 1);
            assert_eq!(n.next_ray as usize, i + 1);
        }
        assert!(templates().piece_chain(PieceKind::Pawn, D4).is_empty());
    }

    #[test]
    fn pawn_push_chain_includes_double_step_from_start_rank() {
        let chain = templates().pawn_push_chain(Color::Light, E2);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].target, 20);
        assert_eq!(chain[1].target, E4);
        assert_eq!(chain[0].next_ray, 2);

        let black = templates().pawn_push_chain(Color::Dark, 52);
        assert_eq!(black.iter().map(|n| n.target).collect::<Vec<_>>(), vec![44, 36]);
    }

    #[test]
    fn promotion_nodes_branch_per_piece() {
        // b7 pawn: four pushes to b8 and four captures each to a8 and c8
        let pushes = templates().pawn_push_chain(Color::Light, 49);
        assert_eq!(pushes.len(), 4);
        assert!(pushes.iter().all(|n| n.target == 57 && n.quiet.promotion.is_some()));

        let captures = templates().pawn_capture_chain(Color::Light, 49);
        assert_eq!(captures.len(), 8);
        assert_eq!(captures[0].next_ray, 4);
        assert_eq!(captures[4].next_ray, 8);
    }

    #[test]
    fn en_passant_table_lists_both_attackers() {
        let entry = templates().en_passant_captures(F6);
        let attackers: Vec<Square> = entry.iter().map(|e| e.attacker).collect();
        assert_eq!(attackers, vec![36, 38]);
        assert!(entry.iter().all(|e| e.capture.en_passant_square == Some(37)));
        assert_eq!(templates().en_passant_captures(16).len(), 1);
        assert!(templates().en_passant_captures(E4).is_empty());
    }
}
