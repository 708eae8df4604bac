//! One-ply greedy mover with a little randomness.
//!
//! Each legal move is scored by the position it leads to. The moves are walked
//! best-first and each one is played with probability `play_best_percent`;
//! if every roll fails the best move is played anyway.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::SearchResult;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{play_generated, MoveGenerator};
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};
use crate::search::search_strategy::{MoveInfo, SearchStrategy};

pub const DEFAULT_PLAY_BEST_PERCENT: u8 = 95;

pub struct SimpleStrategy {
    play_best_percent: u8,
    generator: LegalMoveGenerator,
    scorer: PieceSquareScorer,
    rng: StdRng,
}

impl SimpleStrategy {
    pub fn new(play_best_percent: u8) -> Self {
        Self::with_rng(play_best_percent, StdRng::from_rng(&mut rand::rng()))
    }

    /// Reproducible choices, for tests and matches.
    pub fn seeded(play_best_percent: u8, seed: u64) -> Self {
        Self::with_rng(play_best_percent, StdRng::seed_from_u64(seed))
    }

    fn with_rng(play_best_percent: u8, rng: StdRng) -> Self {
        Self {
            play_best_percent: play_best_percent.min(100),
            generator: LegalMoveGenerator,
            scorer: PieceSquareScorer::default(),
            rng,
        }
    }

    /// Legal moves with the mover-relative score of the resulting position,
    /// best first. Ties keep generator order.
    pub fn ranked_moves(&self, position: &Position) -> SearchResult<Vec<(Move, i32)>> {
        let sign = position.side_to_move().sign();
        let mut ranked = Vec::new();
        for mv in self.generator.generate_legal_moves(position) {
            let after = play_generated(position, &mv)?;
            ranked.push((mv, sign * self.scorer.score(&after)));
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(ranked)
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_BEST_PERCENT)
    }
}

impl SearchStrategy for SimpleStrategy {
    fn name(&self) -> &str {
        "simple"
    }

    fn find_move(&mut self, position: &Position) -> SearchResult<MoveInfo> {
        let ranked = self.ranked_moves(position)?;
        let Some(&(best, best_score)) = ranked.first() else {
            return Ok(MoveInfo::terminal(position));
        };

        let mut chosen = (best, best_score);
        for &(mv, score) in &ranked {
            if self.rng.random_range(1..=100) <= self.play_best_percent {
                chosen = (mv, score);
                break;
            }
        }
        debug!(candidates = ranked.len(), chosen = %chosen.0, score = chosen.1, "simple strategy picked a move");

        Ok(MoveInfo {
            mv: Some(chosen.0),
            line: Some(vec![chosen.0]),
            score: chosen.1,
            nodes: ranked.len() as u64,
            evaluated: ranked.len() as u64,
            ..MoveInfo::default()
        })
    }

    fn current_depth(&self) -> u32 {
        1
    }

    fn increase_depth(&mut self, _by: i32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;
    use crate::utils::long_algebraic::resolve_move;

    #[test]
    fn always_plays_the_best_move_at_full_percentage() {
        let fen = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1";
        let position = parse_fen(fen).expect("fen");
        let capture = resolve_move("d1d5", &position).expect("move");
        for seed in 0..8 {
            let mut strategy = SimpleStrategy::seeded(100, seed);
            let info = strategy.find_move(&position).expect("move");
            assert_eq!(info.mv, Some(capture));
            assert!(info.score > 0);
        }
    }

    #[test]
    fn ranking_is_best_first_for_dark() {
        let position = parse_fen("3rk3/8/8/3Q4/8/8/8/4K3 b - - 0 1").expect("fen");
        let ranked = SimpleStrategy::seeded(95, 1).ranked_moves(&position).expect("ranked");
        assert_eq!(ranked[0].0, resolve_move("d8d5", &position).expect("move"));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn zero_percentage_falls_back_to_the_best() {
        let fen = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1";
        let position = parse_fen(fen).expect("fen");
        let info = SimpleStrategy::seeded(0, 3).find_move(&position).expect("move");
        assert_eq!(info.mv, Some(resolve_move("d1d5", &position).expect("move")));
    }

    #[test]
    fn chosen_move_is_always_legal() {
        let position = Position::starting();
        let legal = position.legal_moves();
        let mut strategy = SimpleStrategy::seeded(50, 42);
        for _ in 0..20 {
            let info = strategy.find_move(&position).expect("move");
            assert!(legal.contains(&info.mv.expect("a move")));
        }
    }

    #[test]
    fn no_moves_reports_the_terminal_state() {
        let position = parse_fen("R3k3/8/4K3/8/8/8/8/8 b - - 0 1").expect("fen");
        let info = SimpleStrategy::default().find_move(&position).expect("search");
        assert!(info.checkmate);
        assert_eq!(info.mv, None);
    }
}
