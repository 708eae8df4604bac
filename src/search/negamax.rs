//! Plain fixed-depth negamax without pruning.
//!
//! Every node is expanded, so this is only practical at small depths. It is
//! kept as a reference the alpha-beta results can be compared against.

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{SearchError, SearchResult};
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{play_generated, MoveGenerator};
use crate::search::alpha_beta::MIN_VAL;
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};
use crate::search::search_strategy::{adjusted_depth, format_line, MoveInfo, SearchStrategy};

/// Negamax over side-relative scores: positive favours the side to move.
pub struct Negamax<G = LegalMoveGenerator, S = PieceSquareScorer> {
    depth: u32,
    generator: G,
    scorer: S,
    last_nodes: u64,
}

impl Negamax {
    pub fn new(depth: u32) -> Self {
        Self::with_parts(depth, LegalMoveGenerator, PieceSquareScorer::default())
    }
}

impl Default for Negamax {
    fn default() -> Self {
        Self::new(4)
    }
}

struct Counters {
    nodes: u64,
    evaluated: u64,
}

impl<G: MoveGenerator, S: BoardScorer> Negamax<G, S> {
    pub fn with_parts(depth: u32, generator: G, scorer: S) -> Self {
        Self {
            depth,
            generator,
            scorer,
            last_nodes: 0,
        }
    }

    /// Best score for the side to move and the line reaching it.
    fn negamax(
        &self,
        position: &Position,
        depth: u32,
        ply: usize,
        counters: &mut Counters,
    ) -> SearchResult<(i32, Vec<Move>)> {
        if depth == 0 {
            counters.evaluated += 1;
            let score = position.side_to_move().sign() * self.scorer.score(position);
            return Ok((score, Vec::new()));
        }

        let moves = self.generator.generate_legal_moves(position);
        if moves.is_empty() {
            let score = if position.is_in_check() { MIN_VAL + ply as i32 } else { 0 };
            return Ok((score, Vec::new()));
        }

        let mut best = (i32::MIN, Vec::new());
        for mv in &moves {
            let child = play_generated(position, mv)?;
            counters.nodes += 1;
            let (child_score, child_line) = self.negamax(&child, depth - 1, ply + 1, counters)?;
            let score = -child_score;
            if score > best.0 {
                let mut line = Vec::with_capacity(child_line.len() + 1);
                line.push(*mv);
                line.extend(child_line);
                best = (score, line);
            }
        }
        Ok(best)
    }
}

impl<G: MoveGenerator, S: BoardScorer> SearchStrategy for Negamax<G, S> {
    fn name(&self) -> &str {
        "negamax"
    }

    fn find_move(&mut self, position: &Position) -> SearchResult<MoveInfo> {
        if self.depth == 0 {
            return Err(SearchError::InvalidDepth(0));
        }
        let started = Utc::now();
        let mut counters = Counters { nodes: 0, evaluated: 0 };
        let (score, line) = self.negamax(position, self.depth, 0, &mut counters)?;
        self.last_nodes = counters.nodes;
        let elapsed_ms = (Utc::now() - started).num_milliseconds();

        if line.is_empty() {
            debug!("negamax root has no legal moves");
            return Ok(MoveInfo {
                score,
                ..MoveInfo::terminal(position)
            });
        }

        info!(
            depth = self.depth,
            nodes = counters.nodes,
            evaluated = counters.evaluated,
            elapsed_ms,
            score,
            line = %format_line(&line),
            "negamax search finished"
        );
        Ok(MoveInfo {
            mv: line.first().copied(),
            line: Some(line),
            score,
            checkmate: false,
            stalemate: false,
            nodes: counters.nodes,
            evaluated: counters.evaluated,
            elapsed_ms,
        })
    }

    fn current_depth(&self) -> u32 {
        self.depth
    }

    fn increase_depth(&mut self, by: i32) {
        self.depth = adjusted_depth(self.depth, by);
    }

    fn nodes_searched(&self) -> u64 {
        self.last_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::alpha_beta::{AlphaBeta, SearchConfig, MAX_VAL};
    use crate::utils::fen_parser::parse_fen;
    use crate::utils::long_algebraic::resolve_move;

    #[test]
    fn takes_a_hanging_queen_for_either_side() {
        let light = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1";
        let info = Negamax::new(1).find_move(&parse_fen(light).expect("fen")).expect("search");
        assert_eq!(info.mv, Some(resolve_move("d1d5", &parse_fen(light).expect("fen")).expect("move")));
        assert!(info.score > 0);

        let dark = "3rk3/8/8/3Q4/8/8/8/4K3 b - - 0 1";
        let info = Negamax::new(1).find_move(&parse_fen(dark).expect("fen")).expect("search");
        assert_eq!(info.mv, Some(resolve_move("d8d5", &parse_fen(dark).expect("fen")).expect("move")));
        assert!(info.score > 0);
    }

    #[test]
    fn mate_in_one_scores_as_mate() {
        let fen = "r3k3/pppppp2/8/8/8/8/8/4K2R w - - 0 2";
        let position = parse_fen(fen).expect("fen");
        let info = Negamax::new(2).find_move(&position).expect("search");
        assert_eq!(info.mv, Some(resolve_move("h1h8", &position).expect("move")));
        assert_eq!(info.score, MAX_VAL - 1);
    }

    #[test]
    fn agrees_with_alpha_beta_on_the_root_score() {
        let fen = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";
        let position = parse_fen(fen).expect("fen");
        let negamax = Negamax::new(2).find_move(&position).expect("search");
        let alpha_beta = AlphaBeta::with_config(SearchConfig {
            start_depth: 2,
            ..SearchConfig::default()
        })
        .find_move(&position)
        .expect("search");
        // light to move, so both scores share a sign convention
        assert_eq!(negamax.score, alpha_beta.score);
        assert!(negamax.nodes >= alpha_beta.nodes);
    }

    #[test]
    fn terminal_root_reports_no_move() {
        let info = Negamax::new(2)
            .find_move(&parse_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").expect("fen"))
            .expect("search");
        assert!(info.stalemate);
        assert_eq!((info.mv, info.score), (None, 0));
    }
}
