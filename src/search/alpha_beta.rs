//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are always from light's point of view: light maximises, dark
//! minimises. Each node tracks the line of moves leading to it so the line
//! that produced the best score can be handed back to the caller and to the
//! report sink while the search is still running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, trace};

use crate::errors::{SearchError, SearchResult};
use crate::game_state::chess_types::Color;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{play_generated, MoveGenerator};
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};
use crate::search::search_progress::SearchProgress;
use crate::search::search_strategy::{
    adjusted_depth, format_line, LogReportSink, MoveInfo, ReportSink, SearchStrategy,
};

/// Worst score for light; being mated scores just above it.
pub const MIN_VAL: i32 = -99_999;
/// Worst score for dark; mating scores just below it.
pub const MAX_VAL: i32 = -MIN_VAL;

const PROGRESS_PUBLISH_INTERVAL: u64 = 1024;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Plies searched below the root.
    pub start_depth: u32,
    /// Try captures before quiet moves.
    pub capture_first_ordering: bool,
    /// Polled between sibling moves; once set every node returns after its
    /// current child.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_depth: 4,
            capture_first_ordering: true,
            stop_flag: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Max,
    Min,
}

impl Mode {
    fn for_side(color: Color) -> Self {
        match color {
            Color::Light => Mode::Max,
            Color::Dark => Mode::Min,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Mode::Max => Mode::Min,
            Mode::Min => Mode::Max,
        }
    }

    /// Score for the side of this mode being mated `ply` plies from the root.
    /// Later mates are better for the mated side.
    fn mated_score(self, ply: usize) -> i32 {
        let ply = ply as i32;
        match self {
            Mode::Max => MIN_VAL + ply,
            Mode::Min => MAX_VAL - ply,
        }
    }
}

struct NodeResult {
    score: i32,
    line: Option<Vec<Move>>,
}

/// State of one `find_move` call. Counters start at zero for every call.
struct SearchContext<'a, G, S> {
    generator: &'a G,
    scorer: &'a S,
    sink: &'a mut dyn ReportSink,
    stop_flag: Option<&'a AtomicBool>,
    progress: Option<&'a SearchProgress>,
    capture_first: bool,
    root_depth: u32,
    line: Vec<Move>,
    nodes: u64,
    evaluated: u64,
}

impl<G: MoveGenerator, S: BoardScorer> SearchContext<'_, G, S> {
    fn alphabeta(
        &mut self,
        position: &Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        mode: Mode,
    ) -> SearchResult<NodeResult> {
        if depth == 0 {
            return Ok(self.leaf(position, mode));
        }

        let moves = self.ordered_moves(position);
        if moves.is_empty() {
            return Ok(self.no_moves(position, mode));
        }

        let mut value = match mode {
            Mode::Max => MIN_VAL,
            Mode::Min => MAX_VAL,
        };
        let mut best_line = None;

        for (index, mv) in moves.iter().enumerate() {
            if index > 0 && self.stop_requested() {
                trace!(depth, "stop requested, skipping remaining siblings");
                break;
            }

            let child = play_generated(position, mv)?;
            self.line.push(*mv);
            self.nodes += 1;
            if self.nodes % PROGRESS_PUBLISH_INTERVAL == 0 {
                self.publish_counts();
            }
            let result = self.alphabeta(&child, depth - 1, alpha, beta, mode.opposite());
            self.line.pop();
            let result = result?;

            match mode {
                Mode::Max => {
                    value = value.max(result.score);
                    if value > beta {
                        trace!(depth, value, beta, "beta cut-off");
                        break;
                    }
                    if result.score > alpha {
                        alpha = result.score;
                        if let Some(line) = result.line {
                            self.improved(depth, &line, result.score);
                            best_line = Some(line);
                        }
                    }
                }
                Mode::Min => {
                    value = value.min(result.score);
                    if value < alpha {
                        trace!(depth, value, alpha, "alpha cut-off");
                        break;
                    }
                    if result.score < beta {
                        beta = result.score;
                        if let Some(line) = result.line {
                            self.improved(depth, &line, result.score);
                            best_line = Some(line);
                        }
                    }
                }
            }
        }

        // All children may have fallen outside (alpha, beta), leaving no line.
        Ok(NodeResult {
            score: value,
            line: best_line,
        })
    }

    /// Horizon node. A side in check is first tested for replies so that a
    /// mate on the horizon scores as a mate.
    fn leaf(&mut self, position: &Position, mode: Mode) -> NodeResult {
        if position.is_in_check() && self.generator.count_legal_moves(position) == 0 {
            return self.no_moves(position, mode);
        }
        self.evaluated += 1;
        NodeResult {
            score: self.scorer.score(position),
            line: Some(self.line.clone()),
        }
    }

    fn no_moves(&self, position: &Position, mode: Mode) -> NodeResult {
        let score = if position.is_in_check() {
            trace!(line = %format_line(&self.line), "mate found");
            mode.mated_score(self.line.len())
        } else {
            0
        };
        NodeResult {
            score,
            line: Some(self.line.clone()),
        }
    }

    fn ordered_moves(&self, position: &Position) -> Vec<Move> {
        let moves = self.generator.generate_legal_moves(position);
        if !self.capture_first {
            return moves;
        }
        let (mut captures, quiet): (Vec<Move>, Vec<Move>) = moves.into_iter().partition(|mv| mv.capture);
        captures.extend(quiet);
        captures
    }

    fn improved(&mut self, depth: u32, line: &[Move], score: i32) {
        if depth != self.root_depth {
            return;
        }
        debug!(depth, score, line = %format_line(line), "new best root line");
        self.sink.report(line, score, depth);
        if let Some(progress) = self.progress {
            progress.publish_line(&format_line(line));
        }
        self.publish_counts();
    }

    fn publish_counts(&self) {
        if let Some(progress) = self.progress {
            progress.publish_counts(self.nodes, self.evaluated);
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Alpha-beta strategy over a move generator and a board scorer.
pub struct AlphaBeta<G = LegalMoveGenerator, S = PieceSquareScorer> {
    config: SearchConfig,
    generator: G,
    scorer: S,
    sink: Box<dyn ReportSink>,
    progress: Option<Arc<SearchProgress>>,
    last_nodes: u64,
}

impl AlphaBeta {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self::with_parts(config, LegalMoveGenerator, PieceSquareScorer::default())
    }
}

impl Default for AlphaBeta {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: MoveGenerator, S: BoardScorer> AlphaBeta<G, S> {
    pub fn with_parts(config: SearchConfig, generator: G, scorer: S) -> Self {
        Self {
            config,
            generator,
            scorer,
            sink: Box::new(LogReportSink),
            progress: None,
            last_nodes: 0,
        }
    }

    /// Mirrors the search counters into `progress` while searching.
    pub fn with_progress(mut self, progress: Arc<SearchProgress>) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl<G: MoveGenerator, S: BoardScorer> SearchStrategy for AlphaBeta<G, S> {
    fn name(&self) -> &str {
        "alpha-beta"
    }

    fn find_move(&mut self, position: &Position) -> SearchResult<MoveInfo> {
        let depth = self.config.start_depth;
        if depth == 0 {
            return Err(SearchError::InvalidDepth(depth));
        }

        let mode = Mode::for_side(position.side_to_move());
        let started = Utc::now();
        if let Some(progress) = &self.progress {
            progress.reset();
        }

        if self.generator.count_legal_moves(position) == 0 {
            let mut info = MoveInfo::terminal(position);
            if info.checkmate {
                info.score = mode.mated_score(0);
            }
            self.last_nodes = 0;
            info!(checkmate = info.checkmate, stalemate = info.stalemate, "no legal moves at the root");
            return Ok(info);
        }

        let mut ctx = SearchContext {
            generator: &self.generator,
            scorer: &self.scorer,
            sink: self.sink.as_mut(),
            stop_flag: self.config.stop_flag.as_deref(),
            progress: self.progress.as_deref(),
            capture_first: self.config.capture_first_ordering,
            root_depth: depth,
            line: Vec::with_capacity(depth as usize),
            nodes: 0,
            evaluated: 0,
        };
        let result = ctx.alphabeta(position, depth, MIN_VAL, MAX_VAL, mode)?;
        ctx.publish_counts();
        let (nodes, evaluated) = (ctx.nodes, ctx.evaluated);
        self.last_nodes = nodes;

        let line = result.line.filter(|line| !line.is_empty());
        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        info!(
            depth,
            nodes,
            evaluated,
            elapsed_ms,
            score = result.score,
            line = %line.as_deref().map(format_line).unwrap_or_default(),
            "alpha-beta search finished"
        );

        Ok(MoveInfo {
            mv: line.as_ref().and_then(|line| line.first().copied()),
            line,
            score: result.score,
            checkmate: false,
            stalemate: false,
            nodes,
            evaluated,
            elapsed_ms,
        })
    }

    fn current_depth(&self) -> u32 {
        self.config.start_depth
    }

    fn increase_depth(&mut self, by: i32) {
        self.config.start_depth = adjusted_depth(self.config.start_depth, by);
    }

    fn set_report_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sink = sink;
    }

    fn nodes_searched(&self) -> u64 {
        self.last_nodes
    }
}
