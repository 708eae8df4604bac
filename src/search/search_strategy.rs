//! Search strategy abstraction and the result payload shared by all strategies.
//!
//! Strategies are chosen at construction time and driven through
//! [`SearchStrategy`]; front ends never need to know which one they hold.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::errors::SearchResult;
use crate::game_state::position::Position;
use crate::move_generation::chess_move::Move;

/// Outcome of one `find_move` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveInfo {
    /// First move of `line`, or the move picked by a strategy without lines.
    pub mv: Option<Move>,
    pub line: Option<Vec<Move>>,
    /// Light's point of view for alpha-beta, side to move for negamax.
    pub score: i32,
    /// Side to move has no legal moves and is in check.
    pub checkmate: bool,
    /// Side to move has no legal moves and is not in check.
    pub stalemate: bool,
    pub nodes: u64,
    pub evaluated: u64,
    pub elapsed_ms: i64,
}

impl MoveInfo {
    /// Result for a position where the side to move cannot move at all.
    pub fn terminal(position: &Position) -> Self {
        let in_check = position.is_in_check();
        Self {
            checkmate: in_check,
            stalemate: !in_check,
            ..Self::default()
        }
    }

    pub fn line_text(&self) -> String {
        self.line.as_deref().map(format_line).unwrap_or_default()
    }
}

/// Space-separated moves with check marks, e.g. `Rh1-h8+ Ke8-e7`.
pub fn format_line(line: &[Move]) -> String {
    line.iter().map(|mv| format!("{mv:#}")).collect::<Vec<_>>().join(" ")
}

/// Receives every line that improves the root during a search.
pub trait ReportSink: Send {
    fn report(&mut self, line: &[Move], score: i32, depth: u32);
}

/// Forwards improved root lines to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn report(&mut self, line: &[Move], score: i32, depth: u32) {
        debug!(depth, score, line = %format_line(line), "improved root line");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub line: Vec<Move>,
    pub score: i32,
    pub depth: u32,
}

/// Keeps every reported line. Clones share the same storage, so a caller can
/// hand one clone to a strategy and read the reports back through another.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    reports: Arc<Mutex<Vec<LineReport>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<LineReport> {
        match self.reports.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn last(&self) -> Option<LineReport> {
        self.reports.lock().ok().and_then(|guard| guard.last().cloned())
    }
}

impl ReportSink for CollectingSink {
    fn report(&mut self, line: &[Move], score: i32, depth: u32) {
        if let Ok(mut guard) = self.reports.lock() {
            guard.push(LineReport {
                line: line.to_vec(),
                score,
                depth,
            });
        }
    }
}

pub trait SearchStrategy: Send {
    fn name(&self) -> &str;

    fn find_move(&mut self, position: &Position) -> SearchResult<MoveInfo>;

    fn current_depth(&self) -> u32;

    /// Adjusts the search depth; the depth never drops below 1.
    fn increase_depth(&mut self, by: i32);

    fn set_report_sink(&mut self, _sink: Box<dyn ReportSink>) {}

    /// Nodes visited by the most recent `find_move`.
    fn nodes_searched(&self) -> u64 {
        0
    }
}

pub(crate) fn adjusted_depth(current: u32, by: i32) -> u32 {
    let adjusted = i64::from(current) + i64::from(by);
    adjusted.clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn collecting_sink_clones_share_reports() {
        let sink = CollectingSink::new();
        let mut handed_out: Box<dyn ReportSink> = Box::new(sink.clone());
        let line = [Move::quiet(12, 28, PieceKind::Pawn)];
        handed_out.report(&line, 35, 4);
        assert_eq!(
            sink.last(),
            Some(LineReport {
                line: line.to_vec(),
                score: 35,
                depth: 4,
            })
        );
        assert_eq!(sink.reports().len(), 1);
    }

    #[test]
    fn terminal_info_tells_mate_from_stalemate() {
        let mate = parse_fen("R3k3/8/4K3/8/8/8/8/8 b - - 0 1").expect("fen");
        let info = MoveInfo::terminal(&mate);
        assert!(info.checkmate && !info.stalemate && info.mv.is_none());

        let stalemate = parse_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").expect("fen");
        let info = MoveInfo::terminal(&stalemate);
        assert!(!info.checkmate && info.stalemate);
    }

    #[test]
    fn depth_adjustment_stays_positive() {
        assert_eq!(adjusted_depth(4, 2), 6);
        assert_eq!(adjusted_depth(4, -2), 2);
        assert_eq!(adjusted_depth(2, -5), 1);
    }

    #[test]
    fn line_text_joins_moves() {
        let info = MoveInfo {
            line: Some(vec![Move::quiet(12, 28, PieceKind::Pawn), Move::quiet(52, 36, PieceKind::Pawn)]),
            ..MoveInfo::default()
        };
        assert_eq!(info.line_text(), "e2-e4 e7-e5");
        assert_eq!(MoveInfo::default().line_text(), "");
    }
}
