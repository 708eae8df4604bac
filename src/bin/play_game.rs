//! Console game against the engine.
//!
//! Usage:
//! `cargo run --release --bin play_game`
//! `cargo run --release --bin play_game -- --depth 3 --dark --strategy simple`
//!
//! Moves are entered in long algebraic form (`e2e4`, `e7e8q`, `e1g1`);
//! `O-O` and `O-O-O` are accepted for castling. `quit` ends the session.

use std::io::{self, BufRead, Write};

use bulldog_chess::game_state::chess_types::{CastlingSide, Color};
use bulldog_chess::game_state::position::Position;
use bulldog_chess::move_generation::chess_move::Move;
use bulldog_chess::move_generation::legal_move_generator::LegalMoveGenerator;
use bulldog_chess::move_generation::move_generator::{terminal_state, TerminalState};
use bulldog_chess::search::alpha_beta::{AlphaBeta, SearchConfig};
use bulldog_chess::search::negamax::Negamax;
use bulldog_chess::search::search_strategy::SearchStrategy;
use bulldog_chess::search::simple_strategy::{SimpleStrategy, DEFAULT_PLAY_BEST_PERCENT};
use bulldog_chess::utils::fen_parser::parse_fen;
use bulldog_chess::utils::long_algebraic::resolve_move;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u32(flag: &str, default: u32) -> u32 {
    arg_value(flag)
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|v| v.max(1))
        .unwrap_or(default)
}

fn strategy_for(name: &str, depth: u32) -> Result<Box<dyn SearchStrategy>, String> {
    match name {
        "alphabeta" => Ok(Box::new(AlphaBeta::with_config(SearchConfig {
            start_depth: depth,
            ..SearchConfig::default()
        }))),
        "negamax" => Ok(Box::new(Negamax::new(depth))),
        "simple" => Ok(Box::new(SimpleStrategy::new(DEFAULT_PLAY_BEST_PERCENT))),
        other => Err(format!("unknown strategy '{other}'")),
    }
}

fn read_human_move(text: &str, position: &Position) -> Result<Move, String> {
    let side = match text {
        "O-O" | "0-0" => Some(CastlingSide::Kingside),
        "O-O-O" | "0-0-0" => Some(CastlingSide::Queenside),
        _ => None,
    };
    match side {
        Some(side) => position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.castling == Some(side))
            .ok_or_else(|| format!("{text} is not a legal move in this position")),
        None => resolve_move(text, position).map_err(|e| e.to_string()),
    }
}

/// Prints the result and returns true once the side to move cannot move.
fn announce_if_over(position: &Position) -> bool {
    match terminal_state(&LegalMoveGenerator, position) {
        Some(TerminalState::Checkmate) => {
            println!("checkmate! {:?} wins", position.side_to_move().opposite());
            true
        }
        Some(TerminalState::Stalemate) => {
            println!("stalemate!");
            true
        }
        None => false,
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let depth = parse_arg_u32("--depth", SearchConfig::default().start_depth);
    let strategy_name = arg_value("--strategy").unwrap_or_else(|| "alphabeta".to_owned());
    let human = if std::env::args().any(|a| a == "--dark") {
        Color::Dark
    } else {
        Color::Light
    };
    let mut strategy = strategy_for(&strategy_name, depth)?;
    let mut position = match arg_value("--fen") {
        Some(fen) => parse_fen(&fen).map_err(|e| e.to_string())?,
        None => Position::starting(),
    };

    println!("new game: you play {human:?}, engine uses {}", strategy.name());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{position}");
        if announce_if_over(&position) {
            break;
        }

        if position.side_to_move() != human {
            let info = strategy.find_move(&position).map_err(|e| e.to_string())?;
            let Some(mv) = info.mv else {
                println!("engine found no move");
                break;
            };
            println!("{}... {mv:#}  (score {}, line [{}])", position.fullmove_number(), info.score, info.line_text());
            position = position.apply(&mv);
            continue;
        }

        print!("{}:  ", position.fullmove_number());
        io::stdout().flush().map_err(|e| e.to_string())?;
        let Some(line) = lines.next() else {
            break;
        };
        let text = line.map_err(|e| e.to_string())?;
        let text = text.trim();
        if text == "quit" {
            break;
        }
        match read_human_move(text, &position) {
            Ok(mv) => position = position.apply(&mv),
            Err(reason) => {
                warn!(input = text, "move rejected");
                println!("{reason}");
            }
        }
    }
    Ok(())
}
