//! Searches one position and prints the chosen move.
//!
//! Usage:
//! `cargo run --release --bin search_position`
//! `cargo run --release --bin search_position -- --depth 5 --strategy negamax --fen "<fen>"`
//!
//! Strategies: `alphabeta` (default), `negamax`, `simple`.

use bulldog_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use bulldog_chess::search::alpha_beta::{AlphaBeta, SearchConfig};
use bulldog_chess::search::negamax::Negamax;
use bulldog_chess::search::search_strategy::SearchStrategy;
use bulldog_chess::search::simple_strategy::{SimpleStrategy, DEFAULT_PLAY_BEST_PERCENT};
use bulldog_chess::utils::fen_parser::parse_fen;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u32(flag: &str, default: u32) -> u32 {
    match arg_value(flag) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(v) => v.max(1),
            Err(_) => {
                warn!(flag, value = %raw, default, "ignoring unparsable value");
                default
            }
        },
        None => default,
    }
}

fn strategy_for(name: &str, depth: u32) -> Result<Box<dyn SearchStrategy>, String> {
    match name {
        "alphabeta" => Ok(Box::new(AlphaBeta::with_config(SearchConfig {
            start_depth: depth,
            ..SearchConfig::default()
        }))),
        "negamax" => Ok(Box::new(Negamax::new(depth))),
        "simple" => Ok(Box::new(SimpleStrategy::new(DEFAULT_PLAY_BEST_PERCENT))),
        other => Err(format!("unknown strategy '{other}' (expected alphabeta, negamax or simple)")),
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let fen = arg_value("--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let depth = parse_arg_u32("--depth", SearchConfig::default().start_depth);
    let strategy_name = arg_value("--strategy").unwrap_or_else(|| "alphabeta".to_owned());

    let position = parse_fen(&fen).map_err(|e| e.to_string())?;
    let mut strategy = strategy_for(&strategy_name, depth)?;

    println!("{position}");
    println!("strategy={} depth={}", strategy.name(), strategy.current_depth());

    let info = strategy.find_move(&position).map_err(|e| e.to_string())?;
    match info.mv {
        Some(mv) => println!(
            "best_move={mv:#} ({}) score={} line=[{}]",
            mv.to_long_algebraic(),
            info.score,
            info.line_text()
        ),
        None if info.checkmate => println!("no move: checkmate"),
        None if info.stalemate => println!("no move: stalemate"),
        None => println!("no move found"),
    }
    println!(
        "nodes={} evaluated={} elapsed_ms={}",
        info.nodes, info.evaluated, info.elapsed_ms
    );
    Ok(())
}
