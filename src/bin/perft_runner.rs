//! Perft counts for one position.
//!
//! Usage:
//! `cargo run --release --bin perft_runner -- --depth 4`
//! `cargo run --release --bin perft_runner -- --fen "<fen>" --depth 3 --divide`

use bulldog_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use bulldog_chess::move_generation::legal_move_generator::LegalMoveGenerator;
use bulldog_chess::move_generation::perft::{perft, perft_divide};
use bulldog_chess::utils::fen_parser::parse_fen;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_arg_u8(flag: &str, default: u8) -> u8 {
    arg_value(flag)
        .and_then(|raw| raw.parse::<u8>().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let fen = arg_value("--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let depth = parse_arg_u8("--depth", 4);
    let divide = std::env::args().any(|a| a == "--divide");
    let position = parse_fen(&fen).map_err(|e| e.to_string())?;
    let generator = LegalMoveGenerator;

    if divide {
        let divided = perft_divide(&generator, &position, depth).map_err(|e| e.to_string())?;
        for (text, nodes) in &divided {
            println!("{text}: {nodes}");
        }
        println!();
        println!("moves={} nodes={}", divided.len(), divided.iter().map(|(_, n)| n).sum::<usize>());
        return Ok(());
    }

    let started = Utc::now();
    let counts = perft(&generator, &position, depth).map_err(|e| e.to_string())?;
    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    info!(depth, nodes = counts.nodes, elapsed_ms, "perft finished");

    println!("depth={depth} nodes={}", counts.nodes);
    println!(
        "captures={} ep={} castles={} promotions={} checks={} discovery={} double={} checkmates={}",
        counts.captures,
        counts.en_passant,
        counts.castles,
        counts.promotions,
        counts.checks,
        counts.discovery_checks,
        counts.double_checks,
        counts.checkmates
    );
    if elapsed_ms > 0 {
        println!("elapsed_ms={elapsed_ms} nps={}", counts.nodes as i64 * 1000 / elapsed_ms);
    }
    Ok(())
}
