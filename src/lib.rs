//! Crate root module declarations for the Bulldog chess engine.
//!
//! The engine core is the position model, the legal move generator, the
//! static evaluator and the search strategies. Notation helpers (FEN, long
//! algebraic text, board rendering) live under `utils` for the binaries and
//! tests that drive the core.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod position;
}

pub mod geometry {
    pub mod move_templates;
    pub mod rays;
}

pub mod move_generation {
    pub mod castling;
    pub mod check_detection;
    pub mod chess_move;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod pin_info;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod negamax;
    pub mod search_progress;
    pub mod search_strategy;
    pub mod simple_strategy;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
