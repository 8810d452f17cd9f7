//! Crate root module declarations for the Pawnstorm chess engine.
//!
//! This file exposes all top-level subsystems (board state, move generation,
//! search, engines, game sessions, and utility helpers) so the binary, tests,
//! and benchmarks can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod undo_state;
}

pub mod moves {
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod piece_moves;
    pub mod sliding;
}

pub mod move_generation {
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_iterative;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod game {
    pub mod match_session;
}

pub mod utils {
    pub mod coordinates;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_board;
}
