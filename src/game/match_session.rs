//! Live game session and head-to-head engine matches.
//!
//! `GameSession` owns the authoritative board for a human-vs-engine game.
//! `play_match` runs two `Engine` implementations against each other without
//! any I/O, for tests and the `--self-play` CLI mode.

use std::time::Instant;

use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_trait::Engine;
use crate::game_state::chess_types::*;

pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

pub struct GameSession {
    board: Board,
    engine: IterativeEngine,
}

impl GameSession {
    /// New game from the standard position; the engine plays `engine.color()`.
    pub fn new(engine: IterativeEngine) -> Self {
        Self::from_board(Board::new_game(), engine)
    }

    pub fn from_board(board: Board, engine: IterativeEngine) -> Self {
        Self { board, engine }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn engine(&self) -> &IterativeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut IterativeEngine {
        &mut self.engine
    }

    pub fn is_engine_turn(&self) -> bool {
        self.board.current_turn() == self.engine.color()
    }

    pub fn outcome(&mut self) -> GameOutcome {
        self.board.outcome()
    }

    /// Validated human move. Refused when it is the engine's turn.
    pub fn play_human_move(&mut self, from: Square, to: Square) -> bool {
        if self.is_engine_turn() {
            debug!(%from, %to, "human move refused: engine to move");
            return false;
        }
        self.board.make_move(from, to, true, true)
    }

    /// Let the engine move once. No-op when it is not the engine's turn or the
    /// game is over.
    pub fn play_engine_turn(&mut self) -> Option<Move> {
        if !self.is_engine_turn() || self.outcome() != GameOutcome::InProgress {
            return None;
        }
        let mv = self.engine.get_move(&mut self.board)?;
        if self.board.make_move(mv.from, mv.to, true, true) {
            Some(mv)
        } else {
            debug!(%mv, "engine move failed validation");
            None
        }
    }

    pub fn undo_last_move(&mut self) -> Option<UndoRecord> {
        self.board.unmake_move(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    DrawStalemate,
    DrawFiftyMoveRule,
    DrawMaxPlies,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_fen: String,
    pub played_moves: Vec<String>,
    pub white_total_time_ms: u128,
    pub black_total_time_ms: u128,
}

/// Play `white` against `black` from `start` for at most `max_plies` plies.
///
/// An engine that returns an illegal move, or no move while legal moves
/// exist, ends the match with an error.
pub fn play_match<'a>(
    white: &'a mut dyn Engine,
    black: &'a mut dyn Engine,
    start: Board,
    max_plies: u16,
) -> ChessResult<MatchResult> {
    white.new_game();
    black.new_game();

    let mut board = start;
    let mut played_moves = Vec::new();
    let mut times = [0u128; 2];

    let outcome = loop {
        match board.outcome() {
            GameOutcome::Checkmate {
                winner: Color::White,
            } => break MatchOutcome::WhiteWinCheckmate,
            GameOutcome::Checkmate {
                winner: Color::Black,
            } => break MatchOutcome::BlackWinCheckmate,
            GameOutcome::Stalemate => break MatchOutcome::DrawStalemate,
            GameOutcome::InProgress => {}
        }
        if board.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
            break MatchOutcome::DrawFiftyMoveRule;
        }
        if played_moves.len() >= usize::from(max_plies) {
            break MatchOutcome::DrawMaxPlies;
        }

        let side = board.current_turn();
        let engine = match side {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };

        let started = Instant::now();
        let output = engine.choose_move(&mut board)?;
        times[side.index()] += started.elapsed().as_millis();

        let mv = output
            .best_move
            .ok_or_else(|| ChessError::EngineReturnedNoMove(engine.name().to_owned()))?;
        board.check_move(mv.from, mv.to)?;
        board.make_move(mv.from, mv.to, false, true);
        debug!(ply = played_moves.len() + 1, %side, %mv, "match move");
        played_moves.push(mv.to_string());
    };

    info!(?outcome, plies = played_moves.len(), "match finished");
    Ok(MatchResult {
        outcome,
        final_fen: board.to_fen(),
        played_moves,
        white_total_time_ms: times[Color::White.index()],
        black_total_time_ms: times[Color::Black.index()],
    })
}
