//! Legal-move tree counting for move generator verification.
//!
//! Counts are produced by make/unmake on one board, so a perft run also
//! exercises undo exactness at every node.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf count only; the fast path used by benches.
pub fn perft(board: &mut Board, depth: u8) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let color = board.current_turn();
    let moves = generate_legal_moves(board, color);
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    let mut nodes = 0u64;
    for mv in moves {
        board.make_move(mv.from, mv.to, false, true);
        nodes += perft(board, depth - 1)?;
        board
            .unmake_move(true)
            .ok_or(ChessError::UndoStackUnderflow { depth })?;
    }
    Ok(nodes)
}

/// Leaf counts with per-move-type breakdown at the final ply.
pub fn perft_detailed(board: &mut Board, depth: u8) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }
    let mut total = PerftCounts::default();
    perft_recurse(board, depth, &mut total)?;
    Ok(total)
}

fn perft_recurse(board: &mut Board, depth: u8, counts: &mut PerftCounts) -> ChessResult<()> {
    let color = board.current_turn();
    for mv in generate_legal_moves(board, color) {
        board.make_move(mv.from, mv.to, false, true);
        if depth == 1 {
            let mut leaf = PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            };
            if let Some(record) = board.move_history().last() {
                leaf.captures = usize::from(record.captured_piece.is_some());
                leaf.castles = usize::from(record.castling.is_some());
                leaf.promotions = usize::from(record.promotion);
            }
            if is_in_check(board, color.opposite()) {
                leaf.checks = 1;
                let reply = color.opposite();
                if generate_legal_moves(board, reply).is_empty() {
                    leaf.checkmates = 1;
                }
            }
            counts.merge(leaf);
        } else {
            perft_recurse(board, depth - 1, counts)?;
        }
        board
            .unmake_move(true)
            .ok_or(ChessError::UndoStackUnderflow { depth })?;
    }
    Ok(())
}

/// Per-root-move leaf counts, sorted by move text.
pub fn perft_divide(board: &mut Board, depth: u8) -> ChessResult<Vec<(Move, u64)>> {
    let color = board.current_turn();
    let mut out = Vec::new();
    for mv in generate_legal_moves(board, color) {
        board.make_move(mv.from, mv.to, false, true);
        let nodes = perft(board, depth.saturating_sub(1))?;
        board
            .unmake_move(true)
            .ok_or(ChessError::UndoStackUnderflow { depth })?;
        out.push((mv, nodes));
    }
    out.sort_by_key(|(mv, _)| mv.to_string());
    Ok(out)
}
