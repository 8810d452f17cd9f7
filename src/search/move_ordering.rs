//! Move ordering: hash move, MVV-LVA captures, killers, history.
//!
//! Moves are sorted descending by score so cutoffs are found early.

use std::cmp::Reverse;

use crate::game_state::chess_types::*;
use crate::search::board_scoring::piece_value;

pub const MAX_PLY: usize = 64;

const TT_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const PROMOTION_BASE: i32 = 90_000;
const KILLER_SCORES: [i32; 2] = [80_000, 70_000];
const HISTORY_MAX: i32 = 50_000;

/// Attacker cost for MVV-LVA; the king is the least willing attacker.
#[inline]
const fn attacker_cost(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 1000,
        other => piece_value(other),
    }
}

/// Small static bias so heavier pieces are tried first among equals.
#[inline]
const fn piece_bias(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 6,
        PieceKind::King => 10,
    }
}

type HistoryTable = [[i32; 64]; 64];

/// Killer and history tables, owned by the engine across searches.
#[derive(Debug, Clone)]
pub struct SearchHeuristics {
    killers: [[Option<Move>; 2]; MAX_PLY],
    history: Box<HistoryTable>,
}

impl Default for SearchHeuristics {
    fn default() -> Self {
        Self {
            killers: [[None; 2]; MAX_PLY],
            history: Box::new([[0; 64]; 64]),
        }
    }
}

impl SearchHeuristics {
    /// Forget killers and halve history; called at the start of every search.
    pub fn prepare_search(&mut self) {
        self.killers.fill([None; 2]);
        for row in self.history.iter_mut() {
            for entry in row.iter_mut() {
                *entry /= 2;
            }
        }
    }

    pub fn clear(&mut self) {
        self.killers.fill([None; 2]);
        self.history.iter_mut().for_each(|row| row.fill(0));
    }

    #[inline]
    pub fn killers_at(&self, ply: usize) -> [Option<Move>; 2] {
        self.killers.get(ply).copied().unwrap_or([None; 2])
    }

    /// Most recent first; a repeat of slot 0 is ignored.
    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.killers.get_mut(ply) else {
            return;
        };
        if slots[0] == Some(mv) {
            return;
        }
        slots[1] = slots[0];
        slots[0] = Some(mv);
    }

    pub fn record_history(&mut self, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.history[mv.from.index()][mv.to.index()];
        *entry = (*entry + bonus).min(HISTORY_MAX);
    }

    #[inline]
    pub fn history_score(&self, mv: Move) -> i32 {
        self.history[mv.from.index()][mv.to.index()]
    }
}

#[inline]
pub fn is_capture(board: &Board, mv: Move) -> bool {
    board.piece_at(mv.to).is_some()
}

#[inline]
pub fn is_promotion(board: &Board, mv: Move) -> bool {
    board
        .piece_at(mv.from)
        .is_some_and(|p| p.kind == PieceKind::Pawn && mv.to.row == p.color.promotion_rank())
}

/// MVV-LVA score for captures and queen promotions; 0 for quiet moves.
pub fn tactical_score(board: &Board, mv: Move) -> i32 {
    let Some(attacker) = board.piece_at(mv.from) else {
        return 0;
    };
    let mut score = 0;
    if let Some(victim) = board.piece_at(mv.to) {
        score += CAPTURE_BASE + piece_value(victim.kind) * 10 - attacker_cost(attacker.kind);
    }
    if is_promotion(board, mv) {
        score += PROMOTION_BASE + piece_value(PieceKind::Queen);
    }
    score
}

pub fn move_order_score(
    board: &Board,
    mv: Move,
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    heuristics: &SearchHeuristics,
) -> i32 {
    if Some(mv) == tt_move {
        return TT_MOVE_SCORE;
    }
    let mut score = tactical_score(board, mv);
    if score == 0 {
        if let Some(slot) = killers.iter().position(|k| *k == Some(mv)) {
            score += KILLER_SCORES[slot];
        }
        score += heuristics.history_score(mv);
    }
    if let Some(piece) = board.piece_at(mv.from) {
        score += piece_bias(piece.kind);
    }
    score
}

pub fn order_moves(
    board: &Board,
    moves: &mut [Move],
    tt_move: Option<Move>,
    ply: usize,
    heuristics: &SearchHeuristics,
) {
    let killers = heuristics.killers_at(ply);
    moves.sort_by_cached_key(|mv| Reverse(move_order_score(board, *mv, tt_move, killers, heuristics)));
}

/// Captures only: MVV-LVA, no heuristics.
pub fn order_captures(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| Reverse(tactical_score(board, *mv)));
}
