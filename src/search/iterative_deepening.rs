//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! One board is mutated in place through make/unmake; no node copies it.
//!
//! Heuristics:
//! - Transposition table probe/store with ply-normalised mate scores.
//! - Null-move pruning (`R = 2 + depth / 6`) outside check.
//! - Principal Variation Search with zero-window probes.
//! - Late Move Reductions for quiet moves past the fourth.
//! - Killer/history move ordering, MVV-LVA for captures.
//! - Quiescence search over captures (all evasions when in check).
//! - Aspiration windows around the previous iteration's score.
//!
//! A missed deadline is not an error: every recursive call returns
//! `Ok(None)` and the driver keeps the last completed iteration.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::{
    generate_legal_moves, generate_pseudolegal_captures,
};
use crate::search::board_scoring::{BoardScorer, MATE_SCORE, MATE_THRESHOLD};
use crate::search::move_ordering::{
    is_capture, is_promotion, order_captures, order_moves, SearchHeuristics,
};
use crate::search::transposition_table::{Bound, TTEntry, TTStats, TranspositionTable};

pub const INFINITY: i32 = MATE_SCORE + 1;
pub const QUIESCENCE_MAX_PLY: u8 = 8;
const ASPIRATION_WINDOW: i32 = 50;
const NULL_MOVE_MIN_DEPTH: u8 = 3;
const LMR_MIN_DEPTH: u8 = 3;
const LMR_FIRST_REDUCED_INDEX: usize = 4;
const TIME_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub movetime_ms: Option<u64>,
    pub use_null_move: bool,
    pub use_lmr: bool,
    pub use_aspiration: bool,
    pub use_tt: bool,
    pub quiescence: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            movetime_ms: None,
            use_null_move: true,
            use_lmr: true,
            use_aspiration: true,
            use_tt: true,
            quiescence: true,
        }
    }
}

impl SearchConfig {
    /// Plain alpha-beta: full window, no TT, no forward pruning, static leaves.
    pub fn exhaustive(max_depth: u8) -> Self {
        Self {
            max_depth,
            movetime_ms: None,
            use_null_move: false,
            use_lmr: false,
            use_aspiration: false,
            use_tt: false,
            quiescence: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub tt_stats: TTStats,
}

/// Search with a private table and fresh heuristics.
pub fn search_with_fresh_tables<S: BoardScorer>(
    board: &mut Board,
    scorer: &S,
    config: &SearchConfig,
) -> ChessResult<SearchReport> {
    let mut tt = TranspositionTable::new_with_mb(4);
    let mut heuristics = SearchHeuristics::default();
    iterative_deepening_search(board, scorer, config, &mut tt, &mut heuristics)
}

/// Search the side to move of `board` and leave the board unchanged.
///
/// Depth 1 always completes, so a legal move is returned whenever one exists.
pub fn iterative_deepening_search<S: BoardScorer>(
    board: &mut Board,
    scorer: &S,
    config: &SearchConfig,
    tt: &mut TranspositionTable,
    heuristics: &mut SearchHeuristics,
) -> ChessResult<SearchReport> {
    let started_at = Instant::now();
    heuristics.prepare_search();
    let deadline = config
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));

    if config.max_depth == 0 {
        return Ok(SearchReport {
            best_score: scorer.score(board),
            nodes: 1,
            tt_stats: tt.stats(),
            ..SearchReport::default()
        });
    }

    let mut searcher = Searcher {
        scorer,
        config,
        tt,
        heuristics,
        deadline: None,
        nodes: 0,
        aborted: false,
    };

    let mut report = SearchReport::default();
    for depth in 1..=config.max_depth {
        if depth > 1 {
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                break;
            }
            searcher.deadline = deadline;
        }

        let Some((best_move, best_score)) =
            searcher.search_root_with_aspiration(board, depth, report.best_score, report.best_move)?
        else {
            debug!(depth, nodes = searcher.nodes, "iteration abandoned at deadline");
            break;
        };

        report.best_move = best_move;
        report.best_score = best_score;
        report.reached_depth = depth;
        report.nodes = searcher.nodes;
        debug!(
            depth,
            score = best_score,
            nodes = searcher.nodes,
            best = ?best_move.map(|m| m.to_string()),
            "iteration complete"
        );

        if best_score >= MATE_THRESHOLD {
            break;
        }
    }

    report.nodes = searcher.nodes;
    report.elapsed_ms = started_at.elapsed().as_millis() as u64;
    report.tt_stats = searcher.tt.stats();
    info!(
        best = ?report.best_move.map(|m| m.to_string()),
        score = report.best_score,
        depth = report.reached_depth,
        nodes = report.nodes,
        elapsed_ms = report.elapsed_ms,
        "search finished"
    );
    Ok(report)
}

#[inline]
pub fn terminal_score(in_check: bool, ply: u8) -> i32 {
    if in_check {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}

fn has_non_pawn_material(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|(_, p)| !matches!(p.kind, PieceKind::Pawn | PieceKind::King))
}

fn undo(board: &mut Board, depth: u8) -> ChessResult<()> {
    board
        .unmake_move(true)
        .map(|_| ())
        .ok_or(ChessError::UndoStackUnderflow { depth })
}

struct Searcher<'a, S: BoardScorer> {
    scorer: &'a S,
    config: &'a SearchConfig,
    tt: &'a mut TranspositionTable,
    heuristics: &'a mut SearchHeuristics,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

impl<S: BoardScorer> Searcher<'_, S> {
    #[inline]
    fn out_of_time(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if let Some(limit) = self.deadline {
            if self.nodes % TIME_CHECK_INTERVAL == 0 && Instant::now() >= limit {
                self.aborted = true;
            }
        }
        self.aborted
    }

    fn search_root_with_aspiration(
        &mut self,
        board: &mut Board,
        depth: u8,
        prev_score: i32,
        prev_best: Option<Move>,
    ) -> ChessResult<Option<(Option<Move>, i32)>> {
        if !self.config.use_aspiration || depth <= 1 || prev_score.abs() >= MATE_THRESHOLD {
            return self.negamax_root(board, depth, -INFINITY, INFINITY, prev_best);
        }

        let alpha = prev_score - ASPIRATION_WINDOW;
        let beta = prev_score + ASPIRATION_WINDOW;
        let Some((best_move, score)) = self.negamax_root(board, depth, alpha, beta, prev_best)?
        else {
            return Ok(None);
        };
        if score > alpha && score < beta {
            return Ok(Some((best_move, score)));
        }

        debug!(depth, score, alpha, beta, "aspiration window missed; re-searching");
        self.negamax_root(board, depth, -INFINITY, INFINITY, best_move.or(prev_best))
    }

    fn negamax_root(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        prev_best: Option<Move>,
    ) -> ChessResult<Option<(Option<Move>, i32)>> {
        self.nodes += 1;
        let side = board.current_turn();
        let mut moves = generate_legal_moves(board, side);
        if moves.is_empty() {
            return Ok(Some((None, terminal_score(board.is_in_check(side), 0))));
        }

        let tt_move = match prev_best {
            Some(mv) => Some(mv),
            None if self.config.use_tt => {
                self.tt.probe(board.zobrist_key()).and_then(|e| e.best_move)
            }
            None => None,
        };
        order_moves(board, &mut moves, tt_move, 0, &*self.heuristics);

        let alpha_orig = alpha;
        let mut best_move = None;
        let mut best_score = -INFINITY;

        for (index, mv) in moves.into_iter().enumerate() {
            if self.deadline.is_some_and(|limit| Instant::now() >= limit) {
                self.aborted = true;
                return Ok(None);
            }

            if !board.make_move(mv.from, mv.to, false, true) {
                continue;
            }
            let child = self.principal_variation_child(board, depth, alpha, beta, 1, index, false);
            undo(board, depth)?;
            let Some(score) = child? else {
                return Ok(None);
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        if self.config.use_tt {
            self.store(board.zobrist_key(), depth, best_score, alpha_orig, beta, best_move, 0);
        }
        Ok(Some((best_move, best_score)))
    }

    /// Score of the move just made, from the parent's point of view.
    ///
    /// The first move gets the full window; later moves get a zero-window
    /// probe (reduced by one ply when `reducible`) and a full re-search only
    /// if the probe beats alpha.
    #[allow(clippy::too_many_arguments)]
    fn principal_variation_child(
        &mut self,
        board: &mut Board,
        depth: u8,
        alpha: i32,
        beta: i32,
        ply: u8,
        index: usize,
        reducible: bool,
    ) -> ChessResult<Option<i32>> {
        let child_depth = depth.saturating_sub(1);
        if index == 0 {
            return Ok(self.negamax(board, child_depth, -beta, -alpha, ply, true)?.map(|s| -s));
        }

        let reduction = u8::from(reducible);
        let Some(probe) = self.negamax(
            board,
            child_depth.saturating_sub(reduction),
            -alpha - 1,
            -alpha,
            ply,
            true,
        )?
        else {
            return Ok(None);
        };
        let mut score = -probe;

        if score > alpha && reduction > 0 {
            let Some(full_depth) = self.negamax(board, child_depth, -alpha - 1, -alpha, ply, true)?
            else {
                return Ok(None);
            };
            score = -full_depth;
        }
        if score > alpha && score < beta {
            let Some(exact) = self.negamax(board, child_depth, -beta, -alpha, ply, true)? else {
                return Ok(None);
            };
            score = -exact;
        }
        Ok(Some(score))
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u8,
        allow_null: bool,
    ) -> ChessResult<Option<i32>> {
        self.nodes += 1;
        if self.out_of_time() {
            return Ok(None);
        }

        let key = board.zobrist_key();
        let alpha_orig = alpha;
        let mut tt_move = None;
        if self.config.use_tt {
            if let Some(entry) = self.tt.probe(key) {
                tt_move = entry.best_move;
                if entry.depth >= depth {
                    let score = entry.score_at(ply);
                    match entry.bound {
                        Bound::Exact => return Ok(Some(score)),
                        Bound::Lower => alpha = alpha.max(score),
                        Bound::Upper => beta = beta.min(score),
                    }
                    if alpha >= beta {
                        return Ok(Some(score));
                    }
                }
            }
        }

        let side = board.current_turn();
        if depth == 0 {
            if self.config.quiescence {
                return self.quiescence(board, alpha, beta, ply, 0);
            }
            return Ok(Some(self.static_leaf(board, side, ply)));
        }

        let in_check = board.is_in_check(side);

        if self.config.use_null_move
            && allow_null
            && depth >= NULL_MOVE_MIN_DEPTH
            && !in_check
            && has_non_pawn_material(board, side)
        {
            let reduction = 2 + depth / 6;
            board.make_null_move();
            let null_score = self.negamax(
                board,
                depth.saturating_sub(1 + reduction),
                -beta,
                -beta + 1,
                ply.saturating_add(1),
                false,
            );
            board.unmake_null_move();
            let Some(null_score) = null_score? else {
                return Ok(None);
            };
            if -null_score >= beta {
                return Ok(Some(beta));
            }
        }

        let mut moves = generate_legal_moves(board, side);
        if moves.is_empty() {
            return Ok(Some(terminal_score(in_check, ply)));
        }
        order_moves(board, &mut moves, tt_move, ply as usize, &*self.heuristics);

        let mut best_move = None;
        let mut best_score = -INFINITY;

        for (index, mv) in moves.into_iter().enumerate() {
            let quiet = !is_capture(board, mv) && !is_promotion(board, mv);
            let reducible = self.config.use_lmr
                && quiet
                && !in_check
                && depth >= LMR_MIN_DEPTH
                && index >= LMR_FIRST_REDUCED_INDEX;

            if !board.make_move(mv.from, mv.to, false, true) {
                continue;
            }
            let child = self.principal_variation_child(
                board,
                depth,
                alpha,
                beta,
                ply.saturating_add(1),
                index,
                reducible,
            );
            undo(board, depth)?;
            let Some(score) = child? else {
                return Ok(None);
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
                if quiet {
                    self.heuristics.record_history(mv, depth);
                }
            }
            if alpha >= beta {
                if quiet {
                    self.heuristics.record_killer(ply as usize, mv);
                }
                break;
            }
        }

        if self.config.use_tt {
            self.store(key, depth, best_score, alpha_orig, beta, best_move, ply);
        }
        Ok(Some(best_score))
    }

    /// Horizon value without quiescence: terminal score or static evaluation.
    fn static_leaf(&mut self, board: &mut Board, side: Color, ply: u8) -> i32 {
        if generate_legal_moves(board, side).is_empty() {
            return terminal_score(board.is_in_check(side), ply);
        }
        self.scorer.score(board)
    }

    fn quiescence(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        beta: i32,
        ply: u8,
        qply: u8,
    ) -> ChessResult<Option<i32>> {
        self.nodes += 1;
        if self.out_of_time() {
            return Ok(None);
        }

        let side = board.current_turn();
        if board.is_in_check(side) {
            if qply >= QUIESCENCE_MAX_PLY {
                return Ok(Some(self.scorer.score(board)));
            }
            let mut evasions = generate_legal_moves(board, side);
            if evasions.is_empty() {
                return Ok(Some(terminal_score(true, ply)));
            }
            order_captures(board, &mut evasions);
            return self.quiescence_moves(board, evasions, -INFINITY, alpha, beta, ply, qply, false);
        }

        let stand_pat = self.scorer.score(board);
        if stand_pat >= beta || qply >= QUIESCENCE_MAX_PLY {
            return Ok(Some(stand_pat));
        }
        alpha = alpha.max(stand_pat);

        let mut captures = generate_pseudolegal_captures(board, side);
        order_captures(board, &mut captures);
        self.quiescence_moves(board, captures, stand_pat, alpha, beta, ply, qply, true)
    }

    #[allow(clippy::too_many_arguments)]
    fn quiescence_moves(
        &mut self,
        board: &mut Board,
        moves: Vec<Move>,
        mut best: i32,
        mut alpha: i32,
        beta: i32,
        ply: u8,
        qply: u8,
        check_legality: bool,
    ) -> ChessResult<Option<i32>> {
        let side = board.current_turn();
        for mv in moves {
            if !board.make_move(mv.from, mv.to, false, true) {
                continue;
            }
            if check_legality && board.is_in_check(side) {
                undo(board, qply)?;
                continue;
            }
            let child = self.quiescence(board, -beta, -alpha, ply.saturating_add(1), qply + 1);
            undo(board, qply)?;
            let Some(score) = child? else {
                return Ok(None);
            };
            let score = -score;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(Some(best))
    }

    #[allow(clippy::too_many_arguments)]
    fn store(
        &mut self,
        key: u64,
        depth: u8,
        score: i32,
        alpha_orig: i32,
        beta: i32,
        best_move: Option<Move>,
        ply: u8,
    ) {
        let bound = Bound::classify(score, alpha_orig, beta);
        self.tt
            .store(TTEntry::new(key, depth, score, ply, bound, best_move));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::{MaterialScorer, TaperedEvaluator};
    use crate::utils::coordinates::parse_move_text;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("FEN should parse")
    }

    /// Unpruned negamax with the same leaf and terminal conventions.
    fn minimax<S: BoardScorer>(board: &mut Board, scorer: &S, depth: u8, ply: u8) -> i32 {
        let side = board.current_turn();
        let moves = board.generate_legal_moves(side);
        if moves.is_empty() {
            return terminal_score(board.is_in_check(side), ply);
        }
        if depth == 0 {
            return scorer.score(board);
        }
        let mut best = -INFINITY;
        for mv in moves {
            if !board.make_move(mv.from, mv.to, false, true) {
                continue;
            }
            best = best.max(-minimax(board, scorer, depth - 1, ply + 1));
            board.unmake_move(true);
        }
        best
    }

    #[test]
    fn depth_zero_reports_static_eval() {
        let mut game = Board::new_game();
        let report = search_with_fresh_tables(&mut game, &MaterialScorer, &SearchConfig::exhaustive(0))
            .expect("search should run");
        assert_eq!(report.best_move, None);
        assert_eq!(report.best_score, 0);
        assert_eq!(report.reached_depth, 0);
    }

    #[test]
    fn exhaustive_search_matches_minimax() {
        for fen in [
            "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
            "r3k3/8/8/8/8/8/1q6/R3K2R w KQ - 0 1",
            "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
        ] {
            let mut position = board(fen);
            let expected = minimax(&mut position, &MaterialScorer, 3, 0);
            let report =
                search_with_fresh_tables(&mut position, &MaterialScorer, &SearchConfig::exhaustive(3))
                    .expect("search should run");
            assert_eq!(report.best_score, expected, "{fen}");
        }
    }

    #[test]
    fn table_and_aspiration_keep_minimax_value() {
        let scorer = TaperedEvaluator::new(Color::White);
        for fen in [
            "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
            "r3k3/8/8/8/8/8/1q6/R3K2R w KQ - 0 1",
            "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ] {
            let mut tt = TranspositionTable::new_with_mb(1);
            let mut heuristics = SearchHeuristics::default();
            for depth in 1..=3 {
                let mut position = board(fen);
                let expected = minimax(&mut position, &scorer, depth, 0);
                let config = SearchConfig {
                    max_depth: depth,
                    movetime_ms: None,
                    use_null_move: false,
                    use_lmr: false,
                    use_aspiration: true,
                    use_tt: true,
                    quiescence: false,
                };
                tt.clear();
                let report =
                    iterative_deepening_search(&mut position, &scorer, &config, &mut tt, &mut heuristics)
                        .expect("search should run");
                assert_eq!(report.best_score, expected, "{fen} at depth {depth}");
            }
        }
    }

    #[test]
    fn prefers_free_rook_capture() {
        let mut game = board("k7/8/8/8/3r4/8/8/K2Q4 w - - 0 1");
        let report = search_with_fresh_tables(&mut game, &MaterialScorer, &SearchConfig::exhaustive(1))
            .expect("search should run");
        assert_eq!(report.best_move, Some(parse_move_text("d1d4").expect("move")));
    }

    #[test]
    fn search_finds_mate_in_one() {
        let mut game = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let report = search_with_fresh_tables(
            &mut game,
            &TaperedEvaluator::new(Color::White),
            &SearchConfig {
                max_depth: 3,
                ..SearchConfig::default()
            },
        )
        .expect("search should run");

        let best = report.best_move.expect("best move should exist");
        assert_eq!(best, parse_move_text("a1a8").expect("move"));
        assert!(
            report.best_score > 29000,
            "mate score should dominate material, got {}",
            report.best_score
        );
        assert!(game.make_move(best.from, best.to, true, true));
        assert!(game.is_checkmate(Color::Black));
    }

    #[test]
    fn depth_one_from_opening_returns_a_move_and_restores_board() {
        let mut game = Board::new_game();
        let before = game.snapshot();
        let report = search_with_fresh_tables(
            &mut game,
            &TaperedEvaluator::new(Color::White),
            &SearchConfig {
                max_depth: 1,
                ..SearchConfig::default()
            },
        )
        .expect("search should run");
        assert!(report.best_move.is_some());
        assert_eq!(game.snapshot(), before);
        assert!(game.move_history().is_empty());
    }

    #[test]
    fn expired_deadline_still_returns_depth_one_move() {
        let mut game = Board::new_game();
        let report = search_with_fresh_tables(
            &mut game,
            &TaperedEvaluator::new(Color::White),
            &SearchConfig {
                max_depth: 30,
                movetime_ms: Some(1),
                ..SearchConfig::default()
            },
        )
        .expect("search should run");
        assert!(report.best_move.is_some());
        assert!(report.reached_depth >= 1 && report.reached_depth < 30);
        assert_eq!(game.snapshot(), Board::new_game().snapshot());
    }

    #[test]
    fn no_legal_moves_returns_none() {
        let mut mated = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        let report = search_with_fresh_tables(&mut mated, &MaterialScorer, &SearchConfig::default())
            .expect("search should run");
        assert_eq!(report.best_move, None);
        assert_eq!(report.best_score, -MATE_SCORE);
    }

    #[test]
    fn quiescence_sees_recapture() {
        // Qxd5 grabs a pawn and loses the queen to exd5.
        let mut game = board("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1");
        let report = search_with_fresh_tables(
            &mut game,
            &MaterialScorer,
            &SearchConfig {
                max_depth: 1,
                ..SearchConfig::default()
            },
        )
        .expect("search should run");
        assert_ne!(report.best_move, Some(parse_move_text("d1d5").expect("move")));
    }
}
