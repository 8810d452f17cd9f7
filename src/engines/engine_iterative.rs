//! Iterative-deepening search engine.
//!
//! Wraps the negamax search with the tapered evaluator and keeps the
//! transposition table and ordering heuristics alive across moves of a game.
//!
//! Options (case-insensitive names):
//! - `Depth`: search depth ceiling (1..=64).
//! - `MoveTime`: per-move budget in milliseconds, `0` for unlimited.
//! - `Hash`: transposition table size in MB (reallocates).
//! - `Color`: side the engine plays, `white` or `black`.
//! - `Difficulty`: `easy`, `medium` or `hard`; resets depth and move time.

use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{parse_option, Engine, EngineOutput};
use crate::game_state::chess_types::{Board, Color, Move};
use crate::search::board_scoring::TaperedEvaluator;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchReport};
use crate::search::move_ordering::{SearchHeuristics, MAX_PLY};
use crate::search::transposition_table::TranspositionTable;

pub const DEFAULT_HASH_MB: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    pub const fn movetime_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 500,
            Difficulty::Medium => 2_000,
            Difficulty::Hard => 5_000,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ChessError::InvalidOptionValue {
                name: "Difficulty".to_owned(),
                value: s.to_owned(),
            }),
        }
    }
}

pub struct IterativeEngine {
    config: SearchConfig,
    difficulty: Difficulty,
    color: Color,
    tt: TranspositionTable,
    heuristics: SearchHeuristics,
    hash_mb: usize,
}

impl IterativeEngine {
    pub fn new(difficulty: Difficulty, color: Color) -> Self {
        Self {
            config: SearchConfig {
                max_depth: difficulty.depth(),
                movetime_ms: Some(difficulty.movetime_ms()),
                ..SearchConfig::default()
            },
            difficulty,
            color,
            tt: TranspositionTable::new_with_mb(DEFAULT_HASH_MB),
            heuristics: SearchHeuristics::default(),
            hash_mb: DEFAULT_HASH_MB,
        }
    }

    /// Engine with an explicit search configuration, e.g. a fixed depth with no clock.
    pub fn with_config(config: SearchConfig, color: Color) -> Self {
        Self {
            config,
            ..Self::new(Difficulty::default(), color)
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.config.max_depth = difficulty.depth();
        self.config.movetime_ms = Some(difficulty.movetime_ms());
    }

    /// Best move for the side to move, or `None` when it has no legal move.
    ///
    /// The caller decides between checkmate and stalemate.
    pub fn get_move(&mut self, board: &mut Board) -> Option<Move> {
        match self.search(board) {
            Ok(report) => report.best_move,
            Err(err) => {
                warn!(%err, "search failed; no move returned");
                None
            }
        }
    }

    /// Search a private copy so the caller's board is never touched.
    pub fn analyze(&mut self, board: &Board) -> ChessResult<SearchReport> {
        let mut scratch = board.clone();
        self.search(&mut scratch)
    }

    fn search(&mut self, board: &mut Board) -> ChessResult<SearchReport> {
        board.validate_kings()?;
        let scorer = TaperedEvaluator::new(self.color);
        let report = iterative_deepening_search(
            board,
            &scorer,
            &self.config,
            &mut self.tt,
            &mut self.heuristics,
        )?;
        info!(
            engine_color = %self.color,
            side_to_move = %board.current_turn(),
            difficulty = %self.difficulty,
            best = ?report.best_move.map(|m| m.to_string()),
            score = report.best_score,
            depth = report.reached_depth,
            "engine chose move"
        );
        Ok(report)
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(Difficulty::default(), Color::Black)
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "Pawnstorm Iterative"
    }

    fn new_game(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Depth") {
            let depth: u8 = parse_option(name, value)?;
            self.config.max_depth = depth.clamp(1, MAX_PLY as u8);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("MoveTime") {
            let ms: u64 = parse_option(name, value)?;
            self.config.movetime_ms = (ms > 0).then_some(ms);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            let mb: usize = parse_option(name, value)?;
            self.hash_mb = mb.max(1);
            self.tt.resize_mb(self.hash_mb);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Color") {
            self.color = match value.trim().to_ascii_lowercase().as_str() {
                "white" | "w" => Color::White,
                "black" | "b" => Color::Black,
                _ => {
                    return Err(ChessError::InvalidOptionValue {
                        name: name.to_owned(),
                        value: value.to_owned(),
                    })
                }
            };
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Difficulty") {
            self.set_difficulty(value.parse()?);
            return Ok(());
        }
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, board: &mut Board) -> ChessResult<EngineOutput> {
        let report = self.search(board)?;

        let mut out = EngineOutput {
            best_move: report.best_move,
            score: Some(report.best_score),
            depth: report.reached_depth,
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {} hashfull {}",
            report.reached_depth,
            report.best_score,
            report.nodes,
            report.elapsed_ms,
            self.tt.hashfull()
        ));
        out.info_lines.push(format!(
            "info string tt probes {} hits {} stores {} hash_mb {}",
            report.tt_stats.probes, report.tt_stats.hits, report.tt_stats.stores, self.hash_mb
        ));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::coordinates::parse_move_text;

    fn fixed_depth(depth: u8, color: Color) -> IterativeEngine {
        IterativeEngine::with_config(
            SearchConfig {
                max_depth: depth,
                movetime_ms: None,
                ..SearchConfig::default()
            },
            color,
        )
    }

    #[test]
    fn difficulty_presets_match_depths() {
        assert_eq!(Difficulty::Easy.depth(), 2);
        assert_eq!(Difficulty::Medium.depth(), 3);
        assert_eq!(Difficulty::Hard.depth(), 4);
        assert_eq!("HARD".parse::<Difficulty>().expect("parse"), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn get_move_returns_move_at_opening() {
        let mut board = Board::new_game();
        let mut engine = fixed_depth(2, Color::White);
        let mv = engine.get_move(&mut board).expect("opening has moves");
        assert!(board.legal_moves().contains(&mv));
        assert!(board.move_history().is_empty());
    }

    #[test]
    fn get_move_none_when_no_legal_moves() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
        let mut engine = fixed_depth(3, Color::Black);
        assert_eq!(engine.get_move(&mut board), None);
    }

    #[test]
    fn engine_plays_mate_in_one_as_black() {
        let mut board = Board::from_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").expect("FEN");
        let mut engine = fixed_depth(3, Color::Black);
        let out = engine.choose_move(&mut board).expect("search");
        assert_eq!(out.best_move, Some(parse_move_text("a8a1").expect("move")));
        assert!(out.score.is_some_and(|s| s > 20_000));
        assert_eq!(out.info_lines.len(), 2);
    }

    #[test]
    fn analyze_leaves_board_untouched() {
        let board = Board::new_game();
        let before = board.snapshot();
        let mut engine = fixed_depth(2, Color::White);
        let report = engine.analyze(&board).expect("analysis");
        assert!(report.best_move.is_some());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn options_are_applied_and_validated() {
        let mut engine = IterativeEngine::default();
        engine.set_option("depth", "5").expect("depth");
        assert_eq!(engine.config().max_depth, 5);
        engine.set_option("MoveTime", "0").expect("movetime");
        assert_eq!(engine.config().movetime_ms, None);
        engine.set_option("Hash", "1").expect("hash");
        engine.set_option("Color", "white").expect("color");
        assert_eq!(engine.color(), Color::White);
        engine.set_option("Difficulty", "easy").expect("difficulty");
        assert_eq!(engine.config().max_depth, 2);
        assert_eq!(engine.config().movetime_ms, Some(500));

        assert!(matches!(
            engine.set_option("Depth", "deep"),
            Err(ChessError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Color", "green"),
            Err(ChessError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Ponder", "true"),
            Err(ChessError::UnknownOption(_))
        ));
    }

    #[test]
    fn missing_king_is_reported() {
        let mut board = Board::empty();
        let mut engine = fixed_depth(1, Color::White);
        assert!(matches!(
            engine.choose_move(&mut board),
            Err(ChessError::MissingKing(_))
        ));
    }
}
