//! Random-move engine.
//!
//! Selects uniformly from legal moves and is used as a sparring partner in
//! match tests and as the lowest-strength opponent.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{parse_option, Engine, EngineOutput};
use crate::game_state::chess_types::Board;

pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible move choice for tests and seeded matches.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Pawnstorm Random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("Seed") {
            self.rng = StdRng::seed_from_u64(parse_option(name, value)?);
            return Ok(());
        }
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    fn choose_move(&mut self, board: &mut Board) -> ChessResult<EngineOutput> {
        let legal_moves = board.legal_moves();

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        out.best_move = legal_moves.choose(&mut self.rng).copied();
        debug!(
            legal_moves = legal_moves.len(),
            picked = ?out.best_move.map(|m| m.to_string()),
            "random engine move"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_engine_picks_a_legal_move() {
        let mut board = Board::new_game();
        let mut engine = RandomEngine::with_seed(7);
        let legal = board.legal_moves();
        for _ in 0..10 {
            let out = engine.choose_move(&mut board).expect("choose should succeed");
            let mv = out.best_move.expect("opening has moves");
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn same_seed_same_choice() {
        let mut board = Board::new_game();
        let a = RandomEngine::with_seed(42).choose_move(&mut board).expect("choose");
        let b = RandomEngine::with_seed(42).choose_move(&mut board).expect("choose");
        assert_eq!(a.best_move, b.best_move);
    }

    #[test]
    fn no_move_when_mated() {
        let mut board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN");
        let out = RandomEngine::with_seed(1).choose_move(&mut board).expect("choose");
        assert_eq!(out.best_move, None);
    }

    #[test]
    fn seed_option_parses() {
        let mut engine = RandomEngine::with_seed(0);
        assert!(engine.set_option("seed", "99").is_ok());
        assert!(matches!(
            engine.set_option("Seed", "abc"),
            Err(ChessError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Hash", "16"),
            Err(ChessError::UnknownOption(_))
        ));
    }
}
