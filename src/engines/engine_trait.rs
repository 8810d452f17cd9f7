//! Engine abstraction layer.
//!
//! Defines the output payload and option surface so different move-choosing
//! strategies can be swapped behind a single trait interface.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Board, Move};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    /// Centipawns from the side to move; `None` for engines that do not score.
    pub score: Option<i32>,
    pub depth: u8,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> ChessResult<()> {
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    /// Choose a move for the side to move. The board is returned unchanged.
    fn choose_move(&mut self, board: &mut Board) -> ChessResult<EngineOutput>;
}

/// Parse a string option value, mapping failures to `InvalidOptionValue`.
pub(crate) fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ChessError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}
