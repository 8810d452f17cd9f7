//! Errors used throughout the engine.
//!
//! Two families live here. `IllegalMove` explains why a board rejected a move
//! attempt; it is an ordinary, frequent outcome (UI probing) and the board's
//! boolean `make_move` simply discards it. `ChessError` covers input parsing
//! and structural invariant violations, which callers should surface.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Square};

/// Reason a validated move attempt was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("piece on {square} belongs to {color}, but it is {turn}'s turn")]
    WrongTurn {
        square: Square,
        color: Color,
        turn: Color,
    },

    #[error("target square is off the board")]
    OutOfBounds,

    #[error("kings cannot be captured ({0})")]
    TargetsKing(Square),

    #[error("{0} is occupied by a piece of the same color")]
    OwnPiece(Square),

    #[error("the piece on {from} cannot reach {to}")]
    BadGeometry { from: Square, to: Square },

    #[error("moving {from}{to} would leave the king in check")]
    LeavesKingInCheck { from: Square, to: Square },
}

/// Unified error type for parsing and invariant failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A FEN string was malformed.
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Square or move text such as `e2e4` could not be parsed.
    #[error("invalid coordinate text '{0}'")]
    InvalidCoordinate(String),

    #[error(transparent)]
    Illegal(#[from] IllegalMove),

    /// A side has no king. No legal sequence of moves can produce this.
    #[error("{0} king is missing from the board")]
    MissingKing(Color),

    /// `unmake_move` found no record to pop while search still had a move open.
    #[error("undo history is empty while a move is still open (depth {depth})")]
    UndoStackUnderflow { depth: u8 },

    #[error("engine '{0}' returned no move while legal moves exist")]
    EngineReturnedNoMove(String),

    #[error("unknown engine option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },
}

/// Result type alias for engine operations.
pub type ChessResult<T> = Result<T, ChessError>;
