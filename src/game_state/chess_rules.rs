//! Canonical chess-rule constants.
//!
//! Starting position plus the fixed castling geometry shared by move
//! application, move generation, and the hasher's castling-rights inference.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Column both kings start on.
pub const KING_START_COL: u8 = 4;

/// King-side castling: king lands here, rook moves `KINGSIDE_ROOK_FROM -> KINGSIDE_ROOK_TO`.
pub const KINGSIDE_KING_TO: u8 = 6;
pub const KINGSIDE_ROOK_FROM: u8 = 7;
pub const KINGSIDE_ROOK_TO: u8 = 5;

/// Queen-side castling: king lands here, rook moves `QUEENSIDE_ROOK_FROM -> QUEENSIDE_ROOK_TO`.
pub const QUEENSIDE_KING_TO: u8 = 2;
pub const QUEENSIDE_ROOK_FROM: u8 = 0;
pub const QUEENSIDE_ROOK_TO: u8 = 3;

/// Which castling a king move two columns sideways performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    pub const fn from_king_target(col: u8) -> Option<Self> {
        match col {
            KINGSIDE_KING_TO => Some(CastleSide::King),
            QUEENSIDE_KING_TO => Some(CastleSide::Queen),
            _ => None,
        }
    }

    pub const fn king_to(self) -> u8 {
        match self {
            CastleSide::King => KINGSIDE_KING_TO,
            CastleSide::Queen => QUEENSIDE_KING_TO,
        }
    }

    pub const fn rook_from(self) -> u8 {
        match self {
            CastleSide::King => KINGSIDE_ROOK_FROM,
            CastleSide::Queen => QUEENSIDE_ROOK_FROM,
        }
    }

    pub const fn rook_to(self) -> u8 {
        match self {
            CastleSide::King => KINGSIDE_ROOK_TO,
            CastleSide::Queen => QUEENSIDE_ROOK_TO,
        }
    }

    /// Columns strictly between king and rook; all must be empty.
    pub const fn between_cols(self) -> &'static [u8] {
        match self {
            CastleSide::King => &[5, 6],
            CastleSide::Queen => &[1, 2, 3],
        }
    }

    /// Column the king crosses on its way; it must not be attacked.
    pub const fn transit_col(self) -> u8 {
        self.rook_to()
    }
}
