use crate::game_state::chess_types::*;

/// Rook relocation performed alongside a castling king move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RookShift {
    pub from: Square,
    pub to: Square,
    pub prev_has_moved: bool,
}

/// Single undo record for `make_move` / `unmake_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    /// The moving piece exactly as it stood before the move (a pawn, even when promoted).
    pub moved_piece: Piece,
    pub captured_piece: Option<Piece>,
    pub from: Square,
    pub to: Square,
    pub prev_has_moved: bool,
    pub castling: Option<RookShift>,
    pub promotion: bool,

    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
    pub prev_zobrist_key: u64,
}
