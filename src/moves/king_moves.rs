//! King geometry including castling.
//!
//! Castling is available only while the king and the chosen corner rook have
//! never moved, every square between them is empty, and the king is not in
//! check, does not cross an attacked square, and does not land on one.

use crate::game_state::chess_rules::{CastleSide, KING_START_COL};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::sliding::is_capturable_or_empty;

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[inline]
pub fn king_attacks(from: Square, target: Square) -> bool {
    let d_row = (i32::from(target.row) - i32::from(from.row)).abs();
    let d_col = (i32::from(target.col) - i32::from(from.col)).abs();
    d_row.max(d_col) == 1
}

pub fn king_can_move(board: &Board, king: Piece, from: Square, to: Square) -> bool {
    if king_attacks(from, to) {
        return board.piece_at(to).map_or(true, |p| p.color != king.color);
    }
    if from.row != to.row || (i32::from(to.col) - i32::from(from.col)).abs() != 2 {
        return false;
    }
    CastleSide::from_king_target(to.col).is_some_and(|side| can_castle(board, king, from, side))
}

/// Full castling precondition check for the king standing on `from`.
pub fn can_castle(board: &Board, king: Piece, from: Square, side: CastleSide) -> bool {
    let row = king.color.back_rank();
    if king.has_moved || from != Square::new(row, KING_START_COL) {
        return false;
    }

    let rook_ready = board
        .piece_at(Square::new(row, side.rook_from()))
        .is_some_and(|r| r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved);
    if !rook_ready {
        return false;
    }

    if side
        .between_cols()
        .iter()
        .any(|&col| board.piece_at(Square::new(row, col)).is_some())
    {
        return false;
    }

    let enemy = king.color.opposite();
    [KING_START_COL, side.transit_col(), side.king_to()]
        .iter()
        .all(|&col| !is_square_attacked(board, Square::new(row, col), enemy))
}

pub fn push_king_moves(board: &Board, king: Piece, from: Square, out: &mut Vec<Move>) {
    for (d_row, d_col) in KING_OFFSETS {
        if let Some(to) = from.offset(d_row, d_col) {
            if is_capturable_or_empty(board.piece_at(to), king.color) {
                out.push(Move::new(from, to));
            }
        }
    }

    for side in CastleSide::BOTH {
        if can_castle(board, king, from, side) {
            out.push(Move::new(from, Square::new(from.row, side.king_to())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_blocked_by_attacked_transit_square() {
        // Black rook on f8 covers f1.
        let board =
            Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN should parse");
        let from = Square::new(7, 4);
        let king = board.piece_at(from).expect("white king");
        assert!(!can_castle(&board, king, from, CastleSide::King));
        assert!(can_castle(&board, king, from, CastleSide::Queen));
    }

    #[test]
    fn castling_requires_unmoved_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w K - 0 1").expect("FEN should parse");
        let from = Square::new(7, 4);
        let king = board.piece_at(from).expect("white king");
        assert!(king_can_move(&board, king, from, Square::new(7, 6)));
        assert!(!king_can_move(&board, king, from, Square::new(7, 2)));
    }

    #[test]
    fn castling_refused_while_in_check() {
        let board =
            Board::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").expect("FEN should parse");
        let from = Square::new(7, 4);
        let king = board.piece_at(from).expect("white king");
        let mut out = Vec::new();
        push_king_moves(&board, king, from, &mut out);
        assert!(out.iter().all(|m| (i32::from(m.to.col) - 4).abs() <= 1));
    }
}
