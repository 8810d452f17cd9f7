use crate::game_state::chess_types::*;
use crate::moves::sliding::is_capturable_or_empty;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[inline]
pub fn knight_attacks(from: Square, target: Square) -> bool {
    let d_row = (i32::from(target.row) - i32::from(from.row)).abs();
    let d_col = (i32::from(target.col) - i32::from(from.col)).abs();
    matches!((d_row, d_col), (1, 2) | (2, 1))
}

pub fn push_knight_moves(board: &Board, knight: Piece, from: Square, out: &mut Vec<Move>) {
    for (d_row, d_col) in KNIGHT_OFFSETS {
        if let Some(to) = from.offset(d_row, d_col) {
            if is_capturable_or_empty(board.piece_at(to), knight.color) {
                out.push(Move::new(from, to));
            }
        }
    }
}

pub fn count_knight_moves(board: &Board, knight: Piece, from: Square) -> i32 {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| from.offset(d_row, d_col))
        .filter(|&to| board.piece_at(to).map_or(true, |p| p.color != knight.color))
        .count() as i32
}
