//! Pawn geometry: pushes onto empty squares, captures on the forward diagonals.
//! En passant is not modeled.

use crate::game_state::chess_types::*;
use crate::moves::sliding::is_capturable_or_empty;

/// Geometric legality of a pawn move (ignores king safety).
pub fn pawn_can_move(board: &Board, pawn: Piece, from: Square, to: Square) -> bool {
    let dir = i32::from(pawn.color.pawn_direction());
    let forward = i32::from(to.row) - i32::from(from.row);
    let side = i32::from(to.col) - i32::from(from.col);

    if side == 0 {
        if forward == dir {
            return board.piece_at(to).is_none();
        }
        if forward == 2 * dir && !pawn.has_moved {
            let Some(middle) = from.offset(dir as i8, 0) else {
                return false;
            };
            return board.piece_at(middle).is_none() && board.piece_at(to).is_none();
        }
        return false;
    }

    side.abs() == 1
        && forward == dir
        && board.piece_at(to).is_some_and(|target| target.color != pawn.color)
}

/// Whether a pawn of `color` on `from` attacks `target`, occupied or not.
#[inline]
pub fn pawn_attacks(color: Color, from: Square, target: Square) -> bool {
    let forward = i32::from(target.row) - i32::from(from.row);
    let side = i32::from(target.col) - i32::from(from.col);
    forward == i32::from(color.pawn_direction()) && side.abs() == 1
}

pub fn push_pawn_moves(board: &Board, pawn: Piece, from: Square, out: &mut Vec<Move>) {
    let dir = pawn.color.pawn_direction();

    if let Some(one) = from.offset(dir, 0) {
        if board.piece_at(one).is_none() {
            out.push(Move::new(from, one));
            if !pawn.has_moved {
                if let Some(two) = one.offset(dir, 0) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    push_pawn_captures(board, pawn, from, out);
}

/// Diagonal captures only; quiescence search builds on this.
pub fn push_pawn_captures(board: &Board, pawn: Piece, from: Square, out: &mut Vec<Move>) {
    let dir = pawn.color.pawn_direction();
    for side in [-1i8, 1] {
        let Some(target_sq) = from.offset(dir, side) else {
            continue;
        };
        let target = board.piece_at(target_sq);
        if target.is_some() && is_capturable_or_empty(target, pawn.color) {
            out.push(Move::new(from, target_sq));
        }
    }
}
