//! Ray helpers shared by bishops, rooks, and queens.

use crate::game_state::chess_types::*;

pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Unit step from `from` toward `to` when they share a line of the requested kind.
#[inline]
pub fn line_step(from: Square, to: Square, diagonal: bool) -> Option<(i8, i8)> {
    let d_row = i32::from(to.row) - i32::from(from.row);
    let d_col = i32::from(to.col) - i32::from(from.col);
    if d_row == 0 && d_col == 0 {
        return None;
    }
    let on_line = if diagonal {
        d_row.abs() == d_col.abs()
    } else {
        d_row == 0 || d_col == 0
    };
    on_line.then(|| (d_row.signum() as i8, d_col.signum() as i8))
}

/// True when every square strictly between `from` and `to` along `step` is empty.
pub fn path_is_clear(board: &Board, from: Square, to: Square, step: (i8, i8)) -> bool {
    let mut current = from;
    loop {
        let Some(next) = current.offset(step.0, step.1) else {
            return false;
        };
        if next == to {
            return true;
        }
        if board.piece_at(next).is_some() {
            return false;
        }
        current = next;
    }
}

/// Slider reach test: on the requested line kind, nothing in between.
#[inline]
pub fn slides_to(board: &Board, from: Square, to: Square, diagonal: bool) -> bool {
    line_step(from, to, diagonal).is_some_and(|step| path_is_clear(board, from, to, step))
}

/// Cast rays from `from`, stopping at the first blocker and including it when
/// it is an enemy non-king piece.
pub fn push_ray_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut current = from;
        while let Some(next) = current.offset(d_row, d_col) {
            match board.piece_at(next) {
                None => out.push(Move::new(from, next)),
                Some(target) => {
                    if target.color != color && target.kind != PieceKind::King {
                        out.push(Move::new(from, next));
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

/// Count of ray destinations, used by the evaluator's mobility term.
pub fn count_ray_moves(board: &Board, from: Square, color: Color, directions: &[(i8, i8)]) -> i32 {
    let mut count = 0;
    for &(d_row, d_col) in directions {
        let mut current = from;
        while let Some(next) = current.offset(d_row, d_col) {
            match board.piece_at(next) {
                None => count += 1,
                Some(target) => {
                    if target.color != color {
                        count += 1;
                    }
                    break;
                }
            }
            current = next;
        }
    }
    count
}

/// Whether `target` may be taken by a piece of `color` in move generation.
#[inline]
pub fn is_capturable_or_empty(target: Option<Piece>, color: Color) -> bool {
    match target {
        None => true,
        Some(p) => p.color != color && p.kind != PieceKind::King,
    }
}
