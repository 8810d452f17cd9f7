//! Attack, check, and terminal-position queries.

use crate::game_state::chess_types::*;
use crate::moves::piece_moves::attacks;

/// True when any `attacker_color` piece attacks `square`.
///
/// Pawns count their diagonals only; occupancy of `square` is irrelevant.
pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    board
        .pieces_of(attacker_color)
        .any(|(from, piece)| from != square && attacks(board, piece, from, square))
}

/// Every `attacker_color` piece attacking `square`, in scan order.
pub fn attackers_to_square(board: &Board, square: Square, attacker_color: Color) -> Vec<(Square, PieceKind)> {
    board
        .pieces_of(attacker_color)
        .filter(|(from, piece)| *from != square && attacks(board, *piece, *from, square))
        .map(|(from, piece)| (from, piece.kind))
        .collect()
}

#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.king_square(color) else {
        board.warn_missing_king(color);
        return true;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

fn has_legal_move(board: &mut Board, color: Color) -> bool {
    let pseudo = board.generate_pseudolegal_moves(color);
    pseudo.into_iter().any(|mv| !board.would_be_in_check(color, mv))
}

/// In check with no legal reply.
pub fn is_checkmate(board: &mut Board, color: Color) -> bool {
    is_in_check(board, color) && !has_legal_move(board, color)
}

/// `color` is to move, not in check, and has no legal move.
pub fn is_stalemate(board: &mut Board, color: Color) -> bool {
    board.current_turn() == color && !is_in_check(board, color) && !has_legal_move(board, color)
}

/// Status from the side to move's point of view.
pub fn position_outcome(board: &mut Board) -> GameOutcome {
    let color = board.current_turn();
    if has_legal_move(board, color) {
        return GameOutcome::InProgress;
    }
    if is_in_check(board, color) {
        GameOutcome::Checkmate {
            winner: color.opposite(),
        }
    } else {
        GameOutcome::Stalemate
    }
}
