//! Single dispatch point over [`PieceKind`] for geometry, attacks, and
//! destination generation.

use crate::game_state::chess_types::*;
use crate::moves::king_moves::{king_attacks, king_can_move, push_king_moves, KING_OFFSETS};
use crate::moves::knight_moves::{count_knight_moves, knight_attacks, push_knight_moves};
use crate::moves::pawn_moves::{pawn_attacks, pawn_can_move, push_pawn_captures, push_pawn_moves};
use crate::moves::sliding::{
    count_ray_moves, push_ray_moves, slides_to, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS,
};

const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Geometric legality of moving `piece` from `from` to `to`.
///
/// Refuses same-color targets. Does not consider whether the mover's king is
/// left in check, and does not refuse king targets (the board does that).
pub fn is_valid_move(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    if from == to {
        return false;
    }
    if board.piece_at(to).is_some_and(|t| t.color == piece.color) {
        return false;
    }
    match piece.kind {
        PieceKind::Pawn => pawn_can_move(board, piece, from, to),
        PieceKind::Knight => knight_attacks(from, to),
        PieceKind::Bishop => slides_to(board, from, to, true),
        PieceKind::Rook => slides_to(board, from, to, false),
        PieceKind::Queen => slides_to(board, from, to, true) || slides_to(board, from, to, false),
        PieceKind::King => king_can_move(board, piece, from, to),
    }
}

/// Whether `piece` standing on `from` attacks `target`, regardless of what
/// occupies `target`.
pub fn attacks(board: &Board, piece: Piece, from: Square, target: Square) -> bool {
    if from == target {
        return false;
    }
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(piece.color, from, target),
        PieceKind::Knight => knight_attacks(from, target),
        PieceKind::Bishop => slides_to(board, from, target, true),
        PieceKind::Rook => slides_to(board, from, target, false),
        PieceKind::Queen => {
            slides_to(board, from, target, true) || slides_to(board, from, target, false)
        }
        PieceKind::King => king_attacks(from, target),
    }
}

/// Append the pseudolegal destinations of `piece` on `from`.
pub fn push_piece_moves(board: &Board, piece: Piece, from: Square, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => push_pawn_moves(board, piece, from, out),
        PieceKind::Knight => push_knight_moves(board, piece, from, out),
        PieceKind::Bishop => push_ray_moves(board, from, piece.color, &DIAGONAL_DIRECTIONS, out),
        PieceKind::Rook => push_ray_moves(board, from, piece.color, &ORTHOGONAL_DIRECTIONS, out),
        PieceKind::Queen => push_ray_moves(board, from, piece.color, &ALL_DIRECTIONS, out),
        PieceKind::King => push_king_moves(board, piece, from, out),
    }
}

/// Append only the captures of `piece` on `from` (no castling, no pushes).
pub fn push_piece_captures(board: &Board, piece: Piece, from: Square, out: &mut Vec<Move>) {
    if piece.kind == PieceKind::Pawn {
        push_pawn_captures(board, piece, from, out);
        return;
    }
    let start = out.len();
    if piece.kind == PieceKind::King {
        out.extend(
            KING_OFFSETS
                .iter()
                .filter_map(|&(d_row, d_col)| from.offset(d_row, d_col))
                .map(|to| Move::new(from, to)),
        );
    } else {
        push_piece_moves(board, piece, from, out);
    }
    let generated = out.split_off(start);
    out.extend(generated.into_iter().filter(|mv| {
        board
            .piece_at(mv.to)
            .is_some_and(|t| t.color != piece.color && t.kind != PieceKind::King)
    }));
}

/// Destination count for the mobility term (sliders and knights only).
pub fn mobility(board: &Board, piece: Piece, from: Square) -> i32 {
    match piece.kind {
        PieceKind::Knight => count_knight_moves(board, piece, from),
        PieceKind::Bishop => count_ray_moves(board, from, piece.color, &DIAGONAL_DIRECTIONS),
        PieceKind::Rook => count_ray_moves(board, from, piece.color, &ORTHOGONAL_DIRECTIONS),
        PieceKind::Queen => count_ray_moves(board, from, piece.color, &ALL_DIRECTIONS),
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_combines_rook_and_bishop_geometry() {
        let board = Board::from_fen("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let from = Square::new(4, 3);
        let queen = board.piece_at(from).expect("queen");
        assert!(is_valid_move(&board, queen, from, Square::new(0, 3)));
        assert!(is_valid_move(&board, queen, from, Square::new(1, 6)));
        assert!(!is_valid_move(&board, queen, from, Square::new(2, 4)));
        assert_eq!(mobility(&board, queen, from), 27);
    }

    #[test]
    fn own_pieces_are_never_valid_targets() {
        let board = Board::new_game();
        let from = Square::new(7, 0);
        let rook = board.piece_at(from).expect("a1 rook");
        assert!(!is_valid_move(&board, rook, from, Square::new(6, 0)));
        assert!(attacks(&board, rook, from, Square::new(6, 0)));
    }

    #[test]
    fn capture_generation_keeps_only_enemy_targets() {
        let board =
            Board::from_fen("4k3/8/3p4/8/4N3/8/3P4/4K3 w - - 0 1").expect("FEN should parse");
        let from = Square::new(4, 4);
        let knight = board.piece_at(from).expect("e4 knight");
        let mut captures = Vec::new();
        push_piece_captures(&board, knight, from, &mut captures);
        assert_eq!(captures, vec![Move::new(from, Square::new(2, 3))]);
    }
}
