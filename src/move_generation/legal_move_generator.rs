//! Pseudo-legal generation plus the make/test/unmake legality filter.
//!
//! Pseudo-legal moves obey piece geometry and never target a king, but may
//! leave the mover in check. Legal moves are the subset that survive a probe:
//! apply without validation or turn switch, test the mover's king, reverse.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::moves::piece_moves::{push_piece_captures, push_piece_moves};

pub fn generate_pseudolegal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::<Move>::with_capacity(64);
    for (from, piece) in board.pieces_of(color) {
        push_piece_moves(board, piece, from, &mut moves);
    }
    moves
}

/// Pseudo-legal captures of non-king enemy pieces (quiescence input).
pub fn generate_pseudolegal_captures(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::<Move>::with_capacity(16);
    for (from, piece) in board.pieces_of(color) {
        push_piece_captures(board, piece, from, &mut moves);
    }
    moves
}

/// Apply `mv` silently and report whether `color`'s king is then attacked.
pub fn would_be_in_check(board: &mut Board, color: Color, mv: Move) -> bool {
    if !board.make_move(mv.from, mv.to, false, false) {
        return true;
    }
    let in_check = is_in_check(board, color);
    board.unmake_move(false);
    in_check
}

pub fn generate_legal_moves(board: &mut Board, color: Color) -> Vec<Move> {
    let mut moves = generate_pseudolegal_moves(board, color);
    moves.retain(|mv| !would_be_in_check(board, color, *mv));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_has_twenty_moves() {
        let mut board = Board::new_game();
        assert_eq!(generate_pseudolegal_moves(&board, Color::White).len(), 20);
        assert_eq!(generate_legal_moves(&mut board, Color::White).len(), 20);
        assert_eq!(generate_legal_moves(&mut board, Color::Black).len(), 20);
    }

    #[test]
    fn legal_moves_are_pseudolegal_subset() {
        // White king in check from the e-file rook; only king moves and the block remain.
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/3B4/4K3 w - - 0 1").expect("FEN parse");
        let before = board.snapshot();
        let pseudo = generate_pseudolegal_moves(&board, Color::White);
        let legal = generate_legal_moves(&mut board, Color::White);
        assert_eq!(board.snapshot(), before);
        assert!(legal.len() < pseudo.len());
        for mv in &legal {
            assert!(pseudo.contains(mv));
            assert!(!would_be_in_check(&mut board, Color::White, *mv));
        }
        for mv in pseudo.iter().filter(|mv| !legal.contains(mv)) {
            assert!(would_be_in_check(&mut board, Color::White, *mv));
        }
    }

    #[test]
    fn no_move_targets_a_king() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/K3R3 w - - 0 1").expect("FEN parse");
        let king = board.king_square(Color::Black);
        for mv in generate_pseudolegal_moves(&board, Color::White) {
            assert_ne!(Some(mv.to), king);
        }
    }

    #[test]
    fn captures_are_only_enemy_pieces() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").expect("FEN parse");
        let captures = generate_pseudolegal_captures(&board, Color::White);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].to.to_string(), "d5");
    }
}
