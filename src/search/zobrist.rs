//! Zobrist hashing for position identity in the transposition table.
//!
//! Keys come from a fixed-seed generator so hashes are deterministic across
//! runs, which keeps search traces and tests reproducible.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::board::CastlingRights;
use crate::game_state::chess_types::*;

const ZOBRIST_SEED: u64 = 0;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    // One key per castling-right flag; a mask hashes to the xor of its flags.
    castling: [u64; 4],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for sq in piece {
                *sq = rng.random();
            }
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 4];
    for key in &mut castling {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
    }
}

/// Key for a `(color, piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    tables().piece_square[color.index()][piece.index()][square.index()]
}

/// Contribution of a castling-rights mask. Linear in the mask, so
/// `castling_key(a ^ b) == castling_key(a) ^ castling_key(b)`.
#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    let keys = &tables().castling;
    (0..4)
        .filter(|bit| castling_rights & (1 << bit) != 0)
        .fold(0, |acc, bit| acc ^ keys[bit])
}

/// Side-to-move toggle key (xor in when Black is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Full key from scratch. The board's incremental key must always match this.
pub fn compute_zobrist_key(board: &Board) -> u64 {
    let mut key = 0u64;
    for (sq, piece) in board.pieces() {
        key ^= piece_square_key(piece.color, piece.kind, sq);
    }
    key ^= castling_key(board.castling_rights());
    if board.current_turn() == Color::Black {
        key ^= side_to_move_key();
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_and_distinct() {
        let a = Board::new_game();
        let b = Board::new_game();
        assert_eq!(compute_zobrist_key(&a), compute_zobrist_key(&b));
        assert_ne!(
            piece_square_key(Color::White, PieceKind::Pawn, Square::new(6, 4)),
            piece_square_key(Color::Black, PieceKind::Pawn, Square::new(6, 4))
        );
    }

    #[test]
    fn castling_key_is_linear() {
        assert_eq!(castling_key(0), 0);
        assert_eq!(castling_key(0b0101), castling_key(0b0001) ^ castling_key(0b0100));
    }

    #[test]
    fn side_to_move_changes_key() {
        let white = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN parse");
        let black = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").expect("FEN parse");
        assert_eq!(
            compute_zobrist_key(&white) ^ side_to_move_key(),
            compute_zobrist_key(&black)
        );
    }

    #[test]
    fn transposed_move_orders_share_a_key() {
        let mut a = Board::new_game();
        let mut b = Board::new_game();
        for (from, to) in [((7, 6), (5, 5)), ((0, 6), (2, 5)), ((7, 1), (5, 2)), ((0, 1), (2, 2))] {
            assert!(a.make_move(Square::new(from.0, from.1), Square::new(to.0, to.1), true, true));
        }
        for (from, to) in [((7, 1), (5, 2)), ((0, 1), (2, 2)), ((7, 6), (5, 5)), ((0, 6), (2, 5))] {
            assert!(b.make_move(Square::new(from.0, from.1), Square::new(to.0, to.1), true, true));
        }
        assert_eq!(a.zobrist_key(), b.zobrist_key());
        assert_eq!(a.zobrist_key(), compute_zobrist_key(&a));
    }
}
