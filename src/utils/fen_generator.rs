//! Board-to-FEN export.
//!
//! Castling rights are inferred from `has_moved`; the en passant field is
//! always `-` because en passant is not modelled.

use crate::game_state::board::{
    CastlingRights, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE,
    CASTLE_WHITE_QUEENSIDE,
};
use crate::game_state::chess_types::*;

pub fn generate_fen(board: &Board) -> String {
    let side_to_move = match board.current_turn() {
        Color::White => "w",
        Color::Black => "b",
    };

    format!(
        "{} {} {} - {} {}",
        generate_board_field(board),
        side_to_move,
        generate_castling_field(board.castling_rights()),
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0u8;

        for col in 0..8u8 {
            if let Some(piece) = board.piece_at(Square::new(row, col)) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    for (flag, letter) in [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ] {
        if rights & flag != 0 {
            out.push(letter);
        }
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::coordinates::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position_fen() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&parsed), STARTING_POSITION_FEN);
    }

    #[test]
    fn round_trip_custom_position_fen() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let parsed = parse_fen(fen).expect("custom FEN should parse");
        let generated = generate_fen(&parsed);
        assert_eq!(generated, fen);
        let reparsed = parse_fen(&generated).expect("generated FEN should parse");
        assert_eq!(reparsed.snapshot(), parsed.snapshot());
    }

    #[test]
    fn clocks_and_rights_follow_moves() {
        let mut board = parse_fen(STARTING_POSITION_FEN).expect("FEN parse");
        let sq = |t: &str| algebraic_to_square(t).expect("square");
        assert!(board.make_move(sq("g1"), sq("f3"), true, true));
        assert!(board.make_move(sq("g8"), sq("f6"), true, true));
        assert!(board.make_move(sq("h1"), sq("g1"), true, true));
        assert_eq!(
            generate_fen(&board),
            "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKBR1 b Qkq - 3 2"
        );
        board.unmake_move(true);
        assert_eq!(
            generate_fen(&board),
            "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 2 2"
        );
    }
}
