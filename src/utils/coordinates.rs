//! Conversions between board coordinates and algebraic text.
//!
//! Row 0 is rank 8 and column 0 is the a-file, so `a8 == (0, 0)` and
//! `h1 == (7, 7)`. Moves are written in coordinate form (`e2e4`); a
//! trailing promotion letter is accepted and ignored since every promotion
//! is to a queen.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Move, Square};

/// Convert algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(text: &str) -> ChessResult<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidCoordinate(text.to_owned()));
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidCoordinate(text.to_owned()));
    }
    Ok(Square::new(b'8' - rank, file - b'a'))
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let file_char = char::from(b'a' + square.col);
    let rank_char = char::from(b'8' - square.row);
    format!("{file_char}{rank_char}")
}

#[inline]
pub fn move_to_text(mv: Move) -> String {
    format!("{}{}", square_to_algebraic(mv.from), square_to_algebraic(mv.to))
}

/// Parse `e2e4` (optionally `e7e8q`).
pub fn parse_move_text(text: &str) -> ChessResult<Move> {
    let text = text.trim();
    let invalid = || ChessError::InvalidCoordinate(text.to_owned());
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(invalid());
    }
    if text.len() == 5 && !matches!(&text[4..], "q" | "Q") {
        return Err(invalid());
    }
    let from = algebraic_to_square(&text[0..2]).map_err(|_| invalid())?;
    let to = algebraic_to_square(&text[2..4]).map_err(|_| invalid())?;
    Ok(Move::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_expected_rows_and_cols() {
        assert_eq!(algebraic_to_square("a8").expect("valid"), Square::new(0, 0));
        assert_eq!(algebraic_to_square("h1").expect("valid"), Square::new(7, 7));
        assert_eq!(algebraic_to_square("e2").expect("valid"), Square::new(6, 4));
        assert_eq!(square_to_algebraic(Square::new(4, 3)), "d4");
    }

    #[test]
    fn rejects_malformed_squares() {
        for bad in ["", "e", "i1", "a9", "e22", "E2"] {
            assert!(algebraic_to_square(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn move_text_round_trip() {
        let mv = parse_move_text("g1f3").expect("valid");
        assert_eq!(mv.from, Square::new(7, 6));
        assert_eq!(move_to_text(mv), "g1f3");
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(parse_move_text(" e7e8q ").expect("valid").to_string(), "e7e8");
        assert!(parse_move_text("e7e8n").is_err());
        assert!(parse_move_text("e2-e4").is_err());
    }
}
