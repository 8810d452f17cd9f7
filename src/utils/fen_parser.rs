//! FEN-to-Board parser.
//!
//! The board stores no castling-rights field, so the castling letters are
//! folded into `has_moved`: a king or home-corner rook is unmoved only when a
//! matching letter is present. Pawns off their start rank and every other
//! piece are marked as moved. The en passant field is validated and ignored.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::board::{castling_flag, CastlingRights};
use crate::game_state::chess_rules::{CastleSide, KING_START_COL};
use crate::game_state::chess_types::*;
use crate::utils::coordinates::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<Board> {
    let invalid = |reason: String| ChessError::InvalidFen {
        fen: fen.to_owned(),
        reason,
    };
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| invalid("missing board layout".to_owned()))?;
    let side_part = parts
        .next()
        .ok_or_else(|| invalid("missing side to move".to_owned()))?;
    let castling_part = parts.next().unwrap_or("-");
    let en_passant_part = parts.next().unwrap_or("-");
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields".to_owned()));
    }

    let placement = parse_board(board_part).map_err(&invalid)?;
    let side_to_move = parse_side_to_move(side_part).map_err(&invalid)?;
    let rights = parse_castling_rights(castling_part).map_err(&invalid)?;
    if en_passant_part != "-" {
        algebraic_to_square(en_passant_part)
            .map_err(|_| invalid(format!("invalid en passant square: {en_passant_part}")))?;
    }
    let halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(format!("invalid halfmove clock: {halfmove_part}")))?;
    let fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(format!("invalid fullmove number: {fullmove_part}")))?;

    let mut board = Board::empty();
    let mut kings = [0u8; 2];
    for (sq, color, kind) in placement {
        if kind == PieceKind::King {
            kings[color.index()] += 1;
            if kings[color.index()] > 1 {
                return Err(invalid(format!("more than one {color} king")));
            }
        }
        let piece = Piece {
            kind,
            color,
            has_moved: infer_has_moved(sq, color, kind, rights),
        };
        board.set_piece(sq, Some(piece));
    }
    board.set_turn(side_to_move);
    board.set_clocks(halfmove_clock, fullmove_number);

    Ok(board)
}

fn infer_has_moved(sq: Square, color: Color, kind: PieceKind, rights: CastlingRights) -> bool {
    let on_back_rank = sq.row == color.back_rank();
    match kind {
        PieceKind::Pawn => sq.row != color.pawn_start_rank(),
        PieceKind::King => {
            let any_right = CastleSide::BOTH
                .iter()
                .any(|side| rights & castling_flag(color, *side) != 0);
            !(on_back_rank && sq.col == KING_START_COL && any_right)
        }
        PieceKind::Rook => !CastleSide::BOTH.iter().any(|side| {
            on_back_rank && sq.col == side.rook_from() && rights & castling_flag(color, *side) != 0
        }),
        _ => true,
    }
}

fn parse_board(board_part: &str) -> Result<Vec<(Square, Color, PieceKind)>, String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("board layout must contain 8 ranks".to_owned());
    }

    let mut placement = Vec::with_capacity(32);
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("invalid empty-square count '{ch}'"));
                }
                col += empty_count as usize;
                continue;
            }

            let (color, kind) =
                piece_from_fen_char(ch).ok_or_else(|| format!("invalid piece character '{ch}'"))?;
            if col >= 8 {
                return Err("board rank has too many files".to_owned());
            }
            placement.push((Square::new(row as u8, col as u8), color, kind));
            col += 1;
        }

        if col != 8 {
            return Err(format!("rank {} does not sum to 8 files", 8 - row));
        }
    }

    Ok(placement)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => castling_flag(Color::White, CastleSide::King),
            'Q' => castling_flag(Color::White, CastleSide::Queen),
            'k' => castling_flag(Color::Black, CastleSide::King),
            'q' => castling_flag(Color::Black, CastleSide::Queen),
            _ => return Err(format!("invalid castling rights character: {ch}")),
        };
    }
    Ok(rights)
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::search::zobrist::compute_zobrist_key;

    #[test]
    fn parse_starting_fen() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(board.current_turn(), Color::White);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.castling_rights(), 0b1111);
        assert!(board.pieces().all(|(_, p)| {
            matches!(p.kind, PieceKind::Pawn | PieceKind::King | PieceKind::Rook) != p.has_moved
        }));
        assert_eq!(board.zobrist_key(), compute_zobrist_key(&board));
    }

    #[test]
    fn castling_letters_drive_has_moved() {
        let board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").expect("FEN parse");
        let flag = |text: &str| {
            let sq = crate::utils::coordinates::algebraic_to_square(text).expect("square");
            board.piece_at(sq).map(|p| p.has_moved)
        };
        assert_eq!(flag("e1"), Some(false));
        assert_eq!(flag("h1"), Some(false));
        assert_eq!(flag("a1"), Some(true));
        assert_eq!(flag("e8"), Some(false));
        assert_eq!(flag("a8"), Some(false));
        assert_eq!(flag("h8"), Some(true));
    }

    #[test]
    fn clocks_are_optional() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 b").expect("FEN parse");
        assert_eq!(board.current_turn(), Color::Black);
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn malformed_fens_are_rejected() {
        for bad in [
            "",
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w X - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - z9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - a 1",
            "4k3/8/8/8/8/8/8/4KK2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
        ] {
            assert!(
                matches!(parse_fen(bad), Err(ChessError::InvalidFen { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
