//! Authoritative mailbox position with reversible move application.
//!
//! `Board` stores an 8x8 grid of optional pieces, the side to move, clocks for
//! FEN export, and an undo stack. Search mutates one board in strict stack
//! discipline through [`Board::make_move`] / [`Board::unmake_move`]; no
//! per-node copies are taken, so unmake must restore the grid, every
//! `has_moved` flag, the turn, the clocks, and the hash exactly.

use tracing::{debug, warn};

use crate::chess_errors::{ChessError, ChessResult, IllegalMove};
use crate::game_state::chess_rules::{CastleSide, KING_START_COL, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{
    is_checkmate, is_in_check, is_stalemate, position_outcome,
};
use crate::move_generation::legal_move_generator::{
    generate_legal_moves, generate_pseudolegal_moves, would_be_in_check,
};
use crate::moves::piece_moves::is_valid_move;
use crate::search::zobrist::{
    castling_key, compute_zobrist_key, piece_square_key, side_to_move_key,
};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Castling-rights bitmask derived from `has_moved` flags (never stored).
pub type CastlingRights = u8;
pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;

#[inline]
pub const fn castling_flag(color: Color, side: CastleSide) -> CastlingRights {
    match (color, side) {
        (Color::White, CastleSide::King) => CASTLE_WHITE_KINGSIDE,
        (Color::White, CastleSide::Queen) => CASTLE_WHITE_QUEENSIDE,
        (Color::Black, CastleSide::King) => CASTLE_BLACK_KINGSIDE,
        (Color::Black, CastleSide::Queen) => CASTLE_BLACK_QUEENSIDE,
    }
}

/// Everything that defines a position, for equality checks in tests and tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSnapshot {
    pub grid: [[Option<Piece>; 8]; 8],
    pub current_turn: Color,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub zobrist_key: u64,
}

#[derive(Debug)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    current_turn: Color,
    move_history: Vec<UndoRecord>,

    // Cached so check detection does not scan for the king.
    king_squares: [Option<Square>; 2],

    halfmove_clock: u16,
    fullmove_number: u16,

    // Incrementally maintained; always equal to `compute_zobrist_key(self)`.
    zobrist_key: u64,
}

/// Deep copy of pieces, turn, and clocks with an empty move history, so
/// speculative searches never touch the game-authoritative board.
impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            current_turn: self.current_turn,
            move_history: Vec::new(),
            king_squares: self.king_squares,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_key: self.zobrist_key,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Board with no pieces, White to move.
    pub fn empty() -> Self {
        let mut board = Self {
            grid: [[None; 8]; 8],
            current_turn: Color::White,
            move_history: Vec::new(),
            king_squares: [None; 2],
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
        };
        board.zobrist_key = compute_zobrist_key(&board);
        board
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    // --- Accessors ---

    /// Bounds-checked lookup; out-of-range coordinates yield `None`.
    #[inline]
    pub fn get_piece(&self, row: i32, col: i32) -> Option<Piece> {
        Square::try_new(row, col).and_then(|sq| self.piece_at(sq))
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    #[inline]
    pub fn move_history(&self) -> &[UndoRecord] {
        &self.move_history
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Incrementally maintained position hash (includes side to move and castling).
    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// Every occupied square with its piece, scanning from row 0.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Occupied squares of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            grid: self.grid,
            current_turn: self.current_turn,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_key: self.zobrist_key,
        }
    }

    /// Castling rights as implied by the king and home-corner rook flags.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = 0;
        for color in [Color::White, Color::Black] {
            let row = color.back_rank();
            let king_home = self
                .piece_at(Square::new(row, KING_START_COL))
                .is_some_and(|k| k.kind == PieceKind::King && k.color == color && !k.has_moved);
            if !king_home {
                continue;
            }
            for side in CastleSide::BOTH {
                let rook_home = self
                    .piece_at(Square::new(row, side.rook_from()))
                    .is_some_and(|r| r.kind == PieceKind::Rook && r.color == color && !r.has_moved);
                if rook_home {
                    rights |= castling_flag(color, side);
                }
            }
        }
        rights
    }

    /// Both kings must be present; anything else means an upstream invariant broke.
    pub fn validate_kings(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            if self.king_square(color).is_none() {
                return Err(ChessError::MissingKing(color));
            }
        }
        Ok(())
    }

    // --- Setup ---

    /// Place or clear a square. Intended for position setup, not for play.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(old) = self.piece_at(square) {
            if old.kind == PieceKind::King && self.king_squares[old.color.index()] == Some(square) {
                self.king_squares[old.color.index()] = None;
            }
        }
        self.grid[square.row as usize][square.col as usize] = piece;
        if let Some(p) = piece {
            if p.kind == PieceKind::King {
                self.king_squares[p.color.index()] = Some(square);
            }
        }
        self.zobrist_key = compute_zobrist_key(self);
    }

    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let old = self.piece_at(square);
        self.set_piece(square, None);
        old
    }

    pub fn set_turn(&mut self, color: Color) {
        self.current_turn = color;
        self.zobrist_key = compute_zobrist_key(self);
    }

    pub fn set_clocks(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number.max(1);
    }

    // --- Move application ---

    /// Explain why `from -> to` would be refused for the side to move.
    pub fn check_move(&mut self, from: Square, to: Square) -> Result<(), IllegalMove> {
        let piece = self.piece_at(from).ok_or(IllegalMove::EmptySquare(from))?;
        if piece.color != self.current_turn {
            return Err(IllegalMove::WrongTurn {
                square: from,
                color: piece.color,
                turn: self.current_turn,
            });
        }
        if let Some(target) = self.piece_at(to) {
            if target.kind == PieceKind::King {
                return Err(IllegalMove::TargetsKing(to));
            }
            if target.color == piece.color {
                return Err(IllegalMove::OwnPiece(to));
            }
        }
        if !is_valid_move(self, piece, from, to) {
            return Err(IllegalMove::BadGeometry { from, to });
        }
        if self.would_be_in_check(piece.color, Move::new(from, to)) {
            return Err(IllegalMove::LeavesKingInCheck { from, to });
        }
        Ok(())
    }

    /// Coordinate-based validated move for UI input; always switches the turn.
    pub fn make_move_coords(
        &mut self,
        start_row: i32,
        start_col: i32,
        end_row: i32,
        end_col: i32,
    ) -> bool {
        let (Some(from), Some(to)) = (
            Square::try_new(start_row, start_col),
            Square::try_new(end_row, end_col),
        ) else {
            debug!(start_row, start_col, end_row, end_col, reason = %IllegalMove::OutOfBounds, "move rejected");
            return false;
        };
        self.make_move(from, to, true, true)
    }

    /// Apply `from -> to`.
    ///
    /// With `validate` the move must pass [`Board::check_move`]; without it
    /// the move is applied as given (search and check probing). Castling and
    /// promotion are inferred from the piece and geometry. Pushes exactly one
    /// [`UndoRecord`] on success.
    pub fn make_move(&mut self, from: Square, to: Square, validate: bool, switch_turn: bool) -> bool {
        if validate {
            if let Err(reason) = self.check_move(from, to) {
                debug!(%from, %to, %reason, "move rejected");
                return false;
            }
        }
        self.apply_move(from, to, switch_turn)
    }

    fn apply_move(&mut self, from: Square, to: Square, switch_turn: bool) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        let captured = self.piece_at(to);
        let prev_rights = self.castling_rights();

        let mut record = UndoRecord {
            moved_piece: piece,
            captured_piece: captured,
            from,
            to,
            prev_has_moved: piece.has_moved,
            castling: None,
            promotion: false,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_number: self.fullmove_number,
            prev_zobrist_key: self.zobrist_key,
        };

        let mut key = self.zobrist_key ^ piece_square_key(piece.color, piece.kind, from);
        if let Some(victim) = captured {
            key ^= piece_square_key(victim.color, victim.kind, to);
            if victim.kind == PieceKind::King {
                self.king_squares[victim.color.index()] = None;
            }
        }

        if piece.kind == PieceKind::King
            && from.row == to.row
            && (i32::from(to.col) - i32::from(from.col)).abs() == 2
        {
            if let Some(side) = CastleSide::from_king_target(to.col) {
                record.castling = self.shift_castling_rook(piece.color, from.row, side, &mut key);
            }
        }

        let mut placed = Piece {
            has_moved: true,
            ..piece
        };
        if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_rank() {
            placed = Piece::moved(PieceKind::Queen, piece.color);
            record.promotion = true;
        }

        self.grid[from.row as usize][from.col as usize] = None;
        self.grid[to.row as usize][to.col as usize] = Some(placed);
        key ^= piece_square_key(placed.color, placed.kind, to);
        if piece.kind == PieceKind::King {
            self.king_squares[piece.color.index()] = Some(to);
        }

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if piece.color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        key ^= castling_key(prev_rights ^ self.castling_rights());
        if switch_turn {
            self.current_turn = self.current_turn.opposite();
            key ^= side_to_move_key();
        }
        self.zobrist_key = key;
        self.move_history.push(record);
        true
    }

    /// Move the home-corner rook next to a castling king, if it is still there unmoved.
    fn shift_castling_rook(
        &mut self,
        color: Color,
        row: u8,
        side: CastleSide,
        key: &mut u64,
    ) -> Option<RookShift> {
        let rook_from = Square::new(row, side.rook_from());
        let rook = self
            .piece_at(rook_from)
            .filter(|r| r.kind == PieceKind::Rook && r.color == color && !r.has_moved)?;
        let rook_to = Square::new(row, side.rook_to());

        self.grid[rook_from.row as usize][rook_from.col as usize] = None;
        self.grid[rook_to.row as usize][rook_to.col as usize] = Some(Piece {
            has_moved: true,
            ..rook
        });
        *key ^= piece_square_key(color, PieceKind::Rook, rook_from)
            ^ piece_square_key(color, PieceKind::Rook, rook_to);

        Some(RookShift {
            from: rook_from,
            to: rook_to,
            prev_has_moved: rook.has_moved,
        })
    }

    /// Pop and exactly reverse the most recent move. `None` when history is empty.
    pub fn unmake_move(&mut self, switch_turn: bool) -> Option<UndoRecord> {
        let record = self.move_history.pop()?;

        self.grid[record.to.row as usize][record.to.col as usize] = record.captured_piece;
        self.grid[record.from.row as usize][record.from.col as usize] = Some(Piece {
            has_moved: record.prev_has_moved,
            ..record.moved_piece
        });

        if let Some(shift) = record.castling {
            let rook = self.grid[shift.to.row as usize][shift.to.col as usize].take();
            self.grid[shift.from.row as usize][shift.from.col as usize] = rook.map(|r| Piece {
                has_moved: shift.prev_has_moved,
                ..r
            });
        }

        if record.moved_piece.kind == PieceKind::King {
            self.king_squares[record.moved_piece.color.index()] = Some(record.from);
        }
        if let Some(victim) = record.captured_piece {
            if victim.kind == PieceKind::King {
                self.king_squares[victim.color.index()] = Some(record.to);
            }
        }

        self.halfmove_clock = record.prev_halfmove_clock;
        self.fullmove_number = record.prev_fullmove_number;
        self.zobrist_key = record.prev_zobrist_key;
        if switch_turn {
            self.current_turn = self.current_turn.opposite();
        }
        Some(record)
    }

    /// Pass the turn without moving (null-move pruning). Not recorded in history.
    #[inline]
    pub fn make_null_move(&mut self) {
        self.current_turn = self.current_turn.opposite();
        self.zobrist_key ^= side_to_move_key();
    }

    #[inline]
    pub fn unmake_null_move(&mut self) {
        self.make_null_move();
    }

    // --- Legality queries ---

    /// True when `color`'s king is attacked. A missing king counts as in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check(self, color)
    }

    pub fn generate_pseudolegal_moves(&self, color: Color) -> Vec<Move> {
        generate_pseudolegal_moves(self, color)
    }

    pub fn generate_legal_moves(&mut self, color: Color) -> Vec<Move> {
        generate_legal_moves(self, color)
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.current_turn;
        generate_legal_moves(self, color)
    }

    pub fn would_be_in_check(&mut self, color: Color, mv: Move) -> bool {
        would_be_in_check(self, color, mv)
    }

    pub fn is_checkmate(&mut self, color: Color) -> bool {
        is_checkmate(self, color)
    }

    pub fn is_stalemate(&mut self, color: Color) -> bool {
        is_stalemate(self, color)
    }

    /// Checkmate / stalemate status of the side to move.
    pub fn outcome(&mut self) -> GameOutcome {
        position_outcome(self)
    }

    pub(crate) fn warn_missing_king(&self, color: Color) {
        warn!(%color, fen = %self.to_fen(), "king not found; treating as in check");
    }
}
