//! Static position evaluation.
//!
//! Search delegates leaf scoring to [`BoardScorer`], so alternate heuristics
//! can be swapped without touching search code. The main scorer is
//! [`TaperedEvaluator`]: material, midgame/endgame piece-square tables blended
//! by material phase, and pawn/rook/king structure terms from a single scan.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::piece_moves::mobility;

pub const MATE_SCORE: i32 = 30000;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, board: &Board) -> i32;
}

#[inline]
pub const fn piece_value(piece: PieceKind) -> i32 {
    match piece {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

#[inline]
fn side_to_move_view(board: &Board, white_minus_black: i32) -> i32 {
    match board.current_turn() {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    pub fn material_balance_white_minus_black(board: &Board) -> i32 {
        board
            .pieces()
            .map(|(_, p)| match p.color {
                Color::White => piece_value(p.kind),
                Color::Black => -piece_value(p.kind),
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &Board) -> i32 {
        side_to_move_view(board, Self::material_balance_white_minus_black(board))
    }
}

// Tables are laid out as a diagram from White's side: row 0 is rank 8.
// White reads `table[row][col]`; Black reads the vertically mirrored row.
type PieceSquareTable = [[i32; 8]; 8];

const PAWN_MG: PieceSquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const PAWN_EG: PieceSquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [80, 80, 80, 80, 80, 80, 80, 80],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [30, 30, 30, 30, 30, 30, 30, 30],
    [20, 20, 20, 20, 20, 20, 20, 20],
    [10, 10, 10, 10, 10, 10, 10, 10],
    [10, 10, 10, 10, 10, 10, 10, 10],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT: PieceSquareTable = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP: PieceSquareTable = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_MG: PieceSquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

const ROOK_EG: PieceSquareTable = [
    [5, 5, 5, 5, 5, 5, 5, 5],
    [10, 10, 10, 10, 10, 10, 10, 10],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const QUEEN: PieceSquareTable = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING_MG: PieceSquareTable = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

const KING_EG: PieceSquareTable = [
    [-50, -40, -30, -20, -20, -30, -40, -50],
    [-30, -20, -10, 0, 0, -10, -20, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 30, 40, 40, 30, -10, -30],
    [-30, -10, 20, 30, 30, 20, -10, -30],
    [-30, -30, 0, 0, 0, 0, -30, -30],
    [-50, -30, -30, -30, -30, -30, -30, -50],
];

#[inline]
const fn tables_for(kind: PieceKind) -> (&'static PieceSquareTable, &'static PieceSquareTable) {
    match kind {
        PieceKind::Pawn => (&PAWN_MG, &PAWN_EG),
        PieceKind::Knight => (&KNIGHT, &KNIGHT),
        PieceKind::Bishop => (&BISHOP, &BISHOP),
        PieceKind::Rook => (&ROOK_MG, &ROOK_EG),
        PieceKind::Queen => (&QUEEN, &QUEEN),
        PieceKind::King => (&KING_MG, &KING_EG),
    }
}

pub const MAX_PHASE: i32 = 24;

#[inline]
const fn phase_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Knight | PieceKind::Bishop => 1,
        PieceKind::Rook => 2,
        PieceKind::Queen => 4,
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

const BISHOP_PAIR: (i32, i32) = (30, 50);
const DOUBLED_PAWN: (i32, i32) = (-10, -20);
const ISOLATED_PAWN: (i32, i32) = (-10, -15);
// Indexed by rows left to promotion.
const PASSED_PAWN_MG: [i32; 8] = [0, 60, 40, 25, 15, 10, 5, 0];
const PASSED_PAWN_EG: [i32; 8] = [0, 120, 80, 50, 30, 20, 10, 0];
const ROOK_OPEN_FILE: (i32, i32) = (20, 10);
const ROOK_SEMI_OPEN_FILE: (i32, i32) = (10, 5);
const PAWN_SHIELD_NEAR: i32 = 10;
const PAWN_SHIELD_FAR: i32 = 5;
const CENTER_OCCUPATION: i32 = 10;
const CHECK_PENALTY: i32 = 50;

/// Midgame/endgame pair, accumulated White minus Black.
#[derive(Debug, Clone, Copy, Default)]
struct Tapered {
    mg: i32,
    eg: i32,
}

impl Tapered {
    #[inline]
    fn add(&mut self, sign: i32, (mg, eg): (i32, i32)) {
        self.mg += sign * mg;
        self.eg += sign * eg;
    }

    #[inline]
    fn blend(self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

/// Per-colour facts gathered in the single board scan.
#[derive(Debug, Clone, Copy, Default)]
struct SideScan {
    /// Bit `r` of `pawn_rows[f]` is set when a pawn stands on row `r` of file `f`.
    pawn_rows: [u8; 8],
    rooks_per_file: [i32; 8],
    bishops: i32,
    mobility: i32,
    king: Option<Square>,
}

impl SideScan {
    #[inline]
    fn pawns_on(&self, col: i32) -> u8 {
        if (0..8).contains(&col) {
            self.pawn_rows[col as usize]
        } else {
            0
        }
    }

    fn structure(&self, color: Color, enemy: &SideScan) -> Tapered {
        let mut terms = Tapered::default();
        if self.bishops >= 2 {
            terms.add(1, BISHOP_PAIR);
        }
        terms.add(1, (self.mobility / 2, 0));

        for col in 0..8i32 {
            let rows = self.pawn_rows[col as usize];
            let count = rows.count_ones() as i32;
            if count > 1 {
                terms.add(1, (DOUBLED_PAWN.0 * (count - 1), DOUBLED_PAWN.1 * (count - 1)));
            }
            let isolated = (self.pawns_on(col - 1) | self.pawns_on(col + 1)) == 0;
            let nearby_enemy = enemy.pawns_on(col - 1) | enemy.pawns_on(col) | enemy.pawns_on(col + 1);
            for row in (0..8u8).filter(|&r| (rows & (1u8 << r)) != 0) {
                if isolated {
                    terms.add(1, ISOLATED_PAWN);
                }
                if (nearby_enemy & rows_ahead(color, row)) == 0 {
                    let to_go = row.abs_diff(color.promotion_rank()) as usize;
                    terms.add(1, (PASSED_PAWN_MG[to_go], PASSED_PAWN_EG[to_go]));
                }
            }

            let rooks = self.rooks_per_file[col as usize];
            if rooks > 0 && rows == 0 {
                let bonus = if enemy.pawns_on(col) == 0 {
                    ROOK_OPEN_FILE
                } else {
                    ROOK_SEMI_OPEN_FILE
                };
                terms.add(1, (bonus.0 * rooks, bonus.1 * rooks));
            }
        }

        if let Some(king) = self.king {
            terms.add(1, (self.pawn_shield(color, king), 0));
        }
        terms
    }

    /// Friendly pawns on the two rows in front of the king, king file and neighbours.
    fn pawn_shield(&self, color: Color, king: Square) -> i32 {
        let dir = i32::from(color.pawn_direction());
        let mut bonus = 0;
        for (step, weight) in [(1, PAWN_SHIELD_NEAR), (2, PAWN_SHIELD_FAR)] {
            let row = i32::from(king.row) + dir * step;
            if !(0..8).contains(&row) {
                continue;
            }
            for col in i32::from(king.col) - 1..=i32::from(king.col) + 1 {
                if (self.pawns_on(col) & (1u8 << row)) != 0 {
                    bonus += weight;
                }
            }
        }
        bonus
    }
}

/// Row mask of everything strictly between `row` and `color`'s promotion rank.
#[inline]
fn rows_ahead(color: Color, row: u8) -> u8 {
    match color {
        Color::White => (1u8 << row) - 1,
        Color::Black => u8::MAX.checked_shl(u32::from(row) + 1).unwrap_or(0),
    }
}

/// Tapered positional evaluator.
///
/// `evaluate` answers from `perspective`'s point of view; the [`BoardScorer`]
/// impl answers from the side to move, which is what negamax wants.
#[derive(Debug, Clone, Copy)]
pub struct TaperedEvaluator {
    pub perspective: Color,
}

impl Default for TaperedEvaluator {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

impl BoardScorer for TaperedEvaluator {
    fn score(&self, board: &Board) -> i32 {
        side_to_move_view(board, Self::white_minus_black(board))
    }
}

impl TaperedEvaluator {
    pub const fn new(perspective: Color) -> Self {
        Self { perspective }
    }

    /// Centipawns, positive when good for `perspective`.
    pub fn evaluate(&self, board: &Board) -> i32 {
        let white_minus_black = Self::white_minus_black(board);
        match self.perspective {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }

    /// Material phase in `0..=24`; 24 is the full opening set.
    pub fn game_phase(board: &Board) -> i32 {
        board
            .pieces()
            .map(|(_, p)| phase_weight(p.kind))
            .sum::<i32>()
            .clamp(0, MAX_PHASE)
    }

    pub fn white_minus_black(board: &Board) -> i32 {
        let (mut total, scans, phase) = scan_board(board);

        for color in [Color::White, Color::Black] {
            let own = &scans[color.index()];
            let enemy = &scans[color.opposite().index()];
            let terms = own.structure(color, enemy);
            total.add(color_sign(color), (terms.mg, terms.eg));
        }

        let mut score = total.blend(phase.clamp(0, MAX_PHASE));
        for color in [Color::White, Color::Black] {
            let checked = scans[color.index()]
                .king
                .is_some_and(|king| is_square_attacked(board, king, color.opposite()));
            if checked {
                score -= color_sign(color) * CHECK_PENALTY;
            }
        }
        score
    }
}

/// Material, piece-square and per-side facts in one pass over the board.
fn scan_board(board: &Board) -> (Tapered, [SideScan; 2], i32) {
    let mut total = Tapered::default();
    let mut scans = [SideScan::default(); 2];
    let mut phase = 0;

    for (sq, piece) in board.pieces() {
        let sign = color_sign(piece.color);
        let scan = &mut scans[piece.color.index()];
        phase += phase_weight(piece.kind);

        let value = piece_value(piece.kind);
        total.add(sign, (value, value));

        let (mg_table, eg_table) = tables_for(piece.kind);
        let row = table_row(piece.color, sq) as usize;
        let col = sq.col as usize;
        total.add(sign, (mg_table[row][col], eg_table[row][col]));

        match piece.kind {
            PieceKind::Pawn => scan.pawn_rows[col] |= 1u8 << sq.row,
            PieceKind::Rook => scan.rooks_per_file[col] += 1,
            PieceKind::Bishop => scan.bishops += 1,
            PieceKind::King => scan.king = Some(sq),
            _ => {}
        }
        if piece.kind != PieceKind::Pawn && piece.kind != PieceKind::King {
            scan.mobility += mobility(board, piece, sq);
        }
        if (3..=4).contains(&sq.row) && (3..=4).contains(&sq.col) {
            total.add(sign, (CENTER_OCCUPATION, 0));
        }
    }
    (total, scans, phase)
}

#[inline]
const fn color_sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
fn table_row(color: Color, sq: Square) -> u8 {
    match color {
        Color::White => sq.row,
        Color::Black => 7 - sq.row,
    }
}
