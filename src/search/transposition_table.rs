//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! A slot is chosen by `key % capacity` and the full key is compared on
//! probe. Re-storing the same position keeps the deeper result; any other
//! position simply takes the slot.
//!
//! Mate scores are kept relative to the node that produced them (see
//! [`TTEntry::new`] and [`TTEntry::score_at`]) so a mate found via a
//! transposition at a different ply still reports the right distance.

use crate::game_state::chess_types::Move;
use crate::search::board_scoring::MATE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

impl Bound {
    /// Classify a fail-soft result against the window it was searched with.
    #[inline]
    pub fn classify(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    /// Node-relative score; read it back through [`TTEntry::score_at`].
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Build an entry from a root-relative `score` found `ply` plies deep.
    pub fn new(key: u64, depth: u8, score: i32, ply: u8, bound: Bound, best_move: Option<Move>) -> Self {
        let ply = i32::from(ply);
        let score = match score {
            s if s >= MATE_THRESHOLD => s + ply,
            s if s <= -MATE_THRESHOLD => s - ply,
            s => s,
        };
        Self {
            key,
            depth,
            score,
            bound,
            best_move,
        }
    }

    /// The stored score re-expressed relative to the root for a node at `ply`.
    pub fn score_at(&self, ply: u8) -> i32 {
        let ply = i32::from(ply);
        match self.score {
            s if s >= MATE_THRESHOLD => s - ply,
            s if s <= -MATE_THRESHOLD => s + ply,
            s => s,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    slots: Box<[Option<TTEntry>]>,
    stats: TTStats,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new_with_mb(16)
    }
}

impl TranspositionTable {
    pub fn new_with_mb(size_mb: usize) -> Self {
        Self::with_capacity(Self::capacity_for_mb(size_mb))
    }

    pub fn with_capacity(count: usize) -> Self {
        Self {
            slots: vec![None; count.max(1)].into_boxed_slice(),
            stats: TTStats::default(),
        }
    }

    fn capacity_for_mb(size_mb: usize) -> usize {
        let slot_bytes = std::mem::size_of::<Option<TTEntry>>().max(1);
        size_mb.max(1) * 1024 * 1024 / slot_bytes
    }

    /// Drop every entry and reallocate for `size_mb`.
    pub fn resize_mb(&mut self, size_mb: usize) {
        *self = Self::new_with_mb(size_mb);
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    /// Occupancy in permille, sampled over the first thousand slots.
    pub fn hashfull(&self) -> u32 {
        let sample = &self.slots[..self.slots.len().min(1000)];
        let used = sample.iter().flatten().count();
        (used * 1000 / sample.len().max(1)) as u32
    }

    #[inline]
    fn slot_of(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let found = self.slots[self.slot_of(key)].filter(|entry| entry.key == key);
        self.stats.hits += u64::from(found.is_some());
        found
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let slot = &mut self.slots[(entry.key % self.slots.len() as u64) as usize];
        if let Some(existing) = slot {
            if existing.key == entry.key && existing.depth > entry.depth {
                return;
            }
        }
        *slot = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Square;
    use crate::search::board_scoring::MATE_SCORE;

    fn entry(key: u64, depth: u8, score: i32) -> TTEntry {
        TTEntry::new(key, depth, score, 0, Bound::Exact, None)
    }

    #[test]
    fn stored_entry_is_found_by_exact_key_only() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let e4 = Move::new(Square::new(6, 4), Square::new(4, 4));
        tt.store(TTEntry::new(123, 5, 42, 0, Bound::Lower, Some(e4)));

        let got = tt.probe(123).expect("entry should exist");
        assert_eq!((got.depth, got.score, got.bound), (5, 42, Bound::Lower));
        assert_eq!(got.best_move, Some(e4));
        assert!(tt.probe(124).is_none());
        assert_eq!(
            tt.stats(),
            TTStats {
                probes: 2,
                hits: 1,
                stores: 1
            }
        );
    }

    #[test]
    fn same_position_keeps_deeper_result() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(entry(555, 2, 1));
        tt.store(entry(555, 1, 9));
        assert_eq!(tt.probe(555).expect("exists").score, 1);

        tt.store(entry(555, 2, 4));
        assert_eq!(tt.probe(555).expect("exists").score, 4);

        tt.store(entry(555, 6, 3));
        assert_eq!(tt.probe(555).expect("exists").depth, 6);
    }

    #[test]
    fn colliding_position_takes_the_slot() {
        let mut tt = TranspositionTable::with_capacity(8);
        tt.store(entry(3, 9, 10));
        tt.store(entry(11, 1, 20));
        assert!(tt.probe(3).is_none());
        assert_eq!(tt.probe(11).expect("exists").score, 20);

        tt.clear();
        assert!(tt.probe(11).is_none());
        assert_eq!(tt.len(), 8);
        assert_eq!(tt.hashfull(), 0);
    }

    #[test]
    fn mate_scores_are_stored_node_relative() {
        let stored = TTEntry::new(1, 4, MATE_SCORE - 5, 3, Bound::Exact, None);
        assert_eq!(stored.score, MATE_SCORE - 2);
        assert_eq!(stored.score_at(3), MATE_SCORE - 5);
        assert_eq!(stored.score_at(1), MATE_SCORE - 3);

        let mated = TTEntry::new(1, 4, -MATE_SCORE + 4, 2, Bound::Exact, None);
        assert_eq!(mated.score_at(2), -MATE_SCORE + 4);
        assert_eq!(TTEntry::new(1, 4, 120, 9, Bound::Exact, None).score_at(0), 120);
    }

    #[test]
    fn bounds_follow_the_window() {
        assert_eq!(Bound::classify(-10, -10, 10), Bound::Upper);
        assert_eq!(Bound::classify(10, -10, 10), Bound::Lower);
        assert_eq!(Bound::classify(0, -10, 10), Bound::Exact);
    }
}
