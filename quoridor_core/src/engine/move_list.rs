use crate::engine::Move;
use crate::logic::board::Position;
use std::ops::Index;

// Five pawn destinations at most plus the whole 128-slot wall lattice.
const MAX_MOVES: usize = 144;

/// A candidate move and its ordering key. For steps the key is the mover's
/// path length after the step; for walls it is the opponent's path increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

impl ScoredMove {
    #[must_use]
    pub const fn new(mv: Move, score: i32) -> Self {
        Self { mv, score }
    }
}

impl Default for ScoredMove {
    fn default() -> Self {
        Self::new(Move::Step(Position::default()), 0)
    }
}

pub struct MoveList {
    moves: [ScoredMove; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [ScoredMove::default(); MAX_MOVES],
            count: 0,
        }
    }
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: ScoredMove) {
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = mv;
            self.count += 1;
        } else {
            debug_assert!(false, "MoveList overflow! Max moves: {MAX_MOVES}");
        }
    }

    pub const fn truncate(&mut self, len: usize) {
        if len < self.count {
            self.count = len;
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScoredMove] {
        self.moves.get(0..self.count).unwrap_or(&[])
    }

    /// Stable, so equal keys keep generation order.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&ScoredMove, &ScoredMove) -> std::cmp::Ordering,
    {
        if let Some(slice) = self.moves.get_mut(0..self.count) {
            slice.sort_by(compare);
        }
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.iter().any(|scored| scored.mv == *mv)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ScoredMove;
    type IntoIter = std::slice::Iter<'a, ScoredMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for MoveList {
    type Output = ScoredMove;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}
