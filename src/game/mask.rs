//! Mask Board
//!
//! Nine fixed slots, each holding at most one token. The occupied counter
//! is only touched by `place`, `remove` and `initialize`.

use std::collections::BTreeMap;

use crate::game::material::{MaskPosition, Token};
use crate::MASK_SLOT_COUNT;

/// The nine-slot board.
#[derive(Clone, Debug, Default)]
pub struct MaskBoard {
    slots: [Option<Token>; MASK_SLOT_COUNT],
    occupied: usize,
}

impl MaskBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all nine positions.
    pub fn initialize(&mut self) {
        self.slots = [None; MASK_SLOT_COUNT];
        self.occupied = 0;
    }

    /// Occupy a position. Returns false if already occupied.
    pub fn place(&mut self, position: MaskPosition, token: Token) -> bool {
        let slot = &mut self.slots[position.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(token);
        self.occupied += 1;
        true
    }

    /// Clear a position, returning what was there.
    pub fn remove(&mut self, position: MaskPosition) -> Option<Token> {
        let removed = self.slots[position.index()].take();
        if removed.is_some() {
            self.occupied -= 1;
        }
        removed
    }

    /// Token at a position.
    #[inline]
    pub fn get(&self, position: MaskPosition) -> Option<Token> {
        self.slots[position.index()]
    }

    /// Whether a position is occupied.
    #[inline]
    pub fn is_occupied(&self, position: MaskPosition) -> bool {
        self.slots[position.index()].is_some()
    }

    /// True iff all nine positions are occupied.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.occupied == MASK_SLOT_COUNT
    }

    /// Number of occupied positions.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// First empty position in slot order.
    pub fn first_empty(&self) -> Option<MaskPosition> {
        MaskPosition::ALL.into_iter().find(|p| !self.is_occupied(*p))
    }

    /// Copy of every position's contents.
    pub fn snapshot(&self) -> BTreeMap<MaskPosition, Option<Token>> {
        MaskPosition::ALL
            .into_iter()
            .map(|p| (p, self.slots[p.index()]))
            .collect()
    }

    /// Occupied positions with their tokens, in slot order.
    pub fn placed(&self) -> impl Iterator<Item = (MaskPosition, Token)> + '_ {
        MaskPosition::ALL
            .into_iter()
            .filter_map(|p| self.slots[p.index()].map(|t| (p, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::material::generate;

    #[test]
    fn test_place_and_no_overwrite() {
        let tokens = generate();
        let mut board = MaskBoard::new();

        assert!(board.place(MaskPosition::Nose, tokens[0]));
        assert!(!board.place(MaskPosition::Nose, tokens[1]));
        assert_eq!(board.get(MaskPosition::Nose), Some(tokens[0]));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_remove() {
        let tokens = generate();
        let mut board = MaskBoard::new();
        board.place(MaskPosition::Mouth, tokens[3]);

        assert_eq!(board.remove(MaskPosition::Mouth), Some(tokens[3]));
        assert_eq!(board.remove(MaskPosition::Mouth), None);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_completion_only_at_nine() {
        let tokens = generate();
        let mut board = MaskBoard::new();

        for (i, pos) in MaskPosition::ALL.iter().enumerate() {
            assert!(!board.is_complete(), "complete with only {} placed", i);
            board.place(*pos, tokens[i]);
        }
        assert!(board.is_complete());
        assert_eq!(board.first_empty(), None);

        board.remove(MaskPosition::Forehead);
        assert!(!board.is_complete());
        assert_eq!(board.first_empty(), Some(MaskPosition::Forehead));
    }

    #[test]
    fn test_counter_matches_slots() {
        let tokens = generate();
        let mut board = MaskBoard::new();
        board.place(MaskPosition::LeftEye, tokens[0]);
        board.place(MaskPosition::LeftEye, tokens[1]);
        board.place(MaskPosition::RightEar, tokens[2]);
        board.remove(MaskPosition::Nose);

        let scanned = board.snapshot().values().filter(|t| t.is_some()).count();
        assert_eq!(scanned, board.occupied_count());
        assert_eq!(board.placed().count(), 2);
    }

    #[test]
    fn test_initialize_clears() {
        let tokens = generate();
        let mut board = MaskBoard::new();
        board.place(MaskPosition::LeftFace, tokens[0]);

        board.initialize();
        assert_eq!(board.occupied_count(), 0);
        assert!(board.snapshot().values().all(|t| t.is_none()));
        assert_eq!(board.snapshot().len(), 9);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let tokens = generate();
        let mut board = MaskBoard::new();
        board.place(MaskPosition::RightFace, tokens[0]);

        let mut snapshot = board.snapshot();
        snapshot.insert(MaskPosition::RightFace, None);
        assert_eq!(board.get(MaskPosition::RightFace), Some(tokens[0]));
    }
}
