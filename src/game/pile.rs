//! Draw Pile
//!
//! The remaining tokens plus the single in-hand slot.

use crate::core::rng::DrawSource;
use crate::game::material::Token;

/// Pile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PileError {
    /// Nothing to take (pile or hand is empty).
    #[error("Pile is empty")]
    Empty,

    /// The in-hand slot is already occupied.
    #[error("Already holding a token")]
    AlreadyHolding,
}

/// Remaining tokens and the in-hand slot.
#[derive(Clone, Debug, Default)]
pub struct DrawPile {
    remaining: Vec<Token>,
    in_hand: Option<Token>,
}

impl DrawPile {
    /// Create an empty pile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the remaining tokens and clear the hand.
    pub fn reset(&mut self, tokens: Vec<Token>) {
        self.remaining = tokens;
        self.in_hand = None;
    }

    /// Draw one token uniformly at random into the hand.
    pub fn draw<R: DrawSource>(&mut self, source: &mut R) -> Result<Token, PileError> {
        if self.in_hand.is_some() {
            return Err(PileError::AlreadyHolding);
        }
        if self.remaining.is_empty() {
            return Err(PileError::Empty);
        }

        let idx = source.pick(self.remaining.len()).min(self.remaining.len() - 1);
        let token = self.remaining.swap_remove(idx);
        self.in_hand = Some(token);
        Ok(token)
    }

    /// Clear and return the in-hand token.
    pub fn take_in_hand(&mut self) -> Result<Token, PileError> {
        self.in_hand.take().ok_or(PileError::Empty)
    }

    /// Put a token into the empty hand without touching the pile.
    pub fn set_in_hand(&mut self, token: Token) -> Result<(), PileError> {
        if self.in_hand.is_some() {
            return Err(PileError::AlreadyHolding);
        }
        self.in_hand = Some(token);
        Ok(())
    }

    /// Current in-hand token.
    #[inline]
    pub fn in_hand(&self) -> Option<Token> {
        self.in_hand
    }

    /// Number of tokens left to draw.
    #[inline]
    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    /// Tokens left to draw (internal order, not draw order).
    pub fn remaining(&self) -> &[Token] {
        &self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use crate::game::material::generate;

    /// Always picks the same slot (clamped by the pile).
    struct Fixed(usize);

    impl DrawSource for Fixed {
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn test_draw_moves_token_to_hand() {
        let mut pile = DrawPile::new();
        pile.reset(generate());
        let mut rng = DeterministicRng::new(1);

        let token = pile.draw(&mut rng).unwrap();
        assert_eq!(pile.in_hand(), Some(token));
        assert_eq!(pile.remaining_count(), 41);
        assert!(!pile.remaining().contains(&token));
    }

    #[test]
    fn test_draw_refuses_when_holding() {
        let mut pile = DrawPile::new();
        pile.reset(generate());
        let mut rng = DeterministicRng::new(1);

        let first = pile.draw(&mut rng).unwrap();
        assert_eq!(pile.draw(&mut rng), Err(PileError::AlreadyHolding));
        assert_eq!(pile.in_hand(), Some(first));
        assert_eq!(pile.remaining_count(), 41);
    }

    #[test]
    fn test_draw_empty() {
        let mut pile = DrawPile::new();
        let mut rng = DeterministicRng::new(1);
        assert_eq!(pile.draw(&mut rng), Err(PileError::Empty));
        assert_eq!(pile.in_hand(), None);
    }

    #[test]
    fn test_injected_source_is_honored() {
        let tokens = generate();
        let mut pile = DrawPile::new();
        pile.reset(tokens.clone());

        let token = pile.draw(&mut Fixed(5)).unwrap();
        assert_eq!(token, tokens[5]);

        // Out-of-range picks are clamped to the last token
        pile.take_in_hand().unwrap();
        let last = *pile.remaining().last().unwrap();
        assert_eq!(pile.draw(&mut Fixed(1000)).unwrap(), last);
    }

    #[test]
    fn test_take_and_set_in_hand() {
        let tokens = generate();
        let mut pile = DrawPile::new();
        assert_eq!(pile.take_in_hand(), Err(PileError::Empty));

        pile.set_in_hand(tokens[0]).unwrap();
        assert_eq!(pile.set_in_hand(tokens[1]), Err(PileError::AlreadyHolding));
        assert_eq!(pile.take_in_hand(), Ok(tokens[0]));
        assert_eq!(pile.in_hand(), None);
    }

    #[test]
    fn test_reset_clears_hand() {
        let mut pile = DrawPile::new();
        pile.reset(generate());
        pile.draw(&mut DeterministicRng::new(9)).unwrap();

        pile.reset(generate());
        assert_eq!(pile.in_hand(), None);
        assert_eq!(pile.remaining_count(), 42);
    }

    #[test]
    fn test_draw_exhausts_all_unique() {
        let mut pile = DrawPile::new();
        pile.reset(generate());
        let mut rng = DeterministicRng::new(42);
        let mut seen = std::collections::BTreeSet::new();

        while let Ok(token) = pile.draw(&mut rng) {
            assert!(seen.insert(token), "token drawn twice");
            pile.take_in_hand().unwrap();
        }
        assert_eq!(seen.len(), 42);
    }
}
