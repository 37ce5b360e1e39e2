//! Game Session
//!
//! Orchestrates the pile, cache and board. The in-hand slot is the only
//! state machine: `Empty` or `Holding(token)`.
//!
//! ## Two-step moves
//!
//! `place`, `cache_current` and `discard` relocate the in-hand token and
//! then run `advance()` to refill the hand. A move only advances if it
//! succeeded, and a failed move leaves every component untouched. Running
//! out of tokens during the advance is reported as
//! [`Advance::PoolExhausted`], not as an error.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rng::{DeterministicRng, DrawSource, derive_session_seed};
use crate::game::cache::{CacheStore, clamp_capacity};
use crate::game::config::SessionConfig;
use crate::game::events::{GameEvent, GameEventData, SessionObserver};
use crate::game::mask::MaskBoard;
use crate::game::material::{self, MaskPosition, Token};
use crate::game::pile::{DrawPile, PileError};

/// Message sent with a successful submit.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Mask submitted!";

/// Message sent when submitting an incomplete mask.
pub const SUBMIT_INCOMPLETE_MESSAGE: &str = "Mask is not complete yet";

/// Session errors.
///
/// All are recoverable; the session is unchanged after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No tokens left to draw.
    #[error("Material pool is exhausted")]
    PoolExhausted,

    /// The in-hand slot is occupied.
    #[error("Already holding a material")]
    AlreadyHolding,

    /// The in-hand slot is empty.
    #[error("No current material")]
    NoCurrentToken,

    /// Board position already holds a token.
    #[error("Position {0} is occupied")]
    PositionOccupied(MaskPosition),

    /// Board position holds nothing.
    #[error("Position {0} is empty")]
    PositionEmpty(MaskPosition),

    /// Cache is at capacity.
    #[error("Cache is full")]
    CacheFull,

    /// Token is not in the cache.
    #[error("{0} is not in the cache")]
    NotInCache(Token),

    /// Board is not fully occupied.
    #[error("Mask is incomplete")]
    MaskIncomplete,
}

/// State of the in-hand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandState {
    /// Nothing to route.
    Empty,
    /// A token is waiting to be placed, cached or discarded.
    Holding(Token),
}

/// Outcome of the refill step after a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A new token is in hand.
    Drew(Token),
    /// The pile is empty; the hand stays empty.
    PoolExhausted,
}

impl Advance {
    /// The drawn token, if any.
    pub fn token(self) -> Option<Token> {
        match self {
            Advance::Drew(token) => Some(token),
            Advance::PoolExhausted => None,
        }
    }
}

/// Read-only picture of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Current in-hand token
    pub in_hand: Option<Token>,
    /// Tokens left to draw
    pub remaining: usize,
    /// Cached tokens in insertion order
    pub cache: Vec<Token>,
    /// Cache capacity
    pub cache_capacity: usize,
    /// Board contents
    pub board: BTreeMap<MaskPosition, Option<Token>>,
    /// Whether all nine positions are filled
    pub complete: bool,
    /// Tokens removed from play
    pub discarded: usize,
}

/// A single-player puzzle session.
///
/// Generic over the draw source so tests can script draws.
pub struct GameSession<R: DrawSource = DeterministicRng> {
    /// Seed recorded for replay
    seed: u64,

    /// Draw source
    rng: R,

    /// Remaining tokens and the in-hand slot
    pile: DrawPile,

    /// Parked tokens
    cache: CacheStore,

    /// The nine mask positions
    board: MaskBoard,

    /// Tokens permanently removed from play
    discarded: Vec<Token>,

    /// Successful mutations so far
    actions: u32,

    /// Events generated since the last `take_events`
    pending_events: Vec<GameEvent>,

    /// Registered views
    observers: Vec<Box<dyn SessionObserver + Send>>,
}

impl GameSession<DeterministicRng> {
    /// Create a session from config. Call [`GameSession::start_game`] to deal.
    ///
    /// Without a configured seed, one is derived from a fresh session id.
    pub fn new(config: &SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            let session_id = uuid::Uuid::new_v4();
            derive_session_seed(session_id.as_bytes())
        });
        Self::with_source(DeterministicRng::new(seed), seed, config.effective_cache_capacity())
    }

    /// Create a session with a fixed seed and default settings.
    pub fn seeded(seed: u64) -> Self {
        Self::new(&SessionConfig::seeded(seed))
    }
}

impl<R: DrawSource> GameSession<R> {
    /// Create a session around an arbitrary draw source.
    ///
    /// `seed` is only recorded (for hashing and logs).
    pub fn with_source(source: R, seed: u64, cache_capacity: usize) -> Self {
        Self {
            seed,
            rng: source,
            pile: DrawPile::new(),
            cache: CacheStore::new(cache_capacity),
            board: MaskBoard::new(),
            discarded: Vec::new(),
            actions: 0,
            pending_events: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register a view.
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver + Send>) {
        self.observers.push(observer);
    }

    // =========================================================================
    // Player operations
    // =========================================================================

    /// Deal a fresh catalog, clear board and cache, and draw the first token.
    ///
    /// Cache capacity is kept.
    pub fn start_game(&mut self) -> Advance {
        self.actions += 1;

        self.pile.reset(material::generate());
        self.board.initialize();
        self.cache.clear();
        self.discarded.clear();

        info!(seed = self.seed, capacity = self.cache.capacity(), "session started");

        self.emit(GameEventData::SessionStarted { seed: self.seed });
        self.emit(GameEventData::InHandChanged { token: None });
        for position in MaskPosition::ALL {
            self.emit(GameEventData::BoardChanged { position, token: None });
        }
        self.emit(GameEventData::CacheChanged { tokens: Vec::new() });
        self.emit(GameEventData::CacheCapacityChanged {
            capacity: self.cache.capacity(),
        });
        self.emit(GameEventData::PoolCountChanged {
            remaining: self.pile.remaining_count(),
        });
        self.emit(GameEventData::MaskComplete { complete: false });

        self.auto_advance()
    }

    /// Start over. Same as [`GameSession::start_game`].
    pub fn reset(&mut self) -> Advance {
        self.start_game()
    }

    /// Refill the empty hand from the pile.
    pub fn advance(&mut self) -> Result<Token, GameError> {
        let token = self.draw_into_hand()?;
        self.actions += 1;
        Ok(token)
    }

    /// Player-facing name for [`GameSession::advance`].
    pub fn draw(&mut self) -> Result<Token, GameError> {
        self.advance()
    }

    /// Move the in-hand token onto the board, then advance.
    pub fn place(&mut self, position: MaskPosition) -> Result<Advance, GameError> {
        let token = self.pile.in_hand().ok_or(GameError::NoCurrentToken)?;
        if self.board.is_occupied(position) {
            debug!(%position, "place rejected: occupied");
            return Err(GameError::PositionOccupied(position));
        }

        self.pile.take_in_hand().map_err(|_| GameError::NoCurrentToken)?;
        self.actions += 1;
        let placed = self.board.place(position, token);
        debug_assert!(placed, "{} checked empty before place", position);
        debug!(%token, %position, "placed");

        self.emit(GameEventData::InHandChanged { token: None });
        self.emit(GameEventData::BoardChanged {
            position,
            token: Some(token),
        });
        if self.board.is_complete() {
            info!("mask complete");
            self.emit(GameEventData::MaskComplete { complete: true });
        }

        Ok(self.auto_advance())
    }

    /// Park the in-hand token in the cache, then advance.
    pub fn cache_current(&mut self) -> Result<Advance, GameError> {
        let token = self.pile.in_hand().ok_or(GameError::NoCurrentToken)?;
        if self.cache.is_full() {
            debug!(capacity = self.cache.capacity(), "cache rejected: full");
            return Err(GameError::CacheFull);
        }

        self.pile.take_in_hand().map_err(|_| GameError::NoCurrentToken)?;
        self.actions += 1;
        let added = self.cache.add(token);
        debug_assert!(added, "cache checked not full before add");
        debug!(%token, size = self.cache.len(), "cached");

        self.emit(GameEventData::InHandChanged { token: None });
        self.emit(GameEventData::CacheChanged {
            tokens: self.cache.contents(),
        });

        Ok(self.auto_advance())
    }

    /// Permanently remove the in-hand token, then advance.
    pub fn discard(&mut self) -> Result<Advance, GameError> {
        let token = self
            .pile
            .take_in_hand()
            .map_err(|_| GameError::NoCurrentToken)?;

        self.actions += 1;
        self.discarded.push(token);
        debug!(%token, "discarded");

        self.emit(GameEventData::InHandChanged { token: None });
        self.emit(GameEventData::TokenDiscarded { token });

        Ok(self.auto_advance())
    }

    /// Move a cached token into the empty hand. Does not advance.
    pub fn retrieve(&mut self, token: Token) -> Result<(), GameError> {
        if self.pile.in_hand().is_some() {
            return Err(GameError::AlreadyHolding);
        }
        if !self.cache.contains(&token) {
            return Err(GameError::NotInCache(token));
        }

        self.pile.set_in_hand(token).map_err(|_| GameError::AlreadyHolding)?;
        let removed = self.cache.remove(&token);
        debug_assert!(removed, "{} checked present before remove", token);
        self.actions += 1;
        debug!(%token, "retrieved from cache");

        self.emit(GameEventData::CacheChanged {
            tokens: self.cache.contents(),
        });
        self.emit(GameEventData::InHandChanged { token: Some(token) });
        Ok(())
    }

    /// Take a placed token back into the empty hand. Does not advance.
    pub fn lift(&mut self, position: MaskPosition) -> Result<Token, GameError> {
        if self.pile.in_hand().is_some() {
            return Err(GameError::AlreadyHolding);
        }
        let token = self
            .board
            .get(position)
            .ok_or(GameError::PositionEmpty(position))?;

        self.pile.set_in_hand(token).map_err(|_| GameError::AlreadyHolding)?;
        let was_complete = self.board.is_complete();
        self.board.remove(position);
        self.actions += 1;
        debug!(%token, %position, "lifted from board");

        self.emit(GameEventData::BoardChanged {
            position,
            token: None,
        });
        self.emit(GameEventData::InHandChanged { token: Some(token) });
        if was_complete {
            self.emit(GameEventData::MaskComplete { complete: false });
        }
        Ok(token)
    }

    /// Submit the mask. Only a complete board succeeds.
    pub fn submit(&mut self) -> Result<(), GameError> {
        if !self.board.is_complete() {
            debug!(occupied = self.board.occupied_count(), "submit rejected");
            self.emit(GameEventData::SubmitResult {
                success: false,
                message: SUBMIT_INCOMPLETE_MESSAGE.to_string(),
            });
            return Err(GameError::MaskIncomplete);
        }

        info!(actions = self.actions, "mask submitted");
        self.emit(GameEventData::SubmitResult {
            success: true,
            message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        });
        Ok(())
    }

    /// Resize the cache. The size is clamped to [3, 10].
    ///
    /// Tokens evicted from the tail are discarded permanently and returned
    /// (most recent first) so the caller can report them.
    pub fn set_cache_size(&mut self, requested: usize) -> Vec<Token> {
        let capacity = clamp_capacity(requested);
        let evicted = self.cache.set_capacity(capacity);
        self.actions += 1;

        self.emit(GameEventData::CacheCapacityChanged { capacity });
        if !evicted.is_empty() {
            warn!(capacity, evicted = evicted.len(), "cache shrink discarded tokens");
            self.discarded.extend(evicted.iter().copied());
            self.emit(GameEventData::CacheEvicted {
                tokens: evicted.clone(),
            });
            self.emit(GameEventData::CacheChanged {
                tokens: self.cache.contents(),
            });
        }
        evicted
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current in-hand token.
    pub fn in_hand(&self) -> Option<Token> {
        self.pile.in_hand()
    }

    /// In-hand slot as a state.
    pub fn hand_state(&self) -> HandState {
        match self.pile.in_hand() {
            Some(token) => HandState::Holding(token),
            None => HandState::Empty,
        }
    }

    /// Tokens left to draw.
    pub fn remaining_count(&self) -> usize {
        self.pile.remaining_count()
    }

    /// Cached tokens in insertion order.
    pub fn cache_contents(&self) -> Vec<Token> {
        self.cache.contents()
    }

    /// Current cache capacity.
    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Whether the cache is at capacity.
    pub fn is_cache_full(&self) -> bool {
        self.cache.is_full()
    }

    /// Copy of the board.
    pub fn board_snapshot(&self) -> BTreeMap<MaskPosition, Option<Token>> {
        self.board.snapshot()
    }

    /// Read-only board access.
    pub fn board(&self) -> &MaskBoard {
        &self.board
    }

    /// Whether all nine positions are filled.
    pub fn is_complete(&self) -> bool {
        self.board.is_complete()
    }

    /// Tokens removed from play, in removal order.
    pub fn discarded(&self) -> &[Token] {
        &self.discarded
    }

    /// Seed recorded for this session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Successful mutations so far.
    pub fn actions(&self) -> u32 {
        self.actions
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView {
            in_hand: self.pile.in_hand(),
            remaining: self.pile.remaining_count(),
            cache: self.cache.contents(),
            cache_capacity: self.cache.capacity(),
            board: self.board.snapshot(),
            complete: self.board.is_complete(),
            discarded: self.discarded.len(),
        }
    }

    /// Tokens across pile, hand, cache, board and discard.
    ///
    /// Equals the catalog size at every point after `start_game`.
    pub fn accounted_count(&self) -> usize {
        self.pile.remaining_count()
            + usize::from(self.pile.in_hand().is_some())
            + self.cache.len()
            + self.board.occupied_count()
            + self.discarded.len()
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.seed, self.actions, |hasher| {
            hasher.update_u32(self.pile.remaining_count() as u32);
            for token in self.pile.remaining() {
                token.hash_into(hasher);
            }

            hasher.update_bool(self.pile.in_hand().is_some());
            if let Some(token) = self.pile.in_hand() {
                token.hash_into(hasher);
            }

            hasher.update_u8(self.cache.capacity() as u8);
            for token in self.cache.as_slice() {
                token.hash_into(hasher);
            }

            for (position, slot) in self.board.snapshot() {
                hasher.update_u8(position.index() as u8);
                hasher.update_bool(slot.is_some());
                if let Some(token) = slot {
                    token.hash_into(hasher);
                }
            }

            hasher.update_u32(self.discarded.len() as u32);
            for token in &self.discarded {
                token.hash_into(hasher);
            }
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Draw into the hand and notify, without counting an action.
    fn draw_into_hand(&mut self) -> Result<Token, GameError> {
        match self.pile.draw(&mut self.rng) {
            Ok(token) => {
                debug!(%token, remaining = self.pile.remaining_count(), "drew");
                self.emit(GameEventData::InHandChanged { token: Some(token) });
                self.emit(GameEventData::PoolCountChanged {
                    remaining: self.pile.remaining_count(),
                });
                Ok(token)
            }
            Err(PileError::Empty) => {
                debug!("pool exhausted");
                self.emit(GameEventData::PoolExhausted);
                Err(GameError::PoolExhausted)
            }
            Err(PileError::AlreadyHolding) => Err(GameError::AlreadyHolding),
        }
    }

    /// Refill step after a successful move. The hand is empty here, so
    /// the only possible failure is exhaustion.
    fn auto_advance(&mut self) -> Advance {
        match self.draw_into_hand() {
            Ok(token) => Advance::Drew(token),
            Err(_) => Advance::PoolExhausted,
        }
    }

    fn emit(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.actions, data);
        for observer in &mut self.observers {
            event.notify(observer.as_mut());
        }
        self.pending_events.push(event);
    }
}

impl<R: DrawSource> fmt::Debug for GameSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.seed)
            .field("actions", &self.actions)
            .field("in_hand", &self.pile.in_hand())
            .field("remaining", &self.pile.remaining_count())
            .field("cache", &self.cache)
            .field("board", &self.board)
            .field("discarded", &self.discarded.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
