//! Game Events
//!
//! Events generated by session mutations. They are queued on the session
//! for replay/diagnostics and dispatched to registered observers.

use serde::{Serialize, Deserialize};

use crate::game::material::{MaskPosition, Token};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A new catalog was dealt
    SessionStarted {
        seed: u64,
    },

    /// In-hand slot changed
    InHandChanged {
        token: Option<Token>,
    },

    /// A board position changed
    BoardChanged {
        position: MaskPosition,
        token: Option<Token>,
    },

    /// Cache contents changed (insertion order)
    CacheChanged {
        tokens: Vec<Token>,
    },

    /// Cache capacity changed
    CacheCapacityChanged {
        capacity: usize,
    },

    /// Remaining pile count changed
    PoolCountChanged {
        remaining: usize,
    },

    /// Board completeness flipped
    MaskComplete {
        complete: bool,
    },

    /// Result of a submit attempt
    SubmitResult {
        success: bool,
        message: String,
    },

    /// Token permanently removed by the player
    TokenDiscarded {
        token: Token,
    },

    /// Tokens evicted (and discarded) by a cache shrink
    CacheEvicted {
        tokens: Vec<Token>,
    },

    /// Advance found the pile empty
    PoolExhausted,
}

/// A game event stamped with the action that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Action counter when the event occurred
    pub action: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(action: u32, data: GameEventData) -> Self {
        Self { action, data }
    }

    /// Deliver this event to an observer.
    pub fn notify(&self, observer: &mut dyn SessionObserver) {
        match &self.data {
            GameEventData::InHandChanged { token } => observer.on_in_hand_changed(*token),
            GameEventData::BoardChanged { position, token } => {
                observer.on_board_changed(*position, *token)
            }
            GameEventData::CacheChanged { tokens } => observer.on_cache_changed(tokens),
            GameEventData::CacheCapacityChanged { capacity } => {
                observer.on_cache_capacity_changed(*capacity)
            }
            GameEventData::PoolCountChanged { remaining } => {
                observer.on_pool_count_changed(*remaining)
            }
            GameEventData::MaskComplete { complete } => observer.on_mask_complete(*complete),
            GameEventData::SubmitResult { success, message } => {
                observer.on_submit_result(*success, message)
            }
            GameEventData::PoolExhausted => observer.on_pool_exhausted(),
            GameEventData::SessionStarted { .. }
            | GameEventData::TokenDiscarded { .. }
            | GameEventData::CacheEvicted { .. } => {}
        }
        observer.on_event(self);
    }
}

/// View-side collaborator notified after each successful mutation.
///
/// All methods default to no-ops so a view implements only what it renders.
/// Observers never get mutable access to the session.
pub trait SessionObserver {
    /// The in-hand token changed.
    fn on_in_hand_changed(&mut self, _token: Option<Token>) {}

    /// A board position changed.
    fn on_board_changed(&mut self, _position: MaskPosition, _token: Option<Token>) {}

    /// Cache contents changed.
    fn on_cache_changed(&mut self, _tokens: &[Token]) {}

    /// Cache capacity changed.
    fn on_cache_capacity_changed(&mut self, _capacity: usize) {}

    /// Remaining pile count changed.
    fn on_pool_count_changed(&mut self, _remaining: usize) {}

    /// Mask completeness changed.
    fn on_mask_complete(&mut self, _complete: bool) {}

    /// A submit was attempted.
    fn on_submit_result(&mut self, _success: bool, _message: &str) {}

    /// An advance found the pile empty.
    fn on_pool_exhausted(&mut self) {}

    /// Every event, after the specific callback.
    fn on_event(&mut self, _event: &GameEvent) {}
}
