//! # Mask Forge
//!
//! Game-state engine for a single-player matching puzzle: route each drawn
//! material to one of nine mask slots, park it in a bounded cache, or
//! discard it. The puzzle is solved when all nine slots are filled.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MASK FORGE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - xoroshiro128+ draw source                 │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Puzzle engine (deterministic)             │
//! │  ├── material.rs - Shapes, colors, tokens, catalog           │
//! │  ├── pile.rs     - Remaining tokens + in-hand slot           │
//! │  ├── cache.rs    - Bounded parking buffer                    │
//! │  ├── mask.rs     - Nine-slot board                           │
//! │  ├── session.rs  - Orchestrator / hand state machine         │
//! │  ├── events.rs   - Events + observer interface               │
//! │  └── config.rs   - Session configuration                     │
//! │                                                              │
//! │  service/        - Serialized cross-task access              │
//! │  └── actor.rs    - Session task + cloneable handle           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token conservation
//!
//! Every token of the 42-token catalog is in exactly one of: the pile, the
//! hand, the cache, the board, or the discard. Only discard (and cache
//! shrink eviction) takes a token out of play.
//!
//! ## Example
//!
//! ```
//! use mask_forge::{GameSession, MaskPosition};
//!
//! let mut session = GameSession::seeded(7);
//! session.start_game();
//! session.place(MaskPosition::Nose).unwrap();
//! assert_eq!(session.remaining_count(), 40);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod service;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, DrawSource};
pub use game::material::{Shape, Color, MaskPosition, Token};
pub use game::session::{GameSession, GameError, HandState, Advance, SessionView};
pub use game::events::{GameEvent, GameEventData, SessionObserver};
pub use game::config::{SessionConfig, ConfigError};
pub use service::{SessionHandle, ServiceError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokens in one session catalog (3 shapes x 7 colors x 2 copies)
pub const CATALOG_SIZE: usize = 42;

/// Positions on the mask
pub const MASK_SLOT_COUNT: usize = 9;

/// Smallest allowed cache capacity
pub const MIN_CACHE_CAPACITY: usize = 3;

/// Largest allowed cache capacity
pub const MAX_CACHE_CAPACITY: usize = 10;

/// Cache capacity for a new session
pub const DEFAULT_CACHE_CAPACITY: usize = 5;
