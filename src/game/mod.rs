//! Game Logic Module
//!
//! The puzzle engine. Deterministic given a seed.
//!
//! ## Module Structure
//!
//! - `material`: Shapes, colors, mask positions, tokens, catalog
//! - `pile`: Remaining tokens and the in-hand slot
//! - `cache`: Bounded parking buffer
//! - `mask`: The nine-slot board
//! - `session`: Orchestrator enforcing every move rule
//! - `events`: Session events and the observer interface
//! - `config`: Session configuration

pub mod material;
pub mod pile;
pub mod cache;
pub mod mask;
pub mod session;
pub mod events;
pub mod config;

// Re-export key types
pub use material::{Shape, Color, MaskPosition, Token, generate};
pub use pile::{DrawPile, PileError};
pub use cache::CacheStore;
pub use mask::MaskBoard;
pub use session::{GameSession, GameError, HandState, Advance, SessionView};
pub use events::{GameEvent, GameEventData, SessionObserver};
pub use config::{SessionConfig, ConfigError};
