//! Core deterministic primitives.
//!
//! Randomness and state fingerprints shared by the game engine. Nothing in
//! here knows about tokens or boards.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, DrawSource, derive_session_seed};
pub use hash::{StateHash, StateHasher, compute_state_hash};
