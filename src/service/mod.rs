//! Session Service
//!
//! Serialized access to one session from many tasks or threads.
//! A single task owns the session and applies commands in arrival order,
//! so multi-step moves (move, then advance) never interleave.

pub mod actor;

pub use actor::{SessionHandle, ServiceError};
