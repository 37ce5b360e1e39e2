//! Cache Store
//!
//! Bounded parking buffer for tokens. Insertion order is kept for display
//! slotting only.

use tracing::trace;

use crate::game::material::Token;
use crate::{MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY, DEFAULT_CACHE_CAPACITY};

/// Clamp a requested capacity into the supported range.
#[inline]
pub fn clamp_capacity(requested: usize) -> usize {
    requested.clamp(MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY)
}

/// Capacity-bounded token buffer.
#[derive(Clone, Debug)]
pub struct CacheStore {
    tokens: Vec<Token>,
    capacity: usize,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CacheStore {
    /// Create an empty cache. Capacity is clamped to [3, 10].
    pub fn new(capacity: usize) -> Self {
        let capacity = clamp_capacity(capacity);
        Self {
            tokens: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a token. Returns false without mutating if full.
    pub fn add(&mut self, token: Token) -> bool {
        if self.is_full() {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Remove a token. Returns false if it is not cached.
    pub fn remove(&mut self, token: &Token) -> bool {
        match self.tokens.iter().position(|t| t == token) {
            Some(idx) => {
                self.tokens.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether the token is cached.
    pub fn contains(&self, token: &Token) -> bool {
        self.tokens.contains(token)
    }

    /// Change capacity, evicting from the tail if needed.
    ///
    /// The requested value is clamped to [3, 10]. Evicted tokens are
    /// returned most-recent first; the caller decides their fate.
    pub fn set_capacity(&mut self, requested: usize) -> Vec<Token> {
        self.capacity = clamp_capacity(requested);

        let mut evicted = Vec::new();
        while self.tokens.len() > self.capacity {
            if let Some(token) = self.tokens.pop() {
                evicted.push(token);
            }
        }

        if !evicted.is_empty() {
            trace!(capacity = self.capacity, evicted = evicted.len(), "cache shrank below size");
        }
        evicted
    }

    /// Drop every cached token, keeping capacity.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Snapshot of cached tokens in insertion order.
    pub fn contents(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    /// Borrowed view of cached tokens.
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether size has reached capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    /// Current capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the cache holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
