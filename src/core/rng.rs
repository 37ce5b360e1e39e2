//! Deterministic Random Number Generator
//!
//! Uses xoroshiro128+ for fast, reproducible draws. Given the same seed, a
//! session deals tokens in exactly the same order on every platform.

use sha2::{Sha256, Digest};

/// Source of draw indices for the pile.
///
/// Implementors return an index in `[0, len)`. The engine never calls
/// `pick` with `len == 0`.
pub trait DrawSource {
    /// Pick an index uniformly from `[0, len)`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Deterministic PRNG using the xoroshiro128+ algorithm.
///
/// # Example
///
/// ```
/// use mask_forge::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Modulo bias is negligible for a 42-token pile
        (self.next_u64() % max as u64) as u32
    }

}

impl DrawSource for DeterministicRng {
    fn pick(&mut self, len: usize) -> usize {
        self.next_int(len as u32) as usize
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a session seed from a session identifier.
///
/// The seed is recorded on the session so a playthrough can be replayed
/// without keeping the identifier around.
pub fn derive_session_seed(session_id: &[u8; 16]) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"MASK_FORGE_SEED_V1");
    hasher.update(session_id);

    let hash = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[0..8]);
    u64::from_le_bytes(seed)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_int() {
        let mut rng = DeterministicRng::new(1234);

        for _ in 0..1000 {
            assert!(rng.next_int(42) < 42);
        }

        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_pick_in_range() {
        let mut rng = DeterministicRng::new(77);
        for len in 1..=42 {
            for _ in 0..50 {
                assert!(rng.pick(len) < len);
            }
        }
    }

    #[test]
    fn test_derive_session_seed() {
        let seed1 = derive_session_seed(&[1u8; 16]);
        let seed2 = derive_session_seed(&[1u8; 16]);
        assert_eq!(seed1, seed2);

        let seed3 = derive_session_seed(&[2u8; 16]);
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_clone_continues_stream() {
        let mut rng = DeterministicRng::new(5555);

        for _ in 0..50 {
            rng.next_u64();
        }

        let mut fork = rng.clone();
        for _ in 0..10 {
            assert_eq!(fork.next_u64(), rng.next_u64());
        }
    }
}
