//! Seedable randomness for room codes and simulated players.
//!
//! Uses ChaCha8 so a seed fully determines every code and every pick, which
//! keeps session tests reproducible. Interactive hosts seed from entropy.
//!
//! ```
//! use dots_boxes::core::SessionRng;
//!
//! let mut a = SessionRng::new(42);
//! let mut b = SessionRng::new(42);
//! assert_eq!(a.room_code(), b.room_code());
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::RoomCode;

/// Deterministic RNG for session-level choices.
#[derive(Clone, Debug)]
pub struct SessionRng {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl SessionRng {
    /// Create an RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this RNG was created with, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw a room code uniformly from `1000..=9999`.
    pub fn room_code(&mut self) -> RoomCode {
        RoomCode::clamped(self.inner.gen_range(RoomCode::MIN..=RoomCode::MAX))
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

impl Default for SessionRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SessionRng::new(12345);
        let mut rng2 = SessionRng::new(12345);

        for _ in 0..50 {
            assert_eq!(rng1.room_code(), rng2.room_code());
        }
    }

    #[test]
    fn test_room_codes_in_range() {
        let mut rng = SessionRng::new(7);
        for _ in 0..1000 {
            let code = rng.room_code();
            assert!((1000..=9999).contains(&code.value()));
            assert_eq!(code.to_string().len(), 4);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut rng1 = SessionRng::new(1);
        let mut rng2 = SessionRng::new(2);

        let codes1: Vec<_> = (0..10).map(|_| rng1.room_code()).collect();
        let codes2: Vec<_> = (0..10).map(|_| rng2.room_code()).collect();
        assert_ne!(codes1, codes2);
    }

    #[test]
    fn test_choose() {
        let mut rng = SessionRng::new(42);
        let items = [1, 2, 3, 4, 5];

        let chosen = rng.choose(&items).unwrap();
        assert!(items.contains(chosen));

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_seed_recorded() {
        assert_eq!(SessionRng::new(9).seed(), Some(9));
        assert_eq!(SessionRng::from_entropy().seed(), None);
    }
}
