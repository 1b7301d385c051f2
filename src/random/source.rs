//! ChaCha-backed integer source with a fixed-seed mode.
//!
//! # Seeding Model
//!
//! A fixed seed value is expanded to the 32-byte ChaCha key with BLAKE3:
//!
//! ```text
//! key = BLAKE3(domain || seed_le_bytes)
//! ```
//!
//! so small neighbouring seeds still give unrelated streams, and the same
//! seed always reproduces the same sequence of draws.

use blake3::Hasher;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use std::collections::VecDeque;

/// Domain separator for seed expansion.
const SEED_DOMAIN: &[u8] = b"fauxtoshop-random-seed-v1";

/// Seed used when the caller asks for reproducible output without naming one.
pub const DEFAULT_FIXED_SEED: u64 = 106;

/// Source of inclusive-range integer draws.
///
/// Filters that need randomness take `&mut impl RandomSource`, so the
/// caller decides between OS-seeded, fixed-seed or scripted draws.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `[low, high]`.
    ///
    /// If `low > high` the bounds are swapped.
    fn random_integer(&mut self, low: i64, high: i64) -> i64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_integer(&mut self, low: i64, high: i64) -> i64 {
        (**self).random_integer(low, high)
    }
}

/// ChaCha20 random source.
pub struct ChaChaSource {
    inner: ChaCha20Rng,
    /// Seed value, if created in fixed-seed mode.
    seed: Option<u64>,
    /// Number of `random_integer` calls served.
    draws: u64,
}

impl ChaChaSource {
    /// Creates a source keyed from the OS entropy source.
    pub fn from_os_entropy() -> Self {
        let mut key = [0u8; 32];
        rand_core::OsRng.fill_bytes(&mut key);

        Self {
            inner: ChaCha20Rng::from_seed(key),
            seed: None,
            draws: 0,
        }
    }

    /// Creates a reproducible source from a seed value.
    pub fn from_seed_value(seed: u64) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(&seed.to_le_bytes());
        let key: [u8; 32] = *hasher.finalize().as_bytes();

        tracing::debug!(seed, "random source seeded");

        Self {
            inner: ChaCha20Rng::from_seed(key),
            seed: Some(seed),
            draws: 0,
        }
    }

    /// Creates a source seeded with [`DEFAULT_FIXED_SEED`].
    pub fn fixed() -> Self {
        Self::from_seed_value(DEFAULT_FIXED_SEED)
    }

    /// The seed value, or `None` when OS-seeded.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of integers drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ChaChaSource {
    fn random_integer(&mut self, low: i64, high: i64) -> i64 {
        self.draws += 1;
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let span = high.wrapping_sub(low) as u64;
        if span == u64::MAX {
            return self.inner.next_u64() as i64;
        }
        let span = span + 1;

        // Reject the top sliver of u64 so every residue is equally likely.
        let reject = (u64::MAX - span + 1) % span;
        let zone = u64::MAX - reject;
        loop {
            let v = self.inner.next_u64();
            if v <= zone {
                return low.wrapping_add((v % span) as i64);
            }
        }
    }
}

impl std::fmt::Debug for ChaChaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaChaSource")
            .field("seed", &self.seed)
            .field("draws", &self.draws)
            .finish()
    }
}

/// Replays a recorded sequence of integers.
///
/// Each draw takes the next recorded value and folds it into the requested
/// range with `low + value.rem_euclid(span)`. The sequence wraps around once
/// exhausted; an empty script always yields `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: VecDeque<i64>,
}

impl ScriptedSource {
    /// Creates a source that replays `values` in order.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn random_integer(&mut self, low: i64, high: i64) -> i64 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let Some(value) = self.values.pop_front() else {
            return low;
        };
        self.values.push_back(value);
        // Widened so a full i64 range cannot overflow; the result is within
        // [low, high] before narrowing.
        let span = i128::from(high) - i128::from(low) + 1;
        (i128::from(low) + i128::from(value).rem_euclid(span)) as i64
    }
}
