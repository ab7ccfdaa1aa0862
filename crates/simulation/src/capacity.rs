//! Random capacity draws.
//!
//! Every station rolls a die each round to decide how much it can process.
//! The runner only sees the [`CapacitySource`] trait, so tests can swap the
//! die for a scripted sequence of rolls (`ScriptedRolls`, behind the
//! `test-utils` feature).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed integer capacities.
pub trait CapacitySource {
    /// Draw a value uniformly from `low..=high`.
    fn draw(&mut self, low: u32, high: u32) -> u32;
}

/// Die backed by a ChaCha stream.
///
/// Seeded instances replay the exact same rolls. Each runner owns one
/// instance; replications never share a stream.
#[derive(Clone, Debug)]
pub struct CapacityRng {
    inner: ChaCha8Rng,
}

impl CapacityRng {
    /// Create a reproducible source from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a non-reproducible source from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl CapacitySource for CapacityRng {
    fn draw(&mut self, low: u32, high: u32) -> u32 {
        self.inner.gen_range(low..=high)
    }
}

/// Replays a fixed sequence of rolls, cycling when exhausted.
///
/// Test fixture for pinning exact rolls. Panics on an empty script or on a
/// roll outside the requested range.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    rolls: Vec<u32>,
    next: usize,
}

#[cfg(any(test, feature = "test-utils"))]
impl ScriptedRolls {
    /// Create a script. Panics if `rolls` is empty.
    pub fn new(rolls: impl Into<Vec<u32>>) -> Self {
        let rolls = rolls.into();
        assert!(!rolls.is_empty(), "script needs at least one roll");
        Self { rolls, next: 0 }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl CapacitySource for ScriptedRolls {
    fn draw(&mut self, low: u32, high: u32) -> u32 {
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        assert!(
            (low..=high).contains(&roll),
            "scripted roll {roll} outside {low}..={high}"
        );
        roll
    }
}
