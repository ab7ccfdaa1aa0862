//! Configuration types for the dice game.

use crate::SimulationError;
use serde::Serialize;

/// Shape of the production line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineConfig {
    /// Number of stations in the line.
    pub stages: usize,

    /// Faces on the die each station rolls for its capacity.
    pub die_sides: u32,

    /// Raw units released into the first buffer every round.
    pub release_rate: u32,

    /// WIP placed in every buffer before the first round.
    pub initial_buffer: u32,
}

impl LineConfig {
    /// Create a line configuration with the classic defaults.
    pub fn new() -> Self {
        Self {
            stages: 5,
            die_sides: 6,
            release_rate: 4,
            initial_buffer: 3,
        }
    }

    /// Set the number of stages.
    pub fn with_stages(mut self, stages: usize) -> Self {
        self.stages = stages;
        self
    }

    /// Set the number of faces on the die.
    pub fn with_die_sides(mut self, die_sides: u32) -> Self {
        self.die_sides = die_sides;
        self
    }

    /// Set the per-round release rate.
    pub fn with_release_rate(mut self, release_rate: u32) -> Self {
        self.release_rate = release_rate;
        self
    }

    /// Set the initial WIP of every buffer.
    pub fn with_initial_buffer(mut self, initial_buffer: u32) -> Self {
        self.initial_buffer = initial_buffer;
        self
    }

    /// Check the line can be simulated.
    ///
    /// Release rate and initial buffer are unsigned, so only the stage count
    /// and die size can be out of range.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.stages < 1 {
            return Err(SimulationError::invalid(
                "stages",
                ">= 1",
                self.stages as u64,
            ));
        }
        if self.die_sides < 2 {
            return Err(SimulationError::invalid(
                "die_sides",
                ">= 2",
                u64::from(self.die_sides),
            ));
        }
        Ok(())
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a set of independent replications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplicationConfig {
    /// Line every replication simulates.
    pub line: LineConfig,

    /// Rounds per replication.
    pub rounds: usize,

    /// Number of independent runs.
    pub replications: usize,

    /// Seed of the first replication. Replication `i` uses `base_seed + i`.
    /// `None` draws every replication from fresh entropy.
    pub base_seed: Option<u64>,
}

impl ReplicationConfig {
    /// Create a single unseeded replication of 20 rounds over `line`.
    pub fn new(line: LineConfig) -> Self {
        Self {
            line,
            rounds: 20,
            replications: 1,
            base_seed: None,
        }
    }

    /// Set the rounds per replication.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the number of replications.
    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    /// Seed the set for reproducible output.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    /// Seed for the replication at `index`, if the set is seeded.
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.base_seed.map(|seed| seed.wrapping_add(index as u64))
    }

    /// Check the line, the round count and the replication count.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.line.validate()?;
        if self.rounds < 1 {
            return Err(SimulationError::invalid(
                "rounds",
                ">= 1",
                self.rounds as u64,
            ));
        }
        if self.replications < 1 {
            return Err(SimulationError::invalid(
                "replications",
                ">= 1",
                self.replications as u64,
            ));
        }
        Ok(())
    }
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self::new(LineConfig::default())
    }
}
