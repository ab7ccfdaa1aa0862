//! Per-round state transition of the stage chain.
//!
//! A round releases raw material into the first buffer, then walks the
//! stations in order. Each station rolls its capacity, processes as much of
//! its available material as the roll allows and hands the result to the
//! next station. Station `i + 1` always sees station `i`'s output from the
//! same round, so stages within a round never run concurrently.

use crate::capacity::CapacitySource;
use crate::config::LineConfig;
use crate::SimulationError;
use serde::Serialize;
use tracing::trace;

/// What one station did in one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    /// 0-based position in the line.
    pub stage: usize,
    /// Capacity rolled this round.
    pub roll: u32,
    /// Buffer contents plus units handed over from upstream.
    pub available: u64,
    /// `min(available, roll)`.
    pub processed: u64,
    /// `available - processed`, left in the buffer.
    pub buffer_after: u64,
    /// Less material than capacity.
    pub starved: bool,
    /// Material left over after processing.
    pub blocked: bool,
}

impl StageOutcome {
    fn new(stage: usize, roll: u32, available: u64) -> Self {
        let capacity = u64::from(roll);
        let processed = available.min(capacity);
        let buffer_after = available - processed;
        Self {
            stage,
            roll,
            available,
            processed,
            buffer_after,
            starved: available < capacity,
            blocked: buffer_after > 0,
        }
    }
}

/// One simulated round across the whole line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    /// 1-based round number.
    pub round_index: usize,
    /// Units leaving the last station.
    pub throughput: u64,
    /// Sum of all buffers after the round.
    pub wip: u64,
    /// One entry per station, in line order.
    pub stage_outcomes: Vec<StageOutcome>,
}

impl RoundOutcome {
    /// Rolls of every station, in line order.
    pub fn rolls(&self) -> Vec<u32> {
        self.stage_outcomes.iter().map(|s| s.roll).collect()
    }

    /// Output of every station, in line order.
    pub fn processed(&self) -> Vec<u64> {
        self.stage_outcomes.iter().map(|s| s.processed).collect()
    }

    /// Buffer of every station after the round, in line order.
    pub fn buffers(&self) -> Vec<u64> {
        self.stage_outcomes.iter().map(|s| s.buffer_after).collect()
    }
}

/// Buffers of a serial line, one per station.
///
/// Owned by a single runner and carried from round to round. Buffers are
/// `u64` so a `u32` release rate can accumulate for billions of rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageChain {
    buffers: Vec<u64>,
    release_rate: u32,
    die_sides: u32,
}

impl StageChain {
    /// Create a chain with every buffer at `initial_buffer`.
    pub fn new(config: &LineConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            buffers: vec![u64::from(config.initial_buffer); config.stages],
            release_rate: config.release_rate,
            die_sides: config.die_sides,
        })
    }

    /// Current buffer contents.
    pub fn buffers(&self) -> &[u64] {
        &self.buffers
    }

    /// Total WIP currently held in the line.
    pub fn wip(&self) -> u64 {
        self.buffers.iter().sum()
    }

    /// Play one round, mutating the buffers in place.
    pub fn play_round(
        &mut self,
        round_index: usize,
        source: &mut impl CapacitySource,
    ) -> RoundOutcome {
        // Release happens before any station runs, regardless of downstream state.
        let mut incoming = u64::from(self.release_rate);
        let mut stage_outcomes = Vec::with_capacity(self.buffers.len());

        for (stage, buffer) in self.buffers.iter_mut().enumerate() {
            let available = *buffer + incoming;
            let roll = source.draw(1, self.die_sides);
            let outcome = StageOutcome::new(stage, roll, available);

            *buffer = outcome.buffer_after;
            incoming = outcome.processed;
            stage_outcomes.push(outcome);
        }

        let round = RoundOutcome {
            round_index,
            throughput: incoming,
            wip: self.wip(),
            stage_outcomes,
        };

        trace!(
            round = round.round_index,
            throughput = round.throughput,
            wip = round.wip,
            "Round complete"
        );

        round
    }
}
