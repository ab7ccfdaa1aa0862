//! Single-run simulation driver.

use crate::capacity::{CapacityRng, CapacitySource};
use crate::config::LineConfig;
use crate::round::{RoundOutcome, StageChain};
use crate::stats::{mean, population_stdev};
use crate::SimulationError;
use serde::Serialize;
use tracing::debug;

/// Aggregate view of one complete run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationSummary {
    /// Every round in play order.
    pub rounds: Vec<RoundOutcome>,
    /// Mean units out of the line per round.
    pub avg_throughput: f64,
    /// Population standard deviation of per-round throughput.
    pub throughput_stdev: f64,
    /// Mean WIP after each round.
    pub avg_wip: f64,
    /// Units out of the line over the whole run.
    pub total_throughput: u64,
    /// Fraction of rounds each station was starved.
    pub stage_starved_ratio: Vec<f64>,
    /// Fraction of rounds each station was blocked.
    pub stage_blocked_ratio: Vec<f64>,
}

impl SimulationSummary {
    /// Aggregate the round history of a line with `stages` stations.
    ///
    /// An empty history has no per-round ratios and is rejected. Outcomes
    /// for stations at or past `stages` are ignored.
    pub fn from_history(
        rounds: Vec<RoundOutcome>,
        stages: usize,
    ) -> Result<Self, SimulationError> {
        if rounds.is_empty() {
            return Err(SimulationError::invalid("rounds", ">= 1", 0));
        }

        let throughput: Vec<f64> = rounds.iter().map(|r| r.throughput as f64).collect();
        let wip: Vec<f64> = rounds.iter().map(|r| r.wip as f64).collect();

        let mut starved = vec![0usize; stages];
        let mut blocked = vec![0usize; stages];
        for outcome in rounds.iter().flat_map(|r| &r.stage_outcomes) {
            if let Some(count) = starved.get_mut(outcome.stage) {
                *count += usize::from(outcome.starved);
            }
            if let Some(count) = blocked.get_mut(outcome.stage) {
                *count += usize::from(outcome.blocked);
            }
        }

        let n = rounds.len() as f64;
        let ratio = |counts: Vec<usize>| -> Vec<f64> {
            counts.into_iter().map(|c| c as f64 / n).collect()
        };

        Ok(Self {
            avg_throughput: mean(&throughput),
            throughput_stdev: population_stdev(&throughput),
            avg_wip: mean(&wip),
            total_throughput: rounds.iter().map(|r| r.throughput).sum(),
            stage_starved_ratio: ratio(starved),
            stage_blocked_ratio: ratio(blocked),
            rounds,
        })
    }

    /// Number of stations in the simulated line.
    pub fn stage_count(&self) -> usize {
        self.stage_starved_ratio.len()
    }
}

/// A dice game over one line, driven round by round.
///
/// Owns its buffers and its capacity source. Construct a new game for every
/// run; state is never shared between games.
#[derive(Debug)]
pub struct DiceGame<S = CapacityRng> {
    config: LineConfig,
    chain: StageChain,
    source: S,
}

impl DiceGame<CapacityRng> {
    /// Create a game with a ChaCha die, seeded when `seed` is given.
    pub fn new(config: LineConfig, seed: Option<u64>) -> Result<Self, SimulationError> {
        Self::with_source(config, CapacityRng::from_seed(seed))
    }
}

impl<S: CapacitySource> DiceGame<S> {
    /// Create a game drawing capacities from `source`.
    pub fn with_source(config: LineConfig, source: S) -> Result<Self, SimulationError> {
        Ok(Self {
            chain: StageChain::new(&config)?,
            config,
            source,
        })
    }

    /// Line this game simulates.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Current buffer contents.
    pub fn buffers(&self) -> &[u64] {
        self.chain.buffers()
    }

    /// Play a single round.
    pub fn play_round(&mut self, round_index: usize) -> RoundOutcome {
        self.chain.play_round(round_index, &mut self.source)
    }

    /// Play `rounds` rounds and aggregate them.
    ///
    /// Fails before playing anything if `rounds` is zero.
    pub fn simulate(&mut self, rounds: usize) -> Result<SimulationSummary, SimulationError> {
        if rounds < 1 {
            return Err(SimulationError::invalid("rounds", ">= 1", rounds as u64));
        }

        let history: Vec<RoundOutcome> = (1..=rounds).map(|i| self.play_round(i)).collect();
        let summary = SimulationSummary::from_history(history, self.config.stages)?;

        debug!(
            rounds,
            stages = self.config.stages,
            avg_throughput = summary.avg_throughput,
            avg_wip = summary.avg_wip,
            "Simulation complete"
        );

        Ok(summary)
    }
}
