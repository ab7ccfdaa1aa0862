//! Independent replications and cross-run statistics.
//!
//! Each replication builds its own [`DiceGame`] with its own buffers and its
//! own die, seeded `base_seed + index`. Nothing is shared between them, so
//! they run on the rayon pool and are collected back in index order.

use crate::config::ReplicationConfig;
use crate::runner::{DiceGame, SimulationSummary};
use crate::stats::{mean, population_stdev};
use crate::SimulationError;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// Little's Law estimate of time in system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CycleTime {
    /// Mean WIP over mean throughput, in rounds.
    Rounds(f64),
    /// Nothing left the line, so the ratio has no value.
    Undefined,
}

impl CycleTime {
    /// Compute `wip / throughput`, or [`CycleTime::Undefined`] for zero throughput.
    pub fn littles_law(avg_wip: f64, avg_throughput: f64) -> Self {
        if avg_throughput > 0.0 {
            Self::Rounds(avg_wip / avg_throughput)
        } else {
            Self::Undefined
        }
    }

    /// The estimate in rounds, if defined.
    pub fn rounds(self) -> Option<f64> {
        match self {
            Self::Rounds(rounds) => Some(rounds),
            Self::Undefined => None,
        }
    }
}

/// Results of every replication plus cross-replication aggregates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplicationSet {
    /// One summary per replication, in replication order.
    pub summaries: Vec<SimulationSummary>,
    /// Mean of each run's average throughput.
    pub avg_throughput: f64,
    /// Mean of each run's own throughput stdev.
    pub intra_throughput_stdev: f64,
    /// Population stdev of the runs' average throughputs.
    pub inter_throughput_stdev: f64,
    /// Mean of each run's average WIP.
    pub avg_wip: f64,
    /// Little's Law over the two means above.
    pub cycle_time: CycleTime,
    /// Mean units out of the line per run.
    pub avg_total_output: f64,
}

impl ReplicationSet {
    /// Aggregate a non-empty set of summaries.
    pub fn from_summaries(summaries: Vec<SimulationSummary>) -> Self {
        let avg_throughputs: Vec<f64> = summaries.iter().map(|s| s.avg_throughput).collect();
        let stdevs: Vec<f64> = summaries.iter().map(|s| s.throughput_stdev).collect();
        let wips: Vec<f64> = summaries.iter().map(|s| s.avg_wip).collect();
        let totals: Vec<f64> = summaries
            .iter()
            .map(|s| s.total_throughput as f64)
            .collect();

        let avg_throughput = mean(&avg_throughputs);
        let avg_wip = mean(&wips);

        Self {
            avg_throughput,
            intra_throughput_stdev: mean(&stdevs),
            inter_throughput_stdev: population_stdev(&avg_throughputs),
            avg_wip,
            cycle_time: CycleTime::littles_law(avg_wip, avg_throughput),
            avg_total_output: mean(&totals),
            summaries,
        }
    }

    /// Number of replications.
    pub fn replication_count(&self) -> usize {
        self.summaries.len()
    }

    /// Rounds played by each replication.
    pub fn rounds_per_replication(&self) -> usize {
        self.summaries.first().map_or(0, |s| s.rounds.len())
    }

    /// Stations in the simulated line.
    pub fn stage_count(&self) -> usize {
        self.summaries.first().map_or(0, |s| s.stage_count())
    }

    /// Starved ratio of `stage`, averaged over replications.
    ///
    /// `None` if `stage` is outside the line.
    pub fn stage_starved_ratio(&self, stage: usize) -> Option<f64> {
        self.stage_mean(stage, |s| s.stage_starved_ratio.as_slice())
    }

    /// Blocked ratio of `stage`, averaged over replications.
    ///
    /// `None` if `stage` is outside the line.
    pub fn stage_blocked_ratio(&self, stage: usize) -> Option<f64> {
        self.stage_mean(stage, |s| s.stage_blocked_ratio.as_slice())
    }

    fn stage_mean(
        &self,
        stage: usize,
        ratios: impl Fn(&SimulationSummary) -> &[f64],
    ) -> Option<f64> {
        let values = self
            .summaries
            .iter()
            .map(|s| ratios(s).get(stage).copied())
            .collect::<Option<Vec<f64>>>()?;
        (!values.is_empty()).then(|| mean(&values))
    }
}

/// Run every replication of `config` and aggregate them.
///
/// The whole configuration is checked before the first round is played.
pub fn run_replications(config: &ReplicationConfig) -> Result<ReplicationSet, SimulationError> {
    config.validate()?;

    info!(
        replications = config.replications,
        rounds = config.rounds,
        stages = config.line.stages,
        seed = ?config.base_seed,
        "Starting replications"
    );

    let summaries = (0..config.replications)
        .into_par_iter()
        .map(|index| {
            let mut game = DiceGame::new(config.line.clone(), config.seed_for(index))?;
            game.simulate(config.rounds)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let set = ReplicationSet::from_summaries(summaries);

    info!(
        avg_throughput = set.avg_throughput,
        avg_wip = set.avg_wip,
        cycle_time = ?set.cycle_time,
        "Replications complete"
    );

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineConfig;
    use tracing_test::traced_test;

    fn summary(avg_throughput: f64, throughput_stdev: f64, avg_wip: f64) -> SimulationSummary {
        SimulationSummary {
            rounds: Vec::new(),
            avg_throughput,
            throughput_stdev,
            avg_wip,
            total_throughput: (avg_throughput * 10.0) as u64,
            stage_starved_ratio: vec![0.2, 0.4],
            stage_blocked_ratio: vec![0.6, 0.0],
        }
    }

    #[test]
    fn test_cross_replication_statistics() {
        let set = ReplicationSet::from_summaries(vec![
            summary(3.0, 1.0, 10.0),
            summary(5.0, 2.0, 14.0),
        ]);

        assert_eq!(set.replication_count(), 2);
        assert_eq!(set.avg_throughput, 4.0);
        assert_eq!(set.intra_throughput_stdev, 1.5);
        assert_eq!(set.inter_throughput_stdev, 1.0);
        assert_eq!(set.avg_wip, 12.0);
        assert_eq!(set.cycle_time, CycleTime::Rounds(3.0));
        assert_eq!(set.avg_total_output, 40.0);
        assert_eq!(set.stage_count(), 2);
        assert!((set.stage_starved_ratio(1).unwrap() - 0.4).abs() < 1e-12);
        assert!((set.stage_blocked_ratio(0).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_stage_ratio_outside_line_is_none() {
        let set = ReplicationSet::from_summaries(vec![summary(3.0, 1.0, 10.0)]);
        assert_eq!(set.stage_count(), 2);
        assert_eq!(set.stage_starved_ratio(2), None);
        assert_eq!(set.stage_blocked_ratio(usize::MAX), None);
    }

    #[test]
    fn test_single_replication_has_zero_inter_stdev() {
        let set = ReplicationSet::from_summaries(vec![summary(3.5, 1.2, 8.0)]);
        assert_eq!(set.inter_throughput_stdev, 0.0);
        assert_eq!(set.intra_throughput_stdev, 1.2);
    }

    #[test]
    fn test_cycle_time_undefined_for_zero_throughput() {
        assert_eq!(CycleTime::littles_law(5.0, 0.0), CycleTime::Undefined);
        assert_eq!(CycleTime::Undefined.rounds(), None);
        assert_eq!(CycleTime::littles_law(6.0, 2.0).rounds(), Some(3.0));
    }

    #[traced_test]
    #[test]
    fn test_run_replications_logs_and_counts() {
        let config = ReplicationConfig::new(LineConfig::new())
            .with_rounds(7)
            .with_replications(4)
            .with_base_seed(9);

        let set = run_replications(&config).unwrap();

        assert_eq!(set.replication_count(), 4);
        assert_eq!(set.rounds_per_replication(), 7);
        assert_eq!(set.stage_count(), 5);
        assert!(logs_contain("Replications complete"));
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let config = ReplicationConfig::default().with_replications(0);
        let err = run_replications(&config).unwrap_err();
        assert_eq!(err.field(), "replications");
    }
}
