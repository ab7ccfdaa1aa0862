//! Console and JSON rendering of simulation results.

use dicegame_simulation::{CycleTime, ReplicationConfig, ReplicationSet, SimulationSummary};
use serde::Serialize;
use std::fmt;

/// Round-by-round detail of one replication.
pub struct HistoryReport<'a> {
    /// 1-based replication number.
    pub replication: usize,
    /// The run whose rounds are listed.
    pub summary: &'a SimulationSummary,
}

impl fmt::Display for HistoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Replication {} ---", self.replication)?;
        for round in &self.summary.rounds {
            writeln!(
                f,
                "  Round {:>2}: throughput={:>2} WIP={:>3} rolls={:?} out={:?} buf={:?}",
                round.round_index,
                round.throughput,
                round.wip,
                round.rolls(),
                round.processed(),
                round.buffers(),
            )?;
        }
        writeln!(f)
    }
}

/// Cross-replication summary block.
pub struct SummaryReport<'a>(pub &'a ReplicationSet);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.0;

        writeln!(f, "=== Dice Game Summary ===")?;
        writeln!(f, "Replications           : {}", set.replication_count())?;
        writeln!(f, "Rounds per replication : {}", set.rounds_per_replication())?;
        writeln!(f, "Average throughput     : {:.3} / round", set.avg_throughput)?;
        writeln!(f, "Throughput stdev (intra): {:.3}", set.intra_throughput_stdev)?;
        writeln!(f, "Throughput stdev (inter): {:.3}", set.inter_throughput_stdev)?;
        writeln!(f, "Average WIP            : {:.3}", set.avg_wip)?;
        match set.cycle_time {
            CycleTime::Rounds(rounds) => writeln!(
                f,
                "Average cycle time     : {rounds:.3} rounds (Little's Law)"
            )?,
            CycleTime::Undefined => {
                writeln!(f, "Average cycle time     : undefined (zero throughput)")?
            }
        }
        writeln!(f, "Average total output   : {:.2} units", set.avg_total_output)?;
        writeln!(f)?;

        for stage in 0..set.stage_count() {
            writeln!(
                f,
                "Stage {}: starved {:5.1}% | blocked {:5.1}%",
                stage + 1,
                set.stage_starved_ratio(stage).unwrap_or_default() * 100.0,
                set.stage_blocked_ratio(stage).unwrap_or_default() * 100.0,
            )?;
        }
        Ok(())
    }
}

/// Starved/blocked ratios of one station.
#[derive(Debug, Serialize)]
pub struct StageReport {
    /// 1-based station number.
    pub stage: usize,
    /// Fraction of rounds starved, averaged over replications.
    pub starved_ratio: f64,
    /// Fraction of rounds blocked, averaged over replications.
    pub blocked_ratio: f64,
}

/// Machine-readable form of a replication set.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Parameters the set was run with.
    pub config: &'a ReplicationConfig,
    /// Number of replications.
    pub replications: usize,
    /// Rounds played by each replication.
    pub rounds_per_replication: usize,
    /// Mean of each run's average throughput.
    pub avg_throughput: f64,
    /// Mean of each run's own throughput stdev.
    pub intra_throughput_stdev: f64,
    /// Population stdev of the runs' average throughputs.
    pub inter_throughput_stdev: f64,
    /// Mean of each run's average WIP.
    pub avg_wip: f64,
    /// Little's Law estimate, or undefined for zero throughput.
    pub cycle_time: CycleTime,
    /// Mean units out of the line per run.
    pub avg_total_output: f64,
    /// Per-station ratios, in line order.
    pub stages: Vec<StageReport>,
    /// Full per-run histories, only in verbose mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<&'a [SimulationSummary]>,
}

impl<'a> JsonReport<'a> {
    /// Build the report for `set`. Histories are included only when `verbose`.
    pub fn new(config: &'a ReplicationConfig, set: &'a ReplicationSet, verbose: bool) -> Self {
        let stages = (0..set.stage_count())
            .map(|stage| StageReport {
                stage: stage + 1,
                starved_ratio: set.stage_starved_ratio(stage).unwrap_or_default(),
                blocked_ratio: set.stage_blocked_ratio(stage).unwrap_or_default(),
            })
            .collect();

        Self {
            config,
            replications: set.replication_count(),
            rounds_per_replication: set.rounds_per_replication(),
            avg_throughput: set.avg_throughput,
            intra_throughput_stdev: set.intra_throughput_stdev,
            inter_throughput_stdev: set.inter_throughput_stdev,
            avg_wip: set.avg_wip,
            cycle_time: set.cycle_time,
            avg_total_output: set.avg_total_output,
            stages,
            runs: verbose.then_some(set.summaries.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicegame_simulation::{DiceGame, LineConfig, ScriptedRolls};

    fn scripted_summary() -> SimulationSummary {
        let line = LineConfig::new().with_stages(2);
        DiceGame::with_source(line, ScriptedRolls::new([6, 1]))
            .unwrap()
            .simulate(2)
            .unwrap()
    }

    #[test]
    fn test_history_lines() {
        let summary = scripted_summary();
        let text = HistoryReport {
            replication: 1,
            summary: &summary,
        }
        .to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Replication 1 ---");
        assert_eq!(
            lines[1],
            "  Round  1: throughput= 1 WIP=  9 rolls=[6, 1] out=[6, 1] buf=[1, 8]"
        );
        assert_eq!(
            lines[2],
            "  Round  2: throughput= 1 WIP= 12 rolls=[6, 1] out=[5, 1] buf=[0, 12]"
        );
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_summary_block() {
        let set = ReplicationSet::from_summaries(vec![scripted_summary()]);
        let text = SummaryReport(&set).to_string();

        assert!(text.starts_with("=== Dice Game Summary ===\n"));
        assert!(text.contains("Replications           : 1\n"));
        assert!(text.contains("Rounds per replication : 2\n"));
        assert!(text.contains("Average throughput     : 1.000 / round\n"));
        assert!(text.contains("Throughput stdev (intra): 0.000\n"));
        assert!(text.contains("Average WIP            : 10.500\n"));
        assert!(text.contains("Average cycle time     : 10.500 rounds (Little's Law)\n"));
        assert!(text.contains("Average total output   : 2.00 units\n"));
        assert!(text.contains("Stage 1: starved  50.0% | blocked  50.0%\n"));
        assert!(text.contains("Stage 2: starved   0.0% | blocked 100.0%\n"));
    }

    #[test]
    fn test_summary_reports_undefined_cycle_time() {
        let line = LineConfig::new()
            .with_stages(1)
            .with_release_rate(0)
            .with_initial_buffer(0);
        let summary = DiceGame::with_source(line, ScriptedRolls::new([3]))
            .unwrap()
            .simulate(3)
            .unwrap();
        let set = ReplicationSet::from_summaries(vec![summary]);

        let text = SummaryReport(&set).to_string();
        assert!(text.contains("Average cycle time     : undefined (zero throughput)\n"));
    }

    #[test]
    fn test_json_omits_runs_unless_verbose() {
        let config = ReplicationConfig::default();
        let set = ReplicationSet::from_summaries(vec![scripted_summary()]);

        let quiet = serde_json::to_value(JsonReport::new(&config, &set, false)).unwrap();
        assert!(quiet.get("runs").is_none());
        assert_eq!(quiet["stages"][1]["stage"], 2);
        assert_eq!(quiet["stages"][0]["starved_ratio"], 0.5);
        assert_eq!(quiet["stages"][1]["blocked_ratio"], 1.0);
        assert_eq!(quiet["cycle_time"]["kind"], "rounds");

        let verbose = serde_json::to_value(JsonReport::new(&config, &set, true)).unwrap();
        assert_eq!(verbose["runs"][0]["rounds"].as_array().unwrap().len(), 2);
    }
}
