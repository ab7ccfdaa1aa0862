//! Command-line arguments and the top-level run.

use crate::report::{HistoryReport, JsonReport, SummaryReport};
use clap::Parser;
use dicegame_simulation::{run_replications, LineConfig, ReplicationConfig, SimulationError};
use std::fmt::Write;
use thiserror::Error;
use tracing::debug;

/// Simulate the dice game from "The Goal".
#[derive(Parser, Debug, Clone)]
#[command(name = "dicegame-sim")]
#[command(about = "Simulate the dice game from \"The Goal\"")]
#[command(version)]
pub struct Args {
    /// Number of stations
    #[arg(long, default_value = "5")]
    pub stages: usize,

    /// Rounds per replication
    #[arg(long, default_value = "20")]
    pub rounds: usize,

    /// Faces on the die
    #[arg(long, default_value = "6")]
    pub die_sides: u32,

    /// Raw units released to stage 1 each round
    #[arg(long, default_value = "4")]
    pub release_rate: u32,

    /// Initial WIP per stage
    #[arg(long, default_value = "3")]
    pub initial_buffer: u32,

    /// Base random seed (replications add their index)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run multiple independent simulations
    #[arg(long, default_value = "1")]
    pub replications: usize,

    /// Print round-by-round details
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Build the replication configuration these arguments describe.
    pub fn to_config(&self) -> ReplicationConfig {
        let line = LineConfig::new()
            .with_stages(self.stages)
            .with_die_sides(self.die_sides)
            .with_release_rate(self.release_rate)
            .with_initial_buffer(self.initial_buffer);

        let config = ReplicationConfig::new(line)
            .with_rounds(self.rounds)
            .with_replications(self.replications);

        match self.seed {
            Some(seed) => config.with_base_seed(seed),
            None => config,
        }
    }
}

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum RunError {
    /// The parameters were rejected by the simulation.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Report rendering failed.
    #[error("Failed to render report: {0}")]
    Render(#[from] std::fmt::Error),

    /// JSON serialization failed.
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Simulation(_) => 2,
            Self::Render(_) | Self::Json(_) => 1,
        }
    }
}

/// Run the simulation described by `args` and render its report.
pub fn run(args: &Args) -> Result<String, RunError> {
    let config = args.to_config();
    let set = run_replications(&config)?;

    debug!(json = args.json, verbose = args.verbose, "Rendering report");

    if args.json {
        let report = JsonReport::new(&config, &set, args.verbose);
        let mut output = serde_json::to_string_pretty(&report)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();
    if args.verbose {
        for (index, summary) in set.summaries.iter().enumerate() {
            let history = HistoryReport {
                replication: index + 1,
                summary,
            };
            write!(output, "{history}")?;
        }
    }
    write!(output, "{}", SummaryReport(&set))?;
    Ok(output)
}
