//! Dice Game Simulator
//!
//! Command-line front end over `dicegame-simulation`: argument parsing,
//! error-to-exit-code mapping and report rendering. All modeling lives in
//! the simulation crate.
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use dicegame_simulator::{run, Args};
//!
//! let args = Args::parse_from(["dicegame-sim", "--rounds", "10", "--seed", "7"]);
//! let output = run(&args).unwrap();
//! assert!(output.contains("=== Dice Game Summary ==="));
//! ```

pub mod cli;
pub mod report;

pub use cli::{run, Args, RunError};
pub use report::{HistoryReport, JsonReport, SummaryReport};
