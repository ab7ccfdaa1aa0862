//! Dice game simulation.
//!
//! Models a serial production line where every station's capacity is a die
//! roll, as in the dice game from "The Goal". Given the same seed, a run
//! produces identical round histories every time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  run_replications                       │
//! │     one DiceGame per replication, seed = base + index   │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     DiceGame::simulate                             │ │
//! │  │     rounds 1..=n in order, then SimulationSummary  │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     StageChain::play_round                         │ │
//! │  │     release → stage 0 → stage 1 → … → output       │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     CapacitySource: one roll per stage per round   │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use dicegame_simulation::{run_replications, LineConfig, ReplicationConfig};
//!
//! let config = ReplicationConfig::new(LineConfig::new().with_stages(3))
//!     .with_rounds(50)
//!     .with_replications(4)
//!     .with_base_seed(42);
//!
//! let set = run_replications(&config).unwrap();
//! assert_eq!(set.replication_count(), 4);
//! assert!(set.avg_throughput <= 6.0);
//! ```

mod capacity;
mod config;
mod error;
mod replication;
mod round;
mod runner;
pub mod stats;

pub use capacity::{CapacityRng, CapacitySource};
#[cfg(any(test, feature = "test-utils"))]
pub use capacity::ScriptedRolls;
pub use config::{LineConfig, ReplicationConfig};
pub use error::SimulationError;
pub use replication::{run_replications, CycleTime, ReplicationSet};
pub use round::{RoundOutcome, StageChain, StageOutcome};
pub use runner::{DiceGame, SimulationSummary};
