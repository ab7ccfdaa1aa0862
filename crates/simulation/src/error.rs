//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised before a simulation starts.
///
/// Per-round arithmetic is total, so configuration is the only thing that
/// can fail. Nothing is simulated once one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A parameter is outside its allowed range.
    #[error("invalid configuration: {field} must be {constraint} (got {value})")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// The constraint it violated, e.g. `>= 1`.
        constraint: &'static str,
        /// The rejected value.
        value: u64,
    },
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, constraint: &'static str, value: u64) -> Self {
        tracing::warn!(field, constraint, value, "Rejected configuration");
        Self::InvalidConfiguration {
            field,
            constraint,
            value,
        }
    }

    /// Name of the parameter that was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { field, .. } => field,
        }
    }
}
