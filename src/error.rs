//! Errors raised by the simulation engine.
use thiserror::Error;

/// Errors which stop a simulation from running.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A configuration field is outside its permitted range
    #[error("Invalid configuration: `{field}` {reason}")]
    InvalidConfiguration {
        /// Name of the offending field, as it appears in `scenario.toml`
        field: &'static str,
        /// What the value must satisfy
        reason: &'static str,
    },
    /// The fund grew beyond the range the engine can represent
    #[error("Simulation diverged in year {year}: {reason}")]
    Diverged {
        /// The year in which the simulation stopped
        year: u32,
        /// Which quantity left its permitted range
        reason: &'static str,
    },
}
