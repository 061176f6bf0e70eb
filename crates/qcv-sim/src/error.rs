//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building or integrating a master equation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// An operator is not square.
    #[error("{what} must be square, got {rows}x{cols}")]
    NotSquare {
        /// Which operator was rejected.
        what: String,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Operator dimensions disagree with the Hamiltonian.
    #[error("{what} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        /// Which operand was rejected.
        what: String,
        /// Hilbert-space dimension of the Hamiltonian.
        expected: usize,
        /// Dimension found.
        got: usize,
    },

    /// Basis state index outside the Hilbert space.
    #[error("basis state {n} does not exist in a {dim}-dimensional space")]
    InvalidBasis {
        /// Hilbert-space dimension.
        dim: usize,
        /// Requested index.
        n: usize,
    },

    /// Time grid is empty, unordered or not finite.
    #[error("invalid time grid: {0}")]
    InvalidTimes(String),

    /// A physical coefficient is outside its domain.
    #[error("{name} must be {requirement}, got {value}")]
    InvalidCoefficient {
        /// Coefficient name.
        name: &'static str,
        /// Domain description.
        requirement: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The generator is too stiff to integrate within the step budget.
    #[error("more than {limit} integration steps needed after t = {time}")]
    StepLimit {
        /// Start of the interval that exceeded the budget.
        time: f64,
        /// Steps allowed per interval.
        limit: usize,
    },

    /// Integration produced NaN or infinite entries.
    #[error("integration diverged at t = {time}")]
    Diverged {
        /// Time at which non-finite values were first observed.
        time: f64,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
