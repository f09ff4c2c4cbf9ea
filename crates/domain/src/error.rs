//! Error taxonomy for simulation requests and numerical failures.

use thiserror::Error;

/// A malformed or out-of-bounds simulation request.
///
/// Always rejected before any path is generated. Every variant carries the
/// name of the offending field so callers can surface it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{field} must not be empty")]
    Empty {
        /// Offending field.
        field: &'static str,
    },
    /// An integer field falls outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Value received.
        value: u64,
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
    /// A numeric field must be strictly positive and finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Value received.
        value: f64,
    },
    /// A numeric field must be finite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite {
        /// Offending field.
        field: &'static str,
        /// Value received.
        value: f64,
    },
}

impl ValidationError {
    /// Returns the name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::OutOfRange { field, .. }
            | Self::NotPositive { field, .. }
            | Self::NotFinite { field, .. } => field,
        }
    }
}

/// An internal numerical failure that would corrupt downstream invariants.
///
/// Soft failures such as an undefined Sharpe ratio never surface here; they
/// degrade to a sentinel value in the summary instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    /// A path set must contain at least one path.
    #[error("path set is empty")]
    EmptyPathSet,
    /// A path must contain at least its initial value.
    #[error("path {path} has no values")]
    EmptyPath {
        /// Path index.
        path: usize,
    },
    /// A growth model produced NaN or infinity.
    #[error("path {path} produced a non-finite value at period {period}")]
    NonFiniteValue {
        /// Path index.
        path: usize,
        /// Period index.
        period: usize,
    },
    /// A path value is below zero.
    #[error("path {path} has negative value {value} at period {period}")]
    NegativeValue {
        /// Path index.
        path: usize,
        /// Period index.
        period: usize,
        /// Offending value.
        value: f64,
    },
    /// Paths in one set must share the same length.
    #[error("path {path} has length {actual}, expected {expected}")]
    InconsistentPathLength {
        /// Path index.
        path: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Every path must start at the initial investment.
    #[error("path {path} starts at {actual}, expected {expected}")]
    InitialValueMismatch {
        /// Path index.
        path: usize,
        /// Expected initial value.
        expected: f64,
        /// Actual initial value.
        actual: f64,
    },
    /// Generation ran past its deadline and was abandoned.
    #[error("simulation exceeded its deadline after {completed} of {requested} paths")]
    DeadlineExceeded {
        /// Paths finished before the deadline.
        completed: usize,
        /// Paths requested.
        requested: usize,
    },
}

impl ComputationError {
    /// Whether resubmitting the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Any failure of a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The request was rejected before generation.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// The computation failed.
    #[error("computation failed: {0}")]
    Computation(#[from] ComputationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::OutOfRange {
            field: "years",
            value: 0,
            min: 1,
            max: 20,
        };
        assert_eq!(err.field(), "years");
        assert_eq!(err.to_string(), "years must be between 1 and 20, got 0");

        let err = ValidationError::Empty { field: "ticker" };
        assert_eq!(err.field(), "ticker");
    }

    #[test]
    fn test_only_deadline_is_retryable() {
        assert!(
            ComputationError::DeadlineExceeded {
                completed: 10,
                requested: 100
            }
            .is_retryable()
        );
        assert!(!ComputationError::EmptyPathSet.is_retryable());
    }

    #[test]
    fn test_simulation_error_from() {
        let err: SimulationError = ValidationError::Empty { field: "ticker" }.into();
        assert!(matches!(err, SimulationError::Validation(_)));
    }
}
