//! Error types for oracle evaluations and optimization routines.
//!
//! Numerical degeneracies (singular parabola fits, indefinite Hessians) are
//! repaired locally by the algorithms and never show up here. Running out of
//! iterations is reported through result flags, not errors. What remains are
//! invalid inputs, which fail fast, and oracle failures, which must abort
//! the run that triggered them.

use thiserror::Error;

/// Errors raised by an oracle while evaluating the objective or its derivatives.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The oracle produced NaN or an infinite value.
    ///
    /// Continuing with such a value would corrupt every subsequent step,
    /// so drivers abort the run when they see it.
    #[error("Oracle produced a non-finite {quantity}")]
    NonFinite {
        /// Which quantity was non-finite ("value", "gradient", ...)
        quantity: String,
    },

    /// Dimension mismatch between a point and the oracle.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// The requested capability is not provided by this oracle.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Name of the unimplemented feature
        feature: String,
    },

    /// The data backing the oracle is malformed.
    #[error("Invalid oracle data: {reason}")]
    InvalidData {
        /// Description of the problem
        reason: String,
    },
}

impl OracleError {
    /// Create a NonFinite error for the named quantity.
    pub fn non_finite<S: Into<String>>(quantity: S) -> Self {
        Self::NonFinite {
            quantity: quantity.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NotImplemented error for a specific feature.
    pub fn not_implemented<S: Into<String>>(feature: S) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Create an InvalidData error with a custom reason.
    pub fn invalid_data<S: Into<String>>(reason: S) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during optimization.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// The search interval does not satisfy its ordering precondition.
    #[error("Precondition violated: invalid search interval [{lower}, {upper}]")]
    InvalidInterval {
        /// Lower bound as given by the caller
        lower: f64,
        /// Upper bound as given by the caller
        upper: f64,
    },

    /// The search direction does not decrease the objective.
    #[error("Precondition violated: not a descent direction (slope {slope})")]
    NotDescentDirection {
        /// Directional derivative ⟨∇f(x), d⟩ at the starting point
        slope: f64,
    },

    /// Line search failed to find an acceptable step.
    #[error("Line search failed: {reason}")]
    LineSearchFailed {
        /// Description of why the line search failed
        reason: String,
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Invalid optimizer configuration.
    ///
    /// This error occurs when an algorithm is configured with invalid
    /// parameters (e.g., negative tolerance, zero iteration cap).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// A numerical repair (e.g. Hessian regularization) gave up.
    #[error("Numerical failure: {reason}")]
    NumericalFailure {
        /// Description of the numerical issue
        reason: String,
    },

    /// Propagated oracle error.
    #[error("Oracle evaluation failed: {0}")]
    Oracle(#[from] OracleError),
}

impl OptimizerError {
    /// Create an InvalidInterval error.
    pub fn invalid_interval<T: num_traits::ToPrimitive>(lower: T, upper: T) -> Self {
        Self::InvalidInterval {
            lower: lower.to_f64().unwrap_or(f64::NAN),
            upper: upper.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Create a NotDescentDirection error.
    pub fn not_descent_direction<T: num_traits::ToPrimitive>(slope: T) -> Self {
        Self::NotDescentDirection {
            slope: slope.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Create a LineSearchFailed error.
    pub fn line_search_failed<S: Into<String>>(reason: S, iterations: usize) -> Self {
        Self::LineSearchFailed {
            reason: reason.into(),
            iterations,
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a NumericalFailure error.
    pub fn numerical_failure<S: Into<String>>(reason: S) -> Self {
        Self::NumericalFailure {
            reason: reason.into(),
        }
    }
}

/// Result type alias for oracle evaluations.
pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_error_creation() {
        let err = OracleError::non_finite("gradient");
        assert!(matches!(err, OracleError::NonFinite { .. }));
        assert_eq!(err.to_string(), "Oracle produced a non-finite gradient");

        let err = OracleError::dimension_mismatch(3, 4);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 4");
    }

    #[test]
    fn test_optimizer_error_display() {
        let errors = vec![
            OptimizerError::invalid_interval(5.0, 0.0),
            OptimizerError::not_descent_direction(0.5),
            OptimizerError::line_search_failed("no bracket", 50),
            OptimizerError::invalid_configuration("must be positive", "eps", "-1"),
            OptimizerError::numerical_failure("Cholesky never succeeded"),
            OptimizerError::Oracle(OracleError::not_implemented("hessian")),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_precondition_errors_are_labelled() {
        let err = OptimizerError::invalid_interval(5.0_f32, 0.0_f32);
        assert!(err.to_string().contains("Precondition violated"));
        if let OptimizerError::InvalidInterval { lower, upper } = err {
            assert_eq!(lower, 5.0);
            assert_eq!(upper, 0.0);
        } else {
            panic!("Expected InvalidInterval variant");
        }

        let err = OptimizerError::not_descent_direction(1.0);
        assert!(err.to_string().contains("not a descent direction"));
    }

    #[test]
    fn test_oracle_error_propagation() {
        let oracle_err = OracleError::non_finite("value");
        let optimizer_err: OptimizerError = oracle_err.into();

        assert!(matches!(optimizer_err, OptimizerError::Oracle(_)));
        assert!(optimizer_err.to_string().contains("Oracle evaluation failed"));
        assert!(optimizer_err.to_string().contains("non-finite value"));
    }
}
