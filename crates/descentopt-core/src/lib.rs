//! Core traits and types for line searches and descent methods.
//!
//! This crate provides the building blocks shared by the descent drivers of
//! `descentopt-optim`: the oracle abstraction, one-dimensional interval
//! searches, step-size strategies and the result/callback/trajectory types
//! that drivers report through.
//!
//! # Key Concepts
//!
//! - **Oracle**: the objective together with its derivatives, the only
//!   source of numerical information for every algorithm
//! - **Interval search**: minimization of a scalar function over `[a, b]`
//! - **Step-size strategy**: the multiplier α of a descent direction
//! - **Trajectory**: one record per iterate of a descent run
//!
//! # Modules
//!
//! - [`error`]: Error types for oracles and optimizers
//! - [`line_search`]: Step-size strategies
//! - [`one_dim`]: Golden-section, Brent and parabolic interval searches
//! - [`optimization`]: Driver interface, stopping criteria, callbacks
//! - [`oracle`]: Oracle trait and reference objectives
//! - [`types`]: Scalar trait, type aliases and numerical constants

pub mod error;
pub mod line_search;
pub mod one_dim;
pub mod optimization;
pub mod oracle;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used items at the crate root
pub use error::{OptimizerError, OptimizerResult, OracleError, OracleResult};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use descentopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{OptimizerError, OptimizerResult, OracleError, OracleResult};
    pub use crate::line_search::{
        ArmijoStep, BrentStep, ConstantStep, GoldenSectionStep, NesterovStep, SharedStepSize,
        StepSize, StepSizeRule, StepSizeStrategy, WolfeStep,
    };
    pub use crate::one_dim::{Brent, GoldenSection, IntervalMinimizer, Parabolic, ScalarMinimum};
    pub use crate::optimization::{
        DriverPhase, IterationRecord, NoOpCallback, OptimizationCallback, OptimizationResult,
        Optimizer, PrintProgressCallback, RecordingCallback, StoppingCriterion,
        TerminationReason, Trajectory,
    };
    pub use crate::oracle::{
        CountingOracle, DerivativeChecker, LogisticRegressionOracle, Oracle, QuadraticOracle,
    };
    pub use crate::types::{constants, DMatrix, DVector, Scalar};
}
