//! Core optimizer traits and types for descent methods.
//!
//! A descent driver minimizes a smooth f: ℝⁿ → ℝ by repeating
//!
//! 1. **Direction**: compute dₖ from the oracle (e.g. −∇f(xₖ))
//! 2. **Step size**: ask a [`StepSizeStrategy`] for αₖ along dₖ
//! 3. **Update**: xₖ₊₁ = xₖ + αₖdₖ and re-evaluate the oracle
//!
//! until the squared gradient norm ratio ‖∇f(xₖ)‖² / ‖∇f(x₀)‖² drops to
//! the tolerance of the [`StoppingCriterion`], or the iteration budget is
//! spent. Running out of iterations is a normal outcome reported through
//! [`TerminationReason::MaxIterations`], not an error.
//!
//! # Examples
//!
//! ```rust
//! # use descentopt_core::prelude::*;
//! let criterion = StoppingCriterion::<f64>::new()
//!     .with_tolerance(1e-10)
//!     .with_max_iterations(500);
//! assert!(criterion.validate().is_ok());
//! assert!(criterion.is_satisfied(1e-11));
//! ```

use crate::{
    error::{OptimizerError, OptimizerResult},
    line_search::StepSizeStrategy,
    optimization::{
        callback::{NoOpCallback, OptimizationCallback},
        trajectory::Trajectory,
    },
    oracle::Oracle,
    types::{constants, DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a descent run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult<T: Scalar> {
    /// The final iterate
    pub point: DVector<T>,

    /// Objective value at the final iterate
    pub value: T,

    /// Number of iterations performed
    pub iterations: usize,

    /// Total oracle calls, including those issued by the step-size strategy
    pub oracle_calls: usize,

    /// Wall-clock time of the run
    pub duration: Duration,

    /// ‖∇f(x)‖² / ‖∇f(x₀)‖² at the final iterate
    pub gradient_ratio: T,

    /// Why the run stopped
    pub termination_reason: TerminationReason,

    /// True if the gradient ratio reached the tolerance
    pub converged: bool,
}

impl<T: Scalar> OptimizationResult<T> {
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            value,
            iterations,
            oracle_calls: 0,
            duration,
            gradient_ratio: T::one(),
            termination_reason,
            converged: termination_reason == TerminationReason::Converged,
        }
    }

    /// Sets the oracle call count.
    pub fn with_oracle_calls(mut self, count: usize) -> Self {
        self.oracle_calls = count;
        self
    }

    /// Sets the final gradient ratio.
    pub fn with_gradient_ratio(mut self, ratio: T) -> Self {
        self.gradient_ratio = ratio;
        self
    }
}

/// Reasons for a descent run to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// ‖∇f(xₖ)‖² / ‖∇f(x₀)‖² ≤ tolerance
    Converged,
    /// Iteration budget exhausted
    MaxIterations,
    /// A callback asked the driver to stop
    CallbackRequest,
}

/// Phases of a descent driver.
///
/// ```text
/// Initialize ──► Iterate ──┬──► Converged
///                          ├──► MaxIterReached
///                          └──► Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriverPhase {
    /// Evaluating the starting point
    #[default]
    Initialize,
    /// Main loop
    Iterate,
    /// Stopped on the gradient ratio test
    Converged,
    /// Stopped on the iteration budget
    MaxIterReached,
    /// Stopped by a callback
    Stopped,
}

impl DriverPhase {
    /// Returns `true` once the driver has left the main loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::MaxIterReached | Self::Stopped)
    }
}

impl From<TerminationReason> for DriverPhase {
    fn from(reason: TerminationReason) -> Self {
        match reason {
            TerminationReason::Converged => Self::Converged,
            TerminationReason::MaxIterations => Self::MaxIterReached,
            TerminationReason::CallbackRequest => Self::Stopped,
        }
    }
}

/// When a descent driver stops.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoppingCriterion<T> {
    /// Bound on ‖∇f(xₖ)‖² / ‖∇f(x₀)‖²
    pub tolerance: T,

    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl<T: Scalar> Default for StoppingCriterion<T> {
    fn default() -> Self {
        Self {
            tolerance: constants::gradient_tolerance(),
            max_iterations: 1000,
        }
    }
}

impl<T: Scalar> StoppingCriterion<T> {
    /// Creates a new stopping criterion with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gradient ratio tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether a gradient ratio meets the tolerance.
    pub fn is_satisfied(&self, gradient_ratio: T) -> bool {
        gradient_ratio <= self.tolerance
    }

    /// Validates the criterion.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.tolerance < T::zero() || !<T as Float>::is_finite(self.tolerance) {
            return Err(OptimizerError::invalid_configuration(
                "Tolerance must be non-negative and finite",
                "tolerance",
                self.tolerance.to_string(),
            ));
        }
        Ok(())
    }
}

/// Interface of the descent drivers.
///
/// A driver owns a [`Trajectory`] that is cleared at the start of every
/// run and filled with one record per iterate, the starting point
/// included.
pub trait Optimizer<T: Scalar>: Debug {
    /// Returns the name of the driver.
    fn name(&self) -> &str;

    /// Minimizes the objective from `start`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for an invalid criterion or driver setup
    /// - `Oracle` errors, including non-finite oracle output and dimension
    ///   mismatches between the oracle and `start`
    /// - any error of the step-size strategy
    fn run<O, S>(
        &mut self,
        oracle: &O,
        start: &DVector<T>,
        strategy: &mut S,
        criterion: &StoppingCriterion<T>,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        O: Oracle<T> + ?Sized,
        S: StepSizeStrategy<T>,
    {
        self.run_with_callback(oracle, start, strategy, criterion, &mut NoOpCallback)
    }

    /// Like [`Optimizer::run`], notifying `callback` of every iterate.
    fn run_with_callback<O, S>(
        &mut self,
        oracle: &O,
        start: &DVector<T>,
        strategy: &mut S,
        criterion: &StoppingCriterion<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        O: Oracle<T> + ?Sized,
        S: StepSizeStrategy<T>;

    /// History of the last run.
    fn trajectory(&self) -> &Trajectory<T>;
}
