//! Gradient descent.
//!
//! The simplest descent driver: the direction is the negative gradient
//!
//! ```text
//! dₖ = −∇f(xₖ),    xₖ₊₁ = xₖ + αₖdₖ
//! ```
//!
//! with αₖ chosen by any [`StepSizeStrategy`]. Each iterate costs one fused
//! `value_and_gradient` call plus whatever the strategy spends.
//!
//! # Example
//!
//! ```rust
//! use descentopt_core::prelude::*;
//! use descentopt_optim::{GradientDescent, GradientDescentConfig};
//!
//! let oracle = QuadraticOracle::diagonal(&[1.0, 4.0]);
//! let start = DVector::from_vec(vec![2.0, -1.0]);
//!
//! let mut gd = GradientDescent::new(GradientDescentConfig::new());
//! let result = gd
//!     .run(&oracle, &start, &mut ArmijoStep::new(), &StoppingCriterion::new())
//!     .unwrap();
//! assert!(result.converged);
//! ```

use crate::driver::{clamp_direction, validate_max_norm, DescentDirection, DescentLog, Evaluation};
use descentopt_core::{
    error::OptimizerResult,
    line_search::StepSizeStrategy,
    optimization::{
        DriverPhase, OptimizationCallback, OptimizationResult, Optimizer, StoppingCriterion,
        Trajectory,
    },
    oracle::{ensure_finite, ensure_finite_vector, Oracle},
    types::{DVector, Scalar},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientDescentConfig<T> {
    /// Directions longer than this are normalized to unit length
    pub max_direction_norm: Option<T>,
}

impl<T: Scalar> Default for GradientDescentConfig<T> {
    fn default() -> Self {
        Self {
            max_direction_norm: None,
        }
    }
}

impl<T: Scalar> GradientDescentConfig<T> {
    /// Creates the default configuration (no direction cap).
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the direction norm.
    pub fn with_max_direction_norm(mut self, max_norm: T) -> Self {
        self.max_direction_norm = Some(max_norm);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        validate_max_norm(self.max_direction_norm)
    }
}

impl<T: Scalar> DescentDirection<T> for GradientDescentConfig<T> {
    type Extra = ();
    const NAME: &'static str = "Gradient Descent";

    fn evaluate<O>(&self, oracle: &O, point: &DVector<T>) -> OptimizerResult<Evaluation<T, ()>>
    where
        O: Oracle<T> + ?Sized,
    {
        let (value, gradient) = oracle.value_and_gradient(point)?;
        Ok(Evaluation {
            value: ensure_finite(value, "value")?,
            gradient: ensure_finite_vector(gradient, "gradient")?,
            extra: (),
        })
    }

    fn direction<O>(
        &self,
        _oracle: &O,
        _point: &DVector<T>,
        evaluation: &Evaluation<T, ()>,
    ) -> OptimizerResult<(DVector<T>, usize)>
    where
        O: Oracle<T> + ?Sized,
    {
        let direction = clamp_direction(-&evaluation.gradient, self.max_direction_norm);
        Ok((direction, 0))
    }
}

/// Gradient descent driver.
#[derive(Debug, Clone)]
pub struct GradientDescent<T: Scalar> {
    config: GradientDescentConfig<T>,
    log: DescentLog<T>,
}

impl<T: Scalar> GradientDescent<T> {
    /// Creates a driver with the given configuration.
    pub fn new(config: GradientDescentConfig<T>) -> Self {
        Self {
            config,
            log: DescentLog::new(),
        }
    }

    /// The driver configuration.
    pub fn config(&self) -> &GradientDescentConfig<T> {
        &self.config
    }

    /// Phase the driver ended the last run in.
    pub fn phase(&self) -> DriverPhase {
        self.log.phase
    }

    /// Stopping criterion with the default tolerance (1e-8 for `f64`) and 10000
    /// iterations.
    pub fn default_criterion() -> StoppingCriterion<T> {
        StoppingCriterion::new().with_max_iterations(10_000)
    }
}

impl<T: Scalar> Default for GradientDescent<T> {
    fn default() -> Self {
        Self::new(GradientDescentConfig::default())
    }
}

impl<T: Scalar> Optimizer<T> for GradientDescent<T> {
    fn name(&self) -> &str {
        <GradientDescentConfig<T> as DescentDirection<T>>::NAME
    }

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
        S: StepSizeStrategy<T>,
    {
        self.config.validate()?;
        self.log
            .descend(&self.config, oracle, start, strategy, criterion, callback)
    }

    fn trajectory(&self) -> &Trajectory<T> {
        &self.log.trajectory
    }
}
