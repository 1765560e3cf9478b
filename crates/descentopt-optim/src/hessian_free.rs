//! Hessian-free (truncated) Newton method.
//!
//! Like [`Newton`](crate::Newton), but the Newton system is never formed:
//! the direction is an inexact solution of `∇²f(xₖ) d = −∇f(xₖ)` computed by
//! [`TruncatedCg`] from Hessian-vector products only. Every product counts
//! as one oracle call. The forcing sequence sets how accurately each
//! system is solved, trading CG work against outer iterations.

use crate::{
    driver::{clamp_direction, validate_max_norm, DescentDirection, DescentLog, Evaluation},
    truncated_cg::{ForcingSequence, TruncatedCg},
};
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

/// Configuration for the Hessian-free Newton method.
#[derive(Debug, Clone, Copy)]
pub struct HessianFreeConfig<T> {
    /// Forcing sequence of the inner CG solve
    pub forcing: ForcingSequence<T>,
    /// Maximum number of CG iterations per outer iteration
    pub max_cg_iterations: usize,
    /// Directions longer than this are normalized to unit length
    pub max_direction_norm: Option<T>,
}

impl<T: Scalar> Default for HessianFreeConfig<T> {
    fn default() -> Self {
        Self {
            forcing: ForcingSequence::Superlinear,
            max_cg_iterations: 1000,
            max_direction_norm: Some(<T as Scalar>::from_f64(1000.0)),
        }
    }
}

impl<T: Scalar> HessianFreeConfig<T> {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the forcing sequence.
    pub fn with_forcing(mut self, forcing: ForcingSequence<T>) -> Self {
        self.forcing = forcing;
        self
    }

    /// Sets the CG iteration cap.
    pub fn with_max_cg_iterations(mut self, max_iterations: usize) -> Self {
        self.max_cg_iterations = max_iterations;
        self
    }

    /// Sets the direction norm cap.
    pub fn with_max_direction_norm(mut self, max_norm: T) -> Self {
        self.max_direction_norm = Some(max_norm);
        self
    }

    /// Disables the direction norm cap.
    pub fn without_direction_cap(mut self) -> Self {
        self.max_direction_norm = None;
        self
    }

    /// The inner solver described by this configuration.
    pub fn solver(&self) -> TruncatedCg<T> {
        TruncatedCg::new()
            .with_forcing(self.forcing)
            .with_max_iterations(self.max_cg_iterations)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        self.solver().validate()?;
        validate_max_norm(self.max_direction_norm)
    }
}

impl<T: Scalar> DescentDirection<T> for HessianFreeConfig<T> {
    type Extra = ();
    const NAME: &'static str = "Hessian-Free Newton";

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
        oracle: &O,
        point: &DVector<T>,
        evaluation: &Evaluation<T, ()>,
    ) -> OptimizerResult<(DVector<T>, usize)>
    where
        O: Oracle<T> + ?Sized,
    {
        let solution = self.solver().solve(&evaluation.gradient, |v| {
            let product = oracle.hessian_vector_product(point, v)?;
            Ok(ensure_finite_vector(product, "Hessian-vector product")?)
        })?;
        let direction = clamp_direction(solution.step, self.max_direction_norm);
        Ok((direction, solution.products))
    }
}

/// Hessian-free Newton driver.
#[derive(Debug, Clone)]
pub struct HessianFreeNewton<T: Scalar> {
    config: HessianFreeConfig<T>,
    log: DescentLog<T>,
}

impl<T: Scalar> HessianFreeNewton<T> {
    /// Creates a driver with the given configuration.
    pub fn new(config: HessianFreeConfig<T>) -> Self {
        Self {
            config,
            log: DescentLog::new(),
        }
    }

    /// The driver configuration.
    pub fn config(&self) -> &HessianFreeConfig<T> {
        &self.config
    }

    /// Phase the driver ended the last run in.
    pub fn phase(&self) -> DriverPhase {
        self.log.phase
    }

    /// Stopping criterion with the default tolerance (1e-8 for `f64`) and 1000
    /// iterations.
    pub fn default_criterion() -> StoppingCriterion<T> {
        StoppingCriterion::new().with_max_iterations(1000)
    }
}

impl<T: Scalar> Default for HessianFreeNewton<T> {
    fn default() -> Self {
        Self::new(HessianFreeConfig::default())
    }
}

impl<T: Scalar> Optimizer<T> for HessianFreeNewton<T> {
    fn name(&self) -> &str {
        <HessianFreeConfig<T> as DescentDirection<T>>::NAME
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
