//! Damped Newton method
//!
//! The Newton method uses second-order information (Hessian) to achieve
//! faster convergence than first-order methods. The direction solves
//!
//! ```text
//! (∇²f(xₖ) + τI) dₖ = −∇f(xₖ)
//! ```
//!
//! by Cholesky factorization. The first attempt uses τ = 0; when the
//! Hessian is not positive definite, τ starts at `initial_regularization`
//! and is multiplied by `regularization_growth` until the factorization
//! succeeds. The step size along dₖ comes from the step-size strategy,
//! which makes the method globally convergent on convex problems.

use crate::driver::{clamp_direction, validate_max_norm, DescentDirection, DescentLog, Evaluation};
use descentopt_core::{
    error::{OptimizerError, OptimizerResult, OracleError},
    line_search::StepSizeStrategy,
    optimization::{
        DriverPhase, OptimizationCallback, OptimizationResult, Optimizer, StoppingCriterion,
        Trajectory,
    },
    oracle::{ensure_finite, ensure_finite_vector, Oracle},
    types::{DMatrix, DVector, Scalar},
};
use nalgebra::Cholesky;
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the damped Newton method
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewtonConfig<T> {
    /// First non-zero shift τ tried when the Hessian is not positive definite
    pub initial_regularization: T,
    /// Factor applied to τ after each failed factorization
    pub regularization_growth: T,
    /// Number of shifted factorizations tried before giving up
    pub max_regularization_attempts: usize,
    /// Directions longer than this are normalized to unit length
    pub max_direction_norm: Option<T>,
}

impl<T: Scalar> Default for NewtonConfig<T> {
    fn default() -> Self {
        Self {
            initial_regularization: <T as Scalar>::from_f64(1e-8),
            regularization_growth: <T as Scalar>::from_f64(2.0),
            max_regularization_attempts: 100,
            max_direction_norm: Some(<T as Scalar>::from_f64(1000.0)),
        }
    }
}

impl<T: Scalar> NewtonConfig<T> {
    /// Create a new Newton configuration with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first regularization shift and its growth factor
    pub fn with_regularization(mut self, initial: T, growth: T) -> Self {
        self.initial_regularization = initial;
        self.regularization_growth = growth;
        self
    }

    /// Set the number of shifted factorizations
    pub fn with_max_regularization_attempts(mut self, attempts: usize) -> Self {
        self.max_regularization_attempts = attempts;
        self
    }

    /// Set the direction norm cap
    pub fn with_max_direction_norm(mut self, max_norm: T) -> Self {
        self.max_direction_norm = Some(max_norm);
        self
    }

    /// Disable the direction norm cap
    pub fn without_direction_cap(mut self) -> Self {
        self.max_direction_norm = None;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.initial_regularization <= T::zero()
            || !<T as Float>::is_finite(self.initial_regularization)
        {
            return Err(OptimizerError::invalid_configuration(
                "Initial regularization must be positive and finite",
                "initial_regularization",
                self.initial_regularization.to_string(),
            ));
        }
        if self.regularization_growth <= T::one()
            || !<T as Float>::is_finite(self.regularization_growth)
        {
            return Err(OptimizerError::invalid_configuration(
                "Regularization growth must be greater than 1",
                "regularization_growth",
                self.regularization_growth.to_string(),
            ));
        }
        validate_max_norm(self.max_direction_norm)
    }

    /// Solves (H + τI) d = −g with the smallest τ in {0, τ₀, τ₀γ, …} that
    /// makes the shifted Hessian positive definite.
    pub fn regularized_direction(
        &self,
        hessian: &DMatrix<T>,
        gradient: &DVector<T>,
    ) -> OptimizerResult<DVector<T>> {
        let rhs = -gradient;
        if let Some(direction) = cholesky_solve(hessian.clone(), &rhs) {
            return Ok(direction);
        }

        let n = hessian.nrows();
        let mut tau = self.initial_regularization;
        for _ in 0..self.max_regularization_attempts {
            let shifted = hessian + DMatrix::<T>::identity(n, n) * tau;
            if let Some(direction) = cholesky_solve(shifted, &rhs) {
                return Ok(direction);
            }
            tau *= self.regularization_growth;
        }

        Err(OptimizerError::numerical_failure(format!(
            "Hessian not positive definite after {} regularization attempts (last shift {})",
            self.max_regularization_attempts,
            tau / self.regularization_growth
        )))
    }
}

/// Solves `matrix · x = rhs` when `matrix` is numerically positive definite.
fn cholesky_solve<T: Scalar>(matrix: DMatrix<T>, rhs: &DVector<T>) -> Option<DVector<T>> {
    let solution = Cholesky::new(matrix)?.solve(rhs);
    let finite = solution.iter().all(|x| <T as Float>::is_finite(*x));
    finite.then_some(solution)
}

impl<T: Scalar> DescentDirection<T> for NewtonConfig<T> {
    type Extra = DMatrix<T>;
    const NAME: &'static str = "Damped Newton";

    fn evaluate<O>(
        &self,
        oracle: &O,
        point: &DVector<T>,
    ) -> OptimizerResult<Evaluation<T, DMatrix<T>>>
    where
        O: Oracle<T> + ?Sized,
    {
        let (value, gradient, hessian) = oracle.value_gradient_hessian(point)?;
        if hessian.iter().any(|h| !<T as Float>::is_finite(*h)) {
            return Err(OracleError::non_finite("hessian").into());
        }
        Ok(Evaluation {
            value: ensure_finite(value, "value")?,
            gradient: ensure_finite_vector(gradient, "gradient")?,
            extra: hessian,
        })
    }

    fn direction<O>(
        &self,
        _oracle: &O,
        _point: &DVector<T>,
        evaluation: &Evaluation<T, DMatrix<T>>,
    ) -> OptimizerResult<(DVector<T>, usize)>
    where
        O: Oracle<T> + ?Sized,
    {
        let direction = self.regularized_direction(&evaluation.extra, &evaluation.gradient)?;
        Ok((clamp_direction(direction, self.max_direction_norm), 0))
    }
}

/// Damped Newton method optimizer
#[derive(Debug, Clone)]
pub struct Newton<T: Scalar> {
    config: NewtonConfig<T>,
    log: DescentLog<T>,
}

impl<T: Scalar> Newton<T> {
    /// Create a new Newton optimizer with the given configuration
    pub fn new(config: NewtonConfig<T>) -> Self {
        Self {
            config,
            log: DescentLog::new(),
        }
    }

    /// The driver configuration.
    pub fn config(&self) -> &NewtonConfig<T> {
        &self.config
    }

    /// Phase the driver ended the last run in.
    pub fn phase(&self) -> DriverPhase {
        self.log.phase
    }

    /// Stopping criterion with the default tolerance (1e-8 for `f64`) and 100
    /// iterations.
    pub fn default_criterion() -> StoppingCriterion<T> {
        StoppingCriterion::new().with_max_iterations(100)
    }
}

impl<T: Scalar> Default for Newton<T> {
    fn default() -> Self {
        Self::new(NewtonConfig::default())
    }
}

impl<T: Scalar> Optimizer<T> for Newton<T> {
    fn name(&self) -> &str {
        <NewtonConfig<T> as DescentDirection<T>>::NAME
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
