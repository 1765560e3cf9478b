use super::{LineFunction, StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult, OracleError},
    oracle::Oracle,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Adaptive step size from a running Lipschitz estimate.
///
/// Keeps an estimate L of the gradient's Lipschitz constant across calls.
/// Each call doubles L until the upper quadratic model holds,
///
/// ```text
/// φ(1/L) ≤ φ(0) + φ'(0)/L + ‖d‖²/(2L)
/// ```
///
/// returns α = 1/L and then halves L, so the next call starts from a more
/// optimistic estimate. The halving happens on every call, including calls
/// where no doubling was needed.
///
/// A NaN or infinite φ(1/L) fails the model test, so L keeps doubling. If
/// the doubling cap is reached on a non-finite value the call fails with
/// `Oracle(NonFinite)`.
///
/// Because L lives on the instance, two calls with identical arguments can
/// return different steps. Use a fresh instance (or [`NesterovStep::reset`])
/// per run when reproducibility matters, and [`super::SharedStepSize`] to
/// share one estimate between threads.
#[derive(Debug, Clone)]
pub struct NesterovStep<T: Scalar> {
    initial_lipschitz: T,
    lipschitz: T,
    max_iterations: usize,
}

impl<T: Scalar> NesterovStep<T> {
    /// Creates the strategy with L = 1 and a doubling cap of 100.
    pub fn new() -> Self {
        Self {
            initial_lipschitz: T::one(),
            lipschitz: T::one(),
            max_iterations: 100,
        }
    }

    /// Sets the starting Lipschitz estimate.
    pub fn with_initial_lipschitz(mut self, lipschitz: T) -> Self {
        self.initial_lipschitz = lipschitz;
        self.lipschitz = lipschitz;
        self
    }

    /// Sets the cap on doublings per call.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Current Lipschitz estimate.
    pub fn lipschitz(&self) -> T {
        self.lipschitz
    }

    /// Restores the starting Lipschitz estimate.
    pub fn reset(&mut self) {
        self.lipschitz = self.initial_lipschitz;
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.lipschitz <= T::zero() || !<T as Float>::is_finite(self.lipschitz) {
            return Err(OptimizerError::invalid_configuration(
                "Lipschitz estimate must be positive and finite",
                "lipschitz",
                self.lipschitz.to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(OptimizerError::invalid_configuration(
                "Maximum iterations must be at least 1",
                "max_iterations",
                "0",
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> Default for NesterovStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> StepSizeStrategy<T> for NesterovStep<T> {
    fn compute<O>(
        &mut self,
        oracle: &O,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        self.validate()?;
        let mut phi = LineFunction::new(oracle, point, direction)?;
        let (phi0, dphi0) = phi.origin()?;
        let norm_sq = phi.direction_norm_squared();

        let two = <T as Scalar>::from_f64(2.0);
        let bound = |l: T| phi0 + dphi0 / l + norm_sq / (two * l);

        let mut doublings = 0;
        let mut value = phi.trial_value(T::one() / self.lipschitz)?;
        let mut accepted = value <= bound(self.lipschitz);
        while !accepted && doublings < self.max_iterations {
            doublings += 1;
            self.lipschitz *= two;
            value = phi.trial_value(T::one() / self.lipschitz)?;
            accepted = value <= bound(self.lipschitz);
        }

        let alpha = T::one() / self.lipschitz;
        self.lipschitz /= two;

        if !<T as Float>::is_finite(value) {
            return Err(OracleError::non_finite("value").into());
        }
        Ok(StepSize::new(alpha, phi.calls(), accepted))
    }

    fn name(&self) -> &str {
        "Nesterov"
    }
}
