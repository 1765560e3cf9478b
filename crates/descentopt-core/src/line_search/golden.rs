use super::{LineFunction, StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult},
    one_dim::{GoldenSection, IntervalMinimizer},
    oracle::Oracle,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Exact line search by golden-section search over a fixed interval.
///
/// Minimizes φ over `[lower, upper]` (default `[0, 15]`) to accuracy `eps`
/// (default `1e-5`). The search keeps the 15-iteration cap of
/// [`GoldenSection`], so one step costs at most 17 evaluations and the
/// returned α is accurate to about `5e-4·(upper − lower)`.
#[derive(Debug, Clone)]
pub struct GoldenSectionStep<T: Scalar> {
    lower: T,
    upper: T,
    eps: T,
    search: GoldenSection,
}

impl<T: Scalar> GoldenSectionStep<T> {
    /// Creates the strategy with the interval `[0, 15]` and `eps = 1e-5`.
    pub fn new() -> Self {
        Self {
            lower: T::zero(),
            upper: <T as Scalar>::from_f64(15.0),
            eps: <T as Scalar>::from_f64(1e-5),
            search: GoldenSection::new(),
        }
    }

    /// Sets the search interval.
    pub fn with_interval(mut self, lower: T, upper: T) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Sets the accuracy of the golden-section search.
    pub fn with_tolerance(mut self, eps: T) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the iteration cap of the underlying search.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.search = self.search.with_max_iterations(max_iterations);
        self
    }

    /// Returns the search interval.
    pub fn interval(&self) -> (T, T) {
        (self.lower, self.upper)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.lower > self.upper
            || !<T as Float>::is_finite(self.lower)
            || !<T as Float>::is_finite(self.upper)
        {
            return Err(OptimizerError::invalid_interval(self.lower, self.upper));
        }
        if self.eps <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "Tolerance must be positive",
                "eps",
                self.eps.to_string(),
            ));
        }
        self.search.validate()
    }
}

impl<T: Scalar> Default for GoldenSectionStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> StepSizeStrategy<T> for GoldenSectionStep<T> {
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

        let minimum = self
            .search
            .minimize(self.lower, self.upper, |alpha| phi.value(alpha), self.eps, false)?;

        Ok(StepSize::new(minimum.x_min, phi.calls(), true))
    }

    fn name(&self) -> &str {
        "Golden Section"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CountingOracle, QuadraticOracle};

    #[test]
    fn test_exact_step_on_quadratic() {
        let oracle = CountingOracle::new(QuadraticOracle::<f64>::diagonal(&[2.0, 4.0]));
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let d = DVector::from_vec(vec![-2.0, -4.0]);

        // φ(α) = (1 − 2α)² + 2(1 − 4α)², minimized at α = 5/18
        let mut strategy = GoldenSectionStep::new().with_max_iterations(100);
        let step = strategy.compute(&oracle, &x, &d).unwrap();

        assert!((step.alpha - 5.0 / 18.0).abs() < 1e-4);
        assert!(step.success);
        assert_eq!(step.oracle_calls, oracle.counts().calls);
    }

    #[test]
    fn test_default_cap_bounds_cost() {
        let oracle = QuadraticOracle::<f64>::simple(2);
        let x = DVector::from_vec(vec![3.0, -1.0]);
        let d = -x.clone();

        let step = GoldenSectionStep::new().compute(&oracle, &x, &d).unwrap();
        assert_eq!(step.oracle_calls, 17);
        assert!((step.alpha - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_custom_interval() {
        let oracle = QuadraticOracle::<f64>::simple(1);
        let x = DVector::from_vec(vec![1.0]);
        let d = DVector::from_vec(vec![-1.0]);

        // the unconstrained minimizer α = 1 lies outside [0, 0.5]
        let mut strategy = GoldenSectionStep::new()
            .with_interval(0.0, 0.5)
            .with_max_iterations(100);
        let step = strategy.compute(&oracle, &x, &d).unwrap();
        assert!((step.alpha - 0.5).abs() < 1e-4);

        let mut invalid = GoldenSectionStep::new().with_interval(1.0, 0.0);
        assert!(invalid.compute(&oracle, &x, &d).is_err());
    }
}
