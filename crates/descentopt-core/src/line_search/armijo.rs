use super::{LineFunction, StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult, OracleError},
    oracle::Oracle,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Armijo line search with step expansion.
///
/// Starting from α = 1, tests the sufficient decrease condition
/// `φ(α) ≤ φ(0) + c₁αφ'(0)` at α and its negation at ηα:
///
/// - if α passes, α is multiplied by η as long as ηα still passes, which
///   finds the largest step of the form ηᵏ with sufficient decrease;
/// - otherwise α is divided by η until it passes.
///
/// Each phase stops after `max_iterations` trials. An expanded step always
/// satisfies sufficient decrease; a shrinking phase that hits the cap
/// returns its last α with `success = false`.
///
/// A NaN or infinite φ(α) counts as a failed trial, so expansion stops
/// before it and shrinking continues past it. If even the last shrunk step
/// has a non-finite φ the search fails with `Oracle(NonFinite)`.
#[derive(Debug, Clone)]
pub struct ArmijoStep<T: Scalar> {
    c1: T,
    eta: T,
    max_iterations: usize,
}

impl<T: Scalar> ArmijoStep<T> {
    /// Creates the strategy with `c1 = 0.4`, `eta = 2` and a cap of 100.
    pub fn new() -> Self {
        Self {
            c1: <T as Scalar>::from_f64(0.4),
            eta: <T as Scalar>::from_f64(2.0),
            max_iterations: 100,
        }
    }

    /// Sets the sufficient decrease constant c₁ ∈ (0, 1).
    pub fn with_c1(mut self, c1: T) -> Self {
        self.c1 = c1;
        self
    }

    /// Sets the expansion/shrink factor η > 1.
    pub fn with_eta(mut self, eta: T) -> Self {
        self.eta = eta;
        self
    }

    /// Sets the iteration cap of each phase.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.c1 <= T::zero() || self.c1 >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "Armijo constant c1 must be in (0, 1)",
                "c1",
                self.c1.to_string(),
            ));
        }
        if self.eta <= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "Step factor eta must be greater than 1",
                "eta",
                self.eta.to_string(),
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

    pub(crate) fn search<O>(
        &self,
        phi: &mut LineFunction<'_, T, O>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        self.validate()?;
        let (phi0, dphi0) = phi.descent_origin()?;
        let decrease = |alpha: T| phi0 + self.c1 * alpha * dphi0;

        let mut alpha = T::one();
        let sufficient = phi.trial_value(alpha)? <= decrease(alpha);
        let mut overshoots = phi.trial_value(self.eta * alpha)? >= decrease(self.eta * alpha);

        if sufficient {
            let mut iterations = 0;
            while !overshoots && iterations < self.max_iterations {
                iterations += 1;
                alpha *= self.eta;
                overshoots = phi.trial_value(self.eta * alpha)? >= decrease(self.eta * alpha);
            }
            return Ok(StepSize::new(alpha, phi.calls(), true));
        }

        let mut value = <T as Float>::infinity();
        let mut sufficient = false;
        let mut iterations = 0;
        while !sufficient && iterations < self.max_iterations {
            iterations += 1;
            alpha /= self.eta;
            value = phi.trial_value(alpha)?;
            sufficient = value <= decrease(alpha);
        }
        if !<T as Float>::is_finite(value) {
            return Err(OracleError::non_finite("value").into());
        }
        Ok(StepSize::new(alpha, phi.calls(), sufficient))
    }
}

impl<T: Scalar> Default for ArmijoStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> StepSizeStrategy<T> for ArmijoStep<T> {
    fn compute<O>(
        &mut self,
        oracle: &O,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        let mut phi = LineFunction::new(oracle, point, direction)?;
        self.search(&mut phi)
    }

    fn name(&self) -> &str {
        "Armijo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleResult;
    use crate::oracle::{CountingOracle, QuadraticOracle};
    use approx::assert_relative_eq;

    fn square() -> QuadraticOracle<f64> {
        // f(x) = x²
        QuadraticOracle::diagonal(&[2.0])
    }

    /// f(x) = −x up to `edge`, NaN beyond.
    #[derive(Debug)]
    struct Cliff {
        edge: f64,
    }

    impl Oracle<f64> for Cliff {
        fn dimension(&self) -> usize {
            1
        }

        fn value(&self, point: &DVector<f64>) -> OracleResult<f64> {
            Ok(if point[0] <= self.edge { -point[0] } else { f64::NAN })
        }

        fn gradient(&self, _point: &DVector<f64>) -> OracleResult<DVector<f64>> {
            Ok(DVector::from_element(1, -1.0))
        }
    }

    fn cliff_step(edge: f64) -> OptimizerResult<StepSize<f64>> {
        let x = DVector::from_element(1, 0.0);
        let d = DVector::from_element(1, 1.0);
        ArmijoStep::new().compute(&Cliff { edge }, &x, &d)
    }

    #[test]
    fn test_shrinking_phase() {
        let oracle = CountingOracle::new(square());
        let x = DVector::from_vec(vec![3.0]);
        let d = DVector::from_vec(vec![-6.0]);

        let step = ArmijoStep::new().compute(&oracle, &x, &d).unwrap();
        assert_relative_eq!(step.alpha, 0.5);
        assert!(step.success);
        assert_eq!(step.oracle_calls, 4);
        assert_eq!(oracle.counts().calls, 4);
    }

    #[test]
    fn test_expanding_phase() {
        let oracle = square();
        let x = DVector::from_vec(vec![3.0]);
        let d = DVector::from_vec(vec![-0.06]);

        let step = ArmijoStep::new().compute(&oracle, &x, &d).unwrap();
        assert_relative_eq!(step.alpha, 32.0);
        assert!(step.success);

        // sufficient decrease holds at α but not at 2α
        let phi = |a: f64| (3.0 - 0.06 * a).powi(2);
        let slope = -2.0 * 3.0 * 0.06;
        assert!(phi(step.alpha) <= 9.0 + 0.4 * step.alpha * slope);
        assert!(phi(2.0 * step.alpha) > 9.0 + 0.4 * 2.0 * step.alpha * slope);
    }

    #[test]
    fn test_phi_decreases_along_negative_gradient() {
        let oracle = square();
        for &start in &[0.1, -2.0, 7.5, 100.0] {
            let x = DVector::from_vec(vec![start]);
            let d = DVector::from_vec(vec![-2.0 * start]);

            let step = ArmijoStep::new().compute(&oracle, &x, &d).unwrap();
            let next = start + step.alpha * d[0];
            assert!(next * next < start * start);
        }
    }

    #[test]
    fn test_ascent_direction_is_rejected() {
        let x = DVector::from_vec(vec![3.0]);
        let d = DVector::from_vec(vec![1.0]);
        assert!(matches!(
            ArmijoStep::new().compute(&square(), &x, &d),
            Err(OptimizerError::NotDescentDirection { .. })
        ));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(ArmijoStep::<f64>::new().with_c1(1.5).validate().is_err());
        assert!(ArmijoStep::<f64>::new().with_eta(0.5).validate().is_err());
        assert!(ArmijoStep::<f64>::new()
            .with_max_iterations(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_expansion_stops_before_non_finite_values() {
        let step = cliff_step(3.0).unwrap();
        assert_eq!(step.alpha, 2.0);
        assert!(step.success);
        assert_eq!(step.oracle_calls, 4);
    }

    #[test]
    fn test_shrinking_passes_non_finite_values() {
        let step = cliff_step(0.3).unwrap();
        assert_eq!(step.alpha, 0.25);
        assert!(step.success);
        assert_eq!(step.oracle_calls, 5);
    }

    #[test]
    fn test_no_finite_trial_is_an_oracle_error() {
        assert!(matches!(
            cliff_step(0.0),
            Err(OptimizerError::Oracle(OracleError::NonFinite { .. }))
        ));
    }
}
