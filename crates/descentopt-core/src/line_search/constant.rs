use super::{StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult},
    oracle::{check_dimension, Oracle},
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Fixed step size.
///
/// Returns the same α on every call without evaluating the oracle. Useful
/// when a step bound is known in advance (e.g. 1/L for an L-smooth
/// objective) and as a baseline in comparisons.
#[derive(Debug, Clone)]
pub struct ConstantStep<T: Scalar> {
    alpha: T,
}

impl<T: Scalar> ConstantStep<T> {
    /// Creates a constant step size strategy.
    pub fn new(alpha: T) -> Self {
        Self { alpha }
    }

    /// The fixed step size.
    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.alpha <= T::zero() || !<T as Float>::is_finite(self.alpha) {
            return Err(OptimizerError::invalid_configuration(
                "Step size must be positive and finite",
                "alpha",
                self.alpha.to_string(),
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> StepSizeStrategy<T> for ConstantStep<T> {
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
        check_dimension(oracle, point)?;
        check_dimension(oracle, direction)?;
        Ok(StepSize::new(self.alpha, 0, true))
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CountingOracle, QuadraticOracle};

    #[test]
    fn test_constant_step_uses_no_oracle_calls() {
        let oracle = CountingOracle::new(QuadraticOracle::<f64>::simple(2));
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let d = DVector::from_vec(vec![-1.0, -1.0]);

        let mut strategy = ConstantStep::new(0.25);
        let step = strategy.compute(&oracle, &x, &d).unwrap();

        assert_eq!(step, StepSize::new(0.25, 0, true));
        assert_eq!(oracle.counts().calls, 0);
    }

    #[test]
    fn test_non_positive_step_is_rejected() {
        let oracle = QuadraticOracle::<f64>::simple(1);
        let x = DVector::from_vec(vec![1.0]);
        let d = DVector::from_vec(vec![-1.0]);

        assert!(ConstantStep::new(0.0).compute(&oracle, &x, &d).is_err());
        assert!(ConstantStep::new(-1.0).validate().is_err());
    }
}
