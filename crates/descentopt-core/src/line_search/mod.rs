//! Step-size strategies for descent methods.
//!
//! Given a point x and a direction d, a strategy picks the multiplier α of
//! the next iterate `x + αd` by looking at the line function
//!
//! ```text
//! φ(α) = f(x + αd),    φ'(α) = ⟨∇f(x + αd), d⟩
//! ```
//!
//! # Strategy Families
//!
//! ## Exact Searches
//! - [`GoldenSectionStep`]: golden-section search of φ over a fixed interval
//! - [`BrentStep`]: downhill bracketing of φ followed by Brent's method
//!
//! ## Inexact Searches
//! - [`ArmijoStep`]: expands or shrinks α by a factor η until the
//!   sufficient decrease condition φ(α) ≤ φ(0) + c₁αφ'(0) is tight
//! - [`WolfeStep`]: strong Wolfe conditions by bracketing and zoom, with
//!   an Armijo fallback
//! - [`NesterovStep`]: adaptive Lipschitz estimate L, α = 1/L
//!
//! ## Fixed
//! - [`ConstantStep`]: a predetermined α, no evaluations
//!
//! # Oracle Accounting
//!
//! Every strategy reports the number of oracle calls it issued in
//! [`StepSize::oracle_calls`]. A call is one `value`, one `gradient` or one
//! fused `value_and_gradient`; descent drivers add these to their own
//! counts.
//!
//! # Runtime Selection
//!
//! [`StepSizeStrategy`] has generic methods and is used through static
//! dispatch. [`StepSizeRule`] wraps every strategy in one enum for code
//! that chooses the strategy at runtime, and [`SharedStepSize`] lets
//! several drivers share one stateful strategy behind a mutex.

use crate::{
    error::{OptimizerError, OptimizerResult},
    oracle::{check_dimension, ensure_finite, Oracle},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

mod armijo;
mod brent;
mod constant;
mod golden;
mod nesterov;
mod rule;
mod shared;
mod wolfe;

pub use armijo::ArmijoStep;
pub use brent::{Bracket, BrentStep};
pub use constant::ConstantStep;
pub use golden::GoldenSectionStep;
pub use nesterov::NesterovStep;
pub use rule::StepSizeRule;
pub use shared::SharedStepSize;
pub use wolfe::WolfeStep;

/// Step size chosen by a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize<T> {
    /// Multiplier α of the direction
    pub alpha: T,
    /// Number of oracle calls the strategy issued
    pub oracle_calls: usize,
    /// Whether the strategy's acceptance condition was met
    pub success: bool,
}

impl<T> StepSize<T> {
    /// Creates a step size record.
    pub fn new(alpha: T, oracle_calls: usize, success: bool) -> Self {
        Self {
            alpha,
            oracle_calls,
            success,
        }
    }
}

/// Trait for step-size strategies.
///
/// Strategies take `&mut self` so they may keep state across calls (see
/// [`NesterovStep`]); stateless strategies simply ignore it.
pub trait StepSizeStrategy<T: Scalar>: Debug {
    /// Computes the step size along `direction` from `point`.
    ///
    /// # Errors
    ///
    /// - `Oracle` errors raised while evaluating φ, including dimension
    ///   mismatches between the oracle, the point and the direction
    /// - `NotDescentDirection` for strategies that require φ'(0) < 0
    /// - `LineSearchFailed` when no usable step could be produced
    fn compute<O>(
        &mut self,
        oracle: &O,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized;

    /// Returns the name of the strategy.
    fn name(&self) -> &str;
}

/// The objective restricted to the ray `x + αd`, counting oracle calls.
#[derive(Debug)]
pub(crate) struct LineFunction<'a, T, O>
where
    T: Scalar,
    O: Oracle<T> + ?Sized,
{
    oracle: &'a O,
    point: &'a DVector<T>,
    direction: &'a DVector<T>,
    calls: usize,
}

impl<'a, T, O> LineFunction<'a, T, O>
where
    T: Scalar,
    O: Oracle<T> + ?Sized,
{
    /// Restricts `oracle` to the line through `point` along `direction`.
    pub(crate) fn new(
        oracle: &'a O,
        point: &'a DVector<T>,
        direction: &'a DVector<T>,
    ) -> OptimizerResult<Self> {
        check_dimension(oracle, point)?;
        check_dimension(oracle, direction)?;
        Ok(Self {
            oracle,
            point,
            direction,
            calls: 0,
        })
    }

    fn point_at(&self, alpha: T) -> DVector<T> {
        self.point + self.direction * alpha
    }

    fn raw_value(&mut self, alpha: T) -> OptimizerResult<T> {
        self.calls += 1;
        Ok(self.oracle.value(&self.point_at(alpha))?)
    }

    fn raw_value_and_slope(&mut self, alpha: T) -> OptimizerResult<(T, T)> {
        self.calls += 1;
        let (value, gradient) = self.oracle.value_and_gradient(&self.point_at(alpha))?;
        Ok((value, gradient.dot(self.direction)))
    }

    /// φ(α), one oracle call. A non-finite φ(α) is an error.
    pub(crate) fn value(&mut self, alpha: T) -> OptimizerResult<T> {
        let value = self.raw_value(alpha)?;
        Ok(ensure_finite(value, "value")?)
    }

    /// φ(α) for a trial step, one oracle call.
    ///
    /// A non-finite φ(α) reads as +∞, so the trial fails every decrease
    /// test and the strategy backs off towards α = 0.
    pub(crate) fn trial_value(&mut self, alpha: T) -> OptimizerResult<T> {
        let value = self.raw_value(alpha)?;
        Ok(finite_or_infinity(value))
    }

    /// φ(α) and φ'(α) for a trial step from one fused oracle call.
    ///
    /// φ(α) reads as +∞ when either quantity is non-finite.
    pub(crate) fn trial_value_and_slope(&mut self, alpha: T) -> OptimizerResult<(T, T)> {
        let (value, slope) = self.raw_value_and_slope(alpha)?;
        if <T as Float>::is_finite(slope) {
            Ok((finite_or_infinity(value), slope))
        } else {
            Ok((<T as Float>::infinity(), slope))
        }
    }

    /// φ(0) and φ'(0), rejecting non-finite values.
    pub(crate) fn origin(&mut self) -> OptimizerResult<(T, T)> {
        let (value, slope) = self.raw_value_and_slope(T::zero())?;
        Ok((ensure_finite(value, "value")?, ensure_finite(slope, "directional derivative")?))
    }

    /// φ(0) and φ'(0), additionally requiring φ'(0) < 0.
    pub(crate) fn descent_origin(&mut self) -> OptimizerResult<(T, T)> {
        let (value, slope) = self.origin()?;
        if slope >= T::zero() {
            return Err(OptimizerError::not_descent_direction(slope));
        }
        Ok((value, slope))
    }

    /// ‖d‖².
    pub(crate) fn direction_norm_squared(&self) -> T {
        self.direction.norm_squared()
    }

    /// Oracle calls issued so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

fn finite_or_infinity<T: Scalar>(value: T) -> T {
    if <T as Float>::is_finite(value) {
        value
    } else {
        <T as Float>::infinity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OracleError, OracleResult};
    use crate::oracle::{CountingOracle, QuadraticOracle};
    use approx::assert_relative_eq;

    #[test]
    fn test_line_function_counts_calls() {
        let oracle = CountingOracle::new(QuadraticOracle::<f64>::simple(2));
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let d = DVector::from_vec(vec![-1.0, -2.0]);

        let mut phi = LineFunction::new(&oracle, &x, &d).unwrap();
        let (phi0, dphi0) = phi.descent_origin().unwrap();
        assert_relative_eq!(phi0, 2.5);
        assert_relative_eq!(dphi0, -5.0);

        // minimum of the line at α = 1
        assert_relative_eq!(phi.value(1.0).unwrap(), 0.0);
        let (value, slope) = phi.trial_value_and_slope(0.5).unwrap();
        assert_relative_eq!(value, 0.625);
        assert_relative_eq!(slope, -2.5);

        assert_eq!(phi.calls(), 3);
        assert_eq!(oracle.counts().calls, 3);
        assert_relative_eq!(phi.direction_norm_squared(), 5.0);
    }

    #[derive(Debug)]
    struct Cliff;

    impl Oracle<f64> for Cliff {
        fn dimension(&self) -> usize {
            1
        }

        fn value(&self, point: &DVector<f64>) -> OracleResult<f64> {
            Ok(if point[0] <= 3.0 { -point[0] } else { f64::NAN })
        }

        fn gradient(&self, _point: &DVector<f64>) -> OracleResult<DVector<f64>> {
            Ok(DVector::from_element(1, -1.0))
        }
    }

    #[test]
    fn test_non_finite_values_beyond_the_cliff() {
        let x = DVector::from_element(1, 0.0);
        let d = DVector::from_element(1, 1.0);
        let mut phi = LineFunction::new(&Cliff, &x, &d).unwrap();

        assert_eq!(phi.value(2.0).unwrap(), -2.0);
        assert!(matches!(
            phi.value(4.0),
            Err(OptimizerError::Oracle(OracleError::NonFinite { .. }))
        ));
        assert_eq!(phi.trial_value(4.0).unwrap(), f64::INFINITY);
        assert_eq!(phi.trial_value_and_slope(4.0).unwrap().0, f64::INFINITY);
        assert_eq!(phi.trial_value_and_slope(1.0).unwrap(), (-1.0, -1.0));
        assert_eq!(phi.calls(), 5);
    }

    #[test]
    fn test_ascent_direction_is_rejected() {
        let oracle = QuadraticOracle::<f64>::simple(2);
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let d = DVector::from_vec(vec![1.0, 0.0]);

        let mut phi = LineFunction::new(&oracle, &x, &d).unwrap();
        assert!(matches!(
            phi.descent_origin(),
            Err(OptimizerError::NotDescentDirection { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_reported() {
        let oracle = QuadraticOracle::<f64>::simple(2);
        let x = DVector::from_vec(vec![1.0, 0.0]);
        let d = DVector::from_vec(vec![1.0, 0.0, 0.0]);

        assert!(matches!(
            LineFunction::new(&oracle, &x, &d),
            Err(OptimizerError::Oracle(_))
        ));
    }
}
