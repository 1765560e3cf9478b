//! One-dimensional interval minimizers.
//!
//! These engines minimize a scalar function `f: ℝ → ℝ` over a closed
//! interval `[a, b]` and are the building blocks of the exact step-size
//! strategies. They assume `f` is unimodal on the interval; for other
//! functions they return some local minimizer.
//!
//! # Algorithms
//!
//! ## Golden-Section Search
//! - **Strategy**: Shrinks the interval by K = (√5 − 1)/2 per iteration,
//!   reusing one interior probe each time
//! - **Cost**: One evaluation per iteration after the initial two
//! - **Convergence**: Linear, guaranteed for unimodal functions
//!
//! ## Brent's Method
//! - **Strategy**: Parabolic interpolation through the three best points,
//!   with a golden-section step whenever the parabola is not trusted
//! - **Cost**: One evaluation per iteration after a single initial one
//! - **Convergence**: Superlinear near a smooth minimum, never worse than
//!   golden section
//!
//! ## Successive Parabolic Interpolation
//! - **Strategy**: Always jumps to the vertex of the interpolating parabola
//! - **Cost**: One evaluation per iteration after the initial three
//! - **Convergence**: Superlinear when started close enough, otherwise
//!   unreliable; non-convergence is reported through
//!   [`ScalarMinimum::converged`]
//!
//! # Objective Contract
//!
//! Objectives are `FnMut(T) -> OptimizerResult<T>` so that step-size
//! strategies can propagate oracle failures through a search; an error from
//! the objective aborts the search and is returned unchanged. A NaN or
//! infinite objective value aborts it with
//! [`OracleError::NonFinite`](crate::error::OracleError::NonFinite).

use crate::{
    error::{OptimizerError, OptimizerResult},
    oracle::ensure_finite,
    types::Scalar,
};
use nalgebra::{Matrix3, Vector3};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod brent;
mod golden_section;
mod parabolic;

pub use brent::Brent;
pub use golden_section::GoldenSection;
pub use parabolic::Parabolic;

/// Kind of step taken by an interval search iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepKind {
    /// Entry describing the starting interval
    Initial,
    /// Golden-section step
    Golden,
    /// Vertex of an interpolating parabola
    Parabolic,
}

/// Per-iteration statistics of an interval search.
///
/// Entry 0 describes the starting state; entry `k` the state after
/// iteration `k`. What "width" measures depends on the engine: the probe
/// spacing `I` for golden section, the last step length for Brent and
/// parabolic interpolation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchTrace<T> {
    /// Iteration indices
    pub iterations: Vec<usize>,
    /// Accuracy measure after each iteration
    pub widths: Vec<T>,
    /// Step kind of each iteration
    pub steps: Vec<StepKind>,
}

impl<T: Copy> SearchTrace<T> {
    fn with_initial(width: T) -> Self {
        Self {
            iterations: vec![0],
            widths: vec![width],
            steps: vec![StepKind::Initial],
        }
    }

    fn push(&mut self, iteration: usize, width: T, step: StepKind) {
        self.iterations.push(iteration);
        self.widths.push(width);
        self.steps.push(step);
    }

    /// Number of entries, including the initial one.
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Number of parabolic steps taken.
    pub fn parabolic_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|&&kind| kind == StepKind::Parabolic)
            .count()
    }
}

/// Result of a one-dimensional minimization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarMinimum<T> {
    /// Approximate minimizer
    pub x_min: T,
    /// Objective value at `x_min`
    pub f_min: T,
    /// Number of objective evaluations
    pub evaluations: usize,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the accuracy target was reached before the iteration cap
    pub converged: bool,
    /// Per-iteration statistics, when requested
    pub trace: Option<SearchTrace<T>>,
}

/// Trait for algorithms minimizing a scalar function over an interval.
pub trait IntervalMinimizer<T: Scalar> {
    /// Minimizes `objective` over `[lower, upper]` to accuracy `eps`.
    ///
    /// When `collect_stats` is true the result carries a [`SearchTrace`].
    ///
    /// # Errors
    ///
    /// - `InvalidInterval` if the bounds are misordered or not finite
    /// - `InvalidConfiguration` if `eps` is not a positive finite number
    /// - Any error returned by `objective`
    fn minimize<F>(
        &self,
        lower: T,
        upper: T,
        objective: F,
        eps: T,
        collect_stats: bool,
    ) -> OptimizerResult<ScalarMinimum<T>>
    where
        F: FnMut(T) -> OptimizerResult<T>;

    /// Returns the name of the algorithm.
    fn name(&self) -> &str;
}

/// Evaluates the objective, rejecting non-finite values.
pub(crate) fn evaluate<T, F>(objective: &mut F, x: T) -> OptimizerResult<T>
where
    T: Scalar,
    F: FnMut(T) -> OptimizerResult<T>,
{
    Ok(ensure_finite(objective(x)?, "objective value")?)
}

/// Checks the tolerance shared by every interval search.
pub(crate) fn validate_eps<T: Scalar>(eps: T) -> OptimizerResult<()> {
    if eps <= T::zero() || !<T as Float>::is_finite(eps) {
        return Err(OptimizerError::invalid_configuration(
            "Tolerance must be positive and finite",
            "eps",
            eps.to_string(),
        ));
    }
    Ok(())
}

/// Checks the interval bounds; `allow_empty` admits `lower == upper`.
pub(crate) fn validate_interval<T: Scalar>(
    lower: T,
    upper: T,
    allow_empty: bool,
) -> OptimizerResult<()> {
    let finite = <T as Float>::is_finite(lower) && <T as Float>::is_finite(upper);
    let ordered = if allow_empty {
        lower <= upper
    } else {
        lower < upper
    };
    if !finite || !ordered {
        return Err(OptimizerError::invalid_interval(lower, upper));
    }
    Ok(())
}

/// Vertex of the parabola through three points.
///
/// Fits `q(x) = a₂x² + a₁x + a₀` by solving the Vandermonde system and
/// returns `−a₁ / (2a₂)`. Returns `None` when the system is singular or the
/// vertex is not finite (collinear points).
pub(crate) fn parabola_vertex<T: Scalar>(points: [(T, T); 3]) -> Option<T> {
    let [(x1, f1), (x2, f2), (x3, f3)] = points;
    #[rustfmt::skip]
    let vandermonde = Matrix3::new(
        x1 * x1, x1, T::one(),
        x2 * x2, x2, T::one(),
        x3 * x3, x3, T::one(),
    );
    let rhs = Vector3::new(f1, f2, f3);

    let coefficients = vandermonde.lu().solve(&rhs)?;
    let (a2, a1) = (coefficients[0], coefficients[1]);
    let vertex = -a1 / (a2 + a2);

    if <T as Float>::is_finite(vertex) {
        Some(vertex)
    } else {
        None
    }
}

/// Sign function returning zero at zero.
pub(crate) fn sign<T: Scalar>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else if x < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parabola_vertex() {
        // (x − 2)² + 1
        let f = |x: f64| (x - 2.0).powi(2) + 1.0;
        let vertex = parabola_vertex([(0.0, f(0.0)), (1.0, f(1.0)), (5.0, f(5.0))]).unwrap();
        assert_relative_eq!(vertex, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parabola_vertex_degenerate() {
        // Repeated abscissa makes the system singular
        assert!(parabola_vertex([(1.0, 1.0), (1.0, 1.0), (2.0, 4.0)]).is_none());
    }

    #[test]
    fn test_interval_validation() {
        assert!(validate_interval(0.0, 1.0, false).is_ok());
        assert!(validate_interval(1.0, 1.0, true).is_ok());
        assert!(matches!(
            validate_interval(1.0, 1.0, false),
            Err(OptimizerError::InvalidInterval { .. })
        ));
        assert!(validate_interval(2.0, 1.0, true).is_err());
        assert!(validate_interval(f64::NAN, 1.0, true).is_err());
    }

    #[test]
    fn test_eps_validation() {
        assert!(validate_eps(1e-8).is_ok());
        assert!(validate_eps(0.0).is_err());
        assert!(validate_eps(-1.0).is_err());
        assert!(validate_eps(f64::INFINITY).is_err());
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }
}
