use super::{ArmijoStep, LineFunction, StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult},
    oracle::Oracle,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Strong Wolfe line search.
///
/// Accepts α when both strong Wolfe conditions hold:
///
/// ```text
/// φ(α)    ≤ φ(0) + c₁αφ'(0)     (sufficient decrease)
/// |φ'(α)| ≤ c₂|φ'(0)|           (curvature)
/// ```
///
/// The search doubles α from 1 until it brackets an acceptable step, then
/// zooms into the bracket with cubic interpolation, falling back to
/// quadratic interpolation and finally bisection when the interpolant lands
/// too close to an end of the bracket.
///
/// If no acceptable step is found within `max_iterations` bracketing steps
/// (or as many zoom steps), the Armijo strategy takes over from scratch.
/// The reported oracle calls include both phases.
///
/// A trial where φ or φ' is NaN or infinite fails sufficient decrease and
/// becomes the far end of the zoom bracket.
#[derive(Debug, Clone)]
pub struct WolfeStep<T: Scalar> {
    c1: T,
    c2: T,
    max_iterations: usize,
    fallback: ArmijoStep<T>,
}

/// One evaluated point of the line function.
#[derive(Debug, Clone, Copy)]
struct Probe<T> {
    alpha: T,
    value: T,
    slope: T,
}

impl<T: Scalar> WolfeStep<T> {
    /// Creates the strategy with `c1 = 1e-4`, `c2 = 0.9` and 10 iterations.
    pub fn new() -> Self {
        Self {
            c1: <T as Scalar>::from_f64(1e-4),
            c2: <T as Scalar>::from_f64(0.9),
            max_iterations: 10,
            fallback: ArmijoStep::new(),
        }
    }

    /// Sets the sufficient decrease constant c₁.
    pub fn with_c1(mut self, c1: T) -> Self {
        self.c1 = c1;
        self
    }

    /// Sets the curvature constant c₂.
    pub fn with_c2(mut self, c2: T) -> Self {
        self.c2 = c2;
        self
    }

    /// Sets the cap on bracketing and zoom iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replaces the Armijo strategy used when the Wolfe search fails.
    pub fn with_fallback(mut self, fallback: ArmijoStep<T>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.c1 <= T::zero() || self.c1 >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "Wolfe constant c1 must be in (0, 1)",
                "c1",
                self.c1.to_string(),
            ));
        }
        if self.c2 <= self.c1 || self.c2 >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "Wolfe constant c2 must satisfy c1 < c2 < 1",
                "c2",
                self.c2.to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(OptimizerError::invalid_configuration(
                "Maximum iterations must be at least 1",
                "max_iterations",
                "0",
            ));
        }
        self.fallback.validate()
    }

    /// Bracketing phase. Returns the accepted step, or `None` on failure.
    fn bracket<O>(
        &self,
        phi: &mut LineFunction<'_, T, O>,
        origin: Probe<T>,
    ) -> OptimizerResult<Option<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        let two = <T as Scalar>::from_f64(2.0);
        let mut previous = origin;
        let mut alpha = T::one();

        for i in 0..self.max_iterations {
            let (value, slope) = phi.trial_value_and_slope(alpha)?;
            let current = Probe { alpha, value, slope };

            if value > origin.value + self.c1 * alpha * origin.slope
                || (i > 0 && value >= previous.value)
            {
                return self.zoom(phi, origin, previous, current);
            }
            if <T as Float>::abs(slope) <= -self.c2 * origin.slope {
                return Ok(Some(alpha));
            }
            if slope >= T::zero() {
                return self.zoom(phi, origin, current, previous);
            }

            previous = current;
            alpha *= two;
        }

        Ok(None)
    }

    /// Zoom phase on a bracket whose `lo` end satisfies sufficient decrease.
    fn zoom<O>(
        &self,
        phi: &mut LineFunction<'_, T, O>,
        origin: Probe<T>,
        mut lo: Probe<T>,
        mut hi: Probe<T>,
    ) -> OptimizerResult<Option<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        let cubic_margin = <T as Scalar>::from_f64(0.2);
        let quadratic_margin = <T as Scalar>::from_f64(0.1);
        let half = <T as Scalar>::from_f64(0.5);

        // third point for the cubic, the previous value of an endpoint
        let mut recent = (origin.alpha, origin.value);

        for i in 0..=self.max_iterations {
            let width = hi.alpha - lo.alpha;
            let (left, right) = if width < T::zero() {
                (hi.alpha, lo.alpha)
            } else {
                (lo.alpha, hi.alpha)
            };
            let inside = |candidate: T, margin: T| {
                let guard = margin * width;
                candidate <= right - guard && candidate >= left + guard
            };

            let cubic = if i > 0 {
                cubic_minimizer(lo, (hi.alpha, hi.value), recent)
                    .filter(|&c| inside(c, cubic_margin))
            } else {
                None
            };
            let alpha = cubic
                .or_else(|| {
                    quadratic_minimizer(lo, (hi.alpha, hi.value))
                        .filter(|&q| inside(q, quadratic_margin))
                })
                .unwrap_or(lo.alpha + half * width);

            let (value, slope) = phi.trial_value_and_slope(alpha)?;
            let trial = Probe { alpha, value, slope };

            if value > origin.value + self.c1 * alpha * origin.slope || value >= lo.value {
                recent = (hi.alpha, hi.value);
                hi = trial;
            } else {
                if <T as Float>::abs(slope) <= -self.c2 * origin.slope {
                    return Ok(Some(alpha));
                }
                if slope * (hi.alpha - lo.alpha) >= T::zero() {
                    recent = (hi.alpha, hi.value);
                    hi = lo;
                } else {
                    recent = (lo.alpha, lo.value);
                }
                lo = trial;
            }
        }

        Ok(None)
    }
}

/// Minimizer of the cubic through `(a, fa)` with slope `fpa` and the points
/// `b` and `c`, if it exists.
fn cubic_minimizer<T: Scalar>(a: Probe<T>, b: (T, T), c: (T, T)) -> Option<T> {
    let three = <T as Scalar>::from_f64(3.0);
    let db = b.0 - a.alpha;
    let dc = c.0 - a.alpha;
    let denom = (db * dc) * (db * dc) * (db - dc);

    let rb = b.1 - a.value - a.slope * db;
    let rc = c.1 - a.value - a.slope * dc;
    let p = (dc * dc * rb - db * db * rc) / denom;
    let q = (-dc * dc * dc * rb + db * db * db * rc) / denom;

    let radical = q * q - three * p * a.slope;
    let xmin = a.alpha + (-q + <T as Float>::sqrt(radical)) / (three * p);
    <T as Float>::is_finite(xmin).then_some(xmin)
}

/// Minimizer of the parabola through `(a, fa)` with slope `fpa` and `b`.
fn quadratic_minimizer<T: Scalar>(a: Probe<T>, b: (T, T)) -> Option<T> {
    let db = b.0 - a.alpha;
    let curvature = (b.1 - a.value - a.slope * db) / (db * db);
    let xmin = a.alpha - a.slope / (curvature + curvature);
    <T as Float>::is_finite(xmin).then_some(xmin)
}

impl<T: Scalar> Default for WolfeStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> StepSizeStrategy<T> for WolfeStep<T> {
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
        let (value, slope) = phi.descent_origin()?;
        let origin = Probe {
            alpha: T::zero(),
            value,
            slope,
        };

        if let Some(alpha) = self.bracket(&mut phi, origin)? {
            return Ok(StepSize::new(alpha, phi.calls(), true));
        }

        let wolfe_calls = phi.calls();
        let mut fallback_phi = LineFunction::new(oracle, point, direction)?;
        let step = self.fallback.search(&mut fallback_phi)?;
        Ok(StepSize::new(
            step.alpha,
            wolfe_calls + step.oracle_calls,
            step.success,
        ))
    }

    fn name(&self) -> &str {
        "Strong Wolfe"
    }
}
