use super::{
    evaluate, parabola_vertex, sign, validate_eps, validate_interval, IntervalMinimizer,
    ScalarMinimum, SearchTrace, StepKind,
};
use crate::{
    error::{OptimizerError, OptimizerResult},
    types::{constants, Scalar},
};
use num_traits::Float;

/// Brent's method for one-dimensional minimization.
///
/// Keeps the three best points found so far, ranked `f(x1) <= f(x2) <= f(x3)`,
/// together with a bracket `[a, b]` around `x1`. Each iteration tries the
/// vertex of the parabola through the three points and falls back to a
/// golden-section step into the larger half of the bracket when
///
/// - the three points are not pairwise distinct,
/// - `x1` is not strictly the best point,
/// - the vertex falls outside `[a, b]`, or
/// - the vertex moves more than half the step taken two iterations ago.
///
/// The last condition makes the parabolic steps shrink geometrically, so
/// the method is never asymptotically slower than golden section.
///
/// The result is the best point `x1`, which is not necessarily the point
/// evaluated last.
#[derive(Debug, Clone)]
pub struct Brent {
    max_iterations: usize,
}

impl Brent {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;

    /// Creates Brent's method with the default iteration cap.
    pub fn new() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
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

impl Default for Brent {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> IntervalMinimizer<T> for Brent {
    fn minimize<F>(
        &self,
        lower: T,
        upper: T,
        mut objective: F,
        eps: T,
        collect_stats: bool,
    ) -> OptimizerResult<ScalarMinimum<T>>
    where
        F: FnMut(T) -> OptimizerResult<T>,
    {
        self.validate()?;
        validate_interval(lower, upper, false)?;
        validate_eps(eps)?;

        let k = constants::golden_fraction::<T>();
        let two = <T as Scalar>::from_f64(2.0);
        let ten = <T as Scalar>::from_f64(10.0);

        let (mut a, mut b) = (lower, upper);

        // All three slots start at the same point and share one evaluation.
        let start = a + k * (b - a);
        let f_start = evaluate(&mut objective, start)?;
        let (mut x1, mut x2, mut x3) = (start, start, start);
        let (mut f1, mut f2, mut f3) = (f_start, f_start, f_start);
        let mut evaluations = 1;

        let mut step_curr = b - a;
        let mut step_prev = b - a;
        let mut iterations = 0;
        let mut converged = false;

        let mut trace = collect_stats.then(|| SearchTrace::with_initial(step_curr));

        loop {
            if step_curr <= eps {
                converged = true;
                break;
            }
            if iterations >= self.max_iterations {
                break;
            }

            let step_preprev = step_prev;
            step_prev = step_curr;

            let tol = eps * <T as Float>::abs(x1) + eps / ten;
            let mid = (a + b) / two;
            if <T as Float>::abs(x1 - mid) + (b - a) / two <= two * tol {
                converged = true;
                break;
            }

            iterations += 1;

            let mut candidate = None;
            let distinct = x1 != x2 && x1 != x3 && x2 != x3;
            if distinct && f1 < f2 && f1 < f3 {
                if let Some(u) = parabola_vertex([(x1, f1), (x2, f2), (x3, f3)]) {
                    if a <= u && u <= b && <T as Float>::abs(u - x1) < step_preprev / two {
                        // too close to a bound, step inward by tol instead
                        if u - a < two * tol || b - u < two * tol {
                            candidate = Some(x1 - sign(x1 - mid) * tol);
                        } else {
                            candidate = Some(u);
                        }
                    }
                }
            }

            let (u, kind) = match candidate {
                Some(u) => (u, StepKind::Parabolic),
                None => {
                    let u = if x1 < mid {
                        step_prev = b - x1;
                        x1 + k * (b - x1)
                    } else {
                        step_prev = x1 - a;
                        x1 - k * (x1 - a)
                    };
                    (u, StepKind::Golden)
                }
            };

            step_curr = <T as Float>::abs(u - x1);
            let f_u = evaluate(&mut objective, u)?;
            evaluations += 1;

            if f_u <= f1 {
                if u >= x1 {
                    a = x1;
                } else {
                    b = x1;
                }
                x3 = x2;
                f3 = f2;
                x2 = x1;
                f2 = f1;
                x1 = u;
                f1 = f_u;
            } else {
                if u >= x1 {
                    b = u;
                } else {
                    a = u;
                }
                if f_u <= f2 || x2 == x1 {
                    x3 = x2;
                    f3 = f2;
                    x2 = u;
                    f2 = f_u;
                } else if f_u <= f3 || x3 == x1 || x3 == x2 {
                    x3 = u;
                    f3 = f_u;
                }
            }

            if let Some(trace) = trace.as_mut() {
                trace.push(iterations, step_curr, kind);
            }
        }

        Ok(ScalarMinimum {
            x_min: x1,
            f_min: f1,
            evaluations,
            iterations,
            converged,
            trace,
        })
    }

    fn name(&self) -> &str {
        "Brent"
    }
}
