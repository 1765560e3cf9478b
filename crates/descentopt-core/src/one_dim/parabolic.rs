use super::{
    evaluate, parabola_vertex, validate_eps, validate_interval, IntervalMinimizer, ScalarMinimum,
    SearchTrace, StepKind,
};
use crate::{
    error::{OptimizerError, OptimizerResult},
    types::{constants, Scalar},
};
use num_traits::Float;

/// Successive parabolic interpolation.
///
/// Starts from `a`, `(a + b)/2`, `b` and replaces one point per iteration
/// with the vertex `u` of the parabola through the current triple. The
/// vertex is taken unconditionally: if `f(x2) <= f(u)` it replaces `x3`,
/// otherwise the triple shifts (`x1 ← x2`, `x2 ← u`). The search stops
/// when two consecutive vertices are less than `eps` apart.
///
/// When the three points make the fit singular, the iteration takes a
/// golden-section step from `x2` into the longer of `[x1, x2]` and
/// `[x2, x3]` instead.
#[derive(Debug, Clone)]
pub struct Parabolic {
    max_iterations: usize,
}

impl Parabolic {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;

    /// Creates the method with the default iteration cap.
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

impl Default for Parabolic {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> IntervalMinimizer<T> for Parabolic {
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

        let two = <T as Scalar>::from_f64(2.0);
        let c = constants::golden_fraction::<T>();

        let (mut x1, mut x2, mut x3) = (lower, (lower + upper) / two, upper);
        let mut f1 = evaluate(&mut objective, x1)?;
        let mut f2 = evaluate(&mut objective, x2)?;
        let mut f3 = evaluate(&mut objective, x3)?;
        let mut evaluations = 3;

        let mut u = x2;
        let mut iterations = 0;
        let mut converged = false;

        let mut trace = collect_stats.then(|| SearchTrace::with_initial(upper - lower));

        while iterations < self.max_iterations {
            iterations += 1;
            let u_prev = u;

            let kind = match parabola_vertex([(x1, f1), (x2, f2), (x3, f3)]) {
                Some(vertex) => {
                    u = vertex;
                    StepKind::Parabolic
                }
                None => {
                    u = if <T as Float>::abs(x3 - x2) >= <T as Float>::abs(x1 - x2) {
                        x2 + c * (x3 - x2)
                    } else {
                        x2 + c * (x1 - x2)
                    };
                    StepKind::Golden
                }
            };

            let f_u = evaluate(&mut objective, u)?;
            evaluations += 1;

            if f2 <= f_u {
                x3 = u;
                f3 = f_u;
            } else {
                x1 = x2;
                f1 = f2;
                x2 = u;
                f2 = f_u;
            }

            let step = <T as Float>::abs(u - u_prev);
            if let Some(trace) = trace.as_mut() {
                trace.push(iterations, step, kind);
            }

            if step < eps {
                converged = true;
                break;
            }
        }

        // Report the best point of the final triple.
        let (mut x_min, mut f_min) = (x1, f1);
        for (x, f) in [(x2, f2), (x3, f3)] {
            if f < f_min {
                x_min = x;
                f_min = f;
            }
        }

        Ok(ScalarMinimum {
            x_min,
            f_min,
            evaluations,
            iterations,
            converged,
            trace,
        })
    }

    fn name(&self) -> &str {
        "Parabolic Interpolation"
    }
}
