use super::{
    evaluate, validate_eps, validate_interval, IntervalMinimizer, ScalarMinimum, SearchTrace,
    StepKind,
};
use crate::{
    error::{OptimizerError, OptimizerResult},
    types::{constants, Scalar},
};

/// Golden-section search.
///
/// With `K = (√5 − 1)/2` and `I = K(b − a)`, the probes `x = b − I` and
/// `y = a + I` split the interval so that after discarding one side the
/// surviving probe sits exactly where the next iteration needs it. Each
/// iteration therefore costs one evaluation and shrinks `I` by `K`.
///
/// The search stops once `I < eps` or after `max_iterations` iterations,
/// whichever comes first. The default cap of 15 iterations bounds the
/// cost of a single line search at 17 evaluations; lift it with
/// [`GoldenSection::with_max_iterations`] when the full accuracy matters.
#[derive(Debug, Clone)]
pub struct GoldenSection {
    max_iterations: usize,
}

impl GoldenSection {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 15;

    /// Creates a golden-section search with the default iteration cap.
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

impl Default for GoldenSection {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> IntervalMinimizer<T> for GoldenSection {
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
        validate_interval(lower, upper, true)?;
        validate_eps(eps)?;

        let k = constants::golden_section::<T>();
        let (mut a, mut b) = (lower, upper);
        let mut width = k * (b - a);

        let mut x = b - width;
        let mut y = a + width;
        let mut f_x = evaluate(&mut objective, x)?;
        let mut f_y = evaluate(&mut objective, y)?;
        let mut evaluations = 2;
        let mut iterations = 0;

        let mut trace = collect_stats.then(|| SearchTrace::with_initial(width));

        while width >= eps && iterations < self.max_iterations {
            iterations += 1;
            width *= k;

            if f_x >= f_y {
                // keep [x, b]
                a = x;
                x = y;
                f_x = f_y;
                y = a + width;
                f_y = evaluate(&mut objective, y)?;
            } else {
                // keep [a, y]
                b = y;
                y = x;
                f_y = f_x;
                x = b - width;
                f_x = evaluate(&mut objective, x)?;
            }
            evaluations += 1;

            if let Some(trace) = trace.as_mut() {
                trace.push(iterations, width, StepKind::Golden);
            }
        }

        let (x_min, f_min) = if f_x <= f_y { (x, f_x) } else { (y, f_y) };

        Ok(ScalarMinimum {
            x_min,
            f_min,
            evaluations,
            iterations,
            converged: width < eps,
            trace,
        })
    }

    fn name(&self) -> &str {
        "Golden Section"
    }
}
