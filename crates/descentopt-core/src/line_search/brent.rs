use super::{LineFunction, StepSize, StepSizeStrategy};
use crate::{
    error::{OptimizerError, OptimizerResult},
    one_dim::{evaluate, Brent, IntervalMinimizer},
    oracle::Oracle,
    types::{constants, DVector, Scalar},
};
use num_traits::Float;

/// A triple `a, b, c` with `f(b) < f(a)` and `f(b) <= f(c)`.
///
/// `b` lies strictly between `a` and `c`, but `a` may be on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket<T> {
    /// First outer point
    pub a: T,
    /// Inner point with the lowest value
    pub b: T,
    /// Second outer point
    pub c: T,
    /// Function values at `a`, `b`, `c`
    pub values: (T, T, T),
    /// Number of function evaluations used
    pub evaluations: usize,
}

impl<T: Scalar> Bracket<T> {
    /// Outer points in increasing order.
    pub fn interval(&self) -> (T, T) {
        if self.a < self.c {
            (self.a, self.c)
        } else {
            (self.c, self.a)
        }
    }

    /// Brackets a minimum of `f` by walking downhill from `xa`, `xb`.
    ///
    /// Steps grow by the golden ratio, with parabolic extrapolation through
    /// the last three points allowed up to `grow_limit` times the last step.
    ///
    /// # Errors
    ///
    /// Returns `LineSearchFailed` if no bracket is found within
    /// `max_iterations` expansion steps, which happens for functions
    /// decreasing without bound along the search direction. A NaN or
    /// infinite value of `f` is an `Oracle(NonFinite)` error.
    pub fn search<F>(
        mut f: F,
        mut xa: T,
        mut xb: T,
        grow_limit: T,
        max_iterations: usize,
    ) -> OptimizerResult<Self>
    where
        F: FnMut(T) -> OptimizerResult<T>,
    {
        let gold = constants::golden_ratio::<T>();
        let tiny = <T as Scalar>::from_f64(1e-21);
        let two = <T as Scalar>::from_f64(2.0);

        let mut fa = evaluate(&mut f, xa)?;
        let mut fb = evaluate(&mut f, xb)?;
        if fa < fb {
            std::mem::swap(&mut xa, &mut xb);
            std::mem::swap(&mut fa, &mut fb);
        }
        let mut xc = xb + gold * (xb - xa);
        let mut fc = evaluate(&mut f, xc)?;
        let mut evaluations = 3;
        let mut iterations = 0;

        while fc < fb {
            if iterations >= max_iterations {
                return Err(OptimizerError::line_search_failed(
                    "no bracket found, objective keeps decreasing",
                    iterations,
                ));
            }
            iterations += 1;

            // vertex of the parabola through a, b, c
            let r = (xb - xa) * (fb - fc);
            let q = (xb - xc) * (fb - fa);
            let val = q - r;
            let denom = if <T as Float>::abs(val) < tiny {
                two * tiny
            } else {
                two * val
            };
            let mut w = xb - ((xb - xc) * q - (xb - xa) * r) / denom;
            let w_limit = xb + grow_limit * (xc - xb);
            let mut fw;

            if (w - xc) * (xb - w) > T::zero() {
                // vertex between b and c
                fw = evaluate(&mut f, w)?;
                evaluations += 1;
                if fw < fc {
                    return Ok(Self {
                        a: xb,
                        b: w,
                        c: xc,
                        values: (fb, fw, fc),
                        evaluations,
                    });
                } else if fw > fb {
                    return Ok(Self {
                        a: xa,
                        b: xb,
                        c: w,
                        values: (fa, fb, fw),
                        evaluations,
                    });
                }
                w = xc + gold * (xc - xb);
                fw = evaluate(&mut f, w)?;
                evaluations += 1;
            } else if (w - w_limit) * (w_limit - xc) >= T::zero() {
                // vertex beyond the growth limit
                w = w_limit;
                fw = evaluate(&mut f, w)?;
                evaluations += 1;
            } else if (w - w_limit) * (xc - w) > T::zero() {
                // vertex between c and the limit
                fw = evaluate(&mut f, w)?;
                evaluations += 1;
                if fw < fc {
                    xb = xc;
                    xc = w;
                    w = xc + gold * (xc - xb);
                    fb = fc;
                    fc = fw;
                    fw = evaluate(&mut f, w)?;
                    evaluations += 1;
                }
            } else {
                w = xc + gold * (xc - xb);
                fw = evaluate(&mut f, w)?;
                evaluations += 1;
            }

            xa = xb;
            xb = xc;
            xc = w;
            fa = fb;
            fb = fc;
            fc = fw;
        }

        Ok(Self {
            a: xa,
            b: xb,
            c: xc,
            values: (fa, fb, fc),
            evaluations,
        })
    }
}

/// Exact line search by downhill bracketing and Brent's method.
///
/// No interval is needed: the minimum of φ is first bracketed starting from
/// the pair `(0, 1)`, and Brent's method then minimizes φ over the bracket
/// with tolerance `1.48e-8`. The step may be negative if φ increases along
/// the direction.
#[derive(Debug, Clone)]
pub struct BrentStep<T: Scalar> {
    start: (T, T),
    grow_limit: T,
    max_bracket_iterations: usize,
    tolerance: T,
    search: Brent,
}

impl<T: Scalar> BrentStep<T> {
    /// Creates the strategy with its default bracketing and tolerance.
    pub fn new() -> Self {
        Self {
            start: (T::zero(), T::one()),
            grow_limit: <T as Scalar>::from_f64(110.0),
            max_bracket_iterations: 50,
            tolerance: <T as Scalar>::from_f64(1.48e-8),
            search: Brent::new(),
        }
    }

    /// Sets the two starting points of the bracketing walk.
    pub fn with_start(mut self, xa: T, xb: T) -> Self {
        self.start = (xa, xb);
        self
    }

    /// Sets the maximum parabolic extrapolation factor.
    pub fn with_grow_limit(mut self, grow_limit: T) -> Self {
        self.grow_limit = grow_limit;
        self
    }

    /// Sets the cap on bracket expansion steps.
    pub fn with_max_bracket_iterations(mut self, max_iterations: usize) -> Self {
        self.max_bracket_iterations = max_iterations;
        self
    }

    /// Sets the tolerance of Brent's method.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.start.0 == self.start.1 {
            return Err(OptimizerError::invalid_configuration(
                "Bracketing start points must differ",
                "start",
                format!("({}, {})", self.start.0, self.start.1),
            ));
        }
        if self.grow_limit <= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "Growth limit must exceed 1",
                "grow_limit",
                self.grow_limit.to_string(),
            ));
        }
        if self.tolerance <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "Tolerance must be positive",
                "tolerance",
                self.tolerance.to_string(),
            ));
        }
        self.search.validate()
    }
}

impl<T: Scalar> Default for BrentStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> StepSizeStrategy<T> for BrentStep<T> {
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

        let bracket = Bracket::search(
            |alpha| phi.value(alpha),
            self.start.0,
            self.start.1,
            self.grow_limit,
            self.max_bracket_iterations,
        )?;
        let (lower, upper) = bracket.interval();

        let minimum = self.search.minimize(
            lower,
            upper,
            |alpha| phi.value(alpha),
            self.tolerance,
            false,
        )?;

        Ok(StepSize::new(minimum.x_min, phi.calls(), minimum.converged))
    }

    fn name(&self) -> &str {
        "Brent"
    }
}
