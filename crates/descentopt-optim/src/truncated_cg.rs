//! Truncated conjugate gradient for the Newton system.
//!
//! Solves `B z ≈ −g` using only products `B v`, stopping early once the
//! residual drops below `η(‖r₀‖²)·‖r₀‖` for a forcing term η. When a
//! direction of non-positive curvature shows up the iteration is truncated
//! (Steihaug): on the very first iteration the solver falls back to the
//! steepest descent direction `−g`, later it returns the last iterate,
//! which is still a descent direction.

use descentopt_core::{
    error::{OptimizerError, OptimizerResult},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt;

/// Forcing term η of the inexact Newton solve, as a function of the squared
/// residual norm ‖r₀‖² = ‖g‖² at the start of the solve.
#[derive(Clone, Copy)]
pub enum ForcingSequence<T> {
    /// η = min(0.5, ‖g‖^½), superlinear local convergence
    Superlinear,
    /// η = min(0.5, ‖g‖), quadratic local convergence
    Quadratic,
    /// A fixed η in `[0, 1)`
    Constant(T),
    /// η computed by a user function of ‖g‖²
    Custom(fn(T) -> T),
}

impl<T: Scalar> ForcingSequence<T> {
    /// η = 0.1
    pub fn tight() -> Self {
        Self::Constant(<T as Scalar>::from_f64(0.1))
    }

    /// η = 0.5
    pub fn moderate() -> Self {
        Self::Constant(<T as Scalar>::from_f64(0.5))
    }

    /// η = 0.9
    pub fn loose() -> Self {
        Self::Constant(<T as Scalar>::from_f64(0.9))
    }

    /// Evaluates η for a squared residual norm.
    pub fn eta(&self, residual_norm_sq: T) -> T {
        let half = <T as Scalar>::from_f64(0.5);
        match self {
            Self::Superlinear => {
                <T as Float>::min(half, <T as Float>::sqrt(<T as Float>::sqrt(residual_norm_sq)))
            }
            Self::Quadratic => <T as Float>::min(half, <T as Float>::sqrt(residual_norm_sq)),
            Self::Constant(eta) => *eta,
            Self::Custom(f) => f(residual_norm_sq),
        }
    }

    /// Validates the forcing term.
    pub fn validate(&self) -> OptimizerResult<()> {
        if let Self::Constant(eta) = self {
            if *eta < T::zero() || *eta >= T::one() || !<T as Float>::is_finite(*eta) {
                return Err(OptimizerError::invalid_configuration(
                    "Constant forcing term must be in [0, 1)",
                    "forcing",
                    eta.to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl<T: Scalar> Default for ForcingSequence<T> {
    fn default() -> Self {
        Self::Superlinear
    }
}

impl<T: fmt::Debug> fmt::Debug for ForcingSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superlinear => f.write_str("Superlinear"),
            Self::Quadratic => f.write_str("Quadratic"),
            Self::Constant(eta) => f.debug_tuple("Constant").field(eta).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Why the CG iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgTermination {
    /// The residual met the forcing tolerance
    Converged,
    /// Non-positive curvature on the first iteration, the step is `−g`
    SteepestDescent,
    /// Non-positive curvature later on, the step is the last iterate
    NegativeCurvature,
    /// The iteration cap was reached
    MaxIterations,
}

/// Outcome of a truncated CG solve.
#[derive(Debug, Clone, PartialEq)]
pub struct CgSolution<T: Scalar> {
    /// Approximate Newton step
    pub step: DVector<T>,
    /// Number of products `B v` evaluated
    pub products: usize,
    /// Number of completed CG iterations
    pub iterations: usize,
    /// Why the solve stopped
    pub termination: CgTermination,
}

/// Truncated CG solver for `B z = −g`.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedCg<T> {
    /// Forcing term of the stopping rule
    pub forcing: ForcingSequence<T>,
    /// Maximum number of CG iterations
    pub max_iterations: usize,
}

impl<T: Scalar> Default for TruncatedCg<T> {
    fn default() -> Self {
        Self {
            forcing: ForcingSequence::default(),
            max_iterations: 1000,
        }
    }
}

impl<T: Scalar> TruncatedCg<T> {
    /// Creates a solver with the superlinear forcing sequence and 1000 iterations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the forcing sequence.
    pub fn with_forcing(mut self, forcing: ForcingSequence<T>) -> Self {
        self.forcing = forcing;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validates the solver parameters.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.max_iterations == 0 {
            return Err(OptimizerError::invalid_configuration(
                "CG needs at least one iteration",
                "max_iterations",
                "0",
            ));
        }
        self.forcing.validate()
    }

    /// Approximately solves `B z = −gradient`.
    ///
    /// `product(v)` must return `B v`; its errors are propagated unchanged.
    pub fn solve<F>(&self, gradient: &DVector<T>, mut product: F) -> OptimizerResult<CgSolution<T>>
    where
        F: FnMut(&DVector<T>) -> OptimizerResult<DVector<T>>,
    {
        self.validate()?;

        let mut z = DVector::zeros(gradient.len());
        let mut r = gradient.clone();
        let mut d = -gradient;
        let mut r_sq = r.norm_squared();

        if r_sq == T::zero() {
            return Ok(CgSolution {
                step: z,
                products: 0,
                iterations: 0,
                termination: CgTermination::Converged,
            });
        }

        let tolerance = self.forcing.eta(r_sq) * <T as Float>::sqrt(r_sq);
        let mut products = 0;

        for iteration in 0..self.max_iterations {
            let bd = product(&d)?;
            products += 1;

            let curvature = d.dot(&bd);
            if curvature <= T::zero() {
                let (step, termination) = if iteration == 0 {
                    (-gradient, CgTermination::SteepestDescent)
                } else {
                    (z, CgTermination::NegativeCurvature)
                };
                return Ok(CgSolution {
                    step,
                    products,
                    iterations: iteration,
                    termination,
                });
            }

            let alpha = r_sq / curvature;
            z.axpy(alpha, &d, T::one());
            r.axpy(alpha, &bd, T::one());

            let r_new_sq = r.norm_squared();
            if <T as Float>::sqrt(r_new_sq) < tolerance {
                return Ok(CgSolution {
                    step: z,
                    products,
                    iterations: iteration + 1,
                    termination: CgTermination::Converged,
                });
            }

            // d = −r + βd
            let beta = r_new_sq / r_sq;
            d *= beta;
            d -= &r;
            r_sq = r_new_sq;
        }

        Ok(CgSolution {
            step: z,
            products,
            iterations: self.max_iterations,
            termination: CgTermination::MaxIterations,
        })
    }
}
