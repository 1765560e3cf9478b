//! Descent drivers for unconstrained smooth optimization.
//!
//! This crate provides the multivariate drivers built on the oracle and
//! step-size abstractions of `descentopt-core`.
//!
//! # Available Optimizers
//!
//! - **Gradient descent**: dₖ = −∇f(xₖ)
//! - **Damped Newton**: Cholesky solve of the regularized Newton system
//! - **Hessian-free Newton**: truncated CG on Hessian-vector products
//!
//! All drivers share one loop: evaluate the oracle once per iterate, ask
//! the step-size strategy for αₖ, stop when ‖∇f(xₖ)‖² / ‖∇f(x₀)‖² reaches
//! the tolerance or the iteration budget runs out.
//!
//! # Examples
//!
//! ```rust
//! use descentopt_core::prelude::*;
//! use descentopt_optim::{Newton, NewtonConfig};
//!
//! let oracle = QuadraticOracle::diagonal(&[2.0, 8.0]);
//! let start = DVector::from_vec(vec![1.0, 1.0]);
//!
//! let mut newton = Newton::new(NewtonConfig::new());
//! let result = newton
//!     .run(&oracle, &start, &mut ArmijoStep::new(), &Newton::default_criterion())
//!     .unwrap();
//!
//! assert!(result.converged);
//! assert_eq!(newton.trajectory().len(), result.iterations + 1);
//! ```

mod driver;
pub mod gradient_descent;
pub mod hessian_free;
pub mod newton;
pub mod truncated_cg;

// Re-export main optimizers for convenience
pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use hessian_free::{HessianFreeConfig, HessianFreeNewton};
pub use newton::{Newton, NewtonConfig};
pub use truncated_cg::{CgSolution, CgTermination, ForcingSequence, TruncatedCg};

#[cfg(test)]
mod tests {
    use super::*;
    use descentopt_core::optimization::Optimizer;

    #[test]
    fn test_exports() {
        assert_eq!(GradientDescent::<f64>::default().name(), "Gradient Descent");
        assert_eq!(Newton::<f64>::default().name(), "Damped Newton");
        assert_eq!(HessianFreeNewton::<f64>::default().name(), "Hessian-Free Newton");
        let _solver = TruncatedCg::<f64>::new().with_forcing(ForcingSequence::tight());
    }
}
