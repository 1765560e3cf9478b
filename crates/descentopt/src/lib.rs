//! # descentopt
//!
//! Line searches and descent methods for unconstrained smooth optimization.
//!
//! This crate re-exports [`descentopt_core`] (oracles, interval searches,
//! step-size strategies, result and callback types) and
//! [`descentopt_optim`] (gradient descent, damped Newton, Hessian-free
//! Newton) behind a single prelude.
//!
//! ## Quick Start
//!
//! ```rust
//! use descentopt::prelude::*;
//!
//! // f(w) = ½ wᵀAw with A = diag(1, 10)
//! let oracle = QuadraticOracle::diagonal(&[1.0, 10.0]);
//! let start = DVector::from_vec(vec![3.0, -1.0]);
//!
//! let mut newton = Newton::new(NewtonConfig::new());
//! let result = newton
//!     .run(&oracle, &start, &mut StepSizeRule::armijo(), &StoppingCriterion::new())
//!     .unwrap();
//!
//! assert!(result.converged);
//! assert!(result.point.norm() < 1e-6);
//! ```
//!
//! ## Interval Searches
//!
//! ```rust
//! use descentopt::prelude::*;
//!
//! let minimum = Brent::new()
//!     .minimize(0.0, 5.0, |x: f64| Ok((x - 2.0).powi(2)), 1e-8, false)
//!     .unwrap();
//! assert!((minimum.x_min - 2.0).abs() < 1e-6);
//! ```

pub use descentopt_core;
pub use descentopt_optim;

pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use descentopt_core::prelude::*;
    pub use descentopt_optim::{
        CgSolution, CgTermination, ForcingSequence, GradientDescent, GradientDescentConfig,
        HessianFreeConfig, HessianFreeNewton, Newton, NewtonConfig, TruncatedCg,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exports() {
        let _gd = GradientDescent::<f64>::new(GradientDescentConfig::new());
        let _newton = Newton::<f64>::new(NewtonConfig::new());
        let _hfn = HessianFreeNewton::<f64>::new(HessianFreeConfig::new());
        let _rule = StepSizeRule::<f64>::constant(0.1);
        let _search = GoldenSection::new().with_max_iterations(50);
    }
}
