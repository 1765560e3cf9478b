//! Oracle interface for descent methods.
//!
//! An oracle is the only source of numerical information the algorithms
//! see: the objective value, its gradient, its Hessian and Hessian-vector
//! products at a point. Fused methods return several quantities from one
//! evaluation so implementations can share intermediate work; callers that
//! need more than one quantity at the same point should always use them.
//!
//! # Design Philosophy
//!
//! - Only `value` and `gradient` are mandatory
//! - Second-order information is optional and reported as
//!   [`OracleError::NotImplemented`] when missing
//! - Hessian-vector products fall back to a forward difference of gradients
//! - Fused methods default to the sequential calls, so overriding them is an
//!   optimization, never a behavioral change

use crate::{
    error::{OracleError, OracleResult},
    types::{constants, DMatrix, DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

mod checker;
mod counting;
mod logistic;
mod quadratic;

pub use checker::DerivativeChecker;
pub use counting::{CountingOracle, EvaluationCounts};
pub use logistic::LogisticRegressionOracle;
pub use quadratic::QuadraticOracle;

/// Trait for differentiable objectives f: ℝⁿ → ℝ.
///
/// This is the main trait that step-size strategies and descent drivers use
/// to evaluate the objective function and its derivatives.
pub trait Oracle<T>: Debug
where
    T: Scalar,
{
    /// Number of variables n of the objective.
    fn dimension(&self) -> usize;

    /// Evaluates the objective at a point.
    fn value(&self, point: &DVector<T>) -> OracleResult<T>;

    /// Evaluates the gradient ∇f at a point.
    fn gradient(&self, point: &DVector<T>) -> OracleResult<DVector<T>>;

    /// Evaluates the Hessian matrix ∇²f at a point.
    ///
    /// # Default Implementation
    ///
    /// Returns `NotImplemented`. Override for second-order methods.
    fn hessian(&self, _point: &DVector<T>) -> OracleResult<DMatrix<T>> {
        Err(OracleError::not_implemented(
            "Hessian computation not implemented for this oracle",
        ))
    }

    /// Computes the Hessian-vector product ∇²f(x)·v.
    ///
    /// This can often be computed much more cheaply than the full Hessian,
    /// which is what makes Hessian-free Newton practical.
    ///
    /// # Default Implementation
    ///
    /// Uses a forward difference on the gradient with step √ε/‖v‖.
    fn hessian_vector_product(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<DVector<T>> {
        let norm = vector.norm();
        if norm < constants::epsilon::<T>() {
            return Ok(DVector::zeros(point.len()));
        }

        let h = <T as Float>::sqrt(constants::epsilon::<T>()) / norm;
        let perturbed = point + vector * h;

        let grad = self.gradient(point)?;
        let grad_perturbed = self.gradient(&perturbed)?;

        Ok((grad_perturbed - grad) / h)
    }

    /// Evaluates value and gradient together.
    fn value_and_gradient(&self, point: &DVector<T>) -> OracleResult<(T, DVector<T>)> {
        Ok((self.value(point)?, self.gradient(point)?))
    }

    /// Evaluates value, gradient and Hessian together.
    fn value_gradient_hessian(
        &self,
        point: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DMatrix<T>)> {
        let (value, gradient) = self.value_and_gradient(point)?;
        Ok((value, gradient, self.hessian(point)?))
    }

    /// Evaluates value, gradient and a Hessian-vector product together.
    fn value_gradient_hvp(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DVector<T>)> {
        let (value, gradient) = self.value_and_gradient(point)?;
        Ok((value, gradient, self.hessian_vector_product(point, vector)?))
    }
}

/// Checks that a point has the dimension the oracle expects.
pub fn check_dimension<T, O>(oracle: &O, point: &DVector<T>) -> OracleResult<()>
where
    T: Scalar,
    O: Oracle<T> + ?Sized,
{
    if point.len() != oracle.dimension() {
        return Err(OracleError::dimension_mismatch(
            oracle.dimension(),
            point.len(),
        ));
    }
    Ok(())
}

/// Rejects NaN and infinite scalars coming out of an oracle.
pub fn ensure_finite<T: Scalar>(value: T, quantity: &str) -> OracleResult<T> {
    if <T as Float>::is_finite(value) {
        Ok(value)
    } else {
        Err(OracleError::non_finite(quantity))
    }
}

/// Rejects vectors with NaN or infinite entries coming out of an oracle.
pub fn ensure_finite_vector<T: Scalar>(
    vector: DVector<T>,
    quantity: &str,
) -> OracleResult<DVector<T>> {
    if vector.iter().all(|x| <T as Float>::is_finite(*x)) {
        Ok(vector)
    } else {
        Err(OracleError::non_finite(quantity))
    }
}
