use super::Oracle;
use crate::{
    error::OracleResult,
    types::{constants, DVector, Scalar},
};
use num_traits::Float;

/// Utilities for checking gradient and Hessian implementations.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Central finite-difference approximation of the gradient.
    ///
    /// Uses the step ε^(1/3), which balances truncation and rounding error
    /// for a second-order scheme.
    pub fn finite_difference_gradient<T: Scalar>(
        oracle: &impl Oracle<T>,
        point: &DVector<T>,
    ) -> OracleResult<DVector<T>> {
        let n = point.len();
        let h = <T as Float>::cbrt(constants::epsilon::<T>());
        let mut gradient = DVector::zeros(n);

        let mut shifted = point.clone();
        for i in 0..n {
            let original = shifted[i];

            shifted[i] = original + h;
            let f_plus = oracle.value(&shifted)?;

            shifted[i] = original - h;
            let f_minus = oracle.value(&shifted)?;

            shifted[i] = original;
            gradient[i] = (f_plus - f_minus) / (h + h);
        }

        Ok(gradient)
    }

    /// Checks if the gradient implementation matches finite differences.
    ///
    /// # Arguments
    ///
    /// * `oracle` - The oracle to check
    /// * `point` - Point at which to check the gradient
    /// * `tol` - Tolerance for the check
    ///
    /// # Returns
    ///
    /// A tuple of (passes, max_error) where passes indicates if the
    /// gradient is correct within tolerance, and max_error is the
    /// maximum component-wise error.
    pub fn check_gradient<T: Scalar>(
        oracle: &impl Oracle<T>,
        point: &DVector<T>,
        tol: T,
    ) -> OracleResult<(bool, T)> {
        let analytical = oracle.gradient(point)?;
        let numerical = Self::finite_difference_gradient(oracle, point)?;

        let max_error = max_abs(&(analytical - numerical));
        Ok((max_error < tol, max_error))
    }

    /// Checks if the Hessian implementation matches central differences of
    /// the gradient.
    ///
    /// Returns a tuple of (passes, max_error).
    pub fn check_hessian<T: Scalar>(
        oracle: &impl Oracle<T>,
        point: &DVector<T>,
        tol: T,
    ) -> OracleResult<(bool, T)> {
        let hessian = oracle.hessian(point)?;
        let n = point.len();
        let h = <T as Float>::sqrt(constants::epsilon::<T>());

        let mut max_error = T::zero();

        for i in 0..n {
            let mut e_i = DVector::zeros(n);
            e_i[i] = T::one();

            let grad_plus = oracle.gradient(&(point + &e_i * h))?;
            let grad_minus = oracle.gradient(&(point - &e_i * h))?;

            let column_fd = (grad_plus - grad_minus) / (h + h);

            for j in 0..n {
                let error = <T as Float>::abs(hessian[(j, i)] - column_fd[j]);
                max_error = <T as Float>::max(max_error, error);
            }
        }

        Ok((max_error < tol, max_error))
    }

    /// Checks if the Hessian is symmetric.
    ///
    /// Returns a tuple of (is_symmetric, max_asymmetry).
    pub fn check_hessian_symmetry<T: Scalar>(
        oracle: &impl Oracle<T>,
        point: &DVector<T>,
        tol: T,
    ) -> OracleResult<(bool, T)> {
        let hessian = oracle.hessian(point)?;
        let n = hessian.nrows();

        let mut max_asymmetry = T::zero();
        for i in 0..n {
            for j in i + 1..n {
                let asymmetry = <T as Float>::abs(hessian[(i, j)] - hessian[(j, i)]);
                max_asymmetry = <T as Float>::max(max_asymmetry, asymmetry);
            }
        }

        Ok((max_asymmetry < tol, max_asymmetry))
    }

    /// Checks the Hessian-vector product against `∇²f(x)·v`.
    ///
    /// Returns a tuple of (passes, max_error).
    pub fn check_hessian_vector_product<T: Scalar>(
        oracle: &impl Oracle<T>,
        point: &DVector<T>,
        vector: &DVector<T>,
        tol: T,
    ) -> OracleResult<(bool, T)> {
        let expected = oracle.hessian(point)? * vector;
        let actual = oracle.hessian_vector_product(point, vector)?;

        let max_error = max_abs(&(actual - expected));
        Ok((max_error < tol, max_error))
    }
}

fn max_abs<T: Scalar>(v: &DVector<T>) -> T {
    v.iter()
        .map(|x| <T as Float>::abs(*x))
        .fold(T::zero(), |a, b| <T as Float>::max(a, b))
}
