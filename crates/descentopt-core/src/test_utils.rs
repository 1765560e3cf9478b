//! Test problems shared by the unit tests, the integration tests and the
//! benchmarks of the workspace.

use crate::{
    error::OracleResult,
    oracle::{check_dimension, LogisticRegressionOracle, Oracle, QuadraticOracle},
    types::{DMatrix, DVector, Scalar},
};

/// Minimizer of [`logistic_problem`], to about 6 digits.
pub const LOGISTIC_MINIMIZER: [f64; 3] = [3.598_461, -0.139_431, -1.329_012];

/// Minimum value of [`logistic_problem`].
pub const LOGISTIC_MINIMUM: f64 = 0.208_870_501_932;

/// A small, non-separable logistic regression problem with intercept.
///
/// Row `i` of the 12 × 3 design matrix is `(tᵢ, sin(1.7i), 1)` with
/// `tᵢ = 4i/11 − 2`; the label is 1 when `tᵢ + ½sin(1.7i) + 0.3cos(3.1i) > 0`.
pub fn logistic_problem<T: Scalar>() -> LogisticRegressionOracle<T> {
    let m = 12;
    let mut features = DMatrix::zeros(m, 2);
    let mut labels = DVector::zeros(m);

    for i in 0..m {
        let t = i as f64 / 11.0 * 4.0 - 2.0;
        let s = (1.7 * i as f64).sin();
        features[(i, 0)] = <T as Scalar>::from_f64(t);
        features[(i, 1)] = <T as Scalar>::from_f64(s);
        if t + 0.5 * s + 0.3 * (3.1 * i as f64).cos() > 0.0 {
            labels[i] = T::one();
        }
    }

    match LogisticRegressionOracle::new(features, labels) {
        Ok(oracle) => oracle.with_intercept(),
        Err(err) => panic!("invalid logistic test problem: {err}"),
    }
}

/// Diagonal quadratic with eigenvalues spread geometrically over
/// `[1, condition]`.
pub fn ill_conditioned_quadratic<T: Scalar>(dim: usize, condition: f64) -> QuadraticOracle<T> {
    let entries: Vec<T> = (0..dim)
        .map(|i| {
            let exponent = if dim > 1 {
                i as f64 / (dim - 1) as f64
            } else {
                0.0
            };
            <T as Scalar>::from_f64(condition.powf(exponent))
        })
        .collect();
    QuadraticOracle::diagonal(&entries)
}

/// The extended Rosenbrock function
///
/// ```text
/// f(x) = Σᵢ 100(xᵢ₊₁ − xᵢ²)² + (1 − xᵢ)²
/// ```
///
/// with its minimum 0 at (1, …, 1).
#[derive(Debug, Clone, Copy)]
pub struct Rosenbrock {
    dim: usize,
}

impl Rosenbrock {
    /// Creates the function in `dim ≥ 2` variables.
    pub fn new(dim: usize) -> Self {
        assert!(dim >= 2, "Rosenbrock needs at least two variables");
        Self { dim }
    }

    /// The classic starting point (−1.2, 1, −1.2, 1, …).
    pub fn start<T: Scalar>(&self) -> DVector<T> {
        DVector::from_fn(self.dim, |i, _| {
            <T as Scalar>::from_f64(if i % 2 == 0 { -1.2 } else { 1.0 })
        })
    }
}

impl<T: Scalar> Oracle<T> for Rosenbrock {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn value(&self, x: &DVector<T>) -> OracleResult<T> {
        check_dimension(self, x)?;
        let hundred = <T as Scalar>::from_f64(100.0);
        let mut total = T::zero();
        for i in 0..self.dim - 1 {
            let a = x[i + 1] - x[i] * x[i];
            let b = T::one() - x[i];
            total += hundred * a * a + b * b;
        }
        Ok(total)
    }

    fn gradient(&self, x: &DVector<T>) -> OracleResult<DVector<T>> {
        check_dimension(self, x)?;
        let two = <T as Scalar>::from_f64(2.0);
        let four_hundred = <T as Scalar>::from_f64(400.0);
        let two_hundred = <T as Scalar>::from_f64(200.0);
        let mut grad = DVector::zeros(self.dim);
        for i in 0..self.dim - 1 {
            let a = x[i + 1] - x[i] * x[i];
            grad[i] -= four_hundred * x[i] * a + two * (T::one() - x[i]);
            grad[i + 1] += two_hundred * a;
        }
        Ok(grad)
    }

    fn hessian(&self, x: &DVector<T>) -> OracleResult<DMatrix<T>> {
        check_dimension(self, x)?;
        let two = <T as Scalar>::from_f64(2.0);
        let two_hundred = <T as Scalar>::from_f64(200.0);
        let four_hundred = <T as Scalar>::from_f64(400.0);
        let twelve_hundred = <T as Scalar>::from_f64(1200.0);
        let mut hess = DMatrix::zeros(self.dim, self.dim);
        for i in 0..self.dim - 1 {
            hess[(i, i)] += twelve_hundred * x[i] * x[i] - four_hundred * x[i + 1] + two;
            hess[(i, i + 1)] -= four_hundred * x[i];
            hess[(i + 1, i)] -= four_hundred * x[i];
            hess[(i + 1, i + 1)] += two_hundred;
        }
        Ok(hess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::DerivativeChecker;
    use approx::assert_relative_eq;

    #[test]
    fn test_logistic_problem_labels() {
        let oracle = logistic_problem::<f64>();
        let expected = [0., 0., 0., 0., 0., 0., 1., 0., 1., 1., 1., 1.];
        assert_eq!(oracle.labels().as_slice(), &expected);
        assert_eq!(oracle.dimension(), 3);

        let w = DVector::from_row_slice(&LOGISTIC_MINIMIZER);
        assert_relative_eq!(oracle.value(&w).unwrap(), LOGISTIC_MINIMUM, epsilon = 1e-9);
        assert!(oracle.gradient(&w).unwrap().norm() < 1e-5);
    }

    #[test]
    fn test_rosenbrock_derivatives() {
        let f = Rosenbrock::new(4);
        let x = DVector::from_vec(vec![-1.2, 1.0, 0.3, -0.5]);

        let (ok, _) = DerivativeChecker::check_gradient(&f, &x, 1e-5).unwrap();
        assert!(ok);
        let (ok, _) = DerivativeChecker::check_hessian(&f, &x, 1e-4).unwrap();
        assert!(ok);

        let ones = DVector::from_element(4, 1.0);
        assert_relative_eq!(Oracle::<f64>::value(&f, &ones).unwrap(), 0.0);
    }

    #[test]
    fn test_condition_spread() {
        let q = ill_conditioned_quadratic::<f64>(3, 100.0);
        assert_relative_eq!(q.a[(0, 0)], 1.0);
        assert_relative_eq!(q.a[(1, 1)], 10.0, epsilon = 1e-12);
        assert_relative_eq!(q.a[(2, 2)], 100.0, epsilon = 1e-10);
    }
}
