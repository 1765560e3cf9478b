//! Quadratic objective with exact derivatives.

use super::Oracle;
use crate::{
    error::{OracleError, OracleResult},
    types::{DMatrix, DVector, Scalar},
};

/// Quadratic objective f(x) = ½ xᵀAx + bᵀx + c.
///
/// `A` should be symmetric; the gradient is computed as `Ax + b`, which is
/// only the true gradient for symmetric `A`.
#[derive(Debug, Clone)]
pub struct QuadraticOracle<T: Scalar> {
    /// The quadratic form matrix
    pub a: DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T: Scalar> QuadraticOracle<T> {
    /// Creates a new quadratic objective, checking that the shapes agree.
    pub fn new(a: DMatrix<T>, b: DVector<T>, c: T) -> OracleResult<Self> {
        if !a.is_square() {
            return Err(OracleError::dimension_mismatch(
                "square matrix",
                format!("{}x{}", a.nrows(), a.ncols()),
            ));
        }
        if a.nrows() != b.len() {
            return Err(OracleError::dimension_mismatch(a.nrows(), b.len()));
        }
        Ok(Self { a, b, c })
    }

    /// Creates f(x) = ½‖x‖².
    pub fn simple(dim: usize) -> Self {
        Self {
            a: DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    /// Creates f(x) = ½ Σ dᵢ xᵢ² from the diagonal entries.
    pub fn diagonal(entries: &[T]) -> Self {
        let dim = entries.len();
        Self {
            a: DMatrix::from_diagonal(&DVector::from_column_slice(entries)),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    /// Minimizer x* = −A⁻¹b, or `None` when `A` is singular.
    pub fn minimizer(&self) -> Option<DVector<T>> {
        self.a.clone().lu().solve(&(-&self.b))
    }
}

impl<T: Scalar> Oracle<T> for QuadraticOracle<T> {
    fn dimension(&self) -> usize {
        self.b.len()
    }

    fn value(&self, point: &DVector<T>) -> OracleResult<T> {
        let ax = &self.a * point;
        let quad_term = point.dot(&ax) * <T as Scalar>::from_f64(0.5);
        Ok(quad_term + self.b.dot(point) + self.c)
    }

    fn gradient(&self, point: &DVector<T>) -> OracleResult<DVector<T>> {
        Ok(&self.a * point + &self.b)
    }

    fn hessian(&self, _point: &DVector<T>) -> OracleResult<DMatrix<T>> {
        Ok(self.a.clone())
    }

    fn hessian_vector_product(
        &self,
        _point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<DVector<T>> {
        Ok(&self.a * vector)
    }

    fn value_and_gradient(&self, point: &DVector<T>) -> OracleResult<(T, DVector<T>)> {
        let ax = &self.a * point;
        let value = point.dot(&ax) * <T as Scalar>::from_f64(0.5) + self.b.dot(point) + self.c;
        Ok((value, ax + &self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_quadratic() {
        let oracle = QuadraticOracle::<f64>::simple(3);
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        assert_relative_eq!(oracle.value(&x).unwrap(), 7.0);
        assert_eq!(oracle.gradient(&x).unwrap(), x);
        assert_eq!(oracle.hessian(&x).unwrap(), DMatrix::identity(3, 3));
        assert_eq!(oracle.dimension(), 3);
    }

    #[test]
    fn test_general_quadratic() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![1.0, -1.0]);
        let oracle = QuadraticOracle::new(a, b, 0.5).unwrap();

        let x = DVector::from_vec(vec![1.0, 1.0]);
        // ½(2 + 2 + 3) + 0 + 0.5
        assert_relative_eq!(oracle.value(&x).unwrap(), 4.0);

        let grad = oracle.gradient(&x).unwrap();
        assert_relative_eq!(grad[0], 4.0);
        assert_relative_eq!(grad[1], 3.0);

        let x_star = oracle.minimizer().unwrap();
        let grad_star = oracle.gradient(&x_star).unwrap();
        assert!(grad_star.norm() < 1e-12);
    }

    #[test]
    fn test_fused_matches_sequential() {
        let oracle = QuadraticOracle::<f64>::diagonal(&[1.0, 4.0, 9.0]);
        let x = DVector::from_vec(vec![0.5, -1.0, 2.0]);

        let (value, gradient) = oracle.value_and_gradient(&x).unwrap();
        assert_relative_eq!(value, oracle.value(&x).unwrap());
        assert_eq!(gradient, oracle.gradient(&x).unwrap());

        let (value, gradient, hessian) = oracle.value_gradient_hessian(&x).unwrap();
        assert_relative_eq!(value, oracle.value(&x).unwrap());
        assert_eq!(gradient, oracle.gradient(&x).unwrap());
        assert_eq!(hessian, oracle.hessian(&x).unwrap());
    }

    #[test]
    fn test_shape_validation() {
        let a = DMatrix::<f64>::identity(2, 3);
        assert!(QuadraticOracle::new(a, DVector::zeros(2), 0.0).is_err());

        let a = DMatrix::<f64>::identity(2, 2);
        assert!(matches!(
            QuadraticOracle::new(a, DVector::zeros(3), 0.0),
            Err(OracleError::DimensionMismatch { .. })
        ));
    }
}
