//! Binary logistic regression objective.
//!
//! The objective is the mean cross-entropy of a dense design matrix `X`
//! (`m × n`) against labels `y ∈ {0, 1}^m`:
//!
//! ```text
//! f(w)   = −(yᵀ log(σ(Xw) + δ) + (1 − y)ᵀ log(1 − σ(Xw) + δ)) / m
//! ∇f(w)  = −Xᵀ(y − σ(Xw)) / m
//! ∇²f(w) = Xᵀ diag(σ(1 − σ)) X / m
//! ```
//!
//! with `δ = 1e-8` keeping the logarithms finite on saturated predictions.
//! The fused methods compute `σ(Xw)` once and share it.

use super::Oracle;
use crate::{
    error::{OracleError, OracleResult},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Mean cross-entropy loss of a linear classifier.
#[derive(Debug, Clone)]
pub struct LogisticRegressionOracle<T: Scalar> {
    features: DMatrix<T>,
    labels: DVector<T>,
}

impl<T: Scalar> LogisticRegressionOracle<T> {
    /// Offset inside the logarithms.
    pub const DELTA: f64 = 1e-8;

    /// Creates the oracle from a design matrix and 0/1 labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty, if the number of rows does
    /// not match the number of labels, or if a label is neither 0 nor 1.
    pub fn new(features: DMatrix<T>, labels: DVector<T>) -> OracleResult<Self> {
        if features.nrows() == 0 || features.ncols() == 0 {
            return Err(OracleError::invalid_data("design matrix is empty"));
        }
        if features.nrows() != labels.len() {
            return Err(OracleError::dimension_mismatch(
                format!("{} labels", features.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        if let Some(bad) = labels
            .iter()
            .find(|&&label| label != T::zero() && label != T::one())
        {
            return Err(OracleError::invalid_data(format!(
                "labels must be 0 or 1, found {}",
                bad
            )));
        }
        if features.iter().any(|x| !<T as Float>::is_finite(*x)) {
            return Err(OracleError::invalid_data(
                "design matrix contains non-finite entries",
            ));
        }

        Ok(Self { features, labels })
    }

    /// Appends a column of ones so the last weight acts as a bias.
    pub fn with_intercept(self) -> Self {
        let ncols = self.features.ncols();
        Self {
            features: self.features.insert_column(ncols, T::one()),
            labels: self.labels,
        }
    }

    /// The design matrix.
    pub fn features(&self) -> &DMatrix<T> {
        &self.features
    }

    /// The 0/1 labels.
    pub fn labels(&self) -> &DVector<T> {
        &self.labels
    }

    /// Number of samples m.
    pub fn num_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Predicted probabilities σ(Xw).
    pub fn predict_proba(&self, weights: &DVector<T>) -> OracleResult<DVector<T>> {
        self.check_weights(weights)?;
        Ok(self.probabilities(weights))
    }

    fn check_weights(&self, weights: &DVector<T>) -> OracleResult<()> {
        if weights.len() != self.features.ncols() {
            return Err(OracleError::dimension_mismatch(
                self.features.ncols(),
                weights.len(),
            ));
        }
        Ok(())
    }

    fn probabilities(&self, weights: &DVector<T>) -> DVector<T> {
        (&self.features * weights).map(sigmoid)
    }

    fn sample_count(&self) -> T {
        <T as Scalar>::from_usize(self.features.nrows())
    }

    fn loss(&self, p: &DVector<T>) -> T {
        let delta = <T as Scalar>::from_f64(Self::DELTA);
        let total = self
            .labels
            .iter()
            .zip(p.iter())
            .fold(T::zero(), |acc, (&y, &p)| {
                acc + y * <T as Float>::ln(p + delta)
                    + (T::one() - y) * <T as Float>::ln(T::one() - p + delta)
            });
        -total / self.sample_count()
    }

    fn loss_gradient(&self, p: &DVector<T>) -> DVector<T> {
        let residual = &self.labels - p;
        -self.features.tr_mul(&residual) / self.sample_count()
    }

    fn curvature_weights(p: &DVector<T>) -> DVector<T> {
        p.map(|p| p * (T::one() - p))
    }

    fn loss_hessian(&self, p: &DVector<T>) -> DMatrix<T> {
        let weights = Self::curvature_weights(p);
        let mut weighted = self.features.clone();
        for (i, mut row) in weighted.row_iter_mut().enumerate() {
            row *= weights[i];
        }
        self.features.tr_mul(&weighted) / self.sample_count()
    }

    fn loss_hvp(&self, p: &DVector<T>, vector: &DVector<T>) -> DVector<T> {
        let projected = &self.features * vector;
        let scaled = Self::curvature_weights(p).component_mul(&projected);
        self.features.tr_mul(&scaled) / self.sample_count()
    }
}

/// Logistic function evaluated without overflow for large |z|.
fn sigmoid<T: Scalar>(z: T) -> T {
    if z >= T::zero() {
        T::one() / (T::one() + <T as Float>::exp(-z))
    } else {
        let ez = <T as Float>::exp(z);
        ez / (T::one() + ez)
    }
}

impl<T: Scalar> Oracle<T> for LogisticRegressionOracle<T> {
    fn dimension(&self) -> usize {
        self.features.ncols()
    }

    fn value(&self, point: &DVector<T>) -> OracleResult<T> {
        self.check_weights(point)?;
        Ok(self.loss(&self.probabilities(point)))
    }

    fn gradient(&self, point: &DVector<T>) -> OracleResult<DVector<T>> {
        self.check_weights(point)?;
        Ok(self.loss_gradient(&self.probabilities(point)))
    }

    fn hessian(&self, point: &DVector<T>) -> OracleResult<DMatrix<T>> {
        self.check_weights(point)?;
        Ok(self.loss_hessian(&self.probabilities(point)))
    }

    fn hessian_vector_product(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<DVector<T>> {
        self.check_weights(point)?;
        self.check_weights(vector)?;
        Ok(self.loss_hvp(&self.probabilities(point), vector))
    }

    fn value_and_gradient(&self, point: &DVector<T>) -> OracleResult<(T, DVector<T>)> {
        self.check_weights(point)?;
        let p = self.probabilities(point);
        Ok((self.loss(&p), self.loss_gradient(&p)))
    }

    fn value_gradient_hessian(
        &self,
        point: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DMatrix<T>)> {
        self.check_weights(point)?;
        let p = self.probabilities(point);
        Ok((self.loss(&p), self.loss_gradient(&p), self.loss_hessian(&p)))
    }

    fn value_gradient_hvp(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DVector<T>)> {
        self.check_weights(point)?;
        self.check_weights(vector)?;
        let p = self.probabilities(point);
        Ok((
            self.loss(&p),
            self.loss_gradient(&p),
            self.loss_hvp(&p, vector),
        ))
    }
}
