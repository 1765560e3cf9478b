use super::Oracle;
use crate::{
    error::OracleResult,
    types::{DMatrix, DVector, Scalar},
};
use std::cell::Cell;
use std::marker::PhantomData;

/// Snapshot of the counters of a [`CountingOracle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationCounts {
    /// Number of oracle method invocations of any kind.
    ///
    /// A fused call counts once here, which is the unit algorithms report
    /// as `oracle_calls`.
    pub calls: usize,
    /// Number of objective values computed
    pub values: usize,
    /// Number of gradients computed
    pub gradients: usize,
    /// Number of Hessians computed
    pub hessians: usize,
    /// Number of Hessian-vector products computed
    pub hessian_vector_products: usize,
}

/// Wrapper to count oracle evaluations for testing and debugging.
///
/// Only calls made through the wrapper are counted; if the inner oracle's
/// default methods call each other internally, those calls stay invisible.
#[derive(Debug)]
pub struct CountingOracle<O, T>
where
    O: Oracle<T>,
    T: Scalar,
{
    inner: O,
    calls: Cell<usize>,
    values: Cell<usize>,
    gradients: Cell<usize>,
    hessians: Cell<usize>,
    hessian_vector_products: Cell<usize>,
    _phantom: PhantomData<T>,
}

impl<O, T> CountingOracle<O, T>
where
    O: Oracle<T>,
    T: Scalar,
{
    /// Creates a new counting wrapper around an oracle.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            values: Cell::new(0),
            gradients: Cell::new(0),
            hessians: Cell::new(0),
            hessian_vector_products: Cell::new(0),
            _phantom: PhantomData,
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.calls.set(0);
        self.values.set(0);
        self.gradients.set(0);
        self.hessians.set(0);
        self.hessian_vector_products.set(0);
    }

    /// Returns the current evaluation counts.
    pub fn counts(&self) -> EvaluationCounts {
        EvaluationCounts {
            calls: self.calls.get(),
            values: self.values.get(),
            gradients: self.gradients.get(),
            hessians: self.hessians.get(),
            hessian_vector_products: self.hessian_vector_products.get(),
        }
    }

    /// The wrapped oracle.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Unwraps the inner oracle.
    pub fn into_inner(self) -> O {
        self.inner
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    fn record(&self, value: bool, gradient: bool, hessian: bool, hvp: bool) {
        Self::bump(&self.calls);
        if value {
            Self::bump(&self.values);
        }
        if gradient {
            Self::bump(&self.gradients);
        }
        if hessian {
            Self::bump(&self.hessians);
        }
        if hvp {
            Self::bump(&self.hessian_vector_products);
        }
    }
}

impl<O, T> Oracle<T> for CountingOracle<O, T>
where
    O: Oracle<T>,
    T: Scalar,
{
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn value(&self, point: &DVector<T>) -> OracleResult<T> {
        self.record(true, false, false, false);
        self.inner.value(point)
    }

    fn gradient(&self, point: &DVector<T>) -> OracleResult<DVector<T>> {
        self.record(false, true, false, false);
        self.inner.gradient(point)
    }

    fn hessian(&self, point: &DVector<T>) -> OracleResult<DMatrix<T>> {
        self.record(false, false, true, false);
        self.inner.hessian(point)
    }

    fn hessian_vector_product(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<DVector<T>> {
        self.record(false, false, false, true);
        self.inner.hessian_vector_product(point, vector)
    }

    fn value_and_gradient(&self, point: &DVector<T>) -> OracleResult<(T, DVector<T>)> {
        self.record(true, true, false, false);
        self.inner.value_and_gradient(point)
    }

    fn value_gradient_hessian(
        &self,
        point: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DMatrix<T>)> {
        self.record(true, true, true, false);
        self.inner.value_gradient_hessian(point)
    }

    fn value_gradient_hvp(
        &self,
        point: &DVector<T>,
        vector: &DVector<T>,
    ) -> OracleResult<(T, DVector<T>, DVector<T>)> {
        self.record(true, true, false, true);
        self.inner.value_gradient_hvp(point, vector)
    }
}
