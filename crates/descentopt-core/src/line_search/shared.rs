use super::{StepSize, StepSizeStrategy};
use crate::{
    error::OptimizerResult,
    oracle::Oracle,
    types::{DVector, Scalar},
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A step-size strategy shared between several owners.
///
/// Stateful strategies such as [`super::NesterovStep`] carry information
/// from one call to the next. Cloning a `SharedStepSize` yields a handle to
/// the same strategy, so drivers running on different threads observe and
/// update one common state. Each `compute` holds the lock for the whole
/// search.
///
/// ```rust
/// # use descentopt_core::line_search::{NesterovStep, SharedStepSize};
/// let shared = SharedStepSize::new(NesterovStep::<f64>::new());
/// let handle = shared.clone();
/// assert_eq!(shared.lock().lipschitz(), handle.lock().lipschitz());
/// ```
#[derive(Debug)]
pub struct SharedStepSize<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedStepSize<S> {
    /// Wraps a strategy for shared use.
    pub fn new(strategy: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(strategy)),
        }
    }

    /// Locks the strategy for inspection or reconfiguration.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }

    /// Runs `f` with exclusive access to the strategy.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Number of handles to the strategy.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<S> Clone for SharedStepSize<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, S> StepSizeStrategy<T> for SharedStepSize<S>
where
    T: Scalar,
    S: StepSizeStrategy<T>,
{
    fn compute<O>(
        &mut self,
        oracle: &O,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<StepSize<T>>
    where
        O: Oracle<T> + ?Sized,
    {
        self.inner.lock().compute(oracle, point, direction)
    }

    fn name(&self) -> &str {
        "Shared"
    }
}
