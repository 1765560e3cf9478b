//! The descent loop shared by all drivers.
//!
//! Drivers differ only in what they ask the oracle for at each iterate and
//! in how they turn it into a direction; both are captured by
//! [`DescentDirection`]. Everything else (stopping rule, oracle accounting,
//! trajectory records, callbacks) lives in [`DescentLog::descend`].

use descentopt_core::{
    error::{OptimizerError, OptimizerResult},
    line_search::StepSizeStrategy,
    optimization::{
        DriverPhase, IterationRecord, OptimizationCallback, OptimizationResult,
        StoppingCriterion, TerminationReason, Trajectory,
    },
    oracle::{check_dimension, Oracle},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::time::{Duration, Instant};

/// Oracle output at one iterate.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation<T: Scalar, E> {
    pub(crate) value: T,
    pub(crate) gradient: DVector<T>,
    pub(crate) extra: E,
}

/// How a driver evaluates the oracle and builds its search direction.
pub(crate) trait DescentDirection<T: Scalar> {
    /// Extra oracle output the direction is built from.
    type Extra;

    /// Display name of the driver.
    const NAME: &'static str;

    /// One fused oracle call at `point`, rejecting non-finite output.
    fn evaluate<O>(&self, oracle: &O, point: &DVector<T>) -> OptimizerResult<Evaluation<T, Self::Extra>>
    where
        O: Oracle<T> + ?Sized;

    /// Search direction at `point` and the oracle calls it cost.
    fn direction<O>(
        &self,
        oracle: &O,
        point: &DVector<T>,
        evaluation: &Evaluation<T, Self::Extra>,
    ) -> OptimizerResult<(DVector<T>, usize)>
    where
        O: Oracle<T> + ?Sized;
}

/// Normalizes directions longer than `max_norm` to unit length.
pub(crate) fn clamp_direction<T: Scalar>(direction: DVector<T>, max_norm: Option<T>) -> DVector<T> {
    match max_norm {
        Some(limit) => {
            let norm = direction.norm();
            if norm > limit {
                direction / norm
            } else {
                direction
            }
        }
        None => direction,
    }
}

/// Validates an optional direction norm cap.
pub(crate) fn validate_max_norm<T: Scalar>(max_norm: Option<T>) -> OptimizerResult<()> {
    if let Some(limit) = max_norm {
        if limit <= T::zero() || !<T as Float>::is_finite(limit) {
            return Err(OptimizerError::invalid_configuration(
                "Direction norm cap must be positive and finite",
                "max_direction_norm",
                limit.to_string(),
            ));
        }
    }
    Ok(())
}

/// Trajectory and phase of a driver, reset by every run.
#[derive(Debug, Clone, Default)]
pub(crate) struct DescentLog<T: Scalar> {
    pub(crate) trajectory: Trajectory<T>,
    pub(crate) phase: DriverPhase,
}

impl<T: Scalar> DescentLog<T> {
    pub(crate) fn new() -> Self {
        Self {
            trajectory: Trajectory::new(),
            phase: DriverPhase::Initialize,
        }
    }

    /// Runs the descent loop from `start`.
    pub(crate) fn descend<D, O, S>(
        &mut self,
        rule: &D,
        oracle: &O,
        start: &DVector<T>,
        strategy: &mut S,
        criterion: &StoppingCriterion<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        D: DescentDirection<T>,
        O: Oracle<T> + ?Sized,
        S: StepSizeStrategy<T>,
    {
        criterion.validate()?;
        check_dimension(oracle, start)?;

        self.trajectory.clear();
        self.phase = DriverPhase::Initialize;
        callback.on_optimization_start(D::NAME);

        let timer = Instant::now();
        let mut x = start.clone();
        let mut current = rule.evaluate(oracle, &x)?;
        let mut oracle_calls = 1;

        let initial_norm_sq = current.gradient.norm_squared();
        let ratio_of = |gradient: &DVector<T>| {
            if initial_norm_sq == T::zero() {
                T::zero()
            } else {
                gradient.norm_squared() / initial_norm_sq
            }
        };
        let mut ratio = ratio_of(&current.gradient);

        let record = IterationRecord {
            value: current.value,
            iteration: 0,
            oracle_calls,
            elapsed: Duration::ZERO,
            gradient_ratio: ratio,
            step_size: T::zero(),
        };
        self.trajectory.push(record);
        let mut stopped = !callback.on_iteration_end(&record);

        self.phase = DriverPhase::Iterate;
        let mut iteration = 0;
        while !stopped && !criterion.is_satisfied(ratio) && iteration < criterion.max_iterations {
            let (direction, direction_calls) = rule.direction(oracle, &x, &current)?;
            oracle_calls += direction_calls;

            let step = strategy.compute(oracle, &x, &direction)?;
            oracle_calls += step.oracle_calls;

            x.axpy(step.alpha, &direction, T::one());
            current = rule.evaluate(oracle, &x)?;
            oracle_calls += 1;
            iteration += 1;
            ratio = ratio_of(&current.gradient);

            let record = IterationRecord {
                value: current.value,
                iteration,
                oracle_calls,
                elapsed: timer.elapsed(),
                gradient_ratio: ratio,
                step_size: step.alpha,
            };
            self.trajectory.push(record);
            stopped = !callback.on_iteration_end(&record);
        }

        let reason = if criterion.is_satisfied(ratio) {
            TerminationReason::Converged
        } else if stopped {
            TerminationReason::CallbackRequest
        } else {
            TerminationReason::MaxIterations
        };
        self.phase = reason.into();

        let result = OptimizationResult::new(x, current.value, iteration, timer.elapsed(), reason)
            .with_oracle_calls(oracle_calls)
            .with_gradient_ratio(ratio);
        callback.on_optimization_end(&result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_direction() {
        let d: DVector<f64> = DVector::from_vec(vec![3000.0, 4000.0]);
        let clamped = clamp_direction(d.clone(), Some(1000.0));
        assert!((clamped.norm() - 1.0).abs() < 1e-12);
        assert!((clamped[0] - 0.6).abs() < 1e-12);

        assert_eq!(clamp_direction(d.clone(), None), d);

        let short = DVector::from_vec(vec![3.0, 4.0]);
        assert_eq!(clamp_direction(short.clone(), Some(1000.0)), short);
    }

    #[test]
    fn test_validate_max_norm() {
        assert!(validate_max_norm::<f64>(None).is_ok());
        assert!(validate_max_norm(Some(1000.0)).is_ok());
        assert!(validate_max_norm(Some(0.0)).is_err());
        assert!(validate_max_norm(Some(f64::INFINITY)).is_err());
    }
}
