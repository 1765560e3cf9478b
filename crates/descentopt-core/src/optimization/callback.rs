//! Callback support for descent drivers.
//!
//! Drivers never print. Progress is reported to an [`OptimizationCallback`]
//! instead, which can log it, record it or stop the run early.

use crate::optimization::{optimizer::OptimizationResult, trajectory::IterationRecord};
use crate::types::Scalar;

/// Trait for optimization callbacks.
///
/// `on_iteration_end` is called for every record a driver appends to its
/// trajectory, including record 0 for the starting point. Returning
/// `false` ends the run with
/// [`TerminationReason::CallbackRequest`](crate::optimization::TerminationReason::CallbackRequest).
pub trait OptimizationCallback<T: Scalar>: Send {
    /// Called before the starting point is evaluated.
    fn on_optimization_start(&mut self, optimizer: &str) {
        let _ = optimizer;
    }

    /// Called after each record is appended.
    ///
    /// Returns `true` to continue optimization, `false` to stop early.
    fn on_iteration_end(&mut self, record: &IterationRecord<T>) -> bool {
        let _ = record;
        true
    }

    /// Called once with the final result.
    fn on_optimization_end(&mut self, result: &OptimizationResult<T>) {
        let _ = result;
    }
}

/// A no-op callback that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {}

/// A callback that prints progress to stdout.
#[derive(Debug, Clone)]
pub struct PrintProgressCallback {
    print_every: usize,
}

impl PrintProgressCallback {
    /// Create a callback printing every `print_every` iterations.
    ///
    /// A period of 0 only prints the start and end of the run.
    pub fn new(print_every: usize) -> Self {
        Self { print_every }
    }
}

impl<T: Scalar> OptimizationCallback<T> for PrintProgressCallback {
    fn on_optimization_start(&mut self, optimizer: &str) {
        println!("Starting {optimizer}...");
    }

    fn on_iteration_end(&mut self, record: &IterationRecord<T>) -> bool {
        if self.print_every > 0 && record.iteration % self.print_every == 0 {
            println!(
                "Iteration {}: value = {}, gradient ratio = {}, step = {}",
                record.iteration, record.value, record.gradient_ratio, record.step_size
            );
        }
        true
    }

    fn on_optimization_end(&mut self, result: &OptimizationResult<T>) {
        println!(
            "Optimization finished after {} iterations ({:?}). Final value: {}",
            result.iterations, result.termination_reason, result.value
        );
    }
}

/// A callback that stores every event, optionally stopping after a fixed
/// number of iterations.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallback<T: Scalar> {
    /// Names passed to `on_optimization_start`, one per run
    pub started: Vec<String>,
    /// Every record seen, across runs
    pub records: Vec<IterationRecord<T>>,
    /// Final results, one per run
    pub results: Vec<OptimizationResult<T>>,
    stop_after: Option<usize>,
}

impl<T: Scalar> RecordingCallback<T> {
    /// Creates a callback that never stops the run.
    pub fn new() -> Self {
        Self {
            started: Vec::new(),
            records: Vec::new(),
            results: Vec::new(),
            stop_after: None,
        }
    }

    /// Requests a stop once the record of `iteration` has been seen.
    pub fn stop_after(mut self, iteration: usize) -> Self {
        self.stop_after = Some(iteration);
        self
    }
}

impl<T: Scalar> OptimizationCallback<T> for RecordingCallback<T> {
    fn on_optimization_start(&mut self, optimizer: &str) {
        self.started.push(optimizer.to_string());
    }

    fn on_iteration_end(&mut self, record: &IterationRecord<T>) -> bool {
        self.records.push(*record);
        self.stop_after.is_none_or(|k| record.iteration < k)
    }

    fn on_optimization_end(&mut self, result: &OptimizationResult<T>) {
        self.results.push(result.clone());
    }
}
