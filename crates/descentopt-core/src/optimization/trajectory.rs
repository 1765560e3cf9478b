//! Per-iteration history of a descent run.

use crate::types::Scalar;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of a driver after one iteration.
///
/// Record 0 describes the starting point: its `gradient_ratio` is 1 (or 0
/// when the starting gradient vanishes) and its `step_size` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IterationRecord<T> {
    /// Objective value at the iterate
    pub value: T,
    /// Iteration index, 0 for the starting point
    pub iteration: usize,
    /// Cumulative oracle calls, including those of the step-size strategy
    pub oracle_calls: usize,
    /// Wall-clock time since the start of the run
    pub elapsed: Duration,
    /// ‖gₖ‖² / ‖g₀‖²
    pub gradient_ratio: T,
    /// Step size that produced the iterate
    pub step_size: T,
}

/// Append-only log of [`IterationRecord`]s.
///
/// A driver owns its trajectory, clears it at the start of every run and
/// exposes it read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory<T> {
    records: Vec<IterationRecord<T>>,
}

impl<T: Scalar> Trajectory<T> {
    /// Creates an empty trajectory.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: IterationRecord<T>) {
        self.records.push(record);
    }

    /// Removes all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// All records in iteration order.
    pub fn records(&self) -> &[IterationRecord<T>] {
        &self.records
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, IterationRecord<T>> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` before the first run.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&IterationRecord<T>> {
        self.records.last()
    }

    /// Objective values in iteration order.
    pub fn values(&self) -> Vec<T> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Squared gradient ratios in iteration order.
    pub fn gradient_ratios(&self) -> Vec<T> {
        self.records.iter().map(|r| r.gradient_ratio).collect()
    }

    /// Step sizes in iteration order.
    pub fn step_sizes(&self) -> Vec<T> {
        self.records.iter().map(|r| r.step_size).collect()
    }

    /// Cumulative oracle calls in iteration order.
    pub fn oracle_calls(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.oracle_calls).collect()
    }
}

impl<'a, T> IntoIterator for &'a Trajectory<T> {
    type Item = &'a IterationRecord<T>;
    type IntoIter = std::slice::Iter<'a, IterationRecord<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
