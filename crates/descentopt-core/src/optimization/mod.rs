//! Driver-facing types: results, stopping criteria, callbacks and the
//! trajectory log.

pub mod callback;
pub mod optimizer;
pub mod trajectory;

pub use callback::{NoOpCallback, OptimizationCallback, PrintProgressCallback, RecordingCallback};
pub use optimizer::{
    DriverPhase, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
};
pub use trajectory::{IterationRecord, Trajectory};
