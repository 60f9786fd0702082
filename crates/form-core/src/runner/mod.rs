//! Runner module: colección ordenada de steps + recompute por ventana.

pub mod builder;
pub mod core;
pub mod state;

pub use builder::RunnerBuilder;
pub use core::StepRunner;
pub use state::{RecomputeOutcome, RunnerState};
