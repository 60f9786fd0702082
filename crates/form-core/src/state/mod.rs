//! Estado de steps y merge de partial updates.

pub mod merge;
pub mod step_state;

pub use merge::merge_state;
pub use step_state::StepState;
