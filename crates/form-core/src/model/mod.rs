//! Modelo neutral del core: documento de trabajo y descriptor de cambio.

pub mod change;
pub mod document;

pub use change::ChangeDescriptor;
pub use document::{ensure_object, object_mut, write_field};
