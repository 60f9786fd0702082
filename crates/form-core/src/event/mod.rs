//! Log de eventos de sesión (in-memory, append-only).

pub mod store;
pub mod types;

pub use store::{EventLog, InMemoryEventLog};
pub use types::{SessionEvent, SessionEventKind};
