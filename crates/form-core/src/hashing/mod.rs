//! Fingerprints de estado.
//!
//! Rol en el asistente:
//! - Cada pass de recompute reemplaza el `RunnerState` completo; el
//!   fingerprint permite detectar passes sin efecto (idempotencia) sin
//!   comparar estructuras campo a campo.
//! - El fingerprint entra en los eventos `PassCommitted` del log de sesión.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_str, hash_value};

use serde_json::{json, Value};

use crate::constants::ENGINE_VERSION;
use crate::runner::RunnerState;

/// Fingerprint estable de un `RunnerState` (incluye `ENGINE_VERSION`).
pub fn state_fingerprint(state: &RunnerState) -> String {
    let encoded = serde_json::to_value(state).unwrap_or(Value::Null);
    hash_value(&json!({
        "engine_version": ENGINE_VERSION,
        "state": encoded,
    }))
}
