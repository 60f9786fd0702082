//! Tipos de evento de sesión y estructura `SessionEvent`.
//!
//! Rol en el asistente:
//! - Cada pass aceptado o rechazado deja un evento en un log append-only.
//! - `PassCommitted` lleva el fingerprint del estado comprometido: dos
//!   eventos consecutivos con el mismo fingerprint delatan un pass sin
//!   efecto, sin comparar estructuras.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreWizardError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// Primera emisión de una sesión: cantidad de steps y fingerprint del
    /// estado tras el pass inicial completo.
    SessionInitialized { step_count: usize, fingerprint: String },
    /// Un pass terminó y su resultado se comprometió entero.
    PassCommitted {
        changed_index: Option<usize>,
        current_step: usize,
        fingerprint: String,
    },
    /// Un pass abortó por error de configuración; nada se comprometió.
    PassRejected {
        changed_index: Option<usize>,
        error: CoreWizardError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub seq: u64, // asignado por el log in-memory (orden de append)
    pub session_id: Uuid,
    pub kind: SessionEventKind,
    pub ts: DateTime<Utc>, // metadato, no entra en ningún fingerprint
}
