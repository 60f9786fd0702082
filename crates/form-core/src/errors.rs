//! Errores específicos del core.
//!
//! Sólo errores de configuración: un estado reconstruido que no cuadra con
//! las definiciones, un índice fuera de rango, un documento que no es objeto.
//! Las condiciones de datos (selección obsoleta, presupuesto reducido) nunca
//! son errores; se corrigen en silencio durante el recompute.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreWizardError {
    #[error("changed step index out of range")] InvalidStepIndex,
    #[error("runner state misaligned with step definitions")] StateMisaligned,
    #[error("working document must be a JSON object")] DocumentNotObject,
    #[error("state encode failed for step '{0}'")] StateEncode(String),
}
