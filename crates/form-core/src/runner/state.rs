//! Estado reconstruible del runner y resultado de un pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::StepState;

/// Snapshot completo de un runner: cursor + estados index-aligned con las
/// definiciones. Se crea una vez por sesión y se reemplaza entero en cada
/// pass; nunca se muta in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    /// Índice del primer step incompleto; un valor >= cantidad de steps
    /// señala "flujo terminado" (ver nota en el algoritmo del runner).
    pub current_step: usize,
    /// `steps[i]` corresponde siempre a `definitions[i]`; nunca se reordena.
    pub steps: Vec<StepState>,
}

impl RunnerState {
    pub fn all_completed(&self) -> bool {
        self.steps.iter().all(|s| s.is_completed)
    }

    pub fn any_visible(&self) -> bool {
        self.steps.iter().any(|s| s.is_visible)
    }
}

/// Resultado de un pass de recompute: el nuevo snapshot y el documento con
/// las contribuciones de todos los steps ya escritas.
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeOutcome {
    pub state: RunnerState,
    pub document: Value,
}
