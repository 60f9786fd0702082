//! Merge de partial updates sobre un snapshot de estado.
//!
//! Semántica shallow: las claves del partial sobreescriben las del estado
//! previo, clave a clave. `is_visible` / `is_completed` actualizan las flags
//! del contrato; el resto cae en los campos específicos del step. Un partial
//! que no es objeto se ignora: el estado siempre se mantiene como objeto.

use serde_json::Value;

use super::StepState;

/// Aplica un partial update disperso y devuelve el nuevo snapshot.
pub fn merge_state(prior: &StepState, partial: &Value) -> StepState {
    let mut out = prior.clone();
    let Some(map) = partial.as_object() else {
        return out;
    };
    for (key, value) in map {
        match key.as_str() {
            "is_visible" => {
                if let Some(flag) = value.as_bool() {
                    out.is_visible = flag;
                }
            }
            "is_completed" => {
                if let Some(flag) = value.as_bool() {
                    out.is_completed = flag;
                }
            }
            _ => {
                out.fields.insert(key.clone(), value.clone());
            }
        }
    }
    out
}
