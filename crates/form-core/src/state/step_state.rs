//! Estado neutral de un step.
//!
//! El engine sólo conoce las dos flags del contrato (`is_visible`,
//! `is_completed`) más un mapa plano de campos específicos del tipo de step.
//! Los steps tipados (de)serializan ese mapa hacia sus structs concretos.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    pub is_visible: bool,
    pub is_completed: bool,
    /// Campos específicos del tipo de step, aplanados al nivel del estado
    /// para que un partial update pueda tocar cualquiera de ellos por clave.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StepState {
    /// Estado inicial del contrato: visible por defecto, completado sólo si
    /// el step no es requerido.
    pub fn initial(required: bool) -> Self {
        Self { is_visible: true,
               is_completed: !required,
               fields: Map::new() }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set_field(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }
}
