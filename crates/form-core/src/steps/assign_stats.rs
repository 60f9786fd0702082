//! Asignación uno-a-uno: un multiset fijo de choices repartido entre stats
//! nombrados, sin duplicar ninguna instancia.
//!
//! La reconciliación recorre los stats en orden: el candidato de cada uno es
//! su `fixed_value` si está bloqueado, o su asignación previa. Si el
//! candidato sigue en el multiset restante (según la función de igualdad
//! configurada) se le vincula y se retira; si no, el stat queda sin asignar
//! (referencia obsoleta, corregida en silencio). Después se deriva por stat
//! la lista de opciones seleccionables: lo elegido más lo que queda.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::CoreWizardError;
use crate::model::write_field;
use crate::step::{TypedState, TypedStep};

use super::VisibilityFn;

pub type ChoicesFn = Box<dyn Fn(&Value, &Value) -> Vec<Value>>;
pub type StatsFn = Box<dyn Fn(&Value, &Value) -> Vec<StatSpec>>;
pub type ChoiceEqFn = Box<dyn Fn(&Value, &Value) -> bool>;

/// Stat nombrado; bloqueado significa que su valor viene fijado por
/// configuración y no por el usuario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSpec {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub fixed_value: Option<Value>,
}

impl StatSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), locked: false, fixed_value: None }
    }

    pub fn locked(name: impl Into<String>, fixed_value: Value) -> Self {
        Self { name: name.into(), locked: true, fixed_value: Some(fixed_value) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSlot {
    pub name: String,
    pub locked: bool,
    /// Choice vinculado a este stat (retirado del multiset restante).
    pub assigned: Option<Value>,
    /// Lo elegido (si hay) seguido de lo que queda disponible.
    pub options: Vec<Value>,
    /// Índice de `assigned` dentro de `options`.
    pub selected_index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignStatsFields {
    pub stats: Vec<StatSlot>,
    /// Choices aún sin vincular tras la reconciliación.
    pub available: Vec<Value>,
}

impl AssignStatsFields {
    /// Write path de una edición: vincula el slot a una de sus propias
    /// opciones (o lo desvincula con `None`). Slots bloqueados rechazan la
    /// edición. La unicidad global la restablece el siguiente pass.
    pub fn try_select(&mut self, name: &str, option_index: Option<usize>) -> bool {
        let Some(slot) = self.stats.iter_mut().find(|s| s.name == name) else {
            return false;
        };
        if slot.locked {
            return false;
        }
        match option_index {
            None => {
                slot.assigned = None;
                slot.selected_index = None;
                true
            }
            Some(index) => match slot.options.get(index) {
                Some(choice) => {
                    slot.assigned = Some(choice.clone());
                    slot.selected_index = Some(index);
                    true
                }
                None => false,
            },
        }
    }

    pub fn to_partial_update(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub struct AssignStatsStep {
    id: String,
    name: String,
    required: bool,
    visible: Option<VisibilityFn>,
    write_key: Option<String>,
    choices: ChoicesFn,
    stats: StatsFn,
    eq: ChoiceEqFn,
}

impl AssignStatsStep {
    pub fn new(id: impl Into<String>,
               choices: impl Fn(&Value, &Value) -> Vec<Value> + 'static,
               stats: impl Fn(&Value, &Value) -> Vec<StatSpec> + 'static)
               -> Self {
        let id = id.into();
        Self { name: id.clone(),
               id,
               required: true,
               visible: None,
               write_key: None,
               choices: Box::new(choices),
               stats: Box::new(stats),
               eq: Box::new(|a, b| a == b) }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(predicate));
        self
    }

    /// Igualdad configurable sobre choices (default: igualdad de `Value`).
    pub fn choice_eq(mut self, eq: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.eq = Box::new(eq);
        self
    }

    /// Proyecta el mapa stat → choice vinculado bajo esta clave del documento.
    pub fn writes_to(mut self, key: impl Into<String>) -> Self {
        self.write_key = Some(key.into());
        self
    }
}

impl TypedStep for AssignStatsStep {
    type Fields = AssignStatsFields;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn required(&self) -> bool {
        self.required
    }

    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        match &self.visible {
            Some(predicate) => predicate(source, document),
            None => true,
        }
    }

    fn init_fields(&self) -> AssignStatsFields {
        AssignStatsFields::default()
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<AssignStatsFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;

        if !*is_visible {
            self.clear_fields(fields);
            return Ok(());
        }

        let specs = (self.stats)(source, document);
        let mut remaining = (self.choices)(source, document);

        let previous: HashMap<String, Value> =
            fields.stats
                  .iter()
                  .filter_map(|s| s.assigned.clone().map(|a| (s.name.clone(), a)))
                  .collect();

        // Primer pase: vincular candidatos que sigan disponibles.
        let mut slots: Vec<StatSlot> = Vec::with_capacity(specs.len());
        for spec in &specs {
            let candidate = if spec.locked {
                spec.fixed_value.clone()
            } else {
                previous.get(&spec.name).cloned()
            };
            let assigned = candidate.and_then(|c| {
                               remaining.iter()
                                        .position(|r| (self.eq)(r, &c))
                                        .map(|at| remaining.remove(at))
                           });
            slots.push(StatSlot { name: spec.name.clone(),
                                  locked: spec.locked,
                                  assigned,
                                  options: Vec::new(),
                                  selected_index: None });
        }

        // Segundo pase: opciones por stat = lo elegido + lo que queda.
        for slot in &mut slots {
            let mut options = Vec::with_capacity(1 + remaining.len());
            if let Some(assigned) = &slot.assigned {
                options.push(assigned.clone());
            }
            options.extend(remaining.iter().cloned());
            slot.selected_index = slot.assigned.as_ref().map(|_| 0);
            slot.options = options;
        }

        fields.stats = slots;
        fields.available = remaining;

        *is_completed = !self.required || fields.available.is_empty();
        Ok(())
    }

    fn write_back_fields(&self,
                         source: &Value,
                         state: &TypedState<AssignStatsFields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        let _ = source;
        if let Some(key) = &self.write_key {
            let mut bound = serde_json::Map::new();
            for slot in &state.fields.stats {
                bound.insert(slot.name.clone(),
                             slot.assigned.clone().unwrap_or(Value::Null));
            }
            write_field(document, key, Value::Object(bound))?;
        }
        Ok(())
    }
}
