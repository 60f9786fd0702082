//! Reparto de un presupuesto entero entre buckets nombrados, con
//! conservación: suma de asignados + restante == disponible, siempre.
//!
//! La reconciliación recorre los pools en orden declarado recortando cada
//! valor previo contra lo que queda del presupuesto y contra el máximo del
//! pool. Un valor `null` fue limpiado explícitamente por el usuario y se
//! mantiene en blanco; un pool sin entrada previa también arranca en blanco.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreWizardError;
use crate::model::write_field;
use crate::step::{TypedState, TypedStep};

use super::VisibilityFn;

pub type AvailableFn = Box<dyn Fn(&Value, &Value) -> i64>;
pub type PoolsFn = Box<dyn Fn(&Value, &Value) -> Vec<PoolSpec>>;

/// Bucket nombrado con tope opcional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub name: String,
    #[serde(default)]
    pub max_value: Option<i64>,
}

impl PoolSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), max_value: None }
    }

    pub fn with_max(name: impl Into<String>, max_value: i64) -> Self {
        Self { name: name.into(), max_value: Some(max_value) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignPoolFields {
    /// Snapshot de los pools del último pass (orden declarado).
    pub pools: Vec<PoolSpec>,
    /// Valor por pool; `None` = en blanco, explícitamente.
    pub values: IndexMap<String, Option<i64>>,
    pub available: i64,
    pub remaining: i64,
}

impl AssignPoolFields {
    /// Write path de una edición de usuario. Rechaza (sin tocar el estado)
    /// valores negativos, por encima del máximo del pool, o cuyo incremento
    /// sobre el valor actual exceda el presupuesto restante.
    pub fn try_set(&mut self, name: &str, value: Option<i64>) -> bool {
        let Some(spec) = self.pools.iter().find(|p| p.name == name) else {
            return false;
        };
        let current = self.values.get(name).copied().flatten().unwrap_or(0);
        match value {
            None => {
                self.values.insert(name.to_string(), None);
                self.remaining += current;
                true
            }
            Some(v) => {
                if v < 0 {
                    return false;
                }
                if let Some(max) = spec.max_value {
                    if v > max {
                        return false;
                    }
                }
                if v - current > self.remaining {
                    return false;
                }
                self.values.insert(name.to_string(), Some(v));
                self.remaining -= v - current;
                true
            }
        }
    }

    /// Campos completos como partial update para el descriptor de cambio.
    pub fn to_partial_update(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub struct AssignPoolStep {
    id: String,
    name: String,
    required: bool,
    visible: Option<VisibilityFn>,
    write_key: Option<String>,
    available: AvailableFn,
    pools: PoolsFn,
}

impl AssignPoolStep {
    pub fn new(id: impl Into<String>,
               available: impl Fn(&Value, &Value) -> i64 + 'static,
               pools: impl Fn(&Value, &Value) -> Vec<PoolSpec> + 'static)
               -> Self {
        let id = id.into();
        Self { name: id.clone(),
               id,
               required: true,
               visible: None,
               write_key: None,
               available: Box::new(available),
               pools: Box::new(pools) }
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

    /// Proyecta el mapa de valores bajo esta clave del documento.
    pub fn writes_to(mut self, key: impl Into<String>) -> Self {
        self.write_key = Some(key.into());
        self
    }
}

impl TypedStep for AssignPoolStep {
    type Fields = AssignPoolFields;

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

    fn init_fields(&self) -> AssignPoolFields {
        AssignPoolFields::default()
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<AssignPoolFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;

        if !*is_visible {
            self.clear_fields(fields);
            return Ok(());
        }

        let pools = (self.pools)(source, document);
        let available = (self.available)(source, document);

        // Reconciliación con conservación: orden declarado, presupuesto que
        // se va consumiendo.
        let mut remaining = available;
        let mut values: IndexMap<String, Option<i64>> = IndexMap::with_capacity(pools.len());
        for pool in &pools {
            let previous = fields.values.get(&pool.name).copied().flatten();
            let assigned = previous.map(|v| {
                               let cap = pool.max_value.unwrap_or(i64::MAX);
                               let v = v.min(cap).min(remaining).max(0);
                               remaining -= v;
                               v
                           });
            values.insert(pool.name.clone(), assigned);
        }

        fields.pools = pools;
        fields.values = values;
        fields.available = available;
        fields.remaining = remaining;

        *is_completed = !self.required || fields.remaining == 0;
        Ok(())
    }

    fn write_back_fields(&self,
                         source: &Value,
                         state: &TypedState<AssignPoolFields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        let _ = source;
        if let Some(key) = &self.write_key {
            let values = serde_json::to_value(&state.fields.values)
                .map_err(|_| CoreWizardError::StateEncode(self.id.clone()))?;
            write_field(document, key, values)?;
        }
        Ok(())
    }
}
