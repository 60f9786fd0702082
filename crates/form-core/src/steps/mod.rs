//! Steps estructurales y de asignación provistos por el core.
//!
//! - `ContainerStep`: expone un runner anidado como un único step.
//! - `ForEachStep`: grupo repetido; replay del runner anidado por iteración.
//! - `AssignPoolStep`: reparto de presupuesto con conservación.
//! - `AssignStatsStep`: asignación uno-a-uno de un multiset de choices.
//!
//! Todo lo específico de dominio entra como callbacks de configuración; el
//! core los invoca, nunca razona sobre ellos.

pub mod assign_pool;
pub mod assign_stats;
pub mod container;
pub mod for_each;

use serde_json::Value;

/// Predicado de visibilidad inyectado por configuración.
pub type VisibilityFn = Box<dyn Fn(&Value, &Value) -> bool>;

pub use assign_pool::{AssignPoolFields, AssignPoolStep, PoolSpec};
pub use assign_stats::{AssignStatsFields, AssignStatsStep, StatSlot, StatSpec};
pub use container::{ContainerFields, ContainerStep};
pub use for_each::{ForEachFields, ForEachStep, IterationState};
