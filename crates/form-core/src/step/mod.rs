//! Definiciones relacionadas a steps.
//!
//! Un step es la unidad del asistente: decide su visibilidad, deriva sus
//! campos a partir del catálogo y del documento acumulado, y escribe su
//! contribución de vuelta al documento. Este módulo define:
//! - `StepDefinition`: interfaz neutral usada por el runner, con el paso
//!   compartido `update` que garantiza invisible ⇒ completado.
//! - `TypedStep`: interfaz de alto nivel (opcional) con campos fuertes.

pub mod definition;
pub mod typed;

pub use definition::StepDefinition;
pub use typed::{TypedState, TypedStep};
