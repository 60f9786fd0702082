//! form-adapters: steps hoja concretos construidos sólo con callbacks de
//! configuración sobre el contrato de `form-core`.
//!
//! Este crate provee los steps de entrada de datos que el core trata como
//! colaboradores opacos:
//! - `SelectStep`: elegir una opción de una lista derivada de catálogo +
//!   documento; las selecciones que dejan de ser válidas se descartan en
//!   silencio.
//! - `NoteStep`: step informativo no requerido (nace completado).
//!
//! Nota: el core sólo conoce `StepState { is_visible, is_completed, fields }`;
//! aquí nos apoyamos en la capa tipada (`TypedStep`) para trabajar con
//! structs concretos serializados a esos campos.

pub mod note;
pub mod select;

pub use note::NoteStep;
pub use select::{SelectFields, SelectStep};
