//! Constantes del motor core.
//!
//! Valores estáticos compartidos por el runner y los steps estructurales.
//! `ENGINE_VERSION` participa en el cálculo de fingerprints: un cambio de
//! versión del motor invalida fingerprints aunque los estados no cambien.

/// Versión lógica del motor. Mantener estable mientras no haya cambios
/// incompatibles en el formato de estado o en el algoritmo de recompute.
pub const ENGINE_VERSION: &str = "W1.0";

/// Clave del dato de iteración dentro del documento scoped de `ForEachStep`.
pub const SCOPED_ITEM_KEY: &str = "item";
/// Clave del índice de iteración dentro del documento scoped.
pub const SCOPED_INDEX_KEY: &str = "index";
/// Clave del documento padre dentro del documento scoped.
pub const SCOPED_PARENT_KEY: &str = "parent";
