//! Descriptor de cambio: el disparador de un pass de recompute.

use serde_json::Value;

/// Qué cambió para disparar el pass.
///
/// `changed_index == None` significa "re-derivar todo" (el sentinel `-1` del
/// contrato original): la ventana de evaluación arranca en el step 0 y no hay
/// partial update que aplicar. Con `Some(i)`, el partial update (si existe)
/// se mergea sobre el estado previo del step `i` antes de evaluarlo.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDescriptor {
    pub changed_index: Option<usize>,
    pub partial_update: Option<Value>,
}

impl ChangeDescriptor {
    /// Pass completo, sin edición puntual.
    pub fn full() -> Self {
        Self { changed_index: None, partial_update: None }
    }

    /// Edición de un step con campos sueltos de su estado.
    pub fn edit(changed_index: usize, partial_update: Value) -> Self {
        Self { changed_index: Some(changed_index), partial_update: Some(partial_update) }
    }

    /// Re-evaluar desde un step sin aportar datos nuevos.
    pub fn touch(changed_index: usize) -> Self {
        Self { changed_index: Some(changed_index), partial_update: None }
    }
}
