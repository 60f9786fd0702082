//! Contrato neutral de un step.

use serde_json::Value;

use crate::errors::CoreWizardError;
use crate::state::StepState;

/// Trait que define un step del asistente. El runner sólo conoce esta
/// interfaz; los steps concretos deciden qué campos derivan y qué escriben
/// en el documento de trabajo.
///
/// Las implementaciones deben ser funciones totales sobre sus inputs: un
/// `Err` aquí es un error de configuración fatal, nunca una condición de
/// datos (las referencias obsoletas se corrigen en silencio, no se reportan).
pub trait StepDefinition {
    /// Identificador estable y único dentro del runner.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Un step requerido sólo se completa cuando tiene respuesta válida; uno
    /// no requerido nace completado.
    fn required(&self) -> bool {
        true
    }

    /// Predicado de visibilidad sobre catálogo + documento (default: visible).
    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        let _ = (source, document);
        true
    }

    /// Estado inicial del step.
    fn init_state(&self) -> StepState {
        StepState::initial(self.required())
    }

    /// Resetea los campos específicos del tipo a su baseline vacío. Se invoca
    /// cuando el step pasa a (o sigue) invisible.
    fn clear(&self, state: &mut StepState) {
        state.fields = self.init_state().fields;
    }

    /// Deriva listas de opciones, defaults desde el documento y recalcula
    /// `is_completed`, con la visibilidad ya resuelta en `state.is_visible`.
    fn update_internal(&self,
                       source: &Value,
                       document: &mut Value,
                       state: &mut StepState)
                       -> Result<(), CoreWizardError>;

    /// Proyecta el estado del step dentro del documento. El runner lo invoca
    /// en cada pass para todos los steps, visibles o no: un step invisible
    /// escribe sus defaults limpios.
    fn write_back(&self,
                  source: &Value,
                  state: &StepState,
                  document: &mut Value)
                  -> Result<(), CoreWizardError> {
        let _ = (source, state, document);
        Ok(())
    }
}

impl dyn StepDefinition {
    /// Paso compartido y no sustituible del contrato: resuelve visibilidad,
    /// delega en `update_internal` y fuerza `is_completed` cuando el
    /// resultado quedó invisible. Este orden garantiza de manera uniforme el
    /// invariante invisible ⇒ completado para todo tipo de step.
    pub fn update(&self,
                  source: &Value,
                  document: &mut Value,
                  state: &mut StepState)
                  -> Result<(), CoreWizardError> {
        state.is_visible = self.is_visible(source, document);
        self.update_internal(source, document, state)?;
        if !state.is_visible {
            state.is_completed = true;
        }
        Ok(())
    }
}
