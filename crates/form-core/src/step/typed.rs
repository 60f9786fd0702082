//! Interfaz de alto nivel para definir steps con campos fuertemente tipados.
//!
//! Implementadores escriben su lógica contra un struct concreto de campos;
//! el adaptador de abajo convierte esa ejecución a la interfaz neutra
//! `StepDefinition` (de)serializando los campos vía serde. Un estado
//! almacenado cuya forma ya no cuadra con el tipo (definiciones cambiadas
//! entre sesiones) se reinicia a los campos iniciales del step: es una
//! corrección silenciosa, no un error.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::CoreWizardError;
use crate::state::StepState;

use super::StepDefinition;

/// Vista tipada del estado de un step: las dos flags del contrato más los
/// campos concretos del tipo.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedState<F> {
    pub is_visible: bool,
    pub is_completed: bool,
    pub fields: F,
}

pub trait TypedStep {
    /// Campos específicos del step, serializables hacia el estado neutral.
    type Fields: Serialize + DeserializeOwned + Clone;

    /// Identificador estable del step dentro del runner.
    fn id(&self) -> &str;

    /// Nombre amigable (por defecto usa el id).
    fn name(&self) -> &str {
        self.id()
    }

    fn required(&self) -> bool {
        true
    }

    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        let _ = (source, document);
        true
    }

    /// Campos baseline del step (estado recién creado o limpiado).
    fn init_fields(&self) -> Self::Fields;

    /// Reset de campos al baseline. Sobreescribir sólo si el baseline no
    /// coincide con `init_fields`.
    fn clear_fields(&self, fields: &mut Self::Fields) {
        *fields = self.init_fields();
    }

    /// Ejecución tipada del update, con la visibilidad ya resuelta en
    /// `state.is_visible`.
    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<Self::Fields>)
                     -> Result<(), CoreWizardError>;

    /// Proyección tipada hacia el documento.
    fn write_back_fields(&self,
                         source: &Value,
                         state: &TypedState<Self::Fields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        let _ = (source, state, document);
        Ok(())
    }
}

/// Decodifica los campos almacenados; forma obsoleta ⇒ baseline del step.
pub(crate) fn decode_fields<T: TypedStep>(step: &T, state: &StepState) -> T::Fields {
    serde_json::from_value(Value::Object(state.fields.clone())).unwrap_or_else(|_| step.init_fields())
}

/// Re-encodea los campos tipados dentro del estado neutral. Que un tipo de
/// campos no serialice a objeto JSON es un error de configuración.
pub(crate) fn encode_fields<T: TypedStep>(step: &T,
                                          state: &mut StepState,
                                          fields: &T::Fields)
                                          -> Result<(), CoreWizardError> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => {
            state.fields = map;
            Ok(())
        }
        _ => Err(CoreWizardError::StateEncode(step.id().to_string())),
    }
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStep` implementa `StepDefinition` neutro.
// -------------------------------------------------------------
impl<T> StepDefinition for T where T: TypedStep + 'static
{
    fn id(&self) -> &str {
        <Self as TypedStep>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedStep>::name(self)
    }

    fn required(&self) -> bool {
        <Self as TypedStep>::required(self)
    }

    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        <Self as TypedStep>::is_visible(self, source, document)
    }

    fn init_state(&self) -> StepState {
        let mut state = StepState::initial(<Self as TypedStep>::required(self));
        // Baseline de campos; si el tipo no serializa a objeto el error
        // aflorará en el primer update.
        let _ = encode_fields(self, &mut state, &self.init_fields());
        state
    }

    fn clear(&self, state: &mut StepState) {
        let mut fields = decode_fields(self, state);
        self.clear_fields(&mut fields);
        let _ = encode_fields(self, state, &fields);
    }

    fn update_internal(&self,
                       source: &Value,
                       document: &mut Value,
                       state: &mut StepState)
                       -> Result<(), CoreWizardError> {
        let mut typed = TypedState { is_visible: state.is_visible,
                                     is_completed: state.is_completed,
                                     fields: decode_fields(self, state) };
        self.update_fields(source, document, &mut typed)?;
        state.is_visible = typed.is_visible;
        state.is_completed = typed.is_completed;
        encode_fields(self, state, &typed.fields)
    }

    fn write_back(&self,
                  source: &Value,
                  state: &StepState,
                  document: &mut Value)
                  -> Result<(), CoreWizardError> {
        let typed = TypedState { is_visible: state.is_visible,
                                 is_completed: state.is_completed,
                                 fields: decode_fields(self, state) };
        self.write_back_fields(source, &typed, document)
    }
}
