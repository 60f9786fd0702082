//! Working document helpers.
//!
//! El documento de trabajo es un `Value` objeto que atraviesa todos los
//! steps de un pass: cada step puede leer lo que escribieron los anteriores
//! y escribir sus propios campos. El clone profundo por pass lo hace el
//! runner; aquí sólo vive la validación estructural.

use serde_json::{Map, Value};

use crate::errors::CoreWizardError;

/// Verifica que el documento sea un objeto JSON (error de configuración si no).
pub fn ensure_object(document: &Value) -> Result<(), CoreWizardError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(CoreWizardError::DocumentNotObject)
    }
}

/// Acceso mutable al mapa del documento.
pub fn object_mut(document: &mut Value) -> Result<&mut Map<String, Value>, CoreWizardError> {
    document.as_object_mut().ok_or(CoreWizardError::DocumentNotObject)
}

/// Inserta un campo en el documento (helper para `write_back`).
pub fn write_field(document: &mut Value,
                   key: &str,
                   value: Value)
                   -> Result<(), CoreWizardError> {
    object_mut(document)?.insert(key.to_string(), value);
    Ok(())
}
