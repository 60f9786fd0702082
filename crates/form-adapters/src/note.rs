//! Step informativo: no requiere respuesta, nace completado.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use form_core::{CoreWizardError, TypedState, TypedStep};

pub type TextFn = Box<dyn Fn(&Value, &Value) -> String>;
pub type VisibleFn = Box<dyn Fn(&Value, &Value) -> bool>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteFields {
    pub text: String,
}

pub struct NoteStep {
    id: String,
    name: String,
    visible: Option<VisibleFn>,
    text: TextFn,
}

impl NoteStep {
    pub fn new(id: impl Into<String>, text: impl Fn(&Value, &Value) -> String + 'static) -> Self {
        let id = id.into();
        Self { name: id.clone(), id, visible: None, text: Box::new(text) }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(predicate));
        self
    }
}

impl TypedStep for NoteStep {
    type Fields = NoteFields;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn required(&self) -> bool {
        false
    }

    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        match &self.visible {
            Some(predicate) => predicate(source, document),
            None => true,
        }
    }

    fn init_fields(&self) -> NoteFields {
        NoteFields::default()
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<NoteFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;
        if *is_visible {
            fields.text = (self.text)(source, document);
        } else {
            self.clear_fields(fields);
        }
        *is_completed = true;
        Ok(())
    }
}
