//! Step hoja de selección única.
//!
//! Deriva su lista de opciones en cada pass; una selección previa que ya no
//! aparece en la lista se descarta (corrección, no error). Con
//! `auto_select_single`, una lista de exactamente una opción se responde
//! sola, lo que permite cascadas de autocompletado ventana abajo.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use form_core::model::write_field;
use form_core::{CoreWizardError, TypedState, TypedStep};

pub type OptionsFn = Box<dyn Fn(&Value, &Value) -> Vec<Value>>;
pub type VisibleFn = Box<dyn Fn(&Value, &Value) -> bool>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectFields {
    /// Opciones válidas derivadas en el último pass.
    pub options: Vec<Value>,
    /// Opción elegida; siempre una de `options`.
    pub selected: Option<Value>,
}

pub struct SelectStep {
    id: String,
    name: String,
    required: bool,
    auto_single: bool,
    visible: Option<VisibleFn>,
    options: OptionsFn,
    write_key: String,
}

impl SelectStep {
    pub fn new(id: impl Into<String>,
               write_key: impl Into<String>,
               options: impl Fn(&Value, &Value) -> Vec<Value> + 'static)
               -> Self {
        let id = id.into();
        Self { name: id.clone(),
               id,
               required: true,
               auto_single: false,
               visible: None,
               options: Box::new(options),
               write_key: write_key.into() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Auto-responder cuando la lista queda en exactamente una opción.
    pub fn auto_select_single(mut self) -> Self {
        self.auto_single = true;
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(predicate));
        self
    }
}

impl TypedStep for SelectStep {
    type Fields = SelectFields;

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

    fn init_fields(&self) -> SelectFields {
        SelectFields::default()
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<SelectFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;

        if !*is_visible {
            self.clear_fields(fields);
            return Ok(());
        }

        fields.options = (self.options)(source, document);

        // Selección obsoleta: descartada en silencio.
        if let Some(selected) = &fields.selected {
            if !fields.options.contains(selected) {
                fields.selected = None;
            }
        }
        if self.auto_single && fields.selected.is_none() && fields.options.len() == 1 {
            fields.selected = Some(fields.options[0].clone());
        }

        *is_completed = !self.required || fields.selected.is_some();
        Ok(())
    }

    fn write_back_fields(&self,
                         _source: &Value,
                         state: &TypedState<SelectFields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        let selected = state.fields.selected.clone().unwrap_or(Value::Null);
        write_field(document, &self.write_key, selected)
    }
}
