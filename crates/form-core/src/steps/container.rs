//! Container: un runner anidado expuesto como un único step.
//!
//! El container no introduce frontera de datos: el runner anidado recomputa
//! contra el mismo documento de trabajo del padre (pass completo, sin índice
//! editado). Su completitud es derivada: todos los hijos completados.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreWizardError;
use crate::model::ChangeDescriptor;
use crate::runner::{RunnerState, StepRunner};
use crate::step::{TypedState, TypedStep};

use super::VisibilityFn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerFields {
    /// Snapshot del runner anidado, almacenado dentro del estado propio.
    pub nested: RunnerState,
}

pub struct ContainerStep {
    id: String,
    name: String,
    visible: Option<VisibilityFn>,
    runner: StepRunner,
}

impl ContainerStep {
    pub fn new(id: impl Into<String>, runner: StepRunner) -> Self {
        let id = id.into();
        Self { name: id.clone(), id, visible: None, runner }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        self.visible = Some(Box::new(predicate));
        self
    }

    pub fn nested_runner(&self) -> &StepRunner {
        &self.runner
    }
}

impl TypedStep for ContainerStep {
    type Fields = ContainerFields;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_visible(&self, source: &Value, document: &Value) -> bool {
        match &self.visible {
            Some(predicate) => predicate(source, document),
            None => true,
        }
    }

    fn init_fields(&self) -> ContainerFields {
        ContainerFields { nested: self.runner.initialize_state() }
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<ContainerFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;

        // Estado guardado con otra cantidad de hijos: reiniciar (corrección
        // silenciosa, las definiciones cambiaron entre sesiones).
        if fields.nested.steps.len() != self.runner.len() {
            fields.nested = self.runner.initialize_state();
        }

        if *is_visible {
            let outcome = self.runner
                              .recompute(source, document, &fields.nested, &ChangeDescriptor::full())?;
            fields.nested = outcome.state;
            // Mismo documento: los writes anidados se vuelven visibles para
            // los steps hermanos que siguen.
            *document = outcome.document;
            *is_completed = fields.nested.all_completed();
        } else {
            for (child, child_state) in self.runner.definitions().iter().zip(fields.nested.steps.iter_mut()) {
                child.clear(child_state);
                child.write_back(source, child_state, document)?;
            }
            *is_completed = true;
        }
        Ok(())
    }

    fn write_back_fields(&self,
                         source: &Value,
                         state: &TypedState<ContainerFields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        // Proyección incondicional de cada hijo con su estado almacenado;
        // cubre también los passes donde el container quedó fuera de la
        // ventana de evaluación.
        for (child, child_state) in self.runner.definitions().iter().zip(state.fields.nested.steps.iter()) {
            child.write_back(source, child_state, document)?;
        }
        Ok(())
    }
}
