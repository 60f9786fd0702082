//! Grupo repetido: replay de un runner anidado por cada iteración sobre un
//! slice de datos del documento padre.
//!
//! Cada iteración corre contra un documento scoped
//! `{ item, index, parent }`; el dato de iteración (posiblemente mutado por
//! los steps anidados) vuelve al slice del padre vía el setter después de
//! cada iteración. La visibilidad del grupo es derivada, no declarada:
//! visible ⇔ alguna iteración tiene algún step anidado visible. Un set de
//! iteraciones vacío o totalmente oculto hace al grupo invisible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{SCOPED_INDEX_KEY, SCOPED_ITEM_KEY, SCOPED_PARENT_KEY};
use crate::errors::CoreWizardError;
use crate::model::ChangeDescriptor;
use crate::runner::{RunnerState, StepRunner};
use crate::step::{TypedState, TypedStep};

pub type CountFn = Box<dyn Fn(&Value, &Value) -> usize>;
pub type ItemsGetFn = Box<dyn Fn(&Value) -> Vec<Value>>;
pub type ItemsSetFn = Box<dyn Fn(&mut Value, Vec<Value>)>;
pub type ItemInitFn = Box<dyn Fn(usize) -> Value>;
pub type LabelFn = Box<dyn Fn(&Value, usize) -> String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationState {
    pub label: String,
    pub nested: RunnerState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForEachFields {
    pub iterations: Vec<IterationState>,
}

pub struct ForEachStep {
    id: String,
    name: String,
    count: CountFn,
    get_items: ItemsGetFn,
    set_items: ItemsSetFn,
    init_item: ItemInitFn,
    label: LabelFn,
    runner: StepRunner,
}

impl ForEachStep {
    pub fn new(id: impl Into<String>,
               runner: StepRunner,
               count: impl Fn(&Value, &Value) -> usize + 'static,
               get_items: impl Fn(&Value) -> Vec<Value> + 'static,
               set_items: impl Fn(&mut Value, Vec<Value>) + 'static,
               init_item: impl Fn(usize) -> Value + 'static)
               -> Self {
        let id = id.into();
        Self { name: id.clone(),
               id,
               count: Box::new(count),
               get_items: Box::new(get_items),
               set_items: Box::new(set_items),
               init_item: Box::new(init_item),
               label: Box::new(|_, index| format!("#{}", index + 1)),
               runner }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Etiqueta por iteración derivada del dato ya recomputado.
    pub fn with_label(mut self, label: impl Fn(&Value, usize) -> String + 'static) -> Self {
        self.label = Box::new(label);
        self
    }

    pub fn nested_runner(&self) -> &StepRunner {
        &self.runner
    }

    fn scoped_document(item: &Value, index: usize, parent: &Value) -> Value {
        let mut scoped = Map::new();
        scoped.insert(SCOPED_ITEM_KEY.to_string(), item.clone());
        scoped.insert(SCOPED_INDEX_KEY.to_string(), Value::from(index as u64));
        scoped.insert(SCOPED_PARENT_KEY.to_string(), parent.clone());
        Value::Object(scoped)
    }
}

impl TypedStep for ForEachStep {
    type Fields = ForEachFields;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn init_fields(&self) -> ForEachFields {
        ForEachFields::default()
    }

    fn update_fields(&self,
                     source: &Value,
                     document: &mut Value,
                     state: &mut TypedState<ForEachFields>)
                     -> Result<(), CoreWizardError> {
        let TypedState { is_visible, is_completed, fields } = state;

        let mut items = (self.get_items)(document);
        let count = (self.count)(source, document);

        // Presupuesto reducido: truncar estados e items en paralelo.
        items.truncate(count);
        fields.iterations.truncate(count);

        // Presupuesto ampliado: crecer ambos hasta `count`.
        while items.len() < count {
            items.push((self.init_item)(items.len()));
        }
        while fields.iterations.len() < count {
            fields.iterations.push(IterationState { label: String::new(),
                                                    nested: self.runner.initialize_state() });
        }

        for index in 0..count {
            let iteration = &mut fields.iterations[index];
            if iteration.nested.steps.len() != self.runner.len() {
                iteration.nested = self.runner.initialize_state();
            }

            let scoped = Self::scoped_document(&items[index], index, document);
            let outcome = self.runner
                              .recompute(source, &scoped, &iteration.nested, &ChangeDescriptor::full())?;
            iteration.nested = outcome.state;

            let item = outcome.document
                              .get(SCOPED_ITEM_KEY)
                              .cloned()
                              .unwrap_or(Value::Null);
            iteration.label = (self.label)(&item, index);
            items[index] = item;
            // El slice vuelve al padre tras cada iteración: la siguiente ve
            // el documento ya actualizado.
            (self.set_items)(document, items.clone());
        }

        // Visibilidad derivada: pisa lo que haya resuelto el predicado.
        *is_visible = fields.iterations.iter().any(|it| it.nested.any_visible());

        if *is_visible {
            *is_completed = fields.iterations.iter().all(|it| it.nested.all_completed());
        } else {
            fields.iterations.clear();
            (self.set_items)(document, Vec::new());
            *is_completed = true;
        }
        Ok(())
    }

    fn write_back_fields(&self,
                         source: &Value,
                         state: &TypedState<ForEachFields>,
                         document: &mut Value)
                         -> Result<(), CoreWizardError> {
        // Proyección incondicional: cada iteración almacenada replayea los
        // write_back de sus hijos sobre un documento scoped y devuelve el
        // dato resultante al slice; cubre también los passes donde el grupo
        // quedó fuera de la ventana de evaluación.
        let iterations = &state.fields.iterations;
        let mut items = (self.get_items)(document);
        items.truncate(iterations.len());
        while items.len() < iterations.len() {
            items.push((self.init_item)(items.len()));
        }

        for (index, iteration) in iterations.iter().enumerate() {
            let mut scoped = Self::scoped_document(&items[index], index, document);
            for (child, child_state) in self.runner.definitions().iter().zip(iteration.nested.steps.iter()) {
                child.write_back(source, child_state, &mut scoped)?;
            }
            items[index] = scoped.get(SCOPED_ITEM_KEY).cloned().unwrap_or(Value::Null);
        }
        (self.set_items)(document, items);
        Ok(())
    }
}
