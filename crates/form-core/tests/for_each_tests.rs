//! Pruebas del grupo repetido: replay del runner anidado por iteración.

use form_core::steps::ForEachStep;
use form_core::{ChangeDescriptor, CoreWizardError, ForEachFields, StepDefinition, StepRunner, StepState};
use serde_json::{json, Value};

/// Step anidado que rellena el dato de la iteración cuando está vacío,
/// combinando un prefijo del documento padre con el índice scoped.
struct FillStep;

impl StepDefinition for FillStep {
    fn id(&self) -> &str {
        "fill"
    }

    fn update_internal(&self,
                       _source: &Value,
                       document: &mut Value,
                       state: &mut StepState)
                       -> Result<(), CoreWizardError> {
        let value = match &document["item"] {
            Value::Null => {
                let prefix = document["parent"]["prefix"].as_str().unwrap_or("fila");
                let index = document["index"].as_u64().unwrap_or(0);
                json!(format!("{prefix}-{index}"))
            }
            current => current.clone(),
        };
        state.set_field("value", value);
        state.is_completed = true;
        Ok(())
    }

    fn write_back(&self,
                  _source: &Value,
                  state: &StepState,
                  document: &mut Value)
                  -> Result<(), CoreWizardError> {
        let value = state.field("value").cloned().unwrap_or(Value::Null);
        form_core::model::write_field(document, "item", value)
    }
}

fn rows_runner() -> StepRunner {
    let nested = StepRunner::builder().step(FillStep).build();
    StepRunner::builder()
        .step(ForEachStep::new("rows",
                               nested,
                               |_, document| document["n"].as_u64().unwrap_or(0) as usize,
                               |document| document["rows"].as_array().cloned().unwrap_or_default(),
                               |document, items| {
                                   if let Some(map) = document.as_object_mut() {
                                       map.insert("rows".into(), Value::Array(items));
                                   }
                               },
                               |_| Value::Null))
        .build()
}

fn fields(state: &form_core::RunnerState) -> ForEachFields {
    serde_json::from_value(Value::Object(state.steps[0].fields.clone())).expect("fields del grupo")
}

#[test]
fn growing_the_count_initializes_items_and_iterations() {
    let runner = rows_runner();
    let state = runner.initialize_state();
    let document = json!({"n": 3, "rows": [], "prefix": "slot"});

    let out = runner.recompute(&json!({}), &document, &state, &ChangeDescriptor::full())
                    .expect("pass");

    // El write-back anidado aterriza en el slice del padre, iteración a
    // iteración, con el documento padre visible vía la clave scoped.
    assert_eq!(out.document["rows"], json!(["slot-0", "slot-1", "slot-2"]));

    let group = fields(&out.state);
    assert_eq!(group.iterations.len(), 3);
    assert!(group.iterations.iter().all(|it| it.nested.all_completed()));
    assert_eq!(group.iterations[0].label, "#1");
    assert_eq!(group.iterations[2].label, "#3");

    assert!(out.state.steps[0].is_visible);
    assert!(out.state.steps[0].is_completed);
}

#[test]
fn shrinking_the_count_truncates_items_and_iterations_together() {
    let runner = rows_runner();
    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"n": 3, "rows": []}), &state, &ChangeDescriptor::full())
                    .expect("pass");
    assert_eq!(fields(&out.state).iterations.len(), 3);

    let mut shrunk = out.document.clone();
    shrunk["n"] = json!(1);
    let out = runner.recompute(&json!({}), &shrunk, &out.state, &ChangeDescriptor::full())
                    .expect("pass");

    // Sólo sobrevive la primera iteración, con su dato intacto.
    assert_eq!(out.document["rows"], json!(["fila-0"]));
    let group = fields(&out.state);
    assert_eq!(group.iterations.len(), 1);
    assert!(out.state.steps[0].is_completed);
}

#[test]
fn zero_count_makes_the_group_invisible_and_resets_the_slice() {
    let runner = rows_runner();
    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"n": 2, "rows": []}), &state, &ChangeDescriptor::full())
                    .expect("pass");
    assert!(out.state.steps[0].is_visible);

    let mut emptied = out.document.clone();
    emptied["n"] = json!(0);
    let out = runner.recompute(&json!({}), &emptied, &out.state, &ChangeDescriptor::full())
                    .expect("pass");

    // Visibilidad derivada: sin iteraciones visibles, el grupo se oculta,
    // se completa y deja el slice vacío.
    assert!(!out.state.steps[0].is_visible);
    assert!(out.state.steps[0].is_completed);
    assert_eq!(out.document["rows"], json!([]));
    assert!(fields(&out.state).iterations.is_empty());
}

#[test]
fn labels_derive_from_the_recomputed_item() {
    let nested = StepRunner::builder().step(FillStep).build();
    let runner = StepRunner::builder()
        .step(ForEachStep::new("rows",
                               nested,
                               |_, document| document["n"].as_u64().unwrap_or(0) as usize,
                               |document| document["rows"].as_array().cloned().unwrap_or_default(),
                               |document, items| {
                                   if let Some(map) = document.as_object_mut() {
                                       map.insert("rows".into(), Value::Array(items));
                                   }
                               },
                               |_| Value::Null)
                  .with_label(|item, index| {
                      format!("Slot {}: {}", index + 1, item.as_str().unwrap_or("?"))
                  }))
        .build();

    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"n": 2, "rows": []}), &state, &ChangeDescriptor::full())
                    .expect("pass");

    let group = fields(&out.state);
    assert_eq!(group.iterations[0].label, "Slot 1: fila-0");
    assert_eq!(group.iterations[1].label, "Slot 2: fila-1");
}

#[test]
fn out_of_window_group_reprojects_the_slice() {
    /// Step requerido sin auto-respuesta, para editar detrás del grupo.
    struct ConfirmStep;
    impl StepDefinition for ConfirmStep {
        fn id(&self) -> &str {
            "confirm"
        }
        fn update_internal(&self,
                           _source: &Value,
                           _document: &mut Value,
                           state: &mut StepState)
                           -> Result<(), CoreWizardError> {
            state.is_completed = state.field("answer").map(|v| !v.is_null()).unwrap_or(false);
            Ok(())
        }
    }

    let nested = StepRunner::builder().step(FillStep).build();
    let runner = StepRunner::builder()
        .step(ForEachStep::new("rows",
                               nested,
                               |_, document| document["n"].as_u64().unwrap_or(0) as usize,
                               |document| document["rows"].as_array().cloned().unwrap_or_default(),
                               |document, items| {
                                   if let Some(map) = document.as_object_mut() {
                                       map.insert("rows".into(), Value::Array(items));
                                   }
                               },
                               |_| Value::Null))
        .step(ConfirmStep)
        .build();

    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"n": 2, "rows": []}), &state, &ChangeDescriptor::full())
                    .expect("pass");
    assert_eq!(out.document["rows"], json!(["fila-0", "fila-1"]));

    // Documento sin el slice y una edición detrás del grupo: el grupo queda
    // antes del inicio de la ventana, pero su proyección replayea las
    // iteraciones almacenadas y reconstruye el slice.
    let stripped = json!({"n": 2});
    let out = runner.recompute(&json!({}), &stripped, &out.state,
                               &ChangeDescriptor::edit(1, json!({"answer": null})))
                    .expect("pass");
    assert!(!out.state.steps[1].is_completed);
    assert_eq!(out.document["rows"], json!(["fila-0", "fila-1"]));
}

#[test]
fn stale_iteration_state_reinitializes() {
    let runner = rows_runner();
    let mut state = runner.initialize_state();

    // Snapshot persistido con un runner anidado de otra forma.
    state.steps[0].set_field("iterations",
                             json!([{"label": "", "nested": {"current_step": 0, "steps": []}}]));

    let out = runner.recompute(&json!({}), &json!({"n": 1, "rows": ["viejo"]}), &state,
                               &ChangeDescriptor::full())
                    .expect("la forma obsoleta se corrige, no falla");

    let group = fields(&out.state);
    assert_eq!(group.iterations[0].nested.steps.len(), 1);
    assert_eq!(out.document["rows"], json!(["viejo"]));
}
