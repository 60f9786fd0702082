//! form-core: Motor de recomputación incremental para asistentes de carga
//! de datos paso a paso.
//!
//! Una edición de usuario sobre un step dispara un pass determinista que
//! re-evalúa exactamente los steps cuyo estado derivado pudo cambiar (en
//! orden, por ventana deslizante), escribiendo cada contribución al
//! documento de trabajo antes de evaluar el siguiente step.
pub mod constants;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod runner;
pub mod session;
pub mod state;
pub mod step;
pub mod steps;

pub use errors::CoreWizardError;
pub use event::{EventLog, InMemoryEventLog, SessionEvent, SessionEventKind};
pub use hashing::state_fingerprint;
pub use model::ChangeDescriptor;
pub use runner::{RecomputeOutcome, RunnerBuilder, RunnerState, StepRunner};
pub use session::WizardSession;
pub use state::{merge_state, StepState};
pub use step::{StepDefinition, TypedState, TypedStep};
pub use steps::{AssignPoolFields, AssignPoolStep, AssignStatsFields, AssignStatsStep, ContainerFields,
                ContainerStep, ForEachFields, ForEachStep, IterationState, PoolSpec, StatSlot, StatSpec};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    // Step hoja mínimo para el smoke test: copia un campo del catálogo al
    // documento y se completa cuando su valor fue respondido.
    struct EchoStep {
        id: &'static str,
        key: &'static str,
    }

    impl StepDefinition for EchoStep {
        fn id(&self) -> &str {
            self.id
        }

        fn update_internal(&self,
                           _source: &Value,
                           _document: &mut Value,
                           state: &mut StepState)
                           -> Result<(), CoreWizardError> {
            state.is_completed = state.field("answer").map(|v| !v.is_null()).unwrap_or(false);
            Ok(())
        }

        fn write_back(&self,
                      _source: &Value,
                      state: &StepState,
                      document: &mut Value)
                      -> Result<(), CoreWizardError> {
            let answer = state.field("answer").cloned().unwrap_or(Value::Null);
            model::write_field(document, self.key, answer)
        }
    }

    #[test]
    fn smoke_full_pass_then_edit() {
        let runner = StepRunner::builder().step(EchoStep { id: "a", key: "a" })
                                          .step(EchoStep { id: "b", key: "b" })
                                          .build();

        let state = runner.initialize_state();
        let doc = json!({});
        let out = runner.recompute(&json!({}), &doc, &state, &ChangeDescriptor::full())
                        .expect("pass inicial");
        // Ningún step respondido: el primero incompleto es el 0.
        assert_eq!(out.state.current_step, 0);
        assert_eq!(out.document["a"], Value::Null);

        let out2 = runner.recompute(&json!({}),
                                    &out.document,
                                    &out.state,
                                    &ChangeDescriptor::edit(0, json!({"answer": "x"})))
                         .expect("pass de edición");
        assert!(out2.state.steps[0].is_completed);
        assert_eq!(out2.document["a"], json!("x"));
        assert_eq!(out2.state.current_step, 1);
    }
}
