//! Sesión de asistente: el snapshot comprometido entre passes.
//!
//! La capa de UI/eventos habla con esto: la sesión posee el documento y el
//! `RunnerState` vigentes, corre un pass por edición y compromete el
//! resultado entero sólo si el pass terminó bien. Un pass con error de
//! configuración no compromete nada (el snapshot previo sigue intacto) y
//! queda registrado en el log.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreWizardError;
use crate::event::{EventLog, InMemoryEventLog, SessionEvent, SessionEventKind};
use crate::hashing::state_fingerprint;
use crate::model::ChangeDescriptor;
use crate::runner::{RunnerState, StepRunner};
use crate::state::StepState;

pub struct WizardSession<L: EventLog = InMemoryEventLog> {
    id: Uuid,
    runner: StepRunner,
    source: Value,
    document: Value,
    state: RunnerState,
    log: L,
}

impl WizardSession<InMemoryEventLog> {
    /// Arranca una sesión con log in-memory: crea el estado inicial y corre
    /// un pass completo para derivar todo desde el documento de partida.
    pub fn start(runner: StepRunner, source: Value, document: Value) -> Result<Self, CoreWizardError> {
        Self::start_with_log(runner, source, document, InMemoryEventLog::default())
    }
}

impl<L: EventLog> WizardSession<L> {
    pub fn start_with_log(runner: StepRunner,
                          source: Value,
                          document: Value,
                          mut log: L)
                          -> Result<Self, CoreWizardError> {
        let id = Uuid::new_v4();
        let initial = runner.initialize_state();
        let outcome = runner.recompute(&source, &document, &initial, &ChangeDescriptor::full())?;

        let fingerprint = state_fingerprint(&outcome.state);
        log.append_kind(id,
                        SessionEventKind::SessionInitialized { step_count: runner.len(),
                                                               fingerprint });
        debug!(session = %id, steps = runner.len(), "session started");

        Ok(Self { id,
                  runner,
                  source,
                  document: outcome.document,
                  state: outcome.state,
                  log })
    }

    /// Corre un pass para la edición dada y compromete el resultado entero.
    /// Con error, el snapshot vigente queda como estaba.
    pub fn edit(&mut self, change: ChangeDescriptor) -> Result<&RunnerState, CoreWizardError> {
        match self.runner
                  .recompute(&self.source, &self.document, &self.state, &change)
        {
            Ok(outcome) => {
                self.state = outcome.state;
                self.document = outcome.document;
                let fingerprint = state_fingerprint(&self.state);
                self.log.append_kind(self.id,
                                     SessionEventKind::PassCommitted { changed_index: change.changed_index,
                                                                       current_step: self.state.current_step,
                                                                       fingerprint });
                Ok(&self.state)
            }
            Err(error) => {
                self.log.append_kind(self.id,
                                     SessionEventKind::PassRejected { changed_index: change.changed_index,
                                                                      error: error.clone() });
                Err(error)
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    /// Estado de un step concreto (la UI lo decodifica a su forma tipada).
    pub fn step_state(&self, index: usize) -> Option<&StepState> {
        self.state.steps.get(index)
    }

    /// Flujo terminado: todos los steps completados.
    pub fn is_completed(&self) -> bool {
        self.state.all_completed()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.log.list(self.id)
    }
}
