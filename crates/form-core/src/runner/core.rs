//! Core StepRunner implementation.
//!
//! El runner mantiene una colección ordenada de definiciones y ejecuta un
//! pass de recompute sobre una ventana deslizante de índices: sólo se
//! re-evalúan los steps cuyo estado derivado pudo haber cambiado, en orden,
//! escribiendo cada contribución al documento antes de evaluar el siguiente.

use std::fmt;

use serde_json::Value;
use tracing::{debug, debug_span, trace};

use crate::errors::CoreWizardError;
use crate::model::{ensure_object, ChangeDescriptor};
use crate::state::{merge_state, StepState};
use crate::step::StepDefinition;

use super::{RecomputeOutcome, RunnerState};

/// Colección ordenada de steps más el algoritmo de recompute por ventana.
pub struct StepRunner {
    steps: Vec<Box<dyn StepDefinition>>,
}

impl StepRunner {
    pub fn new(steps: Vec<Box<dyn StepDefinition>>) -> Self {
        Self { steps }
    }

    /// Builder encadenable (azúcar sobre `new`).
    pub fn builder() -> super::RunnerBuilder {
        super::RunnerBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Acceso a las definiciones (lo usan los steps estructurales para
    /// limpiar/proyectar estados hijos sin pasar por un pass completo).
    pub fn definitions(&self) -> &[Box<dyn StepDefinition>] {
        &self.steps
    }

    /// Crea el snapshot inicial de la sesión: un estado por definición.
    pub fn initialize_state(&self) -> RunnerState {
        RunnerState { current_step: 0,
                      steps: self.steps.iter().map(|s| s.init_state()).collect() }
    }

    /// Un pass de recompute.
    ///
    /// Algoritmo (ventana deslizante):
    /// 1. Clona el documento: un pass fallido jamás corrompe la copia del
    ///    caller.
    /// 2. Ventana inicial `[changed, changed + 1]`; un pass completo
    ///    (`changed_index == None`) arranca en `[0, 0]`.
    /// 3. Recorre todos los índices en orden: mergea el partial update en el
    ///    índice editado, ejecuta `update` sólo dentro de la ventana,
    ///    invoca `write_back` incondicionalmente (también fuera de la
    ///    ventana) y registra el primer step incompleto como `current_step`.
    /// 4. Regla de crecimiento: un step completado con `i >= window_end`
    ///    extiende `window_end = i + 1`, encadenando la re-evaluación hacia
    ///    adelante mientras los steps sigan completándose.
    /// 5. Sin steps incompletos, `current_step = window_end + 1` (valor del
    ///    contrato original; puede apuntar más allá del último índice).
    pub fn recompute(&self,
                     source: &Value,
                     document: &Value,
                     prior: &RunnerState,
                     change: &ChangeDescriptor)
                     -> Result<RecomputeOutcome, CoreWizardError> {
        let span = debug_span!("recompute", steps = self.steps.len(), changed = ?change.changed_index);
        let _guard = span.enter();

        ensure_object(document)?;
        if prior.steps.len() != self.steps.len() {
            return Err(CoreWizardError::StateMisaligned);
        }
        if let Some(changed) = change.changed_index {
            if changed >= self.steps.len() {
                return Err(CoreWizardError::InvalidStepIndex);
            }
        }

        let mut new_document = document.clone();
        let (window_start, mut window_end) = match change.changed_index {
            Some(changed) => (changed, changed + 1),
            None => (0, 0),
        };

        let mut new_steps: Vec<StepState> = Vec::with_capacity(self.steps.len());
        let mut first_incomplete: Option<usize> = None;

        for (i, step) in self.steps.iter().enumerate() {
            let mut working = prior.steps[i].clone();

            // El partial update sólo aplica al step editado.
            if change.changed_index == Some(i) {
                if let Some(partial) = &change.partial_update {
                    working = merge_state(&working, partial);
                }
            }

            if i >= window_start && i <= window_end {
                step.as_ref().update(source, &mut new_document, &mut working)?;
            }

            // Todos los steps proyectan su contribución actual, también los
            // que quedaron fuera de la ventana: el siguiente step siempre ve
            // el documento completo.
            step.write_back(source, &working, &mut new_document)?;

            if first_incomplete.is_none() && !working.is_completed {
                first_incomplete = Some(i);
            }
            if working.is_completed && i >= window_end {
                window_end = i + 1;
                trace!(step = step.id(), window_end, "window extended");
            }

            new_steps.push(working);
        }

        let current_step = first_incomplete.unwrap_or(window_end + 1);
        debug!(current_step, window_start, window_end, "pass finished");

        Ok(RecomputeOutcome { state: RunnerState { current_step, steps: new_steps },
                              document: new_document })
    }
}

impl fmt::Debug for StepRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRunner")
         .field("steps", &self.steps.iter().map(|s| s.id()).collect::<Vec<_>>())
         .finish()
    }
}
