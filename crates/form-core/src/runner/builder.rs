//! Builder para `StepRunner`.
//!
//! Registro explícito de definiciones (inyección de dependencias): el caller
//! arma y posee su catálogo de steps, no hay registro global de proceso.

use crate::step::StepDefinition;

use super::StepRunner;

#[derive(Default)]
pub struct RunnerBuilder {
    steps: Vec<Box<dyn StepDefinition>>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Añade un step al final de la secuencia.
    pub fn step<S>(mut self, step: S) -> Self
        where S: StepDefinition + 'static
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Variante para steps ya boxeados (útil al componer dinámicamente).
    pub fn boxed_step(mut self, step: Box<dyn StepDefinition>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> StepRunner {
        StepRunner::new(self.steps)
    }
}
