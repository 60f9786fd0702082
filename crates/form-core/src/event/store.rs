use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{SessionEvent, SessionEventKind};

/// Log de eventos append-only.
pub trait EventLog {
    /// Agrega un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts asignados).
    fn append_kind(&mut self, session_id: Uuid, kind: SessionEventKind) -> SessionEvent;
    /// Lista los eventos de una sesión (orden ascendente por seq).
    fn list(&self, session_id: Uuid) -> Vec<SessionEvent>;
}

#[derive(Default)]
pub struct InMemoryEventLog {
    pub inner: HashMap<Uuid, Vec<SessionEvent>>,
}

impl EventLog for InMemoryEventLog {
    fn append_kind(&mut self, session_id: Uuid, kind: SessionEventKind) -> SessionEvent {
        let events = self.inner.entry(session_id).or_default();
        let event = SessionEvent { seq: events.len() as u64,
                                   session_id,
                                   kind,
                                   ts: Utc::now() };
        events.push(event.clone());
        event
    }

    fn list(&self, session_id: Uuid) -> Vec<SessionEvent> {
        self.inner.get(&session_id).cloned().unwrap_or_default()
    }
}
