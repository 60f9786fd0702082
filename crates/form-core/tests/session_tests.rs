//! Prueba de humo de la sesión: un mini asistente de punta a punta, con el
//! log de eventos como testigo de cada pass.

use form_adapters::{NoteStep, SelectStep};
use form_core::{ChangeDescriptor, CoreWizardError, SessionEventKind, StepRunner, WizardSession};
use serde_json::json;

fn mini_wizard() -> StepRunner {
    StepRunner::builder()
        .step(SelectStep::new("color", "color", |source, _| {
                  source["colors"].as_array().cloned().unwrap_or_default()
              }))
        .step(NoteStep::new("summary", |_, document| {
                  format!("elegiste {}", document["color"].as_str().unwrap_or("nada"))
              }).visible_when(|_, document| !document["color"].is_null()))
        .build()
}

fn source() -> serde_json::Value {
    json!({"colors": ["rojo", "azul"]})
}

#[test]
fn a_session_walks_the_wizard_to_completion() {
    let mut session = WizardSession::start(mini_wizard(), source(), json!({})).expect("start");
    assert_eq!(session.current_step(), 0);
    assert!(!session.is_completed());
    assert!(matches!(session.events()[0].kind, SessionEventKind::SessionInitialized { step_count: 2, .. }));

    session.edit(ChangeDescriptor::edit(0, json!({"selected": "azul"})))
           .expect("pass");
    assert!(session.is_completed());
    assert_eq!(session.document()["color"], json!("azul"));

    let note = session.step_state(1).expect("summary");
    assert!(note.is_visible);
    assert_eq!(note.field("text"), Some(&json!("elegiste azul")));

    assert!(matches!(session.events().last().map(|e| &e.kind),
                     Some(SessionEventKind::PassCommitted { changed_index: Some(0), .. })));
}

#[test]
fn repeated_full_passes_commit_the_same_fingerprint() {
    let mut session = WizardSession::start(mini_wizard(), source(), json!({})).expect("start");
    session.edit(ChangeDescriptor::edit(0, json!({"selected": "rojo"})))
           .expect("pass");

    session.edit(ChangeDescriptor::full()).expect("pass estable");
    session.edit(ChangeDescriptor::full()).expect("pass estable");

    let events = session.events();
    let fingerprints: Vec<&String> = events.iter()
                                           .rev()
                                           .take(2)
                                           .filter_map(|e| match &e.kind {
                                               SessionEventKind::PassCommitted { fingerprint, .. } => {
                                                   Some(fingerprint)
                                               }
                                               _ => None,
                                           })
                                           .collect();
    assert_eq!(fingerprints.len(), 2);
    // Dos passes sin edición sobre un estado estable: mismo fingerprint.
    assert_eq!(fingerprints[0], fingerprints[1]);
}

#[test]
fn a_rejected_pass_leaves_the_snapshot_intact() {
    let mut session = WizardSession::start(mini_wizard(), source(), json!({})).expect("start");
    session.edit(ChangeDescriptor::edit(0, json!({"selected": "rojo"})))
           .expect("pass");
    let before_state = session.state().clone();
    let before_document = session.document().clone();
    let before_events = session.events().len();

    let err = session.edit(ChangeDescriptor::touch(99)).unwrap_err();
    assert_eq!(err, CoreWizardError::InvalidStepIndex);

    // Nada comprometido; el rechazo quedó en el log.
    assert_eq!(session.state(), &before_state);
    assert_eq!(session.document(), &before_document);
    let events = session.events();
    assert_eq!(events.len(), before_events + 1);
    assert!(matches!(events.last().map(|e| &e.kind),
                     Some(SessionEventKind::PassRejected { changed_index: Some(99),
                                                           error: CoreWizardError::InvalidStepIndex })));
}
