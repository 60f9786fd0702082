//! Pruebas de la asignación uno-a-uno de choices a stats.

use form_core::{AssignStatsFields, AssignStatsStep, ChangeDescriptor, RunnerState, StatSpec, StepRunner};
use serde_json::{json, Value};

fn scores_runner() -> StepRunner {
    StepRunner::builder()
        .step(AssignStatsStep::new("scores",
                                   |_, document| {
                                       document["pool"].as_array().cloned().unwrap_or_default()
                                   },
                                   |_, _| {
                                       vec![StatSpec::new("A"), StatSpec::new("B"), StatSpec::new("C")]
                                   }).writes_to("scores"))
        .build()
}

fn fields(state: &RunnerState) -> AssignStatsFields {
    serde_json::from_value(Value::Object(state.steps[0].fields.clone())).expect("fields de stats")
}

#[test]
fn duplicate_choices_bind_one_instance_each() {
    let runner = scores_runner();
    let document = json!({"pool": [15, 15, 14]});
    let state = runner.initialize_state();
    let mut out = runner.recompute(&json!({}), &document, &state, &ChangeDescriptor::full())
                        .expect("pass");

    let mut stats = fields(&out.state);
    assert_eq!(stats.available, vec![json!(15), json!(15), json!(14)]);
    assert!(stats.stats.iter().all(|s| s.assigned.is_none()));
    assert!(!out.state.steps[0].is_completed);

    // Asignar de a un stat por pass: cada pass retira la instancia vinculada
    // del multiset y recalcula las opciones del resto.
    for (name, expect_available) in [("A", 2), ("B", 1), ("C", 0)] {
        assert!(stats.try_select(name, Some(0)));
        out = runner.recompute(&json!({}), &out.document, &out.state,
                               &ChangeDescriptor::edit(0, stats.to_partial_update()))
                    .expect("pass");
        stats = fields(&out.state);
        assert_eq!(stats.available.len(), expect_available);
    }

    let stats = fields(&out.state);
    assert!(stats.available.is_empty());
    assert!(out.state.steps[0].is_completed);
    assert_eq!(out.document["scores"], json!({"A": 15, "B": 15, "C": 14}));

    // Forma de las opciones: lo propio primero, después lo que queda.
    let slot_a = &stats.stats[0];
    assert_eq!(slot_a.assigned, Some(json!(15)));
    assert_eq!(slot_a.selected_index, Some(0));
    assert_eq!(slot_a.options[0], json!(15));
}

#[test]
fn stale_assignment_is_dropped_silently() {
    let runner = scores_runner();
    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"pool": [15, 14, 13]}), &state,
                               &ChangeDescriptor::full())
                    .expect("pass");

    let mut stats = fields(&out.state);
    assert!(stats.try_select("A", Some(0)));
    let out = runner.recompute(&json!({}), &out.document, &out.state,
                               &ChangeDescriptor::edit(0, stats.to_partial_update()))
                    .expect("pass");
    assert_eq!(fields(&out.state).stats[0].assigned, Some(json!(15)));

    // El multiset cambia y el 15 desaparece: el vínculo se suelta sin error.
    let mut changed = out.document.clone();
    changed["pool"] = json!([14, 13, 12]);
    let out = runner.recompute(&json!({}), &changed, &out.state, &ChangeDescriptor::full())
                    .expect("pass");
    let stats = fields(&out.state);
    assert_eq!(stats.stats[0].assigned, None);
    assert_eq!(stats.stats[0].selected_index, None);
    assert_eq!(stats.available.len(), 3);
    assert!(!out.state.steps[0].is_completed);
}

#[test]
fn locked_slot_binds_its_fixed_value_and_rejects_edits() {
    let runner = StepRunner::builder()
        .step(AssignStatsStep::new("scores",
                                   |_, _| vec![json!(10), json!(12)],
                                   |_, _| {
                                       vec![StatSpec::locked("L", json!(10)), StatSpec::new("M")]
                                   }))
        .build();
    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({}), &state, &ChangeDescriptor::full())
                    .expect("pass");

    let mut stats = fields(&out.state);
    assert_eq!(stats.stats[0].assigned, Some(json!(10)), "bloqueado se vincula solo");
    assert!(stats.stats[0].locked);
    assert_eq!(stats.stats[1].options, vec![json!(12)]);

    assert!(!stats.try_select("L", Some(0)), "slot bloqueado: edición rechazada");
    assert!(!stats.try_select("L", None));
    assert!(stats.try_select("M", Some(0)));
}

#[test]
fn unbinding_returns_the_choice_to_the_remaining_set() {
    let runner = scores_runner();
    let state = runner.initialize_state();
    let out = runner.recompute(&json!({}), &json!({"pool": [15, 14, 13]}), &state,
                               &ChangeDescriptor::full())
                    .expect("pass");

    let mut stats = fields(&out.state);
    assert!(stats.try_select("B", Some(1)));
    let out = runner.recompute(&json!({}), &out.document, &out.state,
                               &ChangeDescriptor::edit(0, stats.to_partial_update()))
                    .expect("pass");
    let mut stats = fields(&out.state);
    assert_eq!(stats.stats[1].assigned, Some(json!(14)));
    assert_eq!(stats.available, vec![json!(15), json!(13)]);

    assert!(stats.try_select("B", None));
    let out = runner.recompute(&json!({}), &out.document, &out.state,
                               &ChangeDescriptor::edit(0, stats.to_partial_update()))
                    .expect("pass");
    let stats = fields(&out.state);
    assert_eq!(stats.stats[1].assigned, None);
    assert_eq!(stats.available, vec![json!(15), json!(14), json!(13)]);
}

#[test]
fn custom_equality_matches_choices_by_key() {
    let runner = StepRunner::builder()
        .step(AssignStatsStep::new("scores",
                                   |_, document| {
                                       document["pool"].as_array().cloned().unwrap_or_default()
                                   },
                                   |_, _| vec![StatSpec::new("A")])
                  .choice_eq(|a, b| a["id"] == b["id"]))
        .build();
    let state = runner.initialize_state();
    let document = json!({"pool": [{"id": 1, "tag": "x"}]});
    let out = runner.recompute(&json!({}), &document, &state, &ChangeDescriptor::full())
                    .expect("pass");

    let mut stats = fields(&out.state);
    assert!(stats.try_select("A", Some(0)));
    let out = runner.recompute(&json!({}), &out.document, &out.state,
                               &ChangeDescriptor::edit(0, stats.to_partial_update()))
                    .expect("pass");

    // El payload del choice cambia pero su id se conserva: la igualdad
    // configurada mantiene el vínculo y toma la instancia fresca.
    let mut changed = out.document.clone();
    changed["pool"] = json!([{"id": 1, "tag": "y"}]);
    let out = runner.recompute(&json!({}), &changed, &out.state, &ChangeDescriptor::full())
                    .expect("pass");
    let stats = fields(&out.state);
    assert_eq!(stats.stats[0].assigned, Some(json!({"id": 1, "tag": "y"})));
    assert!(out.state.steps[0].is_completed);
}
