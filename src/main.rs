//! Demo de consola: una ficha de personaje armada con el motor de
//! recomputación incremental.
//!
//! Este binario es el "caller" externo del contrato: arma el catálogo, las
//! definiciones de steps y traduce ediciones de usuario (aquí, un guion
//! fijo) a descriptores de cambio. El core nunca ve nada de esto.

use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use form_adapters::{NoteStep, SelectStep};
use form_core::{AssignPoolFields, AssignPoolStep, AssignStatsFields, AssignStatsStep, ChangeDescriptor,
                ContainerFields, ContainerStep, ForEachFields, PoolSpec, StatSpec, StepRunner, StepState,
                WizardSession};
use form_core::steps::ForEachStep;
use form_adapters::select::SelectFields;

fn catalog() -> Value {
    json!({
        "classes": [
            {"name": "Guerrero", "gear_slots": 2},
            {"name": "Mago", "gear_slots": 1}
        ],
        "stats": ["Fuerza", "Destreza", "Inteligencia", "Sabiduría"],
        "scores": [15, 14, 13, 12],
        "skills": ["Atletismo", "Sigilo", "Arcanos", "Percepción"],
        "items": ["Espada", "Escudo", "Bastón", "Grimorio"]
    })
}

fn gear_slots(source: &Value, document: &Value) -> usize {
    let Some(class) = document.get("class").and_then(|c| c.as_str()) else {
        return 0;
    };
    source["classes"].as_array()
                     .and_then(|cs| cs.iter().find(|c| c["name"] == class))
                     .and_then(|c| c["gear_slots"].as_u64())
                     .unwrap_or(0) as usize
}

fn build_runner() -> StepRunner {
    let abilities = StepRunner::builder()
        .step(AssignStatsStep::new("scores",
                                   |source, _| source["scores"].as_array().cloned().unwrap_or_default(),
                                   |source, _| {
                                       source["stats"].as_array()
                                                      .cloned()
                                                      .unwrap_or_default()
                                                      .iter()
                                                      .filter_map(|s| s.as_str())
                                                      .map(StatSpec::new)
                                                      .collect()
                                   }).writes_to("scores"))
        .step(AssignPoolStep::new("skills",
                                  |_, _| 4,
                                  |source, _| {
                                      source["skills"].as_array()
                                                      .cloned()
                                                      .unwrap_or_default()
                                                      .iter()
                                                      .filter_map(|s| s.as_str())
                                                      .map(|s| PoolSpec::with_max(s, 2))
                                                      .collect()
                                  }).writes_to("skills"))
        .build();

    let gear_slot = StepRunner::builder()
        .step(SelectStep::new("item", "item", |_, scoped| {
                  // Lo aún no equipado, más lo ya elegido en este slot (para
                  // que la propia selección no se descarte como obsoleta).
                  let mut options = scoped["parent"]["items_left"].as_array().cloned().unwrap_or_default();
                  let current = &scoped["item"];
                  if !current.is_null() && !options.contains(current) {
                      options.insert(0, current.clone());
                  }
                  options
              }))
        .build();

    StepRunner::builder()
        .step(SelectStep::new("class", "class", |source, _| {
                  source["classes"].as_array()
                                   .cloned()
                                   .unwrap_or_default()
                                   .iter()
                                   .map(|c| c["name"].clone())
                                   .collect()
              }))
        .step(ContainerStep::new("abilities", abilities)
                  .visible_when(|_, document| !document["class"].is_null()))
        .step(ItemsLeftStep)
        .step(ForEachStep::new("gear",
                               gear_slot,
                               gear_slots,
                               |document| document["gear"].as_array().cloned().unwrap_or_default(),
                               |document, items| {
                                   if let Some(map) = document.as_object_mut() {
                                       map.insert("gear".into(), Value::Array(items));
                                   }
                               },
                               |_| Value::Null)
                  .with_label(|item, index| match item.as_str() {
                      Some(name) => format!("Slot {}: {}", index + 1, name),
                      None => format!("Slot {}", index + 1),
                  }))
        .step(NoteStep::new("summary", |_, document| {
                  format!("{} listo, equipo: {}",
                          document["class"].as_str().unwrap_or("?"),
                          document["gear"])
              }).visible_when(|_, document| !document["class"].is_null()))
        .build()
}

/// Step auxiliar del demo: deriva la lista de ítems aún no equipados para
/// que los slots de equipo no ofrezcan duplicados.
struct ItemsLeftStep;

impl form_core::StepDefinition for ItemsLeftStep {
    fn id(&self) -> &str {
        "items_left"
    }

    fn required(&self) -> bool {
        false
    }

    fn update_internal(&self,
                       _source: &Value,
                       _document: &mut Value,
                       state: &mut StepState)
                       -> Result<(), form_core::CoreWizardError> {
        state.is_completed = true;
        Ok(())
    }

    fn write_back(&self,
                  source: &Value,
                  _state: &StepState,
                  document: &mut Value)
                  -> Result<(), form_core::CoreWizardError> {
        let taken: Vec<Value> = document["gear"].as_array().cloned().unwrap_or_default();
        let left: Vec<Value> = source["items"].as_array()
                                              .cloned()
                                              .unwrap_or_default()
                                              .into_iter()
                                              .filter(|item| !taken.contains(item))
                                              .collect();
        form_core::model::write_field(document, "items_left", Value::Array(left))
    }
}

fn set_fields(state: &mut StepState, fields: Value) {
    if let Value::Object(map) = fields {
        let is_visible = state.is_visible;
        let is_completed = state.is_completed;
        state.fields = map;
        state.is_visible = is_visible;
        state.is_completed = is_completed;
    }
}

fn decode<T: serde::de::DeserializeOwned>(state: &StepState) -> Option<T> {
    serde_json::from_value(Value::Object(state.fields.clone())).ok()
}

fn step_fields<T: serde::de::DeserializeOwned>(session: &WizardSession,
                                               index: usize)
                                               -> Result<T, Box<dyn std::error::Error>> {
    session.step_state(index)
           .and_then(decode)
           .ok_or_else(|| format!("estado ilegible en el step {index}").into())
}

fn print_progress(session: &WizardSession) {
    for (index, step) in session.state().steps.iter().enumerate() {
        println!("  [{}] visible={} completado={}", index, step.is_visible, step.is_completed);
    }
    println!("  paso actual: {}", session.current_step());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .init();

    let runner = build_runner();
    let mut session = WizardSession::start(runner, catalog(), json!({}))?;
    println!("== sesión {} ==", session.id());
    print_progress(&session);

    // 1. Elegir clase: dispara la cascada (container visible, slots de gear).
    session.edit(ChangeDescriptor::edit(0, json!({"selected": "Guerrero"})))?;
    println!("-- clase elegida --");
    print_progress(&session);

    // 2. Asignar puntuaciones dentro del container, una edición por stat:
    //    cada pass refresca las opciones restantes del resto de stats.
    let stat_names: Vec<String> = {
        let abilities: ContainerFields = step_fields(&session, 1)?;
        let scores: AssignStatsFields = decode(&abilities.nested.steps[0]).ok_or("estado de scores")?;
        scores.stats.iter().map(|s| s.name.clone()).collect()
    };
    for name in &stat_names {
        let mut abilities: ContainerFields = step_fields(&session, 1)?;
        let mut scores: AssignStatsFields = decode(&abilities.nested.steps[0]).ok_or("estado de scores")?;
        scores.try_select(name, Some(0));
        let scores_value = serde_json::to_value(&scores)?;
        set_fields(&mut abilities.nested.steps[0], scores_value);
        let mut partial = Map::new();
        partial.insert("nested".into(), serde_json::to_value(&abilities.nested)?);
        session.edit(ChangeDescriptor::edit(1, Value::Object(partial)))?;
    }

    // 3. Repartir los puntos de habilidad (una sola edición: try_set mantiene
    //    la conservación local y el pass siguiente la verifica).
    let mut abilities: ContainerFields = step_fields(&session, 1)?;
    let mut skills: AssignPoolFields = decode(&abilities.nested.steps[1]).ok_or("estado de skills")?;
    skills.try_set("Atletismo", Some(2));
    skills.try_set("Sigilo", Some(2));
    let skills_value = serde_json::to_value(&skills)?;
    set_fields(&mut abilities.nested.steps[1], skills_value);
    let mut partial = Map::new();
    partial.insert("nested".into(), serde_json::to_value(&abilities.nested)?);
    session.edit(ChangeDescriptor::edit(1, Value::Object(partial)))?;
    println!("-- habilidades asignadas --");
    print_progress(&session);

    // 4. Equipar los slots de gear uno a uno.
    let gear_index = 3;
    for slot in 0..session.document()["gear"].as_array().map(|g| g.len()).unwrap_or(0) {
        let mut gear: ForEachFields = step_fields(&session, gear_index)?;
        let select: SelectFields = decode(&gear.iterations[slot].nested.steps[0]).ok_or("estado del slot")?;
        let Some(choice) = select.options.first().cloned() else {
            continue;
        };
        let selected = serde_json::to_value(&SelectFields { options: select.options.clone(),
                                                            selected: Some(choice) })?;
        set_fields(&mut gear.iterations[slot].nested.steps[0], selected);
        let mut partial = Map::new();
        partial.insert("iterations".into(), serde_json::to_value(&gear.iterations)?);
        session.edit(ChangeDescriptor::edit(gear_index, Value::Object(partial)))?;
    }
    println!("-- equipo completo --");
    print_progress(&session);

    println!("documento final:\n{}", serde_json::to_string_pretty(session.document())?);
    println!("eventos registrados: {}", session.events().len());
    Ok(())
}
