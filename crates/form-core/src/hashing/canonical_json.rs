//! Canonical JSON minimal: representación textual estable para hashear
//! estados sin depender del orden de inserción de las claves.

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys.into_iter()
                                         .map(|k| {
                                             format!("{}:{}",
                                                     serde_json::to_string(k).unwrap_or_default(),
                                                     to_canonical_json(&map[k]))
                                         })
                                         .collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}
