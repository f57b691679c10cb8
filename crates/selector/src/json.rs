//! JSON atom evaluation: keys, indices, wildcards and deep search.
use crate::ast::{JsonAtom, JsonKey, JsonStep};
use crate::engine::SelectorContext;
use crate::html::roots;
use quarry_grammar::wildcard_match;
use quarry_types::Value;
use serde_json::Value as JsonValue;

pub(crate) fn evaluate(atom: &JsonAtom, input: &Value, ctx: &SelectorContext<'_>) -> Vec<Value> {
    let root = match &atom.element_id {
        Some(id) => embedded_json(id, input, ctx),
        None => json_input(input),
    };
    let Some(root) = root else {
        return vec![];
    };

    let mut current = vec![root];
    for step in &atom.steps {
        current = current.iter().flat_map(|value| apply_step(step, value)).collect();
        if current.is_empty() {
            break;
        }
    }

    current
        .into_iter()
        .filter(|value| !value.is_null())
        .filter_map(|value| match &atom.rewrite {
            None => Some(Value::from(value)),
            Some(rewrite) => {
                let text = match value {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                rewrite.apply(&text, ctx.page_url).map(Value::String)
            }
        })
        .collect()
}

/// The JSON text held by the element with the given id.
fn embedded_json(id: &str, input: &Value, ctx: &SelectorContext<'_>) -> Option<JsonValue> {
    let css = format!("[id=\"{}\"]", id.replace('"', "\\\""));
    roots(input, ctx).iter().find_map(|root| {
        root.query_all(&css)
            .first()
            .and_then(|element| element.json_at())
    })
}

/// Interprets a pipeline value as a JSON document.
fn json_input(value: &Value) -> Option<JsonValue> {
    match value {
        Value::Null => None,
        Value::Node(node) => node.json_at(),
        Value::String(text) => match serde_json::from_str(text) {
            Ok(json) => Some(json),
            Err(e) => {
                log::debug!("String input is not JSON: {}", e);
                None
            }
        },
        Value::List(items) => Some(JsonValue::Array(items.iter().map(element_json).collect())),
        Value::Discarded(inner) => json_input(inner),
        other => Some(other.to_json()),
    }
}

fn element_json(value: &Value) -> JsonValue {
    match value {
        Value::Node(node) => node
            .json_at()
            .unwrap_or_else(|| JsonValue::String(node.text())),
        Value::String(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.clone()))
        }
        other => other.to_json(),
    }
}

fn is_blank(values: &[JsonValue]) -> bool {
    values.iter().all(|value| match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn apply_step(step: &JsonStep, value: &JsonValue) -> Vec<JsonValue> {
    step.quantifier
        .combine(&step.keys, |key| apply_key(key, value), is_blank)
}

fn apply_key(key: &JsonKey, value: &JsonValue) -> Vec<JsonValue> {
    match (key, value) {
        (JsonKey::Deep(name), _) => {
            let mut found = Vec::new();
            deep_search(name, value, &mut found);
            found
        }
        (JsonKey::Index(i), JsonValue::Array(items)) => position(items.len(), *i)
            .map(|p| items[p].clone())
            .into_iter()
            .collect(),
        (JsonKey::Index(i), JsonValue::Object(map)) => {
            map.get(&i.to_string()).cloned().into_iter().collect()
        }
        (JsonKey::Key(name), JsonValue::Object(map)) => map.get(name).cloned().into_iter().collect(),
        (JsonKey::Wildcard(pattern), JsonValue::Object(map)) => map
            .iter()
            .filter(|(name, _)| wildcard_match(pattern, name))
            .map(|(_, v)| v.clone())
            .collect(),
        (JsonKey::Wildcard(pattern), JsonValue::Array(items)) if pattern == "*" => items.clone(),
        // Named keys on a list apply to each element.
        (key, JsonValue::Array(items)) => items.iter().flat_map(|item| apply_key(key, item)).collect(),
        _ => vec![],
    }
}

/// Resolves a signed index against a length; negative counts from the end.
pub(crate) fn position(len: usize, index: i64) -> Option<usize> {
    if index >= 0 {
        let index = usize::try_from(index).ok()?;
        (index < len).then_some(index)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

/// Collects every value under a matching key at any depth, flattening
/// list-valued matches.
fn deep_search(name: &str, value: &JsonValue, found: &mut Vec<JsonValue>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                if wildcard_match(name, key) {
                    match child {
                        JsonValue::Array(items) => found.extend(items.iter().cloned()),
                        other => found.push(other.clone()),
                    }
                }
                deep_search(name, child, found);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                deep_search(name, item, found);
            }
        }
        _ => {}
    }
}
