//! The non-text phases: update, filter, index, save and discard.
use crate::directive::FilterToken;
use quarry_types::{Bindings, Value};
use std::collections::BTreeMap;

/// Deep-merges a JSON object into a map value. Anything else passes through.
pub fn update(value: Value, patch: &str) -> Value {
    let mut target = match value {
        Value::Map(map) => map,
        Value::Null => return Value::Null,
        other => {
            log::debug!("update skipped: value is not a map");
            return other;
        }
    };
    match serde_json::from_str::<serde_json::Value>(patch) {
        Ok(json @ serde_json::Value::Object(_)) => {
            if let Value::Map(patch) = Value::from(json) {
                merge(&mut target, patch);
            }
        }
        Ok(_) => log::warn!("update patch '{}' is not a JSON object", patch),
        Err(e) => log::warn!("update patch '{}' is not valid JSON: {}", patch, e),
    }
    Value::Map(target)
}

fn merge(target: &mut BTreeMap<String, Value>, patch: BTreeMap<String, Value>) {
    for (key, incoming) in patch {
        match incoming {
            Value::Map(nested) => match target.get_mut(&key) {
                Some(Value::Map(existing)) => merge(existing, nested),
                _ => {
                    target.insert(key, Value::Map(nested));
                }
            },
            other => {
                target.insert(key, other);
            }
        }
    }
}

/// Keeps list items containing every plain token and none of the negated ones.
/// A single value that fails the test becomes `Null`.
pub fn filter(value: Value, tokens: &[FilterToken]) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::List(items) => Value::List(
            items
                .into_iter()
                .filter(|item| accepts(tokens, &item.to_string()))
                .collect(),
        ),
        other if accepts(tokens, &other.to_string()) => other,
        _ => Value::Null,
    }
}

fn accepts(tokens: &[FilterToken], text: &str) -> bool {
    tokens
        .iter()
        .all(|token| text.contains(token.text.as_str()) != token.negated)
}

/// Picks one list element by signed position. On a non-list, only `0`
/// selects the value itself.
pub fn index(value: Value, raw: &str) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    let Ok(position) = raw.trim().parse::<i64>() else {
        log::warn!("index '{}' is not an integer", raw);
        return Value::Null;
    };
    match value {
        Value::List(mut items) => match resolve_position(items.len(), position) {
            Some(i) => items.swap_remove(i),
            None => Value::Null,
        },
        other if position == 0 => other,
        _ => Value::Null,
    }
}

fn resolve_position(len: usize, position: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if position < 0 { len + position } else { position };
    (0..len).contains(&resolved).then(|| resolved as usize)
}

/// Stores the value under `name`. `Null` stores nothing.
pub fn save(value: Value, name: &str, bindings: &mut Bindings) -> Value {
    if value.is_null() {
        log::debug!("save '{}' skipped: nothing to store", name);
    } else {
        bindings.set(name, value.clone());
    }
    value
}

/// Marks the value as excluded from the simplified view.
pub fn discard(value: Value) -> Value {
    match value {
        Value::Discarded(_) => value,
        other => Value::Discarded(Box::new(other)),
    }
}
