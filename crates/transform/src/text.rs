//! Directives of the `transform` phase.
use crate::context::TransformContext;
use crate::directive::Directive;
use crate::literal::extract_assignment;
use quarry_grammar::{has_wildcard, wildcard_match};
use quarry_types::Value;
use std::collections::BTreeMap;

/// Applies one transform directive. Text directives broadcast over lists;
/// list-aware directives see the list as a single document.
pub fn apply(directive: &Directive, value: Value, ctx: &mut TransformContext<'_, '_>) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    if directive.is_list_aware() {
        return apply_document(directive, &document_text(&value), ctx);
    }
    match value {
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| apply(directive, item, ctx))
                .collect(),
        ),
        other => apply_scalar(directive, other, ctx),
    }
}

fn document_text(value: &Value) -> String {
    match value {
        Value::List(items) => items
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

fn apply_scalar(directive: &Directive, value: Value, ctx: &TransformContext<'_, '_>) -> Value {
    match directive {
        Directive::Upper => Value::String(value.to_string().to_uppercase()),
        Directive::Lower => Value::String(value.to_string().to_lowercase()),
        Directive::Regex(spec) => match spec.apply(&value.to_string(), ctx.page_url) {
            Some(text) => Value::String(text),
            None => Value::Null,
        },
        other => {
            log::warn!("'{}' is not a transform directive; value left unchanged", other);
            value
        }
    }
}

fn apply_document(directive: &Directive, text: &str, ctx: &mut TransformContext<'_, '_>) -> Value {
    match directive {
        Directive::Json(None) => match serde_json::from_str::<serde_json::Value>(text.trim()) {
            Ok(json) => Value::from(json),
            Err(e) => {
                log::warn!("Cannot parse value as JSON: {}", e);
                Value::Null
            }
        },
        Directive::Json(Some(pattern)) => match extract_assignment(text, pattern) {
            Some(json) => Value::from(json),
            None => {
                log::warn!("No JSON assignment matching '{}' found", pattern);
                Value::Null
            }
        },
        Directive::JsEval(names) => eval_script(text, names.as_deref(), ctx),
        other => {
            log::warn!("'{}' does not operate on whole documents", other);
            Value::Null
        }
    }
}

fn eval_script(script: &str, names: Option<&[String]>, ctx: &mut TransformContext<'_, '_>) -> Value {
    let Some(engine) = ctx.script.as_deref_mut() else {
        log::warn!("jseval requested but no script engine is configured");
        return Value::Null;
    };
    let bindings = match engine.extract_variables(script, names) {
        Ok(bindings) => bindings,
        Err(e) => {
            log::warn!("jseval failed: {}", e);
            return Value::Null;
        }
    };
    let Some(names) = names else {
        return non_empty_map(bindings);
    };

    // Exactly one concrete name yields that binding alone.
    if let [name] = names {
        if !has_wildcard(name) {
            return bindings.get(name.as_str()).cloned().unwrap_or_default();
        }
    }
    let selected: BTreeMap<String, Value> = bindings
        .into_iter()
        .filter(|(key, _)| names.iter().any(|name| wildcard_match(name, key)))
        .collect();
    non_empty_map(selected)
}

fn non_empty_map(map: BTreeMap<String, Value>) -> Value {
    if map.is_empty() {
        Value::Null
    } else {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use quarry_traits::StaticScriptEngine;
    use quarry_types::Bindings;
    use serde_json::json;

    fn directive(raw: &str) -> Directive {
        Directive::parse(Phase::Transform, raw).unwrap()
    }

    fn run(raw: &str, value: Value) -> Value {
        let mut bindings = Bindings::new();
        let mut ctx = TransformContext::new(&mut bindings, "https://example.com/page");
        apply(&directive(raw), value, &mut ctx)
    }

    #[test]
    fn test_case_directives_broadcast() {
        assert_eq!(run("upper", Value::from("hello")), Value::from("HELLO"));
        assert_eq!(
            run("lower", Value::from(vec![Value::from("A"), Value::from("B")])),
            Value::from(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(run("upper", Value::Null), Value::Null);
    }

    #[test]
    fn test_scalar_equals_first_of_singleton_list() {
        let scalar = run("regexp:/o/0/", Value::from("foo"));
        let listed = run("regexp:/o/0/", Value::from(vec![Value::from("foo")]));
        assert_eq!(Some(&scalar), listed.as_list().and_then(|l| l.first()));
    }

    #[test]
    fn test_regexp_extraction_and_miss() {
        assert_eq!(run("regexp:/\\d+/", Value::from("id 77")), Value::from("77"));
        assert_eq!(run("regexp:/\\d+/", Value::from("none")), Value::Null);
    }

    #[test]
    fn test_json_parses_whole_list_as_one_document() {
        let parts = Value::from(vec![Value::from("{\"a\":"), Value::from("[1, 2]}")]);
        assert_eq!(run("json", parts), Value::from(json!({"a": [1, 2]})));
        assert_eq!(run("json", Value::from("{broken")), Value::Null);
    }

    #[test]
    fn test_json_assignment() {
        let script = Value::from("window.__DATA__ = {\"n\": 1};");
        assert_eq!(run("json:__DATA__", script), Value::from(json!({"n": 1})));
    }

    #[test]
    fn test_jseval_without_engine_is_null() {
        assert_eq!(run("jseval", Value::from("var a = 1;")), Value::Null);
    }

    #[test]
    fn test_jseval_shapes() {
        let mut engine = StaticScriptEngine::new()
            .with_binding("price", 10i64)
            .with_binding("priceMax", 20i64)
            .with_binding("title", "T");
        let mut bindings = Bindings::new();
        let mut ctx = TransformContext::new(&mut bindings, "").with_script(&mut engine);

        let single = apply(&directive("jseval:title"), Value::from("s"), &mut ctx);
        assert_eq!(single, Value::from("T"));

        let globbed = apply(&directive("jseval:price*"), Value::from("s"), &mut ctx);
        let expected: BTreeMap<String, Value> = [
            ("price".to_string(), Value::from(10i64)),
            ("priceMax".to_string(), Value::from(20i64)),
        ]
        .into_iter()
        .collect();
        assert_eq!(globbed, Value::Map(expected));

        let all = apply(&directive("jseval"), Value::from("s"), &mut ctx);
        assert_eq!(all.as_map().map(BTreeMap::len), Some(3));
    }
}
