//! Runs directives phase by phase in the fixed order.
use crate::context::TransformContext;
use crate::directive::Directive;
use crate::phase::Phase;
use crate::{phases, text};
use quarry_grammar::FormatError;
use quarry_types::Value;
use std::collections::BTreeMap;

/// Parsed directives keyed by phase. Iteration follows [`Phase`] order no
/// matter how the directives were specified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    phases: BTreeMap<Phase, Vec<Directive>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw directive texts grouped by phase.
    pub fn parse(raw: &BTreeMap<Phase, Vec<String>>) -> Result<Self, FormatError> {
        let mut pipeline = Self::new();
        for (phase, texts) in raw {
            for text in texts {
                pipeline.push(*phase, Directive::parse(*phase, text)?);
            }
        }
        Ok(pipeline)
    }

    pub fn push(&mut self, phase: Phase, directive: Directive) {
        self.phases.entry(phase).or_default().push(directive);
    }

    pub fn directives(&self, phase: Phase) -> &[Directive] {
        self.phases.get(&phase).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.values().all(Vec::is_empty)
    }

    /// Refines a value through every phase. Never fails: run-time problems
    /// are logged and resolved to the original value or `Null`.
    pub fn run(&self, value: Value, ctx: &mut TransformContext<'_, '_>) -> Value {
        let mut value = value;
        for (phase, directives) in &self.phases {
            if value.is_null() && phase.skips_null() {
                continue;
            }
            for directive in directives {
                value = apply(*phase, directive, value, ctx);
            }
            log::debug!("{} phase produced {}", phase, describe(&value));
        }
        value
    }
}

fn apply(phase: Phase, directive: &Directive, value: Value, ctx: &mut TransformContext<'_, '_>) -> Value {
    match (phase, directive) {
        (Phase::Transform, directive) => text::apply(directive, value, ctx),
        (_, Directive::Update(patch)) => phases::update(value, patch),
        (_, Directive::Filter(tokens)) => phases::filter(value, tokens),
        (_, Directive::Index(raw)) => phases::index(value, raw),
        (_, Directive::Save(name)) => phases::save(value, name, ctx.bindings),
        (_, Directive::Discard) => phases::discard(value),
        (phase, directive) => {
            log::warn!("'{}' cannot run in the {} phase", directive, phase);
            value
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::List(items) => format!("a list of {}", items.len()),
        Value::Map(map) => format!("a map of {}", map.len()),
        Value::Node(_) => "a node".to_string(),
        Value::Discarded(inner) => format!("discarded {}", describe(inner)),
        other => format!("'{}'", other),
    }
}
