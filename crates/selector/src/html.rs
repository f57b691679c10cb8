//! HTML atom evaluation: moves, CSS queries and accessors.
use crate::ast::{Accessor, AccessorSpec, HtmlAtom, HtmlStep};
use crate::engine::SelectorContext;
use quarry_grammar::wildcard_match;
use quarry_types::{Move, NodeRef, Value};
use std::rc::Rc;

pub(crate) fn evaluate(atom: &HtmlAtom, input: &Value, ctx: &SelectorContext<'_>) -> Vec<Value> {
    let mut matches = Vec::new();
    for root in roots(input, ctx) {
        let nodes = walk(&atom.steps, root);
        match &atom.accessor {
            None => matches.extend(nodes.into_iter().map(Value::Node)),
            Some(spec) => {
                for node in &nodes {
                    matches.extend(access(spec, node, ctx));
                }
            }
        }
    }
    matches
}

/// The nodes an input value can be navigated from.
pub(crate) fn roots(input: &Value, ctx: &SelectorContext<'_>) -> Vec<NodeRef> {
    match input {
        Value::Node(node) => vec![Rc::clone(node)],
        Value::String(markup) => match ctx.markup {
            Some(parser) => parser.parse_fragment(markup, ctx.page_url).into_iter().collect(),
            None => {
                log::debug!("No markup parser configured; string input is not navigable");
                vec![]
            }
        },
        Value::List(items) => items.iter().flat_map(|item| roots(item, ctx)).collect(),
        Value::Discarded(inner) => roots(inner, ctx),
        _ => vec![],
    }
}

fn walk(steps: &[HtmlStep], root: NodeRef) -> Vec<NodeRef> {
    let mut current = vec![root];
    for step in steps {
        current = current.iter().flat_map(|node| apply_step(step, node)).collect();
        if current.is_empty() {
            break;
        }
    }
    current
}

fn apply_step(step: &HtmlStep, node: &NodeRef) -> Vec<NodeRef> {
    match step {
        HtmlStep::Move { step, until_class } => {
            navigate(node, *step, until_class.as_deref()).into_iter().collect()
        }
        HtmlStep::Query { css, all: true } => node.query_all(css),
        HtmlStep::Query { css, all: false } => node.query_all(css).into_iter().take(1).collect(),
    }
}

/// Moves once, or keeps moving until an element has a matching class.
fn navigate(node: &NodeRef, step: Move, until_class: Option<&str>) -> Option<NodeRef> {
    let Some(class) = until_class else {
        return node.navigate(step);
    };
    let mut current = node.navigate(step)?;
    loop {
        if has_class(&current, class) {
            return Some(current);
        }
        // The root never moves further.
        if step == Move::Root {
            return None;
        }
        current = current.navigate(step)?;
    }
}

fn has_class(node: &NodeRef, pattern: &str) -> bool {
    node.class_names()
        .iter()
        .any(|class| wildcard_match(pattern, class))
}

fn access(spec: &AccessorSpec, node: &NodeRef, ctx: &SelectorContext<'_>) -> Vec<Value> {
    let mut strings = spec.quantifier.combine(
        &spec.accessors,
        |accessor| vec![read(accessor, node)],
        |results: &[String]| results.iter().all(|s| s.trim().is_empty()),
    );
    // Every fallback was blank: the node still reads as an empty string.
    if strings.is_empty() {
        strings.push(String::new());
    }
    strings
        .into_iter()
        .filter_map(|s| match &spec.rewrite {
            Some(rewrite) => rewrite.apply(&s, ctx.page_url),
            None => Some(s),
        })
        .map(Value::String)
        .collect()
}

fn read(accessor: &Accessor, node: &NodeRef) -> String {
    match accessor {
        Accessor::Text => node.text(),
        Accessor::InnerHtml => node.inner_html(),
        Accessor::OuterHtml => node.outer_html(),
        Accessor::Class(pattern) if has_class(node, pattern) => "true".to_string(),
        Accessor::Class(_) => String::new(),
        Accessor::Attribute(name) => node.attribute(name).unwrap_or_default(),
    }
}
