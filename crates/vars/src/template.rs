//! `${...}` substitution inside arbitrary query text.
use crate::engine::evaluate;
use crate::parser::parse_expression;
use quarry_types::Bindings;
use std::borrow::Cow;

/// Placeholder names expanded later by the regex rewrite, not by the resolver.
/// They are left verbatim unless the table binds them explicitly.
pub const RESERVED_NAMES: &[&str] = &["pageUrl", "rootUrl"];

const OPEN: &str = "${";

pub fn has_placeholder(text: &str) -> bool {
    text.contains(OPEN)
}

/// Substitutes every `${...}` placeholder in `text`.
///
/// `\${` produces a literal `${`. An unterminated placeholder is kept as-is.
/// Substitution happens only inside `${}`.
pub fn resolve<'t>(text: &'t str, bindings: &Bindings) -> Cow<'t, str> {
    if !has_placeholder(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        if rest[..start].ends_with('\\') {
            out.push_str(&rest[..start - 1]);
            out.push_str(OPEN);
            rest = &rest[start + OPEN.len()..];
            continue;
        }
        out.push_str(&rest[..start]);
        let body = &rest[start + OPEN.len()..];
        let Some(end) = closing_brace(body) else {
            out.push_str(&rest[start..]);
            return Cow::Owned(out);
        };
        out.push_str(&substitute(&body[..end], bindings));
        rest = &body[end + 1..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Byte offset of the `}` closing a placeholder body, skipping quoted text.
fn closing_brace(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '}') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

fn substitute(source: &str, bindings: &Bindings) -> String {
    let name = source.trim();
    if RESERVED_NAMES.contains(&name) && !bindings.contains(name) {
        return format!("{}{}}}", OPEN, source);
    }
    match parse_expression(source) {
        Ok(expr) => evaluate(&expr, bindings).to_string(),
        Err(e) => {
            log::warn!("{}; substituting an empty string", e);
            String::new()
        }
    }
}
