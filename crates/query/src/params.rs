//! Splitting the `?key=value&...` tail of a query part.
//!
//! Directive values are taken verbatim up to the next `&` that starts a
//! known key, so `filter=a&b` or `regexp=/x?/&/` keep their literal `&`
//! and `?`. `save`, `keep` and every ordinary parameter stop at the first
//! literal `&`. Ordinary values are percent-decoded; directive values are
//! not.
use quarry_grammar::{FormatError, find_unescaped};
use std::borrow::Cow;

/// Keys whose value extends to the next known key.
pub const DIRECTIVE_KEYS: &[&str] = &["transform", "filter", "update", "regexp", "index"];

/// Every key a non-`url` part accepts.
pub const KNOWN_KEYS: &[&str] = &[
    "transform",
    "filter",
    "update",
    "regexp",
    "index",
    "save",
    "keep",
    "discard",
    "required",
];

/// One `key[=value]` pair with its raw, undecoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam<'t> {
    pub key: &'t str,
    pub value: Option<&'t str>,
}

impl RawParam<'_> {
    pub fn is_directive(&self) -> bool {
        DIRECTIVE_KEYS.contains(&self.key)
    }
}

pub fn split_params(query: &str) -> Vec<RawParam<'_>> {
    let mut params = Vec::new();
    let mut rest = query;
    while !rest.is_empty() {
        let key_end = rest.find(['=', '&']).unwrap_or(rest.len());
        let key = &rest[..key_end];
        if !rest[key_end..].starts_with('=') {
            params.push(RawParam { key, value: None });
            rest = rest.get(key_end + 1..).unwrap_or("");
            continue;
        }
        let tail = &rest[key_end + 1..];
        let value_end = if DIRECTIVE_KEYS.contains(&key) {
            next_known_key(tail)
        } else {
            tail.find('&')
        }
        .unwrap_or(tail.len());
        params.push(RawParam {
            key,
            value: Some(&tail[..value_end]),
        });
        rest = tail.get(value_end + 1..).unwrap_or("");
    }
    params
}

/// Offset of the first unescaped `&` followed by a known key.
fn next_known_key(text: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(i) = find_unescaped(&text[offset..], "&") {
        let at = offset + i;
        if starts_known_key(&text[at + 1..]) {
            return Some(at);
        }
        offset = at + 1;
    }
    None
}

fn starts_known_key(text: &str) -> bool {
    KNOWN_KEYS.iter().any(|key| {
        text.strip_prefix(key)
            .is_some_and(|after| after.is_empty() || after.starts_with(['=', '&']))
    })
}

/// Percent-decodes a path or ordinary value. `+` stays literal.
pub fn decode(text: &str) -> Result<Cow<'_, str>, FormatError> {
    if !text.contains('%') {
        return Ok(Cow::Borrowed(text));
    }
    urlencoding::decode(text).map_err(|_| FormatError::Decode(text.to_string()))
}
