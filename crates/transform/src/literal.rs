//! Locates `name = <literal>;` assignments in script-like text.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::multispace0,
    combinator::{map, recognize},
    number::complete::double,
    sequence::preceded,
};
use quarry_grammar::{has_wildcard, wildcard_match};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[^\w$.])([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*(=)[^=]")
        .expect("assignment pattern is valid")
});

/// A literal recognized on the right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
enum Literal<'a> {
    /// Text in JSON syntax (object, array, number, double-quoted string, keyword).
    Json(&'a str),
    /// The body of a single-quoted string.
    Quoted(&'a str),
}

/// Finds the first assignment whose name matches `pattern` and parses its
/// value. The pattern is matched against the full dotted name and its last
/// segment, so `__DATA__` finds `window.__DATA__ = {...}`.
pub fn extract_assignment(text: &str, pattern: &str) -> Option<JsonValue> {
    for caps in ASSIGNMENT_RE.captures_iter(text) {
        let (Some(name), Some(equals)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if !name_matches(pattern, name.as_str()) {
            continue;
        }
        let rest = &text[equals.end()..];
        match literal(rest) {
            Ok((_, parsed)) => {
                if let Some(value) = decode(parsed) {
                    return Some(value);
                }
                log::debug!("Assignment to '{}' is not valid JSON", name.as_str());
            }
            Err(_) => log::debug!("Assignment to '{}' has no literal value", name.as_str()),
        }
    }
    None
}

fn name_matches(pattern: &str, name: &str) -> bool {
    let last = name.rsplit('.').next().unwrap_or(name);
    if has_wildcard(pattern) {
        wildcard_match(pattern, name) || wildcard_match(pattern, last)
    } else {
        pattern == name || pattern == last
    }
}

fn decode(literal: Literal<'_>) -> Option<JsonValue> {
    match literal {
        Literal::Json(text) => serde_json::from_str(text).ok(),
        Literal::Quoted(body) => Some(JsonValue::String(body.replace("\\'", "'"))),
    }
}

// --- Literal Parsers ---

fn literal(input: &str) -> IResult<&str, Literal<'_>> {
    preceded(
        multispace0,
        alt((
            map(balanced('{', '}'), Literal::Json),
            map(balanced('[', ']'), Literal::Json),
            map(double_quoted, Literal::Json),
            map(single_quoted, Literal::Quoted),
            map(alt((tag("true"), tag("false"), tag("null"))), Literal::Json),
            map(recognize(double), Literal::Json),
        )),
    )
    .parse(input)
}

/// Recognizes a bracketed block, skipping brackets inside string literals.
fn balanced(open: char, close: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        if !input.starts_with(open) {
            return Err(fail(input, nom::error::ErrorKind::Char));
        }
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut chars = input.char_indices();
        while let Some((i, c)) = chars.next() {
            match quote {
                Some(_) if c == '\\' => {
                    chars.next();
                }
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == open => depth += 1,
                None if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        let end = i + c.len_utf8();
                        return Ok((&input[end..], &input[..end]));
                    }
                }
                None => {}
            }
        }
        Err(fail(input, nom::error::ErrorKind::TakeUntil))
    }
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    quoted('"')(input)
}

fn single_quoted(input: &str) -> IResult<&str, &str> {
    let (rest, whole) = quoted('\'')(input)?;
    Ok((rest, &whole[1..whole.len() - 1]))
}

/// Recognizes a quoted string including its quotes, honoring backslash escapes.
fn quoted(delimiter: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        if !input.starts_with(delimiter) {
            return Err(fail(input, nom::error::ErrorKind::Char));
        }
        let mut chars = input.char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if c == delimiter {
                let end = i + c.len_utf8();
                return Ok((&input[end..], &input[..end]));
            }
        }
        Err(fail(input, nom::error::ErrorKind::Char))
    }
}

fn fail(input: &str, kind: nom::error::ErrorKind) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, kind))
}
