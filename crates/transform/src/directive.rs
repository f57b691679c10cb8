//! Parsed transform instructions.
use crate::phase::Phase;
use quarry_grammar::{FormatError, Suggestion, closest};
use quarry_selector::RewriteSpec;
use std::fmt;

/// Keywords accepted by the `transform` phase.
pub const TRANSFORM_KEYWORDS: &[&str] = &["upper", "lower", "json", "jseval", "regexp"];

/// One transform instruction. Order within a phase is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Upper,
    Lower,
    /// Parse the whole text, or a `name = literal;` assignment matching the pattern.
    Json(Option<String>),
    /// Extract script bindings, all of them or the named (glob) ones.
    JsEval(Option<Vec<String>>),
    Regex(RewriteSpec),
    /// A JSON object deep-merged into map values.
    Update(String),
    Filter(Vec<FilterToken>),
    Index(String),
    Save(String),
    Discard,
}

/// A filter term; negated terms must be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToken {
    pub text: String,
    pub negated: bool,
}

impl Directive {
    /// Parses the raw text of one directive belonging to `phase`.
    pub fn parse(phase: Phase, raw: &str) -> Result<Self, FormatError> {
        match phase {
            Phase::Transform => parse_transform(raw),
            Phase::Update => Ok(Directive::Update(raw.trim().to_string())),
            Phase::Filter => Ok(Directive::Filter(parse_filter(raw))),
            Phase::Index => Ok(Directive::Index(raw.trim().to_string())),
            Phase::Save => match raw.trim() {
                "" => Err(FormatError::EmptySaveName),
                name => Ok(Directive::Save(name.to_string())),
            },
            Phase::Discard => Ok(Directive::Discard),
        }
    }

    /// Directives that consume a list as one document instead of per element.
    pub fn is_list_aware(&self) -> bool {
        matches!(self, Directive::Json(_) | Directive::JsEval(_))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Upper => f.write_str("upper"),
            Directive::Lower => f.write_str("lower"),
            Directive::Json(None) => f.write_str("json"),
            Directive::Json(Some(pattern)) => write!(f, "json:{}", pattern),
            Directive::JsEval(None) => f.write_str("jseval"),
            Directive::JsEval(Some(names)) => write!(f, "jseval:{}", names.join(",")),
            Directive::Regex(spec) => match spec.replacement() {
                Some(replacement) => write!(f, "regexp:/{}/{}/", spec.pattern(), replacement),
                None => write!(f, "regexp:/{}/", spec.pattern()),
            },
            Directive::Update(patch) => write!(f, "update={}", patch),
            Directive::Filter(tokens) => {
                let terms: Vec<String> = tokens
                    .iter()
                    .map(|t| format!("{}{}", if t.negated { "!" } else { "" }, t.text))
                    .collect();
                write!(f, "filter={}", terms.join(" "))
            }
            Directive::Index(index) => write!(f, "index={}", index),
            Directive::Save(name) => write!(f, "save={}", name),
            Directive::Discard => f.write_str("discard"),
        }
    }
}

fn parse_transform(raw: &str) -> Result<Directive, FormatError> {
    let raw = raw.trim();
    let (keyword, argument) = match raw.split_once(':') {
        Some((keyword, argument)) => (keyword.trim(), Some(argument)),
        None => (raw, None),
    };
    match (keyword, argument) {
        ("upper", None) => Ok(Directive::Upper),
        ("lower", None) => Ok(Directive::Lower),
        ("upper" | "lower", Some(_)) => Err(FormatError::InvalidArgument {
            directive: keyword.to_string(),
            message: "takes no argument".to_string(),
        }),
        ("json", None) => Ok(Directive::Json(None)),
        ("json", Some(pattern)) if pattern.trim().is_empty() => Err(FormatError::InvalidArgument {
            directive: keyword.to_string(),
            message: "expected a variable name pattern after ':'".to_string(),
        }),
        ("json", Some(pattern)) => Ok(Directive::Json(Some(pattern.trim().to_string()))),
        ("jseval", None) => Ok(Directive::JsEval(None)),
        ("jseval", Some(names)) => {
            let names: Vec<String> = names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                return Err(FormatError::InvalidArgument {
                    directive: keyword.to_string(),
                    message: "expected comma-separated variable names after ':'".to_string(),
                });
            }
            Ok(Directive::JsEval(Some(names)))
        }
        ("regexp", None) => Err(FormatError::EmptyPattern(raw.to_string())),
        ("regexp", Some(spec)) => RewriteSpec::parse_delimited(spec).map(Directive::Regex),
        (other, _) => Err(FormatError::UnknownDirective {
            directive: other.to_string(),
            suggestion: Suggestion(closest(other, TRANSFORM_KEYWORDS).map(str::to_string)),
        }),
    }
}

/// Splits filter text on unescaped spaces. `\ `, `\;` and `\&` are literal;
/// a leading `!` negates a term.
fn parse_filter(raw: &str) -> Vec<FilterToken> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (' ' | ';' | '&')) => current.push(next),
                Some(next) => {
                    current.push(c);
                    current.push(next);
                }
                None => current.push(c),
            },
            c if c.is_whitespace() => terms.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    terms.push(current);

    terms
        .into_iter()
        .filter(|term| !term.is_empty())
        .map(|term| match term.strip_prefix('!') {
            Some(text) if !text.is_empty() => FilterToken {
                text: text.to_string(),
                negated: true,
            },
            _ => FilterToken {
                text: term,
                negated: false,
            },
        })
        .collect()
}
