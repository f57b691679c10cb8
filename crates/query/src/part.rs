//! One segment of a query chain: `[scheme:]path[?key=value&...]`.
use crate::params::{self, KNOWN_KEYS, RawParam};
use crate::scheme::Scheme;
use quarry_grammar::{FormatError, Suggestion, closest, find_unescaped, split_unescaped, unescape};
use quarry_selector::{Selector, parse_selector};
use quarry_transform::{Phase, Pipeline, TRANSFORM_KEYWORDS};
use quarry_vars::has_placeholder;
use std::collections::BTreeMap;

/// A compiled query part.
///
/// The raw path, parameters and directive texts are kept so `${}`
/// placeholders can be resolved against the bindings at run time. Parts
/// without placeholders also carry their pre-parsed selector and pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPart {
    scheme: Scheme,
    path: String,
    params: BTreeMap<String, Vec<String>>,
    directives: BTreeMap<Phase, Vec<String>>,
    required: Option<bool>,
    is_pipe: bool,
    selector: Option<Selector>,
    pipeline: Option<Pipeline>,
}

impl QueryPart {
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let (scheme, rest) = Scheme::strip(text.trim());
        let mut part = QueryPart {
            scheme,
            path: String::new(),
            params: BTreeMap::new(),
            directives: BTreeMap::new(),
            required: None,
            is_pipe: false,
            selector: None,
            pipeline: None,
        };
        if scheme == Scheme::Template {
            part.path = rest.to_string();
            return Ok(part);
        }

        let (path, query) = match find_unescaped(rest, "?") {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };
        part.path = params::decode(path)?.into_owned();
        part.apply_params(params::split_params(query))?;
        part.precompile()?;
        Ok(part)
    }

    fn apply_params(&mut self, raw: Vec<RawParam<'_>>) -> Result<(), FormatError> {
        let mut saved = false;
        let mut keep = false;
        let mut discard = false;

        for param in raw {
            let key = params::decode(param.key)?;
            let value = param.value.unwrap_or("");
            match key.as_ref() {
                "" => {}
                "transform" => {
                    let pieces = split_transform(value);
                    self.push_directives(Phase::Transform, pieces);
                }
                "regexp" => {
                    self.push_directives(Phase::Transform, [format!("regexp:{}", value)]);
                }
                "update" | "filter" | "index" => {
                    let phase = Phase::from_key(&key).unwrap_or(Phase::Filter);
                    let pieces = split_unescaped(value, ";")
                        .into_iter()
                        .filter(|piece| phase == Phase::Filter || !piece.trim().is_empty())
                        .map(str::to_string);
                    self.push_directives(phase, pieces);
                }
                "save" => {
                    self.push_save_names(value)?;
                    saved = true;
                }
                "keep" => {
                    if !value.is_empty() {
                        self.push_save_names(value)?;
                    }
                    keep = true;
                }
                "discard" => discard = true,
                "required" => self.required = Some(parse_flag("required", param.value)?),
                other if self.scheme == Scheme::Url => {
                    self.params
                        .entry(other.to_string())
                        .or_default()
                        .push(params::decode(value)?.into_owned());
                }
                other => {
                    return Err(FormatError::UnknownKey {
                        key: other.to_string(),
                        suggestion: Suggestion(closest(other, KNOWN_KEYS).map(str::to_string)),
                    });
                }
            }
        }

        if discard || (saved && !keep) {
            self.directives
                .entry(Phase::Discard)
                .or_default()
                .push(String::new());
        }
        Ok(())
    }

    fn push_directives<I, S>(&mut self, phase: Phase, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives
            .entry(phase)
            .or_default()
            .extend(texts.into_iter().map(Into::into));
    }

    fn push_save_names(&mut self, value: &str) -> Result<(), FormatError> {
        let names: Vec<String> = split_unescaped(value, ";")
            .into_iter()
            .map(|name| unescape(name.trim(), ";").into_owned())
            .collect();
        if names.iter().any(String::is_empty) {
            return Err(FormatError::EmptySaveName);
        }
        self.push_directives(Phase::Save, names);
        Ok(())
    }

    /// Validates the selector and directives, caching them when they carry
    /// no placeholders.
    fn precompile(&mut self) -> Result<(), FormatError> {
        let pipeline = Pipeline::parse(&self.directives)?;
        if !self.directives.values().flatten().any(|d| has_placeholder(d)) {
            self.pipeline = Some(pipeline);
        }
        if let Some(flavor) = self.scheme.flavor()
            && !has_placeholder(&self.path)
        {
            self.selector = Some(parse_selector(&self.path, flavor)?);
        }
        Ok(())
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Ordinary parameters. Only `url:` parts have any.
    pub fn params(&self) -> &BTreeMap<String, Vec<String>> {
        &self.params
    }

    /// Raw directive texts by phase, before `${}` resolution.
    pub fn directives(&self) -> &BTreeMap<Phase, Vec<String>> {
        &self.directives
    }

    /// `Some` only when `required=` was given explicitly.
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    /// Whether this part consumes the preceding part's output.
    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    pub(crate) fn set_pipe(&mut self, is_pipe: bool) {
        self.is_pipe = is_pipe;
    }

    pub(crate) fn cached_selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    pub(crate) fn cached_pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }
}

/// Splits a `transform` value on `;` only where a directive keyword
/// follows, so replacements may contain literal semicolons.
fn split_transform(value: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    while let Some(i) = find_unescaped(&value[offset..], ";") {
        let at = offset + i;
        if starts_directive(&value[at + 1..]) {
            pieces.push(&value[start..at]);
            start = at + 1;
        }
        offset = at + 1;
    }
    pieces.push(&value[start..]);
    pieces
        .into_iter()
        .map(|piece| unescape(piece.trim(), ";").into_owned())
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn starts_directive(text: &str) -> bool {
    let text = text.trim_start();
    TRANSFORM_KEYWORDS.iter().any(|keyword| {
        text.strip_prefix(keyword)
            .is_some_and(|after| after.is_empty() || after.starts_with([':', ';']))
    })
}

fn parse_flag(key: &str, value: Option<&str>) -> Result<bool, FormatError> {
    match value.map(str::trim) {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(FormatError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}
