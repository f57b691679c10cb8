//! Splitting at the first unescaped delimiter.
//!
//! A backslash always escapes the character that follows it, so `\\` is a
//! literal backslash and never escapes anything after it. Delimiters are
//! literal strings; at each position the longest matching delimiter wins.
use crate::error::FormatError;
use std::borrow::Cow;

/// The escape character shared by every grammar layer.
pub const ESCAPE: char = '\\';

/// The outcome of splitting a text once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'t> {
    pub before: &'t str,
    pub after: &'t str,
    /// The delimiter that matched, `None` when the text had no delimiter.
    pub delimiter: Option<&'t str>,
}

/// An escape-aware splitter over a set of literal delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    delimiters: Vec<String>,
    whitespace_bounded: bool,
    first_can_ignore: bool,
}

impl Separator {
    /// Creates a separator. Fails when no usable delimiter is given.
    pub fn new<I, S>(delimiters: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut delimiters: Vec<String> = delimiters.into_iter().map(Into::into).collect();
        if delimiters.is_empty() {
            return Err(FormatError::Separator(
                "at least one delimiter is required".to_string(),
            ));
        }
        if let Some(bad) = delimiters
            .iter()
            .find(|d| d.is_empty() || d.starts_with(ESCAPE))
        {
            return Err(FormatError::Separator(format!(
                "delimiter '{}' is empty or starts with the escape character",
                bad
            )));
        }
        delimiters.sort_by(|a, b| b.len().cmp(&a.len()));
        delimiters.dedup();
        Ok(Self {
            delimiters,
            whitespace_bounded: false,
            first_can_ignore: false,
        })
    }

    /// Only match delimiters with whitespace on both sides.
    pub fn whitespace_bounded(mut self) -> Self {
        self.whitespace_bounded = true;
        self
    }

    /// When nothing matches, report the whole text as the part *after* the
    /// delimiter instead of the part before it.
    pub fn first_can_ignore(mut self) -> Self {
        self.first_can_ignore = true;
        self
    }

    /// Finds the first unescaped delimiter, returning its byte offset and text.
    pub fn find<'t>(&self, text: &'t str) -> Option<(usize, &'t str)> {
        let mut chars = text.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == ESCAPE {
                chars.next();
                continue;
            }
            let rest = &text[i..];
            for delimiter in &self.delimiters {
                if rest.starts_with(delimiter.as_str()) && self.bounded(text, i, delimiter.len()) {
                    return Some((i, &text[i..i + delimiter.len()]));
                }
            }
        }
        None
    }

    fn bounded(&self, text: &str, start: usize, len: usize) -> bool {
        if !self.whitespace_bounded {
            return true;
        }
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let after_ok = text[start + len..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace);
        before_ok && after_ok
    }

    /// Splits at the first unescaped delimiter.
    pub fn split<'t>(&self, text: &'t str) -> Split<'t> {
        match self.find(text) {
            Some((i, delimiter)) => Split {
                before: &text[..i],
                after: &text[i + delimiter.len()..],
                delimiter: Some(delimiter),
            },
            None if self.first_can_ignore => Split {
                before: "",
                after: text,
                delimiter: None,
            },
            None => Split {
                before: text,
                after: "",
                delimiter: None,
            },
        }
    }

    /// Splits at every unescaped delimiter. Each piece is paired with the
    /// delimiter that preceded it (`None` for the first piece).
    pub fn split_all<'t>(&self, text: &'t str) -> Vec<(Option<&'t str>, &'t str)> {
        let mut pieces = Vec::new();
        let mut preceding = None;
        let mut rest = text;
        while let Some((i, delimiter)) = self.find(rest) {
            pieces.push((preceding, &rest[..i]));
            preceding = Some(delimiter);
            rest = &rest[i + delimiter.len()..];
        }
        pieces.push((preceding, rest));
        pieces
    }
}

/// Byte offset of the first unescaped occurrence of `needle`.
pub fn find_unescaped(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == ESCAPE {
            chars.next();
            continue;
        }
        if text[i..].starts_with(needle) {
            return Some(i);
        }
    }
    None
}

/// Splits at every unescaped occurrence of `needle`, keeping escapes intact.
pub fn split_unescaped<'t>(text: &'t str, needle: &str) -> Vec<&'t str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(i) = find_unescaped(rest, needle) {
        pieces.push(&rest[..i]);
        rest = &rest[i + needle.len()..];
    }
    pieces.push(rest);
    pieces
}

/// Removes the escape character in front of each character of `escapable`.
///
/// Escapes of other characters are preserved verbatim (both characters),
/// so regex escapes such as `\d` survive.
pub fn unescape<'t>(text: &'t str, escapable: &str) -> Cow<'t, str> {
    if !text.contains(ESCAPE) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if escapable.contains(next) => out.push(next),
            Some(next) => {
                out.push(ESCAPE);
                out.push(next);
            }
            None => out.push(ESCAPE),
        }
    }
    Cow::Owned(out)
}
