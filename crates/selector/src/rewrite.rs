//! Regex extraction and replacement applied to selected strings.
//!
//! Two textual forms share one representation:
//!
//! - inline, after `::` in a selector: `pattern[/replacement]`
//! - delimited, in the `regexp` directive: `/pattern/[replacement/]`
//!
//! Replacements understand `$N` capture references, `\$` for a literal
//! dollar, and the `${pageUrl}`/`${rootUrl}` tokens.
use quarry_grammar::{FormatError, find_unescaped, unescape};
use regex::{Captures, Regex};
use url::Url;

/// The pattern meaning "the whole input".
pub const MATCH_ALL: &str = r"\ALL";

const PAGE_URL_TOKEN: &str = "${pageUrl}";
const ROOT_URL_TOKEN: &str = "${rootUrl}";

/// A rewrite compiled at parse time.
///
/// An invalid pattern is not a format error: it is kept as the compile
/// error and the rewrite passes its input through unchanged.
#[derive(Debug, Clone)]
pub struct RewriteSpec {
    pattern: String,
    replacement: Option<String>,
    regex: Result<Regex, regex::Error>,
    pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    PageUrl,
    RootUrl,
}

impl PartialEq for RewriteSpec {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.replacement == other.replacement
    }
}

impl Eq for RewriteSpec {}

impl RewriteSpec {
    /// Parses `pattern[/replacement]`. A trailing `/` means an empty replacement.
    pub fn parse_inline(text: &str) -> Result<Self, FormatError> {
        let (pattern, replacement) = match find_unescaped(text, "/") {
            Some(i) => (&text[..i], Some(&text[i + 1..])),
            None => (text, None),
        };
        Self::build(text, pattern, replacement)
    }

    /// Parses `/pattern/[replacement/]`. Text without the leading slash is
    /// read in the inline form.
    pub fn parse_delimited(text: &str) -> Result<Self, FormatError> {
        let Some(body) = text.strip_prefix('/') else {
            return Self::parse_inline(text);
        };
        let (pattern, rest) = match find_unescaped(body, "/") {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, ""),
        };
        let replacement = match rest {
            "" => None,
            rest => Some(strip_closing_slash(rest)),
        };
        Self::build(text, pattern, replacement)
    }

    fn build(source: &str, pattern: &str, replacement: Option<&str>) -> Result<Self, FormatError> {
        if pattern.is_empty() {
            return Err(FormatError::EmptyPattern(source.to_string()));
        }
        let pattern = unescape(pattern, "/").into_owned();
        let replacement = replacement.map(|r| unescape(r, "/").into_owned());
        let regex = compile(&pattern);
        if let Err(e) = &regex {
            log::warn!("Invalid regular expression '{}': {}", pattern, e);
        }
        let pieces = replacement.as_deref().map(parse_replacement).unwrap_or_default();
        Ok(Self {
            pattern,
            replacement,
            regex,
            pieces,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    /// The compiled pattern, or `None` when it is not a valid regex.
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref().ok()
    }

    pub fn is_extraction(&self) -> bool {
        self.replacement.is_none()
    }

    /// Applies the rewrite to `input`.
    ///
    /// Returns `None` when an extraction finds no match. An invalid regex
    /// leaves the input unchanged.
    pub fn apply(&self, input: &str, page_url: &str) -> Option<String> {
        let Ok(regex) = &self.regex else {
            return Some(input.to_string());
        };
        if self.is_extraction() {
            return regex.find(input).map(|m| m.as_str().to_string());
        }
        let urls = self
            .pieces
            .iter()
            .any(|piece| matches!(piece, Piece::PageUrl | Piece::RootUrl))
            .then(|| UrlTokens::resolve(page_url));
        let replaced = regex.replace_all(input, |caps: &Captures| expand(&self.pieces, caps, urls.as_ref()));
        Some(replaced.into_owned())
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    if pattern == MATCH_ALL {
        return Regex::new(r"(?s)\A.*\z");
    }
    Regex::new(&format!("(?m){}", pattern))
}

fn strip_closing_slash(text: &str) -> &str {
    match text.strip_suffix('/') {
        Some(stripped) if !stripped.ends_with('\\') || stripped.ends_with("\\\\") => stripped,
        _ => text,
    }
}

/// Expansions of `${pageUrl}` (the full document URL) and `${rootUrl}`
/// (its origin). An unparsable URL leaves both tokens in place.
struct UrlTokens {
    page: String,
    root: String,
}

impl UrlTokens {
    fn resolve(page_url: &str) -> Self {
        let mut tokens = Self {
            page: PAGE_URL_TOKEN.to_string(),
            root: ROOT_URL_TOKEN.to_string(),
        };
        match Url::parse(page_url) {
            Ok(url) => {
                let origin = url.origin();
                if origin.is_tuple() {
                    tokens.root = origin.ascii_serialization();
                }
                tokens.page = url.into();
            }
            Err(e) => log::debug!("Cannot expand URL tokens, '{}' is not a URL: {}", page_url, e),
        }
        tokens
    }
}

/// Splits a replacement into literal text, `$N` group references and URL
/// tokens. `\$` is a literal dollar and `\\` a literal backslash.
fn parse_replacement(template: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    while let Some(c) = rest.chars().next() {
        let token = [(PAGE_URL_TOKEN, Piece::PageUrl), (ROOT_URL_TOKEN, Piece::RootUrl)]
            .into_iter()
            .find(|(text, _)| rest.starts_with(text));
        if let Some((text, piece)) = token {
            flush(&mut literal, &mut pieces);
            pieces.push(piece);
            rest = &rest[text.len()..];
        } else if let Some(after) = rest.strip_prefix('\\')
            && let Some(next @ ('$' | '\\')) = after.chars().next()
        {
            literal.push(next);
            rest = &after[1..];
        } else if let Some(after) = rest.strip_prefix('$')
            && after.starts_with(|d: char| d.is_ascii_digit())
        {
            let end = after.find(|d: char| !d.is_ascii_digit()).unwrap_or(after.len());
            flush(&mut literal, &mut pieces);
            pieces.push(Piece::Group(after[..end].parse().unwrap_or(usize::MAX)));
            rest = &after[end..];
        } else {
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    flush(&mut literal, &mut pieces);
    pieces
}

fn flush(literal: &mut String, pieces: &mut Vec<Piece>) {
    if !literal.is_empty() {
        pieces.push(Piece::Literal(std::mem::take(literal)));
    }
}

fn expand(pieces: &[Piece], caps: &Captures, urls: Option<&UrlTokens>) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Group(n) => {
                if let Some(m) = caps.get(*n) {
                    out.push_str(m.as_str());
                }
            }
            Piece::PageUrl => out.push_str(urls.map_or(PAGE_URL_TOKEN, |u| u.page.as_str())),
            Piece::RootUrl => out.push_str(urls.map_or(ROOT_URL_TOKEN, |u| u.root.as_str())),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://shop.example.com/items/42?ref=home";

    #[test]
    fn test_parse_forms() {
        let spec = RewriteSpec::parse_delimited("/(\\d+)/#$1/").unwrap();
        assert_eq!(spec.pattern(), "(\\d+)");
        assert_eq!(spec.replacement(), Some("#$1"));

        let spec = RewriteSpec::parse_delimited("/\\d+/").unwrap();
        assert!(spec.is_extraction());

        let spec = RewriteSpec::parse_delimited("/x//").unwrap();
        assert_eq!(spec.replacement(), Some(""));

        let spec = RewriteSpec::parse_inline("a\\/b/c").unwrap();
        assert_eq!(spec.pattern(), "a/b");
        assert_eq!(spec.replacement(), Some("c"));

        assert_eq!(
            RewriteSpec::parse_delimited("//x/"),
            Err(FormatError::EmptyPattern("//x/".to_string()))
        );
    }

    #[test]
    fn test_extraction_returns_first_match() {
        let spec = RewriteSpec::parse_inline("\\d+").unwrap();
        assert_eq!(spec.apply("a12 b34", PAGE).as_deref(), Some("12"));
        assert_eq!(spec.apply("none", PAGE), None);
    }

    #[test]
    fn test_extraction_is_multiline() {
        let spec = RewriteSpec::parse_inline("^b.*$").unwrap();
        assert_eq!(spec.apply("a\nbc\nd", PAGE).as_deref(), Some("bc"));
    }

    #[test]
    fn test_replacement_with_groups_and_dollar() {
        let spec = RewriteSpec::parse_delimited("/(\\w+)=(\\d+)/$2:$1 \\$/").unwrap();
        assert_eq!(spec.apply("a=1 b=2", PAGE).as_deref(), Some("1:a $ 2:b $"));
    }

    #[test]
    fn test_match_all() {
        let spec = RewriteSpec::parse_delimited("/\\ALL/[$0]/").unwrap();
        assert_eq!(spec.apply("two\nlines", PAGE).as_deref(), Some("[two\nlines]"));
    }

    #[test]
    fn test_url_tokens() {
        let spec = RewriteSpec::parse_delimited("/^/${rootUrl}/").unwrap();
        assert_eq!(
            spec.apply("/img/a.png", PAGE).as_deref(),
            Some("https://shop.example.com/img/a.png")
        );
        let spec = RewriteSpec::parse_delimited("/\\ALL/${pageUrl}/").unwrap();
        assert_eq!(spec.apply("x", PAGE).as_deref(), Some(PAGE));
        assert_eq!(spec.apply("x", "not a url").as_deref(), Some("${pageUrl}"));
    }

    #[test]
    fn test_page_url_is_not_reparsed_as_replacement() {
        let page = "https://ex.com/a$1b";
        let spec = RewriteSpec::parse_delimited("/(x)/${pageUrl}/").unwrap();
        assert_eq!(spec.apply("x", page).as_deref(), Some(page));

        let spec = RewriteSpec::parse_delimited("/(x)/$1 ${rootUrl}\\\\/").unwrap();
        assert_eq!(spec.apply("x", page).as_deref(), Some("x https://ex.com\\"));

        let spec = RewriteSpec::parse_delimited("/x/\\${pageUrl}/").unwrap();
        assert_eq!(spec.apply("x", page).as_deref(), Some("${pageUrl}"));
    }

    #[test]
    fn test_regex_is_compiled_when_parsed() {
        let spec = RewriteSpec::parse_inline("\\d+").unwrap();
        assert_eq!(spec.regex().map(Regex::as_str), Some("(?m)\\d+"));

        let spec = RewriteSpec::parse_delimited("/\\ALL/x/").unwrap();
        assert!(spec.regex().is_some_and(|r| r.is_match("")));

        let copy = spec.clone();
        assert_eq!(copy, spec);
        assert!(copy.regex().is_some());
    }

    #[test]
    fn test_invalid_regex_keeps_input() {
        let spec = RewriteSpec::parse_inline("(unclosed").unwrap();
        assert!(spec.regex().is_none());
        assert_eq!(spec.apply("value", PAGE).as_deref(), Some("value"));
        assert_eq!(spec.apply("other", PAGE).as_deref(), Some("other"));
    }
}
