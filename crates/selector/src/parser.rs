//! Compiles selector text into a [`Selector`].
use crate::ast::{
    Accessor, AccessorSpec, Atom, Flavor, HtmlAtom, HtmlStep, JsonAtom, JsonKey, JsonStep, Selector,
};
use crate::rewrite::RewriteSpec;
use quarry_grammar::{
    Combination, ESCAPE, FormatError, Quantifier, Separator, find_unescaped, has_wildcard,
    split_unescaped, unescape,
};
use quarry_types::Move;

const ATOM_SEPARATOR: &str = "||";
const ACCESSOR_MARK: &str = "@";
const REWRITE_MARK: &str = "::";
const PATH_SEPARATOR: &str = "/";
const ALL_MATCHES: char = '*';
const DEEP_SEARCH: &str = "..";

/// Characters a CSS component may escape to hide them from the selector grammar.
const CSS_ESCAPABLE: &str = "/@|";
/// Characters a JSON key may escape.
const KEY_ESCAPABLE: &str = "/@|,:#.*?";

// --- Main Public Parser ---

/// Parses `[any#|every#]atom(||atom)*`. Atoms without an `html:`/`json:`
/// prefix use `default_flavor`. An empty selector selects the input itself.
pub fn parse_selector(input: &str, default_flavor: Flavor) -> Result<Selector, FormatError> {
    let separator = Separator::new([ATOM_SEPARATOR])?;
    let combination = Combination::parse(Quantifier::Any, input.trim(), Some(&separator));
    let mut atoms = combination
        .children
        .iter()
        .map(|child| child.trim())
        .filter(|child| !child.is_empty())
        .map(|child| parse_atom(child, default_flavor))
        .collect::<Result<Vec<_>, _>>()?;
    if atoms.is_empty() {
        atoms.push(match default_flavor {
            Flavor::Html => Atom::Html(HtmlAtom::default()),
            Flavor::Json => Atom::Json(JsonAtom::default()),
        });
    }
    Ok(Selector {
        quantifier: combination.quantifier,
        atoms,
    })
}

fn parse_atom(text: &str, default_flavor: Flavor) -> Result<Atom, FormatError> {
    let (flavor, body) = if let Some(body) = text.strip_prefix(Flavor::Json.prefix()) {
        (Flavor::Json, body)
    } else if let Some(body) = text.strip_prefix(Flavor::Html.prefix()) {
        (Flavor::Html, body)
    } else {
        (default_flavor, text)
    };
    match flavor {
        Flavor::Html => parse_html_atom(body).map(Atom::Html),
        Flavor::Json => parse_json_atom(body).map(Atom::Json),
    }
}

// --- HTML Atoms ---

fn parse_html_atom(text: &str) -> Result<HtmlAtom, FormatError> {
    let (path, accessor) = match find_unescaped(text, ACCESSOR_MARK) {
        Some(i) => (&text[..i], Some(&text[i + ACCESSOR_MARK.len()..])),
        None => (text, None),
    };
    let steps = split_unescaped(path, PATH_SEPARATOR)
        .into_iter()
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .map(|component| parse_html_step(text, component))
        .collect::<Result<Vec<_>, _>>()?;
    let accessor = accessor
        .map(|spec| parse_accessor_spec(text, spec))
        .transpose()?;
    Ok(HtmlAtom { steps, accessor })
}

fn parse_html_step(atom: &str, component: &str) -> Result<HtmlStep, FormatError> {
    let (keyword, class) = match component.split_once('.') {
        Some((keyword, class)) => (keyword, Some(class)),
        None => (component, None),
    };
    if let Some(step) = Move::from_keyword(keyword) {
        let until_class = match class {
            Some("") => {
                return Err(FormatError::Selector {
                    selector: atom.to_string(),
                    message: format!("'{}' needs a class name after '.'", keyword),
                });
            }
            Some(class) => Some(unescape(class, CSS_ESCAPABLE).into_owned()),
            None => None,
        };
        return Ok(HtmlStep::Move { step, until_class });
    }

    let (all, css) = match component.strip_prefix(ALL_MATCHES) {
        Some(rest) if !rest.trim().is_empty() => (true, rest.trim()),
        _ => (false, component),
    };
    Ok(HtmlStep::Query {
        css: unescape(css, CSS_ESCAPABLE).into_owned(),
        all,
    })
}

fn parse_accessor_spec(atom: &str, text: &str) -> Result<AccessorSpec, FormatError> {
    let (accessors, rewrite) = match find_unescaped(text, REWRITE_MARK) {
        Some(i) => (&text[..i], Some(&text[i + REWRITE_MARK.len()..])),
        None => (text, None),
    };
    let separator = Separator::new(["|"])?;
    let combination = Combination::parse(Quantifier::Any, accessors.trim(), Some(&separator));
    let mut parsed = combination
        .children
        .iter()
        .map(|name| parse_accessor(atom, name.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    if parsed.is_empty() {
        parsed.push(Accessor::Text);
    }
    Ok(AccessorSpec {
        quantifier: combination.quantifier,
        accessors: parsed,
        rewrite: rewrite.map(RewriteSpec::parse_inline).transpose()?,
    })
}

fn parse_accessor(atom: &str, name: &str) -> Result<Accessor, FormatError> {
    Ok(match name {
        "" | "text" => Accessor::Text,
        "innerHtml" => Accessor::InnerHtml,
        "outerHtml" => Accessor::OuterHtml,
        name => match name.strip_prefix('.') {
            Some("") => {
                return Err(FormatError::Selector {
                    selector: atom.to_string(),
                    message: "empty class name in accessor".to_string(),
                });
            }
            Some(class) => Accessor::Class(unescape(class, CSS_ESCAPABLE).into_owned()),
            None => Accessor::Attribute(unescape(name, CSS_ESCAPABLE).into_owned()),
        },
    })
}

// --- JSON Atoms ---

fn parse_json_atom(text: &str) -> Result<JsonAtom, FormatError> {
    let (path, rewrite) = match find_unescaped(text, REWRITE_MARK) {
        Some(i) => (&text[..i], Some(&text[i + REWRITE_MARK.len()..])),
        None => (text, None),
    };
    let mut components: Vec<&str> = split_unescaped(path, PATH_SEPARATOR)
        .into_iter()
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .collect();

    let element_id = match components.first().and_then(|first| first.strip_prefix('#')) {
        Some("") => {
            return Err(FormatError::Selector {
                selector: text.to_string(),
                message: "empty element id".to_string(),
            });
        }
        Some(id) => {
            let id = unescape(id, KEY_ESCAPABLE).into_owned();
            components.remove(0);
            Some(id)
        }
        None => None,
    };

    let steps = components
        .into_iter()
        .map(parse_json_step)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JsonAtom {
        element_id,
        steps,
        rewrite: rewrite.map(RewriteSpec::parse_inline).transpose()?,
    })
}

fn parse_json_step(text: &str) -> Result<JsonStep, FormatError> {
    let separator = Separator::new([",", "|"])?;
    let (tag, rest) = Quantifier::strip_tag(text);
    let pieces = separator.split_all(rest);
    // The first delimiter decides the default: `,` is a union, `|` a fallback.
    let implied = match pieces.get(1).and_then(|(delimiter, _)| *delimiter) {
        Some(",") => Quantifier::Every,
        _ => Quantifier::Any,
    };
    let keys = pieces
        .into_iter()
        .map(|(_, key)| key.trim())
        .filter(|key| !key.is_empty())
        .map(parse_json_key)
        .collect();
    Ok(JsonStep {
        quantifier: tag.unwrap_or(implied),
        keys,
    })
}

fn parse_json_key(text: &str) -> JsonKey {
    if let Some(deep) = text.strip_prefix(DEEP_SEARCH) {
        return JsonKey::Deep(key_pattern(deep));
    }
    if let Ok(index) = text.parse::<i64>() {
        return JsonKey::Index(index);
    }
    let pattern = key_pattern(text);
    if has_wildcard(&pattern) {
        return JsonKey::Wildcard(pattern);
    }
    JsonKey::Key(unescape(&pattern, KEY_ESCAPABLE).into_owned())
}

/// Rewrites `\?` to the one-character wildcard. A bare `?` ends the path
/// of a query part, so keys spell it escaped. Other escapes are kept for
/// the wildcard matcher.
fn key_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('?') => out.push('?'),
            Some(next) => {
                out.push(ESCAPE);
                out.push(next);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(text: &str) -> HtmlAtom {
        match parse_selector(text, Flavor::Html).unwrap().atoms.remove(0) {
            Atom::Html(atom) => atom,
            other => panic!("expected an html atom, got {:?}", other),
        }
    }

    fn json(text: &str) -> JsonAtom {
        match parse_selector(text, Flavor::Json).unwrap().atoms.remove(0) {
            Atom::Json(atom) => atom,
            other => panic!("expected a json atom, got {:?}", other),
        }
    }

    fn query(css: &str, all: bool) -> HtmlStep {
        HtmlStep::Query {
            css: css.to_string(),
            all,
        }
    }

    #[test]
    fn test_css_with_accessor() {
        let atom = html("div.card/*a[href]@href");
        assert_eq!(atom.steps, vec![query("div.card", false), query("a[href]", true)]);
        let accessor = atom.accessor.unwrap();
        assert_eq!(accessor.accessors, vec![Accessor::Attribute("href".to_string())]);
        assert!(accessor.rewrite.is_none());
    }

    #[test]
    fn test_empty_accessor_is_text() {
        let atom = html("div/@");
        assert_eq!(atom.steps, vec![query("div", false)]);
        assert_eq!(atom.accessor.unwrap().accessors, vec![Accessor::Text]);
        assert!(html("h1").accessor.is_none());
    }

    #[test]
    fn test_moves_with_class_targets() {
        let atom = html("parent.card*/next/span");
        assert_eq!(
            atom.steps,
            vec![
                HtmlStep::Move {
                    step: Move::Parent,
                    until_class: Some("card*".to_string())
                },
                HtmlStep::Move {
                    step: Move::Next,
                    until_class: None
                },
                query("span", false),
            ]
        );
    }

    #[test]
    fn test_accessor_fallbacks_and_rewrite() {
        let accessor = html("img@data-src|src::\\d+/N").accessor.unwrap();
        assert_eq!(accessor.quantifier, Quantifier::Any);
        assert_eq!(
            accessor.accessors,
            vec![
                Accessor::Attribute("data-src".to_string()),
                Accessor::Attribute("src".to_string())
            ]
        );
        let rewrite = accessor.rewrite.unwrap();
        assert_eq!(rewrite.pattern(), "\\d+");
        assert_eq!(rewrite.replacement(), Some("N"));

        let accessor = html("li@every#.active|innerHtml").accessor.unwrap();
        assert_eq!(accessor.quantifier, Quantifier::Every);
        assert_eq!(accessor.accessors[0], Accessor::Class("active".to_string()));
    }

    #[test]
    fn test_escaped_delimiters_in_css() {
        let atom = html("a[href$='\\/x']\\@@title");
        assert_eq!(atom.steps, vec![query("a[href$='/x']@", false)]);
    }

    #[test]
    fn test_atom_alternatives_and_flavors() {
        let selector = parse_selector("every#h1@text || json:#data/title", Flavor::Html).unwrap();
        assert_eq!(selector.quantifier, Quantifier::Every);
        assert_eq!(selector.atoms.len(), 2);
        assert_eq!(selector.atoms[0].flavor(), Flavor::Html);
        match &selector.atoms[1] {
            Atom::Json(atom) => assert_eq!(atom.element_id.as_deref(), Some("data")),
            other => panic!("unexpected atom {:?}", other),
        }
    }

    #[test]
    fn test_json_steps() {
        let atom = json("a/b,c/1/-1/items*/..name::\\w+");
        assert_eq!(atom.steps.len(), 6);
        assert_eq!(atom.steps[1].quantifier, Quantifier::Every);
        assert_eq!(
            atom.steps[1].keys,
            vec![JsonKey::Key("b".to_string()), JsonKey::Key("c".to_string())]
        );
        assert_eq!(atom.steps[2].keys, vec![JsonKey::Index(1)]);
        assert_eq!(atom.steps[3].keys, vec![JsonKey::Index(-1)]);
        assert_eq!(atom.steps[4].keys, vec![JsonKey::Wildcard("items*".to_string())]);
        assert_eq!(atom.steps[5].keys, vec![JsonKey::Deep("name".to_string())]);
        assert!(atom.rewrite.unwrap().is_extraction());
    }

    #[test]
    fn test_json_fallback_step_and_escapes() {
        let atom = json("root/every#x|y/a\\/b/q\\?");
        assert_eq!(atom.steps[1].quantifier, Quantifier::Every);
        assert_eq!(atom.steps[2].keys, vec![JsonKey::Key("a/b".to_string())]);
        assert_eq!(atom.steps[3].keys, vec![JsonKey::Wildcard("q?".to_string())]);
        assert_eq!(json("x|y").steps[0].quantifier, Quantifier::Any);

        // An escaped star stays literal inside a wildcard key.
        assert_eq!(json("a\\*b*").steps[0].keys, vec![JsonKey::Wildcard("a\\*b*".to_string())]);
        assert_eq!(json("a\\*b").steps[0].keys, vec![JsonKey::Key("a*b".to_string())]);
        assert_eq!(json("..ti\\?r").steps[0].keys, vec![JsonKey::Deep("ti?r".to_string())]);

        // A leading tag belongs to the atom list, not the first step.
        let selector = parse_selector("every#x|y", Flavor::Json).unwrap();
        assert_eq!(selector.quantifier, Quantifier::Every);
    }

    #[test]
    fn test_empty_selector_selects_input() {
        let selector = parse_selector("", Flavor::Json).unwrap();
        assert_eq!(selector.atoms, vec![Atom::Json(JsonAtom::default())]);
    }

    #[test]
    fn test_malformed_selectors() {
        assert!(matches!(
            parse_selector("parent./a", Flavor::Html),
            Err(FormatError::Selector { .. })
        ));
        assert!(matches!(
            parse_selector("a@.", Flavor::Html),
            Err(FormatError::Selector { .. })
        ));
        assert!(matches!(
            parse_selector("json:#/a", Flavor::Html),
            Err(FormatError::Selector { .. })
        ));
        assert!(matches!(
            parse_selector("a@href::/x", Flavor::Html),
            Err(FormatError::EmptyPattern(_))
        ));
    }
}
