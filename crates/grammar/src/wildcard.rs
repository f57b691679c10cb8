//! `*`/`?` wildcard matching used for class names, JSON keys and script
//! binding names. A backslash makes the next character literal, so `\*`
//! matches a star.
use crate::separator::{ESCAPE, find_unescaped};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `*`: any run of characters, including none.
    Many,
    /// `?`: exactly one character.
    One,
    Char(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            ESCAPE => Token::Char(chars.next().unwrap_or(ESCAPE)),
            '*' => Token::Many,
            '?' => Token::One,
            c => Token::Char(c),
        });
    }
    tokens
}

/// True when `pattern` contains an unescaped wildcard character.
pub fn has_wildcard(pattern: &str) -> bool {
    find_unescaped(pattern, "*").is_some() || find_unescaped(pattern, "?").is_some()
}

/// Matches `text` against a pattern where `*` matches any run of characters
/// (including none) and `?` matches exactly one character.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern = tokenize(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(Token::One) => {
                p += 1;
                t += 1;
            }
            Some(Token::Char(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            Some(Token::Many) => {
                backtrack = Some((p, t));
                p += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&token| token == Token::Many)
}
