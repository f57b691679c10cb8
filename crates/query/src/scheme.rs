use quarry_selector::Flavor;
use std::fmt;

/// How a query part produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// An HTML selector.
    #[default]
    Html,
    /// A JSON selector.
    Json,
    /// A URL resolved against the executing document.
    Url,
    /// Literal text with `${}` placeholders.
    Template,
}

impl Scheme {
    const ALL: [Scheme; 4] = [Scheme::Html, Scheme::Json, Scheme::Url, Scheme::Template];

    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Html => "html",
            Scheme::Json => "json",
            Scheme::Url => "url",
            Scheme::Template => "template",
        }
    }

    /// Splits an optional `scheme:` prefix off a part, defaulting to HTML.
    pub fn strip(text: &str) -> (Scheme, &str) {
        for scheme in Self::ALL {
            if let Some(rest) = text
                .strip_prefix(scheme.name())
                .and_then(|rest| rest.strip_prefix(':'))
            {
                return (scheme, rest);
            }
        }
        (Scheme::Html, text)
    }

    /// The selector grammar used by selector schemes.
    pub fn flavor(&self) -> Option<Flavor> {
        match self {
            Scheme::Html => Some(Flavor::Html),
            Scheme::Json => Some(Flavor::Json),
            Scheme::Url | Scheme::Template => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
