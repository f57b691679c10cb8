use quarry_grammar::{FormatError, Separator};
use std::fmt;

/// How a part combines with what the chain produced before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// `++`: run against the root and append.
    Append,
    /// `||`: run against the root only while the results are blank.
    Fallback,
    /// `>>`: run against the preceding part's output.
    Pipe,
    /// `>>>`: run once per element of the preceding part's output.
    ArrayPipe,
}

impl Chain {
    const ALL: [Chain; 4] = [Chain::ArrayPipe, Chain::Pipe, Chain::Append, Chain::Fallback];

    pub fn token(&self) -> &'static str {
        match self {
            Chain::Append => "++",
            Chain::Fallback => "||",
            Chain::Pipe => ">>",
            Chain::ArrayPipe => ">>>",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.token() == token)
    }

    pub fn is_pipe(&self) -> bool {
        matches!(self, Chain::Pipe | Chain::ArrayPipe)
    }

    pub fn separator() -> Result<Separator, FormatError> {
        Ok(Separator::new(Self::ALL.map(|chain| chain.token()))?.whitespace_bounded())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Splits query text into `(operator, segment)` pairs. The first segment
/// has no operator. Empty segments are errors.
pub fn split_chain(text: &str) -> Result<Vec<(Option<Chain>, &str)>, FormatError> {
    let separator = Chain::separator()?;
    separator
        .split_all(text)
        .into_iter()
        .enumerate()
        .map(|(index, (delimiter, segment))| {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(FormatError::EmptySegment(index));
            }
            Ok((delimiter.and_then(Chain::from_token), segment))
        })
        .collect()
}
