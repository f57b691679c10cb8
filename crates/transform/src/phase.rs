use std::fmt;

/// A stage of the pipeline. The declaration order is the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Transform,
    Update,
    Filter,
    Index,
    Save,
    Discard,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Transform,
        Phase::Update,
        Phase::Filter,
        Phase::Index,
        Phase::Save,
        Phase::Discard,
    ];

    /// The query parameter that feeds this phase.
    pub fn key(&self) -> &'static str {
        match self {
            Phase::Transform => "transform",
            Phase::Update => "update",
            Phase::Filter => "filter",
            Phase::Index => "index",
            Phase::Save => "save",
            Phase::Discard => "discard",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.key() == key)
    }

    /// Phases that skip a `Null` input. `save` and `discard` still run.
    pub fn skips_null(&self) -> bool {
        !matches!(self, Phase::Save | Phase::Discard)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
