use std::fmt;

/// Variable and binder names.
///
/// Top-level postulate binders are stored with a `*` prefix in the context
/// name list; the prefix never appears in terms.
pub type Name = String;

/// Whether an argument is written by the user or may be inserted by
/// elaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icit {
    Impl,
    Expl,
}

impl fmt::Display for Icit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Icit::Impl => write!(f, "implicit"),
            Icit::Expl => write!(f, "explicit"),
        }
    }
}

/// Records whether a context entry comes from a user-written binder or was
/// inserted by elaboration. Only source names are visible to name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameOrigin {
    Source,
    Inserted,
}

/// Identifier of a metavariable.
///
/// Constancy constraints live in the same namespace, so a `MetaVar` may also
/// name a constraint slot in the metacontext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaVar {
    pub id: u64,
}

impl fmt::Display for MetaVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.id)
    }
}
