use crate::common::*;
use crate::span::Span;

/// Surface terms as produced by the parser.
///
/// Variables are referenced by name; binding structure is resolved during
/// elaboration.
#[derive(Debug, Clone)]
pub enum Raw {
    Var(Name),
    Lam { name: Name, ann: Option<Box<Raw>>, icit: Icit, body: Box<Raw> },
    App { fun: Box<Raw>, arg: Box<Raw>, icit: Icit },
    Univ,
    Pi { name: Name, icit: Icit, dom: Box<Raw>, cod: Box<Raw> },
    Let { name: Name, ann: Box<Raw>, val: Box<Raw>, body: Box<Raw> },
    Hole,
    /// Source position wrapper; installs a position for the duration of a
    /// sub-elaboration so that errors can be tagged.
    SrcPos { span: Span, inner: Box<Raw> },
}

impl Raw {
    /// The term with all position wrappers at the root removed.
    pub fn unwrap_pos(&self) -> &Raw {
        match self {
            Raw::SrcPos { inner, .. } => inner.unwrap_pos(),
            t => t,
        }
    }
}
