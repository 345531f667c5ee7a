//! The elaboration context.
//!
//! Tracks locally bound variables: their values, their types, their names and
//! whether each binder was written by the user or inserted by elaboration.
//! All four columns always have equal length.

use std::rc::Rc;

use ast::{Lvl, Name, NameOrigin, Span, Tm};

use crate::metas::MetaCxt;
use crate::normalizer::env::Env;
use crate::normalizer::quote::Quote;
use crate::normalizer::val::{Closure, Val};
use crate::result::TcResult;

/// One column of the type environment. A `Def` entry is `let`-bound and is
/// skipped when closing a type over the context; a `Bound` entry becomes a Π
/// binder. A `Bound` entry whose type is a telescope record marks a
/// telescope-bound variable and closes as a telescope Π.
#[derive(Debug, Clone)]
pub enum TyEntry {
    Def(Rc<Val>),
    Bound(Rc<Val>),
}

impl TyEntry {
    pub fn ty(&self) -> &Rc<Val> {
        match self {
            TyEntry::Def(a) | TyEntry::Bound(a) => a,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cxt {
    /// Values of bound variables; `Skipped` for variables without one.
    pub vals: Env,
    pub types: Vec<TyEntry>,
    pub names: Vec<Name>,
    pub origins: Vec<NameOrigin>,
    pub len: Lvl,
    /// Position of the surface term currently being elaborated, used to tag
    /// errors.
    pub span: Option<Span>,
}

impl Cxt {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Push a bound variable with its semantic type.
    pub fn bind(&self, name: Name, origin: NameOrigin, ty: Rc<Val>) -> Cxt {
        let mut cxt = self.clone();
        cxt.vals = cxt.vals.skipped();
        cxt.types.push(TyEntry::Bound(ty));
        cxt.names.push(name);
        cxt.origins.push(origin);
        cxt.len = cxt.len.succ();
        cxt
    }

    pub fn bind_src(&self, name: Name, ty: Rc<Val>) -> Cxt {
        self.bind(name, NameOrigin::Source, ty)
    }

    /// Push a `let`-bound variable with its value.
    pub fn define(&self, name: Name, ty: Rc<Val>, val: Rc<Val>) -> Cxt {
        let mut cxt = self.clone();
        cxt.vals = cxt.vals.defined(val);
        cxt.types.push(TyEntry::Def(ty));
        cxt.names.push(name);
        cxt.origins.push(NameOrigin::Source);
        cxt.len = cxt.len.succ();
        cxt
    }

    /// The context with the current source position replaced.
    pub fn with_pos(&self, span: Span) -> Cxt {
        let mut cxt = self.clone();
        cxt.span = Some(span);
        cxt
    }

    /// Name of the binder at a level, without the postulate marker.
    pub fn lvl_name(&self, l: Lvl) -> Name {
        match self.names.get(l.0) {
            Some(n) => n.trim_start_matches('*').to_owned(),
            None => format!("@{}", l.0),
        }
    }

    /// Turn a value living in this context extended by one binder into a
    /// first-class closure: quote at `len + 1`, then evaluate in the
    /// context's environment extended by the argument.
    pub fn lift_val(&self, meta: &MetaCxt, v: Rc<Val>) -> TcResult<Closure> {
        let body: Rc<Tm> = v.quote(meta, self.len.succ())?;
        Ok(Closure::bind(self.vals.clone(), body))
    }
}
