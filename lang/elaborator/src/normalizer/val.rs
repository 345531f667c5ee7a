//! Weak-head normal forms.

use std::fmt;
use std::rc::Rc;

use ast::{Icit, Lvl, MetaVar, Name, Tm};

use crate::metas::MetaCxt;
use crate::normalizer::env::Env;
use crate::normalizer::eval::Eval;
use crate::result::TcResult;

/// Head of a neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head {
    Var(Lvl),
    Meta(MetaVar),
}

/// One eliminator in a spine. A telescope application stores the
/// telescope-domain type it eliminates with.
#[derive(Debug, Clone)]
pub enum Elim {
    App(Icit, Rc<Val>),
    AppTel(Rc<Val>, Rc<Val>),
    Proj1,
    Proj2,
}

/// A left-to-right stack of eliminators applied to a neutral head.
pub type Spine = Vec<Elim>;

/// Binder bodies are host closures: applying one extends an environment and
/// re-evaluates a body, or runs whatever computation the unifier cooked up.
#[derive(Clone)]
pub struct Closure(Rc<ClosureFn>);

pub type ClosureFn = dyn Fn(&MetaCxt, Rc<Val>) -> TcResult<Rc<Val>>;

impl Closure {
    pub fn new(f: impl Fn(&MetaCxt, Rc<Val>) -> TcResult<Rc<Val>> + 'static) -> Self {
        Closure(Rc::new(f))
    }

    /// The canonical closure: a term evaluated in an extended environment.
    pub fn bind(env: Env, body: Rc<Tm>) -> Self {
        Closure::new(move |meta, v| body.eval(meta, &env.defined(v)))
    }

    pub fn apply(&self, meta: &MetaCxt, v: Rc<Val>) -> TcResult<Rc<Val>> {
        (self.0)(meta, v)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<closure>")
    }
}

/// The result of evaluation.
#[derive(Debug, Clone)]
pub enum Val {
    /// A value whose evaluation is blocked on the head.
    Neu(Head, Spine),
    U,
    Pi(Name, Icit, Rc<Val>, Closure),
    Lam(Name, Icit, Rc<Val>, Closure),

    /// The universe of telescopes.
    Tel,
    TEmpty,
    TCons(Name, Rc<Val>, Closure),

    /// The record type of a telescope.
    Rec(Rc<Val>),
    Tempty,
    Tcons(Rc<Val>, Rc<Val>),

    /// Function type over a telescope. Kept only while the telescope is
    /// neutral; see `v_pi_tel`.
    PiTel(Name, Rc<Val>, Closure),
    /// Function over a telescope. Kept only while the telescope is neutral;
    /// see `v_lam_tel`.
    LamTel(Name, Rc<Val>, Closure),
}

impl Val {
    pub fn var(l: Lvl) -> Rc<Val> {
        Rc::new(Val::Neu(Head::Var(l), Vec::new()))
    }

    pub fn meta(m: MetaVar) -> Rc<Val> {
        Rc::new(Val::Neu(Head::Meta(m), Vec::new()))
    }

    pub fn u() -> Rc<Val> {
        Rc::new(Val::U)
    }

    pub fn tel() -> Rc<Val> {
        Rc::new(Val::Tel)
    }

    /// The empty telescope.
    pub fn tel_empty() -> Rc<Val> {
        Rc::new(Val::TEmpty)
    }

    /// The empty record.
    pub fn rec_empty() -> Rc<Val> {
        Rc::new(Val::Tempty)
    }
}
