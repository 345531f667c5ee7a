//! The semantic core of the elaborator: normalization by evaluation, pattern
//! unification with telescope mediation, the metacontext with constancy
//! constraints, and the bidirectional typechecker.

pub mod metas;
pub mod normalizer;
pub mod result;
pub mod typechecker;
pub mod unifier;
pub mod zonk;

use std::rc::Rc;

use ast::{Lvl, Raw, Tm};

pub use metas::{MetaCxt, MetaEntry};
pub use result::{SolveError, SpineError, StrengtheningError, TcResult, TypeError};

use normalizer::env::Env;
use normalizer::eval::Eval;
use normalizer::quote::Quote;
use typechecker::ctx::Cxt;
use typechecker::typecheck::infer_top_lams;
use zonk::Zonk;

/// Result of elaborating a top-level term.
#[derive(Debug)]
pub struct Elab {
    /// The elaborated core term, not yet zonked.
    pub tm: Rc<Tm>,
    /// The inferred type, quoted at the empty context.
    pub ty: Rc<Tm>,
    /// The final metacontext.
    pub meta: MetaCxt,
}

impl Elab {
    /// The elaborated term with all solved metas substituted.
    pub fn zonked_tm(&self) -> TcResult<Rc<Tm>> {
        self.tm.zonk(&self.meta, &Env::empty())
    }

    /// The normal form of the elaborated term.
    pub fn nf(&self) -> TcResult<Rc<Tm>> {
        let v = self.tm.eval(&self.meta, &Env::empty())?;
        v.quote(&self.meta, Lvl(0))
    }
}

/// Elaborate a closed surface term, treating leading lambdas as postulates.
pub fn elaborate(raw: &Raw) -> TcResult<Elab> {
    let mut meta = MetaCxt::new();
    let cxt = Cxt::empty();
    let (tm, vty) = infer_top_lams(&mut meta, &cxt, raw)?;
    let ty = vty.quote(&meta, Lvl(0))?;
    Ok(Elab { tm, ty, meta })
}
