//! Closure-free normalization by evaluation.
//!
//! Telescope formers compute: a `PiTel`/`LamTel` over a telescope that is
//! known to be empty or a cons unfolds into ordinary (implicit) functions, so
//! `VPiTel`/`VLamTel` only ever survive with a neutral telescope domain.
//! Because the blocking telescope may be solved later, `force` re-runs these
//! smart constructors in addition to following solved metas.

use std::rc::Rc;

use ast::{Icit, Name, Tm};

use crate::metas::{MetaCxt, MetaEntry};
use crate::normalizer::env::Env;
use crate::normalizer::val::{Closure, Elim, Head, Spine, Val};
use crate::result::{TcResult, TypeError};

pub trait Eval {
    fn eval(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Val>>;
}

impl Eval for Tm {
    fn eval(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Val>> {
        match self {
            Tm::Var(idx) => env.lookup(*idx),
            Tm::Let { val, body, .. } => {
                let v = val.eval(meta, env)?;
                body.eval(meta, &env.defined(v))
            }
            Tm::U => Ok(Val::u()),
            Tm::Meta(m) => match meta.solution(*m) {
                Some(v) => Ok(v),
                None => Ok(Val::meta(*m)),
            },
            Tm::Pi { name, icit, dom, cod } => Ok(Rc::new(Val::Pi(
                name.clone(),
                *icit,
                dom.eval(meta, env)?,
                Closure::bind(env.clone(), cod.clone()),
            ))),
            Tm::Lam { name, icit, ty, body } => Ok(Rc::new(Val::Lam(
                name.clone(),
                *icit,
                ty.eval(meta, env)?,
                Closure::bind(env.clone(), body.clone()),
            ))),
            Tm::App { fun, arg, icit } => {
                let f = fun.eval(meta, env)?;
                let u = arg.eval(meta, env)?;
                v_app(meta, f, u, *icit)
            }
            Tm::Skip(body) => body.eval(meta, &env.skipped()),

            Tm::Tel => Ok(Val::tel()),
            Tm::TEmpty => Ok(Val::tel_empty()),
            Tm::TCons { name, ty, rest } => Ok(Rc::new(Val::TCons(
                name.clone(),
                ty.eval(meta, env)?,
                Closure::bind(env.clone(), rest.clone()),
            ))),
            Tm::Rec(t) => Ok(Rc::new(Val::Rec(t.eval(meta, env)?))),
            Tm::Tempty => Ok(Val::rec_empty()),
            Tm::Tcons { head, tail } => {
                Ok(Rc::new(Val::Tcons(head.eval(meta, env)?, tail.eval(meta, env)?)))
            }
            Tm::Proj1(t) => v_proj1(meta, t.eval(meta, env)?),
            Tm::Proj2(t) => v_proj2(meta, t.eval(meta, env)?),

            Tm::PiTel { name, dom, cod } => v_pi_tel(
                meta,
                name.clone(),
                dom.eval(meta, env)?,
                Closure::bind(env.clone(), cod.clone()),
            ),
            Tm::AppTel { tel, fun, arg } => {
                let a = tel.eval(meta, env)?;
                let f = fun.eval(meta, env)?;
                let u = arg.eval(meta, env)?;
                v_app_tel(meta, a, f, u)
            }
            Tm::LamTel { name, dom, body } => v_lam_tel(
                meta,
                name.clone(),
                dom.eval(meta, env)?,
                Closure::bind(env.clone(), body.clone()),
            ),
        }
    }
}

impl Eval for Rc<Tm> {
    fn eval(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Val>> {
        (**self).eval(meta, env)
    }
}

/// Apply a function value to an argument.
pub fn v_app(meta: &MetaCxt, fun: Rc<Val>, arg: Rc<Val>, icit: Icit) -> TcResult<Rc<Val>> {
    match &*fun {
        Val::Lam(_, _, _, body) => body.apply(meta, arg),
        Val::Neu(h, sp) => {
            let mut sp = sp.clone();
            sp.push(Elim::App(icit, arg));
            Ok(Rc::new(Val::Neu(*h, sp)))
        }
        // The telescope domain may have been solved since this value was
        // built; recompute before applying.
        Val::LamTel(x, a, t) => {
            let f = v_lam_tel(meta, x.clone(), a.clone(), t.clone())?;
            match &*f {
                Val::LamTel(..) => Err(TypeError::impossible("application of a telescope function")),
                _ => v_app(meta, f, arg, icit),
            }
        }
        _ => Err(TypeError::impossible("application of a non-function value")),
    }
}

/// Apply a telescope function to a record of the telescope `tel`.
pub fn v_app_tel(meta: &MetaCxt, tel: Rc<Val>, fun: Rc<Val>, arg: Rc<Val>) -> TcResult<Rc<Val>> {
    let tel = force(meta, tel)?;
    match &*tel {
        Val::TEmpty => Ok(fun),
        Val::TCons(_, _, rest) => {
            let u1 = v_proj1(meta, arg.clone())?;
            let u2 = v_proj2(meta, arg)?;
            let rest = rest.apply(meta, u1.clone())?;
            let fun = v_app(meta, fun, u1, Icit::Impl)?;
            v_app_tel(meta, rest, fun, u2)
        }
        _ => match &*fun {
            Val::LamTel(_, _, body) => body.apply(meta, arg),
            Val::Neu(h, sp) => {
                let mut sp = sp.clone();
                sp.push(Elim::AppTel(tel.clone(), arg));
                Ok(Rc::new(Val::Neu(*h, sp)))
            }
            _ => Err(TypeError::impossible("telescope application of a non-function value")),
        },
    }
}

pub fn v_proj1(_meta: &MetaCxt, v: Rc<Val>) -> TcResult<Rc<Val>> {
    match &*v {
        Val::Tcons(t, _) => Ok(t.clone()),
        Val::Neu(h, sp) => {
            let mut sp = sp.clone();
            sp.push(Elim::Proj1);
            Ok(Rc::new(Val::Neu(*h, sp)))
        }
        _ => Err(TypeError::impossible("first projection of a non-record value")),
    }
}

pub fn v_proj2(_meta: &MetaCxt, v: Rc<Val>) -> TcResult<Rc<Val>> {
    match &*v {
        Val::Tcons(_, u) => Ok(u.clone()),
        Val::Neu(h, sp) => {
            let mut sp = sp.clone();
            sp.push(Elim::Proj2);
            Ok(Rc::new(Val::Neu(*h, sp)))
        }
        _ => Err(TypeError::impossible("second projection of a non-record value")),
    }
}

/// Computing constructor for telescope function types.
///
/// A `Π` over the empty telescope is its codomain at the empty record; a `Π`
/// over a cons telescope unfolds into an implicit function.
pub fn v_pi_tel(meta: &MetaCxt, name: Name, tel: Rc<Val>, cod: Closure) -> TcResult<Rc<Val>> {
    let tel = force(meta, tel)?;
    match &*tel {
        Val::TEmpty => return cod.apply(meta, Val::rec_empty()),
        Val::TCons(x1, a1, rest) => {
            let (x1, a1, rest) = (x1.clone(), a1.clone(), rest.clone());
            let outer = Closure::new(move |meta, v1| {
                let cod = cod.clone();
                let hd = v1.clone();
                let inner = Closure::new(move |meta, v2| {
                    cod.apply(meta, Rc::new(Val::Tcons(hd.clone(), v2)))
                });
                v_pi_tel(meta, name.clone(), rest.apply(meta, v1)?, inner)
            });
            return Ok(Rc::new(Val::Pi(x1, Icit::Impl, a1, outer)));
        }
        _ => {}
    }
    Ok(Rc::new(Val::PiTel(name, tel, cod)))
}

/// Computing constructor for telescope functions, mirroring `v_pi_tel`.
pub fn v_lam_tel(meta: &MetaCxt, name: Name, tel: Rc<Val>, body: Closure) -> TcResult<Rc<Val>> {
    let tel = force(meta, tel)?;
    match &*tel {
        Val::TEmpty => return body.apply(meta, Val::rec_empty()),
        Val::TCons(x1, a1, rest) => {
            let (x1, a1, rest) = (x1.clone(), a1.clone(), rest.clone());
            let outer = Closure::new(move |meta, v1| {
                let body = body.clone();
                let hd = v1.clone();
                let inner = Closure::new(move |meta, v2| {
                    body.apply(meta, Rc::new(Val::Tcons(hd.clone(), v2)))
                });
                v_lam_tel(meta, name.clone(), rest.apply(meta, v1)?, inner)
            });
            return Ok(Rc::new(Val::Lam(x1, Icit::Impl, a1, outer)));
        }
        _ => {}
    }
    Ok(Rc::new(Val::LamTel(name, tel, body)))
}

/// Apply one eliminator to a value.
pub fn apply_elim(meta: &MetaCxt, v: Rc<Val>, elim: &Elim) -> TcResult<Rc<Val>> {
    match elim {
        Elim::App(icit, u) => v_app(meta, v, u.clone(), *icit),
        Elim::AppTel(a, u) => v_app_tel(meta, a.clone(), v, u.clone()),
        Elim::Proj1 => v_proj1(meta, v),
        Elim::Proj2 => v_proj2(meta, v),
    }
}

/// Apply a whole spine to a value.
pub fn apply_spine(meta: &MetaCxt, v: Rc<Val>, sp: &Spine) -> TcResult<Rc<Val>> {
    sp.iter().try_fold(v, |v, e| apply_elim(meta, v, e))
}

/// Unfold solved metavariable heads and recompute blocked telescope formers
/// until a stable head constructor is exposed.
pub fn force(meta: &MetaCxt, v: Rc<Val>) -> TcResult<Rc<Val>> {
    match &*v {
        Val::Neu(Head::Meta(m), sp) => match meta.solution(*m) {
            Some(sol) => {
                let v = apply_spine(meta, sol, sp)?;
                force(meta, v)
            }
            None => Ok(v.clone()),
        },
        Val::PiTel(x, a, b) => {
            let fa = force(meta, a.clone())?;
            match &*fa {
                Val::TEmpty | Val::TCons(..) => {
                    let v = v_pi_tel(meta, x.clone(), fa.clone(), b.clone())?;
                    force(meta, v)
                }
                _ => Ok(v.clone()),
            }
        }
        Val::LamTel(x, a, b) => {
            let fa = force(meta, a.clone())?;
            match &*fa {
                Val::TEmpty | Val::TCons(..) => {
                    let v = v_lam_tel(meta, x.clone(), fa.clone(), b.clone())?;
                    force(meta, v)
                }
                _ => Ok(v.clone()),
            }
        }
        _ => Ok(v.clone()),
    }
}

/// Re-eliminate a spine onto a head value, unfolding eliminators whose
/// telescope domain has since become concrete.
pub fn force_sp(meta: &MetaCxt, head: Rc<Val>, sp: &Spine) -> TcResult<Rc<Val>> {
    apply_spine(meta, head, sp)
}
