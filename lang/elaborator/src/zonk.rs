//! Zonking: substituting solved metavariables throughout a term.
//!
//! This is a post-pass for printing, not part of the core. Application spines
//! whose head turns out to be a solved meta are evaluated and quoted back so
//! the solution is beta-reduced into place.

use std::rc::Rc;

use ast::{Lvl, Tm};

use crate::metas::MetaCxt;
use crate::normalizer::env::Env;
use crate::normalizer::eval::{v_app, v_app_tel, Eval};
use crate::normalizer::quote::Quote;
use crate::normalizer::val::Val;
use crate::result::TcResult;

pub trait Zonk {
    fn zonk(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Tm>>;
}

/// Result of zonking the head of an application spine: either a value to
/// keep reducing with, or an already-zonked term.
enum SpineHead {
    Reduce(Rc<Val>),
    Keep(Rc<Tm>),
}

impl Zonk for Tm {
    fn zonk(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Tm>> {
        match self {
            Tm::Var(idx) => Ok(Rc::new(Tm::Var(*idx))),
            Tm::U => Ok(Rc::new(Tm::U)),
            Tm::Tel => Ok(Rc::new(Tm::Tel)),
            Tm::TEmpty => Ok(Rc::new(Tm::TEmpty)),
            Tm::Tempty => Ok(Rc::new(Tm::Tempty)),
            Tm::Meta(m) => match meta.solution(*m) {
                Some(v) => v.quote(meta, Lvl(env.len())),
                None => Ok(Rc::new(Tm::Meta(*m))),
            },
            Tm::App { .. } | Tm::AppTel { .. } => match zonk_spine(self, meta, env)? {
                SpineHead::Reduce(v) => v.quote(meta, Lvl(env.len())),
                SpineHead::Keep(t) => Ok(t),
            },
            Tm::Let { name, ty, val, body } => Ok(Rc::new(Tm::Let {
                name: name.clone(),
                ty: ty.zonk(meta, env)?,
                val: val.zonk(meta, env)?,
                body: body.zonk(meta, &env.skipped())?,
            })),
            Tm::Pi { name, icit, dom, cod } => Ok(Rc::new(Tm::Pi {
                name: name.clone(),
                icit: *icit,
                dom: dom.zonk(meta, env)?,
                cod: cod.zonk(meta, &env.skipped())?,
            })),
            Tm::Lam { name, icit, ty, body } => Ok(Rc::new(Tm::Lam {
                name: name.clone(),
                icit: *icit,
                ty: ty.zonk(meta, env)?,
                body: body.zonk(meta, &env.skipped())?,
            })),
            Tm::Skip(body) => Ok(Rc::new(Tm::Skip(body.zonk(meta, &env.skipped())?))),
            Tm::TCons { name, ty, rest } => Ok(Rc::new(Tm::TCons {
                name: name.clone(),
                ty: ty.zonk(meta, env)?,
                rest: rest.zonk(meta, &env.skipped())?,
            })),
            Tm::Rec(t) => Ok(Rc::new(Tm::Rec(t.zonk(meta, env)?))),
            Tm::Tcons { head, tail } => Ok(Rc::new(Tm::Tcons {
                head: head.zonk(meta, env)?,
                tail: tail.zonk(meta, env)?,
            })),
            Tm::Proj1(t) => Ok(Rc::new(Tm::Proj1(t.zonk(meta, env)?))),
            Tm::Proj2(t) => Ok(Rc::new(Tm::Proj2(t.zonk(meta, env)?))),
            Tm::PiTel { name, dom, cod } => Ok(Rc::new(Tm::PiTel {
                name: name.clone(),
                dom: dom.zonk(meta, env)?,
                cod: cod.zonk(meta, &env.skipped())?,
            })),
            Tm::LamTel { name, dom, body } => Ok(Rc::new(Tm::LamTel {
                name: name.clone(),
                dom: dom.zonk(meta, env)?,
                body: body.zonk(meta, &env.skipped())?,
            })),
        }
    }
}

impl Zonk for Rc<Tm> {
    fn zonk(&self, meta: &MetaCxt, env: &Env) -> TcResult<Rc<Tm>> {
        (**self).zonk(meta, env)
    }
}

fn zonk_spine(t: &Tm, meta: &MetaCxt, env: &Env) -> TcResult<SpineHead> {
    match t {
        Tm::Meta(m) => match meta.solution(*m) {
            Some(v) => Ok(SpineHead::Reduce(v)),
            None => Ok(SpineHead::Keep(Rc::new(Tm::Meta(*m)))),
        },
        Tm::App { fun, arg, icit } => match zonk_spine(fun, meta, env)? {
            SpineHead::Reduce(f) => {
                let u = arg.eval(meta, env)?;
                Ok(SpineHead::Reduce(v_app(meta, f, u, *icit)?))
            }
            SpineHead::Keep(f) => Ok(SpineHead::Keep(Rc::new(Tm::App {
                fun: f,
                arg: arg.zonk(meta, env)?,
                icit: *icit,
            }))),
        },
        Tm::AppTel { tel, fun, arg } => match zonk_spine(fun, meta, env)? {
            SpineHead::Reduce(f) => {
                let a = tel.eval(meta, env)?;
                let u = arg.eval(meta, env)?;
                Ok(SpineHead::Reduce(v_app_tel(meta, a, f, u)?))
            }
            SpineHead::Keep(f) => Ok(SpineHead::Keep(Rc::new(Tm::AppTel {
                tel: tel.zonk(meta, env)?,
                fun: f,
                arg: arg.zonk(meta, env)?,
            }))),
        },
        t => Ok(SpineHead::Keep(t.zonk(meta, env)?)),
    }
}
