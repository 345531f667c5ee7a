//! Reading values back into core terms.

use std::rc::Rc;

use ast::{Lvl, Tm};

use crate::metas::MetaCxt;
use crate::normalizer::eval::force;
use crate::normalizer::val::{Closure, Elim, Head, Val};
use crate::result::TcResult;

pub trait Quote {
    fn quote(&self, meta: &MetaCxt, depth: Lvl) -> TcResult<Rc<Tm>>;
}

impl Quote for Rc<Val> {
    fn quote(&self, meta: &MetaCxt, depth: Lvl) -> TcResult<Rc<Tm>> {
        let v = force(meta, self.clone())?;
        match &*v {
            Val::Neu(h, sp) => {
                let head = match h {
                    Head::Var(l) => Rc::new(Tm::Var(l.to_idx(depth))),
                    Head::Meta(m) => Rc::new(Tm::Meta(*m)),
                };
                sp.iter().try_fold(head, |acc, e| {
                    Ok(match e {
                        Elim::App(icit, u) => Rc::new(Tm::App {
                            fun: acc,
                            arg: u.quote(meta, depth)?,
                            icit: *icit,
                        }),
                        Elim::AppTel(a, u) => Rc::new(Tm::AppTel {
                            tel: a.quote(meta, depth)?,
                            fun: acc,
                            arg: u.quote(meta, depth)?,
                        }),
                        Elim::Proj1 => Rc::new(Tm::Proj1(acc)),
                        Elim::Proj2 => Rc::new(Tm::Proj2(acc)),
                    })
                })
            }
            Val::U => Ok(Rc::new(Tm::U)),
            Val::Pi(x, i, a, b) => Ok(Rc::new(Tm::Pi {
                name: x.clone(),
                icit: *i,
                dom: a.quote(meta, depth)?,
                cod: quote_bind(meta, depth, b)?,
            })),
            Val::Lam(x, i, a, t) => Ok(Rc::new(Tm::Lam {
                name: x.clone(),
                icit: *i,
                ty: a.quote(meta, depth)?,
                body: quote_bind(meta, depth, t)?,
            })),
            Val::Tel => Ok(Rc::new(Tm::Tel)),
            Val::TEmpty => Ok(Rc::new(Tm::TEmpty)),
            Val::TCons(x, a, rest) => Ok(Rc::new(Tm::TCons {
                name: x.clone(),
                ty: a.quote(meta, depth)?,
                rest: quote_bind(meta, depth, rest)?,
            })),
            Val::Rec(a) => Ok(Rc::new(Tm::Rec(a.quote(meta, depth)?))),
            Val::Tempty => Ok(Rc::new(Tm::Tempty)),
            Val::Tcons(t, u) => Ok(Rc::new(Tm::Tcons {
                head: t.quote(meta, depth)?,
                tail: u.quote(meta, depth)?,
            })),
            Val::PiTel(x, a, b) => Ok(Rc::new(Tm::PiTel {
                name: x.clone(),
                dom: a.quote(meta, depth)?,
                cod: quote_bind(meta, depth, b)?,
            })),
            Val::LamTel(x, a, t) => Ok(Rc::new(Tm::LamTel {
                name: x.clone(),
                dom: a.quote(meta, depth)?,
                body: quote_bind(meta, depth, t)?,
            })),
        }
    }
}

fn quote_bind(meta: &MetaCxt, depth: Lvl, body: &Closure) -> TcResult<Rc<Tm>> {
    let v = body.apply(meta, Val::var(depth))?;
    v.quote(meta, depth.succ())
}
