//! Bidirectional elaboration.
//!
//! `check` pushes an expected type into a surface term, inserting implicit
//! lambdas and, under a meta-typed checking position, a telescope lambda;
//! `infer` synthesizes a type, inserting implicit arguments after the fact.

use std::rc::Rc;

use log::trace;

use ast::{Icit, Idx, Name, NameOrigin, Raw, Tm, ToMiette};

use crate::metas::MetaCxt;
use crate::normalizer::eval::{force, Eval};
use crate::normalizer::quote::Quote;
use crate::normalizer::val::{Closure, Head, Val};
use crate::result::{TcResult, TypeError};
use crate::typechecker::ctx::Cxt;
use crate::unifier::constancy::new_constancy;
use crate::unifier::solve::fresh_meta;
use crate::unifier::unify::unify_while;

#[cfg(feature = "strict-app")]
use crate::unifier::solve::print_val;

/// Bidirectional type checking and inference for surface terms.
///
/// ```text
///     Γ ⊢ t ⇐ A      Γ ⊢ t ⇒ A
/// ```
pub trait CheckInfer {
    fn check(&self, meta: &mut MetaCxt, cxt: &Cxt, expected: Rc<Val>) -> TcResult<Rc<Tm>>;
    fn infer(&self, meta: &mut MetaCxt, cxt: &Cxt) -> TcResult<(Rc<Tm>, Rc<Val>)>;
}

impl CheckInfer for Raw {
    fn check(&self, meta: &mut MetaCxt, cxt: &Cxt, expected: Rc<Val>) -> TcResult<Rc<Tm>> {
        let fe = force(meta, expected.clone())?;
        match (self, &*fe) {
            (Raw::SrcPos { span, inner }, _) => {
                inner.check(meta, &cxt.with_pos(*span), expected)
            }

            (Raw::Lam { name, ann, icit, body }, Val::Pi(_, i2, a, b)) if icit == i2 => {
                let ann_tm = match ann {
                    Some(ann) => {
                        let ann_tm = ann.check(meta, cxt, Val::u())?;
                        let va = ann_tm.eval(meta, &cxt.vals)?;
                        unify_while(meta, cxt, va, a.clone())?;
                        ann_tm
                    }
                    None => a.quote(meta, cxt.len)?,
                };
                let bv = b.apply(meta, Val::var(cxt.len))?;
                let cxt2 = cxt.bind_src(name.clone(), a.clone());
                let body_tm = body.check(meta, &cxt2, bv)?;
                Ok(Rc::new(Tm::Lam {
                    name: name.clone(),
                    icit: *icit,
                    ty: ann_tm,
                    body: body_tm,
                }))
            }

            // The expected type wants an implicit argument the term does not
            // bind: insert an implicit lambda.
            (_, Val::Pi(x, Icit::Impl, a, b)) => {
                let bv = b.apply(meta, Val::var(cxt.len))?;
                let cxt2 = cxt.bind(x.clone(), NameOrigin::Inserted, a.clone());
                let body_tm = self.check(meta, &cxt2, bv)?;
                Ok(Rc::new(Tm::Lam {
                    name: x.clone(),
                    icit: Icit::Impl,
                    ty: a.quote(meta, cxt.len)?,
                    body: body_tm,
                }))
            }

            // The expected type is an unknown meta: insert a telescope
            // lambda, so that the term may later be generalized over an
            // arbitrary number of implicit arguments.
            (_, Val::Neu(Head::Meta(_), _)) => {
                let name: Name = format!("Γ{}", meta.next_mid());
                let dom_tm = fresh_meta(meta, cxt, Val::tel())?;
                let vdom = dom_tm.eval(meta, &cxt.vals)?;
                let cxt2 =
                    cxt.bind(name.clone(), NameOrigin::Inserted, Rc::new(Val::Rec(vdom.clone())));
                let inferred = self.infer(meta, &cxt2)?;
                let (body_tm, a) = insert(meta, &cxt2, inferred)?;
                let lifted = cxt.lift_val(meta, a)?;
                new_constancy(meta, cxt, vdom.clone(), &lifted)?;
                unify_while(
                    meta,
                    cxt,
                    expected,
                    Rc::new(Val::PiTel(name.clone(), vdom, lifted)),
                )?;
                Ok(Rc::new(Tm::LamTel { name, dom: dom_tm, body: body_tm }))
            }

            (Raw::Let { name, ann, val, body }, _) => {
                let a = ann.check(meta, cxt, Val::u())?;
                let va = a.eval(meta, &cxt.vals)?;
                let t = val.check(meta, cxt, va.clone())?;
                let vt = t.eval(meta, &cxt.vals)?;
                let cxt2 = cxt.define(name.clone(), va, vt);
                let u = body.check(meta, &cxt2, expected)?;
                Ok(Rc::new(Tm::Let { name: name.clone(), ty: a, val: t, body: u }))
            }

            (Raw::Hole, _) => fresh_meta(meta, cxt, expected),

            _ => {
                let inferred = self.infer(meta, cxt)?;
                let (t, va) = insert(meta, cxt, inferred)?;
                unify_while(meta, cxt, expected, va)?;
                Ok(t)
            }
        }
    }

    fn infer(&self, meta: &mut MetaCxt, cxt: &Cxt) -> TcResult<(Rc<Tm>, Rc<Val>)> {
        match self {
            Raw::SrcPos { span, inner } => inner.infer(meta, &cxt.with_pos(*span)),

            // Type-in-type by design.
            Raw::Univ => Ok((Rc::new(Tm::U), Val::u())),

            Raw::Var(x) => {
                for i in 0..cxt.len.0 {
                    let pos = cxt.len.0 - 1 - i;
                    if cxt.origins[pos] == NameOrigin::Source
                        && (cxt.names[pos] == *x || cxt.names[pos] == format!("*{x}"))
                    {
                        let ty = cxt.types[pos].ty().clone();
                        trace!("var {x} resolved to index {i}");
                        return Ok((Rc::new(Tm::Var(Idx(i))), ty));
                    }
                }
                Err(Box::new(TypeError::NameNotInScope {
                    name: x.clone(),
                    span: cxt.span.to_miette(),
                }))
            }

            Raw::Pi { name, icit, dom, cod } => {
                let a = dom.check(meta, cxt, Val::u())?;
                let va = a.eval(meta, &cxt.vals)?;
                let cxt2 = cxt.bind_src(name.clone(), va);
                let b = cod.check(meta, &cxt2, Val::u())?;
                Ok((
                    Rc::new(Tm::Pi { name: name.clone(), icit: *icit, dom: a, cod: b }),
                    Val::u(),
                ))
            }

            Raw::App { fun, arg, icit } => infer_app(meta, cxt, fun, arg, *icit),

            Raw::Lam { name, ann, icit, body } => {
                let a = match ann {
                    Some(ann) => ann.check(meta, cxt, Val::u())?,
                    None => fresh_meta(meta, cxt, Val::u())?,
                };
                let va = a.eval(meta, &cxt.vals)?;
                let cxt2 = cxt.bind_src(name.clone(), va.clone());
                let inferred = body.infer(meta, &cxt2)?;
                let (t, b) = insert(meta, &cxt2, inferred)?;
                let b_cl = cxt.lift_val(meta, b)?;
                Ok((
                    Rc::new(Tm::Lam { name: name.clone(), icit: *icit, ty: a, body: t }),
                    Rc::new(Val::Pi(name.clone(), *icit, va, b_cl)),
                ))
            }

            Raw::Let { name, ann, val, body } => {
                let a = ann.check(meta, cxt, Val::u())?;
                let va = a.eval(meta, &cxt.vals)?;
                let t = val.check(meta, cxt, va.clone())?;
                let vt = t.eval(meta, &cxt.vals)?;
                let cxt2 = cxt.define(name.clone(), va, vt);
                let (u, bty) = body.infer(meta, &cxt2)?;
                Ok((Rc::new(Tm::Let { name: name.clone(), ty: a, val: t, body: u }), bty))
            }

            Raw::Hole => {
                let a = fresh_meta(meta, cxt, Val::u())?;
                let va = a.eval(meta, &cxt.vals)?;
                let t = fresh_meta(meta, cxt, va.clone())?;
                Ok((t, va))
            }
        }
    }
}

/// After an inference, peel implicit Π layers by applying fresh metas.
pub fn insert_all(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    (mut t, mut va): (Rc<Tm>, Rc<Val>),
) -> TcResult<(Rc<Tm>, Rc<Val>)> {
    loop {
        let fva = force(meta, va)?;
        match &*fva {
            Val::Pi(_, Icit::Impl, a, b) => {
                let m_tm = fresh_meta(meta, cxt, a.clone())?;
                let mv = m_tm.eval(meta, &cxt.vals)?;
                t = Rc::new(Tm::App { fun: t, arg: m_tm, icit: Icit::Impl });
                va = b.apply(meta, mv)?;
            }
            _ => return Ok((t, fva.clone())),
        }
    }
}

/// Like [insert_all], but leaves a surface implicit lambda unpeeled.
pub fn insert(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    (t, va): (Rc<Tm>, Rc<Val>),
) -> TcResult<(Rc<Tm>, Rc<Val>)> {
    if let Tm::Lam { icit: Icit::Impl, .. } = &*t {
        return Ok((t, va));
    }
    insert_all(meta, cxt, (t, va))
}

fn infer_app(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    fun: &Raw,
    arg: &Raw,
    icit: Icit,
) -> TcResult<(Rc<Tm>, Rc<Val>)> {
    let (t, va) = match icit {
        Icit::Impl => fun.infer(meta, cxt)?,
        Icit::Expl => {
            let inferred = fun.infer(meta, cxt)?;
            insert_all(meta, cxt, inferred)?
        }
    };
    let (dom, cod) = ensure_fun(meta, cxt, va, icit)?;
    let u = arg.check(meta, cxt, dom)?;
    let vu = u.eval(meta, &cxt.vals)?;
    let ty = cod.apply(meta, vu)?;
    Ok((Rc::new(Tm::App { fun: t, arg: u, icit }), ty))
}

/// Make sure an inferred head type is a function type with the requested
/// icitness by unifying it against a Π of two fresh metas.
#[cfg(not(feature = "strict-app"))]
fn ensure_fun(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    va: Rc<Val>,
    icit: Icit,
) -> TcResult<(Rc<Val>, Closure)> {
    fresh_fun(meta, cxt, va, icit)
}

/// Head-directed variant: inspect the head former and fail outright when it
/// is not a function type.
#[cfg(feature = "strict-app")]
fn ensure_fun(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    va: Rc<Val>,
    icit: Icit,
) -> TcResult<(Rc<Val>, Closure)> {
    let fva = force(meta, va.clone())?;
    match &*fva {
        Val::Pi(_, i2, a, b) => {
            if *i2 != icit {
                return Err(Box::new(TypeError::IcitMismatch {
                    expected: *i2,
                    got: icit,
                    span: cxt.span.to_miette(),
                }));
            }
            Ok((a.clone(), b.clone()))
        }
        Val::Neu(Head::Meta(_), _) => fresh_fun(meta, cxt, fva.clone(), icit),
        _ => Err(Box::new(TypeError::ExpectedFunction {
            got: print_val(meta, cxt, &fva),
            span: cxt.span.to_miette(),
        })),
    }
}

fn fresh_fun(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    va: Rc<Val>,
    icit: Icit,
) -> TcResult<(Rc<Val>, Closure)> {
    let a0 = fresh_meta(meta, cxt, Val::u())?;
    let va0 = a0.eval(meta, &cxt.vals)?;
    let cxt2 = cxt.bind("x".to_owned(), NameOrigin::Inserted, va0.clone());
    let a1 = fresh_meta(meta, &cxt2, Val::u())?;
    let cod = Closure::bind(cxt.vals.clone(), a1);
    unify_while(
        meta,
        cxt,
        va,
        Rc::new(Val::Pi("x".to_owned(), icit, va0.clone(), cod.clone())),
    )?;
    Ok((va0, cod))
}

/// Infer the type of a top-level term, treating a leading block of lambdas as
/// postulates: their names are stored with a `*` prefix so ordinary variable
/// lookup still finds them. The elaborated term is a nest of ordinary
/// lambdas.
pub fn infer_top_lams(meta: &mut MetaCxt, cxt: &Cxt, raw: &Raw) -> TcResult<(Rc<Tm>, Rc<Val>)> {
    match raw {
        Raw::SrcPos { span, inner } => infer_top_lams(meta, &cxt.with_pos(*span), inner),
        Raw::Lam { name, ann, icit, body } => {
            let a = match ann {
                Some(ann) => ann.check(meta, cxt, Val::u())?,
                None => fresh_meta(meta, cxt, Val::u())?,
            };
            let va = a.eval(meta, &cxt.vals)?;
            let cxt2 = cxt.bind_src(format!("*{name}"), va.clone());
            let (t, b) = infer_top_lams(meta, &cxt2, body)?;
            let b_cl = cxt.lift_val(meta, b)?;
            Ok((
                Rc::new(Tm::Lam { name: name.clone(), icit: *icit, ty: a, body: t }),
                Rc::new(Val::Pi(name.clone(), *icit, va, b_cl)),
            ))
        }
        raw => {
            let inferred = raw.infer(meta, cxt)?;
            insert(meta, cxt, inferred)
        }
    }
}
