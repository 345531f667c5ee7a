//! Syntactic structural unification modulo definitional equality.
//!
//! Hard cases are delegated to `solve_meta`. Two escape hatches mediate
//! between telescope function types and iterated implicit functions: a
//! telescope Π matched against an implicit Π is refined by prepending the
//! implicit domain to the telescope (guarded by `impl_arity` to prevent
//! oscillation), and a telescope Π matched against anything else collapses to
//! its codomain at the empty telescope.

use std::rc::Rc;

use ast::{Icit, Name, NameOrigin, ToMiette};

use crate::metas::MetaCxt;
use crate::normalizer::eval::{force, force_sp, v_app, v_app_tel, v_pi_tel, Eval};
use crate::normalizer::val::{Closure, Elim, Head, Spine, Val};
use crate::result::{SolveError, TcResult, TypeError};
use crate::typechecker::ctx::Cxt;
use crate::unifier::constancy::new_constancy;
use crate::unifier::solve::{check_sp, fresh_meta, print_val, solve_meta};

/// Unify two values in `cxt`.
pub fn unify(meta: &mut MetaCxt, cxt: &Cxt, l: Rc<Val>, r: Rc<Val>) -> TcResult<()> {
    let fl = force(meta, l)?;
    let fr = force(meta, r)?;
    log::trace!("unify {} =? {}", print_val(meta, cxt, &fl), print_val(meta, cxt, &fr));
    match (&*fl, &*fr) {
        // Lambdas and eta-expansion
        (Val::Lam(x, _, a, t), Val::Lam(_, _, _, t2)) => unify_bind(meta, cxt, x, a, t, t2),
        (Val::Lam(x, i, a, t), _) => {
            let v = Val::var(cxt.len);
            let cxt2 = cxt.bind(x.clone(), NameOrigin::Source, a.clone());
            let lv = t.apply(meta, v.clone())?;
            let rv = v_app(meta, fr.clone(), v, *i)?;
            unify(meta, &cxt2, lv, rv)
        }
        (_, Val::Lam(x, i, a, t)) => {
            let v = Val::var(cxt.len);
            let cxt2 = cxt.bind(x.clone(), NameOrigin::Source, a.clone());
            let lv = v_app(meta, fl.clone(), v.clone(), *i)?;
            let rv = t.apply(meta, v)?;
            unify(meta, &cxt2, lv, rv)
        }

        (Val::Pi(x, i, a, b), Val::Pi(_, i2, a2, b2)) if i == i2 => {
            unify(meta, cxt, a.clone(), a2.clone())?;
            unify_bind(meta, cxt, x, a, b, b2)
        }

        (Val::U, Val::U)
        | (Val::Tel, Val::Tel)
        | (Val::TEmpty, Val::TEmpty)
        | (Val::Tempty, Val::Tempty) => Ok(()),
        (Val::Rec(a), Val::Rec(a2)) => unify(meta, cxt, a.clone(), a2.clone()),
        (Val::TCons(x, a, b), Val::TCons(_, a2, b2)) => {
            unify(meta, cxt, a.clone(), a2.clone())?;
            unify_bind(meta, cxt, x, a, b, b2)
        }
        (Val::Tcons(t, u), Val::Tcons(t2, u2)) => {
            unify(meta, cxt, t.clone(), t2.clone())?;
            unify(meta, cxt, u.clone(), u2.clone())
        }

        (Val::PiTel(x, a, b), Val::PiTel(_, a2, b2)) => {
            unify(meta, cxt, a.clone(), a2.clone())?;
            let rec = Rc::new(Val::Rec(a.clone()));
            unify_bind(meta, cxt, x, &rec, b, b2)
        }
        (Val::LamTel(x, a, t), Val::LamTel(_, _, t2)) => {
            let rec = Rc::new(Val::Rec(a.clone()));
            unify_bind(meta, cxt, x, &rec, t, t2)
        }
        (Val::LamTel(x, a, t), _) => {
            let v = Val::var(cxt.len);
            let cxt2 = cxt.bind(x.clone(), NameOrigin::Source, Rc::new(Val::Rec(a.clone())));
            let lv = t.apply(meta, v.clone())?;
            let rv = v_app_tel(meta, a.clone(), fr.clone(), v)?;
            unify(meta, &cxt2, lv, rv)
        }
        (_, Val::LamTel(x, a, t)) => {
            let v = Val::var(cxt.len);
            let cxt2 = cxt.bind(x.clone(), NameOrigin::Source, Rc::new(Val::Rec(a.clone())));
            let lv = v_app_tel(meta, a.clone(), fl.clone(), v.clone())?;
            let rv = t.apply(meta, v)?;
            unify(meta, &cxt2, lv, rv)
        }

        // Neutrals with equal heads: unify the spines pairwise. The spines
        // are re-eliminated first so that telescope applications whose domain
        // has since become concrete take their unfolded form.
        (Val::Neu(h, sp), Val::Neu(h2, sp2)) if h == h2 => {
            let lv = force_sp(meta, Rc::new(Val::Neu(*h, Vec::new())), sp)?;
            let rv = force_sp(meta, Rc::new(Val::Neu(*h2, Vec::new())), sp2)?;
            match (&*lv, &*rv) {
                (Val::Neu(_, sp), Val::Neu(_, sp2)) => {
                    unify_sp(meta, cxt, sp.clone(), sp2.clone(), &fl, &fr)
                }
                _ => unify(meta, cxt, lv.clone(), rv.clone()),
            }
        }

        // Flex-flex: try to solve the left meta first; fall back to the
        // right on a spine failure. The order is a deliberate heuristic and
        // is not symmetric.
        (Val::Neu(Head::Meta(m), sp), Val::Neu(Head::Meta(m2), sp2)) => {
            match check_sp(meta, sp) {
                Ok(_) => solve_meta(meta, cxt, *m, sp, fr.clone()),
                Err(SolveError::Spine(_)) => solve_meta(meta, cxt, *m2, sp2, fl.clone()),
                Err(SolveError::Strengthening(_)) => {
                    Err(TypeError::impossible("spine check reported a strengthening error"))
                }
                Err(SolveError::Tc(err)) => Err(err),
            }
        }
        (Val::Neu(Head::Meta(m), sp), _) => solve_meta(meta, cxt, *m, sp, fr.clone()),
        (_, Val::Neu(Head::Meta(m), sp)) => solve_meta(meta, cxt, *m, sp, fl.clone()),

        // Telescope/implicit-Π mediation
        (Val::PiTel(x, a, b), Val::Pi(x2, Icit::Impl, a2, b2)) => {
            if impl_arity(meta, cxt, b)? < impl_arity(meta, cxt, b2)? + 1 {
                refine_telescope(meta, cxt, x, a, b, x2, a2, b2, false)
            } else {
                collapse_telescope(meta, cxt, a, b, &fr)
            }
        }
        (Val::Pi(x2, Icit::Impl, a2, b2), Val::PiTel(x, a, b)) => {
            if impl_arity(meta, cxt, b)? < impl_arity(meta, cxt, b2)? + 1 {
                refine_telescope(meta, cxt, x, a, b, x2, a2, b2, true)
            } else {
                collapse_telescope(meta, cxt, a, b, &fl)
            }
        }
        (Val::PiTel(_, a, b), _) => collapse_telescope(meta, cxt, a, b, &fr),
        (_, Val::PiTel(_, a, b)) => collapse_telescope(meta, cxt, a, b, &fl),

        _ => Err(unify_error(meta, cxt, &fl, &fr)),
    }
}

/// Decorate unification failures with the sides the caller originally
/// equated.
pub fn unify_while(meta: &mut MetaCxt, cxt: &Cxt, l: Rc<Val>, r: Rc<Val>) -> TcResult<()> {
    unify(meta, cxt, l.clone(), r.clone()).map_err(|inner| {
        Box::new(TypeError::UnifyErrorWhile {
            lhs: print_val(meta, cxt, &l),
            rhs: print_val(meta, cxt, &r),
            span: cxt.span.to_miette(),
            inner,
        })
    })
}

fn unify_bind(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    x: &Name,
    a: &Rc<Val>,
    t: &Closure,
    t2: &Closure,
) -> TcResult<()> {
    let v = Val::var(cxt.len);
    let cxt2 = cxt.bind(x.clone(), NameOrigin::Source, a.clone());
    let lv = t.apply(meta, v.clone())?;
    let rv = t2.apply(meta, v)?;
    unify(meta, &cxt2, lv, rv)
}

fn unify_sp(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    sp: Spine,
    sp2: Spine,
    l: &Rc<Val>,
    r: &Rc<Val>,
) -> TcResult<()> {
    if sp.len() != sp2.len() {
        return Err(unify_error(meta, cxt, l, r));
    }
    for (e, e2) in sp.iter().zip(sp2.iter()) {
        match (e, e2) {
            (Elim::App(i, u), Elim::App(i2, u2)) if i == i2 => {
                unify(meta, cxt, u.clone(), u2.clone())?
            }
            (Elim::AppTel(_, u), Elim::AppTel(_, u2)) => {
                unify(meta, cxt, u.clone(), u2.clone())?
            }
            (Elim::Proj1, Elim::Proj1) | (Elim::Proj2, Elim::Proj2) => {}
            _ => return Err(unify_error(meta, cxt, l, r)),
        }
    }
    Ok(())
}

/// Number of implicit Π binders at the head of `b` applied to a fresh
/// variable. Guards telescope refinement against oscillating with implicit
/// peeling.
fn impl_arity(meta: &MetaCxt, cxt: &Cxt, b: &Closure) -> TcResult<usize> {
    let mut arity = 0;
    let mut depth = cxt.len.succ();
    let mut v = b.apply(meta, Val::var(cxt.len))?;
    loop {
        let fv = force(meta, v)?;
        match &*fv {
            Val::Pi(_, Icit::Impl, _, b2) => {
                arity += 1;
                v = b2.apply(meta, Val::var(depth))?;
                depth = depth.succ();
            }
            _ => break,
        }
    }
    Ok(arity)
}

/// Refine the telescope `a` by prepending the implicit domain `a2`: allocate
/// a fresh telescope meta under `x2 : a2`, unify `a` with the extended cons
/// telescope, attach a constancy constraint for the new tail and unify the
/// two codomains with `x2` bound.
#[allow(clippy::too_many_arguments)]
fn refine_telescope(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    x: &Name,
    a: &Rc<Val>,
    b: &Closure,
    x2: &Name,
    a2: &Rc<Val>,
    b2: &Closure,
    swapped: bool,
) -> TcResult<()> {
    let cxt2 = cxt.bind(x2.clone(), NameOrigin::Inserted, a2.clone());
    let m_tm = fresh_meta(meta, &cxt2, Val::tel())?;
    let vm = m_tm.eval(meta, &cxt2.vals)?;
    let lifted = cxt.lift_val(meta, vm.clone())?;
    unify(meta, cxt, a.clone(), Rc::new(Val::TCons(x2.clone(), a2.clone(), lifted)))?;

    let x2_var = Val::var(cxt.len);
    let rest_cod = {
        let b = b.clone();
        let hd = x2_var.clone();
        Closure::new(move |meta, u| b.apply(meta, Rc::new(Val::Tcons(hd.clone(), u))))
    };
    new_constancy(meta, &cxt2, vm.clone(), &rest_cod)?;

    let tel_side = v_pi_tel(meta, x.clone(), vm, rest_cod)?;
    let pi_side = b2.apply(meta, x2_var)?;
    if swapped {
        unify(meta, &cxt2, pi_side, tel_side)
    } else {
        unify(meta, &cxt2, tel_side, pi_side)
    }
}

/// Collapse an empty telescope Π to its codomain.
fn collapse_telescope(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    a: &Rc<Val>,
    b: &Closure,
    other: &Rc<Val>,
) -> TcResult<()> {
    unify(meta, cxt, a.clone(), Val::tel_empty())?;
    let body = b.apply(meta, Val::rec_empty())?;
    unify(meta, cxt, body, other.clone())
}

fn unify_error(meta: &MetaCxt, cxt: &Cxt, l: &Rc<Val>, r: &Rc<Val>) -> Box<TypeError> {
    Box::new(TypeError::UnifyError {
        names: cxt.names.clone(),
        lhs: print_val(meta, cxt, l),
        rhs: print_val(meta, cxt, r),
        span: cxt.span.to_miette(),
    })
}
