//! Metavariable solving.
//!
//! A meta-headed equation `?m sp =? rhs` is solved in three steps: the spine
//! is checked against the pattern condition (`check_sp`), the right-hand side
//! is strengthened into the meta's scope under the resulting partial renaming
//! (with pruning of out-of-scope meta arguments and an occurs check), and the
//! result is wrapped in lambdas matching the meta's closed type.
//!
//! Based on:
//!
//! * Andreas Abel, and Brigitte Pientka. "Higher-order dynamic pattern
//!   unification for dependent types and records." (2011)
//! * András Kovács's elaboration-zoo (https://github.com/AndrasKovacs/elaboration-zoo)

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ast::{Icit, Idx, Lvl, MetaVar, Name, Tm, ToMiette};
use printer::Print;

use crate::metas::{MetaCxt, MetaEntry};
use crate::normalizer::env::Env;
use crate::normalizer::eval::{force, Eval};
use crate::normalizer::quote::Quote;
use crate::normalizer::val::{Closure, Elim, Head, Spine, Val};
use crate::result::{SolveError, SpineError, StrengtheningError, TcResult, TypeError};
use crate::typechecker::ctx::{Cxt, TyEntry};
use crate::unifier::constancy::try_constancy;

/// A partial renaming from bound levels to bound levels, together with the
/// sizes of its codomain and domain and an optional occurs-check meta.
#[derive(Debug, Clone)]
pub struct Str {
    /// Size of the target scope.
    pub dom: usize,
    /// Size of the source scope.
    pub cod: usize,
    /// Map from source levels to target levels; a level outside the map is
    /// out of scope.
    pub ren: HashMap<usize, usize>,
    /// Meta whose occurrence makes the solution circular.
    pub occ: Option<MetaVar>,
}

impl Str {
    pub fn new(dom: usize, cod: usize, ren: HashMap<usize, usize>, occ: Option<MetaVar>) -> Self {
        Str { dom, cod, ren, occ }
    }

    /// Extend both scopes, mapping the new source level to the new target
    /// level.
    pub fn lift(&self) -> Str {
        let mut ren = self.ren.clone();
        ren.insert(self.cod, self.dom);
        Str { dom: self.dom + 1, cod: self.cod + 1, ren, occ: self.occ }
    }

    /// Advance only the source scope, leaving a gap in the renaming.
    pub fn skip(&self) -> Str {
        Str { dom: self.dom, cod: self.cod + 1, ren: self.ren.clone(), occ: self.occ }
    }
}

/// Check that a spine is a variable substitution: every eliminator must be an
/// application and every argument a distinct bound variable. Returns the
/// inverse renaming, the spine length and the argument levels in order.
pub fn check_sp(
    meta: &MetaCxt,
    sp: &Spine,
) -> Result<(HashMap<usize, usize>, usize, Vec<Lvl>), SolveError> {
    let mut ren = HashMap::new();
    let mut vars = Vec::new();
    for elim in sp {
        match elim {
            Elim::App(_, u) | Elim::AppTel(_, u) => {
                let u = force(meta, u.clone())?;
                match &*u {
                    Val::Neu(Head::Var(x), sp) if sp.is_empty() => {
                        if ren.insert(x.0, vars.len()).is_some() {
                            return Err(SpineError::NonLinear(*x).into());
                        }
                        vars.push(*x);
                    }
                    _ => return Err(SpineError::NonVariable.into()),
                }
            }
            Elim::Proj1 | Elim::Proj2 => return Err(SpineError::Projection.into()),
        }
    }
    let len = vars.len();
    Ok((ren, len, vars))
}

/// Re-quote a value as a core term under a partial renaming.
///
/// Fails with a scope error if a bound variable outside the renaming occurs,
/// and with an occurs-check failure on `str_.occ`. Out-of-scope variables
/// inside the spine of another metavariable are pruned away instead of
/// failing; this is the sole producer of meta solutions reachable from
/// unification.
pub fn strengthen(meta: &mut MetaCxt, str_: &Str, v: Rc<Val>) -> Result<Rc<Tm>, SolveError> {
    let fv = force(meta, v)?;
    match &*fv {
        Val::Neu(Head::Var(x), sp) => match str_.ren.get(&x.0) {
            None => Err(StrengtheningError::ScopeError(*x).into()),
            Some(&x2) => {
                let head = Rc::new(Tm::Var(Idx(str_.dom - x2 - 1)));
                strengthen_sp(meta, str_, head, sp)
            }
        },
        Val::Neu(Head::Meta(m), sp) => {
            if str_.occ == Some(*m) {
                return Err(StrengtheningError::OccursCheck.into());
            }
            prune(meta, str_, *m, sp)?;
            // Pruning may have solved `m`; re-force to expose the result.
            let fv = force(meta, fv.clone())?;
            match &*fv {
                Val::Neu(Head::Meta(m), sp) => {
                    strengthen_sp(meta, str_, Rc::new(Tm::Meta(*m)), sp)
                }
                _ => strengthen(meta, str_, fv.clone()),
            }
        }
        Val::U => Ok(Rc::new(Tm::U)),
        Val::Pi(x, i, a, b) => Ok(Rc::new(Tm::Pi {
            name: x.clone(),
            icit: *i,
            dom: strengthen(meta, str_, a.clone())?,
            cod: strengthen_bind(meta, str_, b)?,
        })),
        Val::Lam(x, i, a, t) => Ok(Rc::new(Tm::Lam {
            name: x.clone(),
            icit: *i,
            ty: strengthen(meta, str_, a.clone())?,
            body: strengthen_bind(meta, str_, t)?,
        })),
        Val::Tel => Ok(Rc::new(Tm::Tel)),
        Val::TEmpty => Ok(Rc::new(Tm::TEmpty)),
        Val::TCons(x, a, rest) => Ok(Rc::new(Tm::TCons {
            name: x.clone(),
            ty: strengthen(meta, str_, a.clone())?,
            rest: strengthen_bind(meta, str_, rest)?,
        })),
        Val::Rec(a) => Ok(Rc::new(Tm::Rec(strengthen(meta, str_, a.clone())?))),
        Val::Tempty => Ok(Rc::new(Tm::Tempty)),
        Val::Tcons(t, u) => Ok(Rc::new(Tm::Tcons {
            head: strengthen(meta, str_, t.clone())?,
            tail: strengthen(meta, str_, u.clone())?,
        })),
        Val::PiTel(x, a, b) => Ok(Rc::new(Tm::PiTel {
            name: x.clone(),
            dom: strengthen(meta, str_, a.clone())?,
            cod: strengthen_bind(meta, str_, b)?,
        })),
        Val::LamTel(x, a, t) => Ok(Rc::new(Tm::LamTel {
            name: x.clone(),
            dom: strengthen(meta, str_, a.clone())?,
            body: strengthen_bind(meta, str_, t)?,
        })),
    }
}

fn strengthen_bind(
    meta: &mut MetaCxt,
    str_: &Str,
    body: &Closure,
) -> Result<Rc<Tm>, SolveError> {
    let v = body.apply(meta, Val::var(Lvl(str_.cod)))?;
    strengthen(meta, &str_.lift(), v)
}

fn strengthen_sp(
    meta: &mut MetaCxt,
    str_: &Str,
    head: Rc<Tm>,
    sp: &Spine,
) -> Result<Rc<Tm>, SolveError> {
    sp.iter().try_fold(head, |acc, elim| {
        Ok(match elim {
            Elim::App(icit, u) => Rc::new(Tm::App {
                fun: acc,
                arg: strengthen(meta, str_, u.clone())?,
                icit: *icit,
            }),
            Elim::AppTel(a, u) => Rc::new(Tm::AppTel {
                tel: strengthen(meta, str_, a.clone())?,
                fun: acc,
                arg: strengthen(meta, str_, u.clone())?,
            }),
            Elim::Proj1 => Rc::new(Tm::Proj1(acc)),
            Elim::Proj2 => Rc::new(Tm::Proj2(acc)),
        })
    })
}

/// Replace `m` by a fresh meta of smaller arity when some of its spine
/// arguments are out of scope for the current renaming. If the spine is not a
/// pure variable spine nothing happens here and the subsequent traversal may
/// still fail with a scope error.
fn prune(meta: &mut MetaCxt, str_: &Str, m: MetaVar, sp: &Spine) -> Result<(), SolveError> {
    let mut mask: Vec<bool> = Vec::with_capacity(sp.len());
    for elim in sp {
        match elim {
            Elim::App(_, u) | Elim::AppTel(_, u) => {
                let u = force(meta, u.clone())?;
                match &*u {
                    Val::Neu(Head::Var(x), sp) if sp.is_empty() => {
                        mask.push(str_.ren.contains_key(&x.0));
                    }
                    _ => return Ok(()),
                }
            }
            Elim::Proj1 | Elim::Proj2 => return Ok(()),
        }
    }
    if mask.iter().all(|&keep| keep) {
        return Ok(());
    }

    log::trace!("pruning metavariable {m}");
    let meta_ty = match meta.lookup(m) {
        MetaEntry::Unsolved { ty, .. } => ty.clone(),
        _ => return Err(TypeError::impossible("pruning a solved metavariable").into()),
    };

    let pruned_ty = prune_ty(meta, &mask, &Str::new(0, 0, HashMap::new(), None), meta_ty.clone())?;
    let pruned_vty = pruned_ty.eval(meta, &Env::empty())?;
    let m2 = meta.fresh(MetaEntry::Unsolved { blockers: HashSet::new(), ty: pruned_vty });

    let body = pruned_body(meta, &mask, meta_ty.clone(), m2)?;
    let solution = closing_tm(meta, meta_ty, mask.len(), &[], body)?;
    let solution = solution.eval(meta, &Env::empty())?;
    meta.write(m, MetaEntry::Solved(solution));
    Ok(())
}

/// The type of the pruned replacement meta: the original type with the
/// dropped binders removed, strengthened through the Π/telescope-Π prefix.
fn prune_ty(
    meta: &mut MetaCxt,
    mask: &[bool],
    str_: &Str,
    ty: Rc<Val>,
) -> Result<Rc<Tm>, SolveError> {
    let Some((&keep, rest)) = mask.split_first() else {
        return strengthen(meta, str_, ty);
    };
    let fty = force(meta, ty)?;
    match &*fty {
        Val::Pi(x, i, a, b) => {
            let bv = b.apply(meta, Val::var(Lvl(str_.cod)))?;
            if keep {
                Ok(Rc::new(Tm::Pi {
                    name: x.clone(),
                    icit: *i,
                    dom: strengthen(meta, str_, a.clone())?,
                    cod: prune_ty(meta, rest, &str_.lift(), bv)?,
                }))
            } else {
                prune_ty(meta, rest, &str_.skip(), bv)
            }
        }
        Val::PiTel(x, a, b) => {
            let bv = b.apply(meta, Val::var(Lvl(str_.cod)))?;
            if keep {
                Ok(Rc::new(Tm::PiTel {
                    name: x.clone(),
                    dom: strengthen(meta, str_, a.clone())?,
                    cod: prune_ty(meta, rest, &str_.lift(), bv)?,
                }))
            } else {
                prune_ty(meta, rest, &str_.skip(), bv)
            }
        }
        _ => Err(TypeError::impossible("pruned meta type has too few binders").into()),
    }
}

/// The body of the pruning solution: the replacement meta applied to the kept
/// arguments.
fn pruned_body(
    meta: &mut MetaCxt,
    mask: &[bool],
    ty: Rc<Val>,
    m2: MetaVar,
) -> Result<Rc<Tm>, SolveError> {
    let arity = mask.len();
    let mut acc = Rc::new(Tm::Meta(m2));
    let mut ty = ty;
    for (d, &keep) in mask.iter().enumerate() {
        let fty = force(meta, ty)?;
        match &*fty {
            Val::Pi(_, i, _, b) => {
                if keep {
                    acc = Rc::new(Tm::App {
                        fun: acc,
                        arg: Rc::new(Tm::Var(Idx(arity - d - 1))),
                        icit: *i,
                    });
                }
                ty = b.apply(meta, Val::var(Lvl(d)))?;
            }
            Val::PiTel(_, a, b) => {
                if keep {
                    acc = Rc::new(Tm::AppTel {
                        tel: a.quote(meta, Lvl(arity))?,
                        fun: acc,
                        arg: Rc::new(Tm::Var(Idx(arity - d - 1))),
                    });
                }
                ty = b.apply(meta, Val::var(Lvl(d)))?;
            }
            _ => return Err(TypeError::impossible("pruned meta type has too few binders").into()),
        }
    }
    Ok(acc)
}

/// Wrap a term in `len` lambdas matching the Π/telescope-Π prefix of `ty`.
/// Binder names are taken from `names` where available.
pub fn closing_tm(
    meta: &MetaCxt,
    ty: Rc<Val>,
    len: usize,
    names: &[Name],
    body: Rc<Tm>,
) -> TcResult<Rc<Tm>> {
    fn go(
        meta: &MetaCxt,
        d: usize,
        ty: Rc<Val>,
        len: usize,
        names: &[Name],
        body: Rc<Tm>,
    ) -> TcResult<Rc<Tm>> {
        if len == 0 {
            return Ok(body);
        }
        let fty = force(meta, ty)?;
        let (name_rest, name) = match names.split_first() {
            Some((n, rest)) => (rest, Some(n.clone())),
            None => (names, None),
        };
        match &*fty {
            Val::Pi(x, i, a, b) => {
                let dom = a.quote(meta, Lvl(d))?;
                let inner = go(
                    meta,
                    d + 1,
                    b.apply(meta, Val::var(Lvl(d)))?,
                    len - 1,
                    name_rest,
                    body,
                )?;
                Ok(Rc::new(Tm::Lam {
                    name: name.unwrap_or_else(|| x.clone()),
                    icit: *i,
                    ty: dom,
                    body: inner,
                }))
            }
            Val::PiTel(x, a, b) => {
                let dom = a.quote(meta, Lvl(d))?;
                let inner = go(
                    meta,
                    d + 1,
                    b.apply(meta, Val::var(Lvl(d)))?,
                    len - 1,
                    name_rest,
                    body,
                )?;
                Ok(Rc::new(Tm::LamTel {
                    name: name.unwrap_or_else(|| x.clone()),
                    dom,
                    body: inner,
                }))
            }
            _ => Err(TypeError::impossible("closing over a non-function meta type")),
        }
    }
    go(meta, 0, ty, len, names, body)
}

/// Close a type over a context: `Bound` entries become Π binders (telescope Π
/// for telescope-bound variables), `Defined` entries become `Skip` nodes.
pub fn closing_ty(meta: &MetaCxt, cxt: &Cxt, ty: Rc<Tm>) -> TcResult<Rc<Tm>> {
    let mut acc = ty;
    for (i, entry) in cxt.types.iter().enumerate().rev() {
        match entry {
            TyEntry::Def(_) => acc = Rc::new(Tm::Skip(acc)),
            TyEntry::Bound(a) => {
                let fa = force(meta, a.clone())?;
                match &*fa {
                    Val::Rec(tel) => {
                        acc = Rc::new(Tm::PiTel {
                            name: cxt.names[i].clone(),
                            dom: tel.quote(meta, Lvl(i))?,
                            cod: acc,
                        })
                    }
                    _ => {
                        acc = Rc::new(Tm::Pi {
                            name: cxt.names[i].clone(),
                            icit: Icit::Expl,
                            dom: a.quote(meta, Lvl(i))?,
                            cod: acc,
                        })
                    }
                }
            }
        }
    }
    Ok(acc)
}

/// Allocate a fresh unsolved meta of type `ty` (a value in `cxt`) and return
/// the term standing for it: the meta applied to every bound variable of the
/// context.
pub fn fresh_meta(meta: &mut MetaCxt, cxt: &Cxt, ty: Rc<Val>) -> TcResult<Rc<Tm>> {
    let ty = ty.quote(meta, cxt.len)?;
    let meta_ty = closing_ty(meta, cxt, ty)?;
    let meta_vty = meta_ty.eval(meta, &Env::empty())?;
    let m = meta.fresh(MetaEntry::Unsolved { blockers: HashSet::new(), ty: meta_vty });
    log::trace!("fresh metavariable {m}");

    let mut tm = Rc::new(Tm::Meta(m));
    for (x, entry) in cxt.types.iter().enumerate() {
        match entry {
            TyEntry::Def(_) => {}
            TyEntry::Bound(a) => {
                let fa = force(meta, a.clone())?;
                let var = Rc::new(Tm::Var(Idx(cxt.len.0 - x - 1)));
                match &*fa {
                    Val::Rec(tel) => {
                        tm = Rc::new(Tm::AppTel {
                            tel: tel.quote(meta, cxt.len)?,
                            fun: tm,
                            arg: var,
                        })
                    }
                    _ => tm = Rc::new(Tm::App { fun: tm, arg: var, icit: Icit::Expl }),
                }
            }
        }
    }
    Ok(tm)
}

/// Solve `?m sp := rhs` in `cxt`. Recoverable spine and strengthening
/// failures are rethrown here as rich unification errors with the normalized
/// sides attached.
pub fn solve_meta(
    meta: &mut MetaCxt,
    cxt: &Cxt,
    m: MetaVar,
    sp: &Spine,
    rhs: Rc<Val>,
) -> TcResult<()> {
    log::trace!("solving metavariable {m}");
    let (ren, sp_len, sp_vars) = match check_sp(meta, sp) {
        Ok(res) => res,
        Err(err) => return Err(solve_failure(meta, cxt, err, m, sp, &rhs)),
    };
    let str_ = Str::new(sp_len, cxt.len.0, ren, Some(m));
    let rhs_tm = match strengthen(meta, &str_, rhs.clone()) {
        Ok(tm) => tm,
        Err(err) => return Err(solve_failure(meta, cxt, err, m, sp, &rhs)),
    };

    let (blockers, meta_ty) = match meta.lookup(m) {
        MetaEntry::Unsolved { blockers, ty } => (blockers.clone(), ty.clone()),
        _ => return Err(TypeError::impossible(format!("solving non-open metavariable {m}"))),
    };
    let names: Vec<Name> = sp_vars.iter().map(|l| cxt.lvl_name(*l)).collect();
    let closed = closing_tm(meta, meta_ty, sp_len, &names, rhs_tm)?;
    let solution = closed.eval(meta, &Env::empty())?;
    meta.write(m, MetaEntry::Solved(solution));

    for blocker in blockers {
        try_constancy(meta, blocker)?;
    }
    Ok(())
}

/// Render a recoverable solve failure as a rich type error carrying the
/// normalized sides of the equation.
fn solve_failure(
    meta: &MetaCxt,
    cxt: &Cxt,
    err: SolveError,
    m: MetaVar,
    sp: &Spine,
    rhs: &Rc<Val>,
) -> Box<TypeError> {
    let lhs_val: Rc<Val> = Rc::new(Val::Neu(Head::Meta(m), sp.clone()));
    let lhs = print_val(meta, cxt, &lhs_val);
    let rhs = print_val(meta, cxt, rhs);
    let meta_var = m.to_string();
    let span = cxt.span.to_miette();
    Box::new(match err {
        SolveError::Spine(SpineError::NonVariable) => {
            TypeError::MetaArgNotVariable { meta_var, lhs, rhs, span }
        }
        SolveError::Spine(SpineError::NonLinear(x)) => TypeError::MetaArgNotDistinct {
            meta_var,
            arg: cxt.lvl_name(x),
            lhs,
            rhs,
            span,
        },
        SolveError::Spine(SpineError::Projection) => {
            TypeError::MetaSpineProjection { meta_var, lhs, rhs, span }
        }
        SolveError::Strengthening(StrengtheningError::ScopeError(x)) => {
            TypeError::MetaEquatedToOutOfScope {
                meta_var,
                out_of_scope: cxt.lvl_name(x),
                lhs,
                rhs,
                span,
            }
        }
        SolveError::Strengthening(StrengtheningError::OccursCheck) => {
            TypeError::MetaOccursCheckFailed { meta_var, lhs, rhs, span }
        }
        SolveError::Tc(err) => *err,
    })
}

/// Quote and print a value for an error message.
pub fn print_val(meta: &MetaCxt, cxt: &Cxt, v: &Rc<Val>) -> String {
    match v.quote(meta, cxt.len) {
        Ok(tm) => tm.print_to_string(None),
        Err(_) => "<value>".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::NameOrigin;

    fn unsolved(meta: &mut MetaCxt, ty: Rc<Val>) -> MetaVar {
        meta.fresh(MetaEntry::Unsolved { blockers: HashSet::new(), ty })
    }

    fn const_u() -> Closure {
        Closure::new(|_, _| Ok(Val::u()))
    }

    fn fun_u_u() -> Rc<Val> {
        Rc::new(Val::Pi("x".to_owned(), Icit::Expl, Val::u(), const_u()))
    }

    /// Failure of the pattern condition: a non-variable argument.
    #[test]
    fn check_sp_rejects_non_variable() {
        let mut meta = MetaCxt::new();
        let _m = unsolved(&mut meta, fun_u_u());
        let sp = vec![Elim::App(Icit::Expl, Val::u())];
        let err = check_sp(&meta, &sp).unwrap_err();
        assert!(matches!(err, SolveError::Spine(SpineError::NonVariable)));
    }

    /// Failure of the pattern condition: a repeated variable.
    #[test]
    fn check_sp_rejects_non_linear_spine() {
        let meta = MetaCxt::new();
        let x = Val::var(Lvl(0));
        let sp = vec![Elim::App(Icit::Expl, x.clone()), Elim::App(Icit::Expl, x)];
        let err = check_sp(&meta, &sp).unwrap_err();
        assert!(matches!(err, SolveError::Spine(SpineError::NonLinear(Lvl(0)))));
    }

    /// Failure of the pattern condition: a projection eliminator.
    #[test]
    fn check_sp_rejects_projections() {
        let meta = MetaCxt::new();
        let sp = vec![Elim::Proj1];
        let err = check_sp(&meta, &sp).unwrap_err();
        assert!(matches!(err, SolveError::Spine(SpineError::Projection)));
    }

    #[test]
    fn check_sp_accepts_distinct_variables() {
        let meta = MetaCxt::new();
        let sp = vec![
            Elim::App(Icit::Expl, Val::var(Lvl(3))),
            Elim::AppTel(Val::tel(), Val::var(Lvl(1))),
        ];
        let (ren, len, vars) = check_sp(&meta, &sp).unwrap();
        assert_eq!(len, 2);
        assert_eq!(vars, vec![Lvl(3), Lvl(1)]);
        assert_eq!(ren[&3], 0);
        assert_eq!(ren[&1], 1);
    }

    /// `?m x := x` solves to the identity function.
    #[test]
    fn solve_meta_identity() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty().bind("x".to_owned(), NameOrigin::Source, Val::u());
        let m = unsolved(&mut meta, fun_u_u());
        let sp = vec![Elim::App(Icit::Expl, Val::var(Lvl(0)))];
        solve_meta(&mut meta, &cxt, m, &sp, Val::var(Lvl(0))).unwrap();

        let sol = meta.solution(m).expect("meta should be solved");
        let applied = crate::normalizer::eval::v_app(&meta, sol, Val::u(), Icit::Expl).unwrap();
        assert!(matches!(&*applied, Val::U));
    }

    /// A solution may not smuggle in a variable the meta cannot see.
    #[test]
    fn solve_meta_scope_error() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty().bind("x".to_owned(), NameOrigin::Source, Val::u());
        let m = unsolved(&mut meta, Val::u());
        let err = solve_meta(&mut meta, &cxt, m, &Vec::new(), Val::var(Lvl(0))).unwrap_err();
        assert!(matches!(*err, TypeError::MetaEquatedToOutOfScope { .. }));
    }

    /// A meta may not be solved by a value containing itself.
    #[test]
    fn solve_meta_occurs_check() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty();
        let m = unsolved(&mut meta, Val::u());
        let rhs = Rc::new(Val::Pi("x".to_owned(), Icit::Expl, Val::meta(m), const_u()));
        let err = solve_meta(&mut meta, &cxt, m, &Vec::new(), rhs).unwrap_err();
        assert!(matches!(*err, TypeError::MetaOccursCheckFailed { .. }));
    }

    /// Strengthening prunes an out-of-scope argument from another meta's
    /// spine instead of failing.
    #[test]
    fn strengthen_prunes_out_of_scope_spine_args() {
        let mut meta = MetaCxt::new();
        // m : (a : U) (b : U) → U
        let ty = Rc::new(Val::Pi(
            "a".to_owned(),
            Icit::Expl,
            Val::u(),
            Closure::new(|_, _| Ok(fun_u_u())),
        ));
        let m = unsolved(&mut meta, ty);

        // Strengthen `m @0 @1` under a renaming covering only level 0.
        let v = Rc::new(Val::Neu(
            Head::Meta(m),
            vec![
                Elim::App(Icit::Expl, Val::var(Lvl(0))),
                Elim::App(Icit::Expl, Val::var(Lvl(1))),
            ],
        ));
        let str_ = Str::new(1, 2, HashMap::from([(0, 0)]), None);
        let tm = strengthen(&mut meta, &str_, v).unwrap();

        // The original meta is now solved by a pruned replacement applied to
        // the surviving argument only.
        assert!(meta.solution(m).is_some());
        let Tm::App { fun, arg, .. } = &*tm else { panic!("expected application") };
        assert!(matches!(&**fun, Tm::Meta(m2) if *m2 != m));
        assert!(matches!(&**arg, Tm::Var(Idx(0))));
    }

    #[test]
    fn closing_ty_wraps_bound_and_skips_defined() {
        let meta = MetaCxt::new();
        let cxt = Cxt::empty()
            .bind("x".to_owned(), NameOrigin::Source, Val::u())
            .define("y".to_owned(), Val::u(), Val::u());
        let closed = closing_ty(&meta, &cxt, Rc::new(Tm::U)).unwrap();
        let Tm::Pi { name, cod, .. } = &*closed else { panic!("expected pi") };
        assert_eq!(name, "x");
        assert!(matches!(&**cod, Tm::Skip(t) if matches!(&**t, Tm::U)));
    }

    /// A fresh meta is applied to exactly the bound variables of its context.
    #[test]
    fn fresh_meta_spine_covers_bound_vars() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty()
            .bind("x".to_owned(), NameOrigin::Source, Val::u())
            .define("y".to_owned(), Val::u(), Val::u())
            .bind("z".to_owned(), NameOrigin::Source, Val::u());
        let tm = fresh_meta(&mut meta, &cxt, Val::u()).unwrap();
        // (?m x) z — y is let-bound and not part of the spine
        let Tm::App { fun, arg, .. } = &*tm else { panic!("expected application") };
        assert!(matches!(&**arg, Tm::Var(Idx(0))));
        let Tm::App { fun, arg, .. } = &**fun else { panic!("expected application") };
        assert!(matches!(&**fun, Tm::Meta(_)));
        assert!(matches!(&**arg, Tm::Var(Idx(2))));
    }
}
