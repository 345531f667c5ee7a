//! Constancy constraints.
//!
//! A constraint `Constancy(cxt, dom, cod)` asserts that the telescope `dom`
//! is the empty telescope exactly when `cod` does not use the variable bound
//! right above `cxt`. A rigid occurrence keeps the telescope; occurrences
//! only inside metavariable spines postpone the decision and subscribe the
//! constraint to those metas.

use std::collections::HashSet;
use std::rc::Rc;

use ast::{Lvl, MetaVar};

use crate::metas::{MetaCxt, MetaEntry};
use crate::normalizer::eval::force;
use crate::normalizer::val::{Closure, Elim, Head, Val};
use crate::result::TcResult;
use crate::typechecker::ctx::Cxt;
use crate::unifier::unify::unify;

/// Classification of the occurrences of a bound level in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occurs {
    /// No occurrence at all.
    None,
    /// At least one occurrence outside any metavariable spine.
    Rigid,
    /// All occurrences sit inside the spines of these metas.
    Flex(HashSet<MetaVar>),
}

impl Occurs {
    /// Monoid append: `Rigid` absorbs, `Flex` unions, `None` is the identity.
    pub fn combine(self, other: Occurs) -> Occurs {
        match (self, other) {
            (Occurs::Rigid, _) | (_, Occurs::Rigid) => Occurs::Rigid,
            (Occurs::Flex(mut l), Occurs::Flex(r)) => {
                l.extend(r);
                Occurs::Flex(l)
            }
            (Occurs::None, r) => r,
            (l, Occurs::None) => l,
        }
    }
}

/// Classify the occurrences of the level `x` in `v`, where `depth` is the
/// current binder depth. This runs on values: only forced values expose which
/// occurrences sit under meta spines.
pub fn occurs(meta: &MetaCxt, depth: Lvl, x: Lvl, v: &Rc<Val>) -> TcResult<Occurs> {
    let fv = force(meta, v.clone())?;
    match &*fv {
        Val::Neu(Head::Var(y), sp) => {
            let head = if *y == x { Occurs::Rigid } else { Occurs::None };
            Ok(occurs_spine(meta, depth, x, sp)?.into_iter().fold(head, Occurs::combine))
        }
        Val::Neu(Head::Meta(m), sp) => {
            let inner =
                occurs_spine(meta, depth, x, sp)?.into_iter().fold(Occurs::None, Occurs::combine);
            Ok(match inner {
                Occurs::Rigid => Occurs::Flex(HashSet::from([*m])),
                o => o,
            })
        }
        Val::U | Val::Tel | Val::TEmpty | Val::Tempty => Ok(Occurs::None),
        Val::Pi(_, _, a, b) | Val::Lam(_, _, a, b) => {
            Ok(occurs(meta, depth, x, a)?.combine(occurs_bind(meta, depth, x, b)?))
        }
        Val::TCons(_, a, b) => {
            Ok(occurs(meta, depth, x, a)?.combine(occurs_bind(meta, depth, x, b)?))
        }
        Val::Rec(a) => occurs(meta, depth, x, a),
        Val::Tcons(t, u) => Ok(occurs(meta, depth, x, t)?.combine(occurs(meta, depth, x, u)?)),
        Val::PiTel(_, a, b) | Val::LamTel(_, a, b) => {
            Ok(occurs(meta, depth, x, a)?.combine(occurs_bind(meta, depth, x, b)?))
        }
    }
}

fn occurs_spine(
    meta: &MetaCxt,
    depth: Lvl,
    x: Lvl,
    sp: &[Elim],
) -> TcResult<Vec<Occurs>> {
    let mut out = Vec::with_capacity(sp.len());
    for elim in sp {
        match elim {
            Elim::App(_, u) => out.push(occurs(meta, depth, x, u)?),
            Elim::AppTel(a, u) => {
                out.push(occurs(meta, depth, x, a)?);
                out.push(occurs(meta, depth, x, u)?);
            }
            Elim::Proj1 | Elim::Proj2 => {}
        }
    }
    Ok(out)
}

fn occurs_bind(meta: &MetaCxt, depth: Lvl, x: Lvl, body: &Closure) -> TcResult<Occurs> {
    let v = body.apply(meta, Val::var(depth))?;
    occurs(meta, depth.succ(), x, &v)
}

/// Allocate a constancy constraint for `(cxt, dom, cod)`, with `cod` applied
/// to the variable bound right above `cxt`, and immediately try to discharge
/// it.
pub fn new_constancy(meta: &mut MetaCxt, cxt: &Cxt, dom: Rc<Val>, cod: &Closure) -> TcResult<()> {
    let cod = cod.apply(meta, Val::var(cxt.len))?;
    let c = meta.fresh(MetaEntry::Constancy {
        cxt: cxt.clone(),
        dom,
        cod,
        blockers: HashSet::new(),
    });
    try_constancy(meta, c)
}

/// Retry a constancy constraint.
///
/// Old blocker registrations are cleared first; then the codomain occurrence
/// of the telescope variable decides: no occurrence forces the telescope
/// empty, a rigid occurrence keeps it, and flexible occurrences re-subscribe
/// the constraint to the blocking metas.
pub fn try_constancy(meta: &mut MetaCxt, c: MetaVar) -> TcResult<()> {
    let (cxt, dom, cod, blockers) = match meta.get(c) {
        Some(MetaEntry::Constancy { cxt, dom, cod, blockers }) => {
            (cxt.clone(), dom.clone(), cod.clone(), blockers.clone())
        }
        // Already discharged by a cascaded retry.
        _ => return Ok(()),
    };

    for m in blockers {
        meta.modify(m, |entry| match entry {
            MetaEntry::Unsolved { mut blockers, ty } => {
                blockers.remove(&c);
                MetaEntry::Unsolved { blockers, ty }
            }
            entry => entry,
        });
    }

    match occurs(meta, cxt.len.succ(), cxt.len, &cod)? {
        Occurs::None => {
            log::trace!("constancy {c}: telescope is constant, collapsing to empty");
            unify(meta, &cxt, dom, Val::tel_empty())?;
            meta.remove(c);
        }
        Occurs::Rigid => {
            log::trace!("constancy {c}: rigid dependency, keeping telescope");
            meta.remove(c);
        }
        Occurs::Flex(ms) => {
            log::trace!("constancy {c}: blocked on {ms:?}");
            for m in &ms {
                meta.modify(*m, |entry| match entry {
                    MetaEntry::Unsolved { mut blockers, ty } => {
                        blockers.insert(c);
                        MetaEntry::Unsolved { blockers, ty }
                    }
                    entry => entry,
                });
            }
            meta.write(c, MetaEntry::Constancy { cxt, dom, cod, blockers: ms });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metas::MetaEntry;
    use crate::normalizer::val::Elim;
    use ast::Icit;

    fn unsolved(meta: &mut MetaCxt, ty: Rc<Val>) -> MetaVar {
        meta.fresh(MetaEntry::Unsolved { blockers: HashSet::new(), ty })
    }

    #[test]
    fn combine_is_a_monoid_with_rigid_absorbing() {
        let m = MetaVar { id: 0 };
        let flex = || Occurs::Flex(HashSet::from([m]));
        assert_eq!(Occurs::None.combine(Occurs::None), Occurs::None);
        assert_eq!(Occurs::None.combine(flex()), flex());
        assert_eq!(flex().combine(Occurs::Rigid), Occurs::Rigid);
        assert_eq!(Occurs::Rigid.combine(flex()), Occurs::Rigid);
        let m2 = MetaVar { id: 1 };
        let combined = flex().combine(Occurs::Flex(HashSet::from([m2])));
        assert_eq!(combined, Occurs::Flex(HashSet::from([m, m2])));
    }

    #[test]
    fn occurs_classifies_rigid_occurrence() {
        let meta = MetaCxt::new();
        let v = Val::var(Lvl(0));
        assert_eq!(occurs(&meta, Lvl(1), Lvl(0), &v).unwrap(), Occurs::Rigid);
    }

    #[test]
    fn occurs_classifies_no_occurrence() {
        let meta = MetaCxt::new();
        assert_eq!(occurs(&meta, Lvl(1), Lvl(0), &Val::u()).unwrap(), Occurs::None);
    }

    #[test]
    fn occurs_classifies_flexible_occurrence() {
        let mut meta = MetaCxt::new();
        let m = unsolved(&mut meta, Val::u());
        let v = Rc::new(Val::Neu(Head::Meta(m), vec![Elim::App(Icit::Expl, Val::var(Lvl(0)))]));
        assert_eq!(occurs(&meta, Lvl(1), Lvl(0), &v).unwrap(), Occurs::Flex(HashSet::from([m])));
    }

    /// A rigid occurrence under a variable-headed spine stays rigid.
    #[test]
    fn occurs_spine_of_variable_head_is_rigid() {
        let meta = MetaCxt::new();
        let v = Rc::new(Val::Neu(
            Head::Var(Lvl(5)),
            vec![Elim::App(Icit::Expl, Val::var(Lvl(0)))],
        ));
        assert_eq!(occurs(&meta, Lvl(6), Lvl(0), &v).unwrap(), Occurs::Rigid);
    }

    /// A constraint whose codomain ignores its variable collapses the
    /// telescope to the empty one.
    #[test]
    fn constancy_collapses_constant_codomain() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty();
        let dom = unsolved(&mut meta, Val::tel());
        let cod = Closure::new(|_, _| Ok(Val::u()));
        new_constancy(&mut meta, &cxt, Val::meta(dom), &cod).unwrap();

        let solved = meta.solution(dom).expect("telescope should be solved");
        assert!(matches!(&*solved, Val::TEmpty));
        assert!(!meta.iter().any(|(_, e)| matches!(e, MetaEntry::Constancy { .. })));
    }

    /// A rigid dependency keeps the telescope and discharges the constraint.
    #[test]
    fn constancy_keeps_rigidly_used_telescope() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty();
        let dom = unsolved(&mut meta, Val::tel());
        let cod = Closure::new(|_, v| Ok(v));
        new_constancy(&mut meta, &cxt, Val::meta(dom), &cod).unwrap();

        assert!(meta.solution(dom).is_none());
        assert!(!meta.iter().any(|(_, e)| matches!(e, MetaEntry::Constancy { .. })));
    }

    /// Flexible occurrences postpone the decision and subscribe the
    /// constraint to the blocking metas, bidirectionally.
    #[test]
    fn constancy_blocks_on_flexible_occurrences() {
        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty();
        let dom = unsolved(&mut meta, Val::tel());
        let blocker = unsolved(&mut meta, Val::u());
        let cod = Closure::new(move |_, v| {
            Ok(Rc::new(Val::Neu(Head::Meta(blocker), vec![Elim::App(Icit::Expl, v)])))
        });
        new_constancy(&mut meta, &cxt, Val::meta(dom), &cod).unwrap();

        let constancies: Vec<_> = meta
            .iter()
            .filter_map(|(c, e)| match e {
                MetaEntry::Constancy { blockers, .. } => Some((*c, blockers.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(constancies.len(), 1);
        let (c, blockers) = &constancies[0];
        assert_eq!(blockers, &HashSet::from([blocker]));
        match meta.lookup(blocker) {
            MetaEntry::Unsolved { blockers, .. } => assert_eq!(blockers, &HashSet::from([*c])),
            _ => panic!("expected the blocker to stay unsolved"),
        }
    }

    /// Solving the blocking meta retries and discharges the constraint.
    #[test]
    fn solving_the_blocker_retries_the_constraint() {
        use crate::unifier::solve::solve_meta;

        let mut meta = MetaCxt::new();
        let cxt = Cxt::empty();
        let dom = unsolved(&mut meta, Val::tel());
        let blocker = unsolved(&mut meta, Rc::new(Val::Pi(
            "x".to_owned(),
            Icit::Expl,
            Val::u(),
            Closure::new(|_, _| Ok(Val::u())),
        )));
        let cod = Closure::new(move |_, v| {
            Ok(Rc::new(Val::Neu(Head::Meta(blocker), vec![Elim::App(Icit::Expl, v)])))
        });
        new_constancy(&mut meta, &cxt, Val::meta(dom), &cod).unwrap();

        // blocker := λ x. U, so the codomain no longer mentions the variable.
        solve_meta(&mut meta, &cxt, blocker, &Vec::new(), Rc::new(Val::Lam(
            "x".to_owned(),
            Icit::Expl,
            Val::u(),
            Closure::new(|_, _| Ok(Val::u())),
        )))
        .unwrap();

        assert!(!meta.iter().any(|(_, e)| matches!(e, MetaEntry::Constancy { .. })));
        let solved = meta.solution(dom).expect("telescope should collapse");
        assert!(matches!(&*solved, Val::TEmpty));
    }
}
