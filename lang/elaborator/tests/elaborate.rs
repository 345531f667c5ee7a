//! End-to-end elaboration scenarios and metacontext invariants.

use std::collections::HashSet;
use std::rc::Rc;

use ast::{Lvl, MetaVar, Tm};
use elaborator::metas::{MetaCxt, MetaEntry};
use elaborator::normalizer::quote::Quote;
use elaborator::{elaborate, Elab};
use printer::Print;

fn elab(src: &str) -> Elab {
    let raw = parser::parse_term(src).expect("parse error");
    elaborate(&raw).expect("elaboration error")
}

fn print(t: &Rc<Tm>) -> String {
    t.print_to_string(None)
}

/// Every solved meta quotes to a closed term that does not mention itself.
/// Quoting substitutes solved metas on the way, so this also exercises
/// acyclicity: a cyclic solution would fail to terminate.
fn assert_solutions_acyclic_and_closed(meta: &MetaCxt) {
    for (m, entry) in meta.iter() {
        if let MetaEntry::Solved(v) = entry {
            let tm = v.quote(meta, Lvl(0)).expect("solution must quote");
            assert!(!tm.contains_meta(*m), "solution of {m} mentions itself");
            assert!(
                tm.free_vars().is_empty(),
                "solution of {m} has free variables: {}",
                tm.print_to_string(None)
            );
        }
    }
}

/// Unsolved metas and constancy constraints index each other bidirectionally.
fn assert_blockers_bijective(meta: &MetaCxt) {
    for (m, entry) in meta.iter() {
        match entry {
            MetaEntry::Unsolved { blockers, .. } => {
                for c in blockers {
                    match meta.get(*c) {
                        Some(MetaEntry::Constancy { blockers, .. }) => {
                            assert!(
                                blockers.contains(m),
                                "constancy {c} does not list its blocker {m}"
                            );
                        }
                        _ => panic!("blocker {c} of {m} is not a constancy constraint"),
                    }
                }
            }
            MetaEntry::Constancy { blockers, .. } => {
                for b in blockers {
                    match meta.get(*b) {
                        Some(MetaEntry::Unsolved { blockers, .. }) => {
                            assert!(
                                blockers.contains(m),
                                "unsolved {b} does not list constancy {m}"
                            );
                        }
                        _ => panic!("constancy {m} blocked on non-open meta {b}"),
                    }
                }
            }
            MetaEntry::Solved(_) => {}
        }
    }
}

fn assert_invariants(meta: &MetaCxt) {
    assert_solutions_acyclic_and_closed(meta);
    assert_blockers_bijective(meta);
}

#[test]
fn universe_has_type_universe() {
    let e = elab("U");
    assert_eq!(print(&e.ty), "U");
    assert_eq!(print(&e.nf().unwrap()), "U");
    assert_invariants(&e.meta);
}

#[test]
fn identity_applied_to_universe() {
    let e = elab("let id : {A} → A → A = λ x. x in id U");
    assert_eq!(print(&e.nf().unwrap()), "U");
    assert_eq!(print(&e.ty), "U");
    assert_invariants(&e.meta);
}

#[test]
fn const_applied() {
    let e = elab("let const : {A B} → A → B → A = λ x y. x in const U (U → U)");
    assert_eq!(print(&e.nf().unwrap()), "U");
    assert_invariants(&e.meta);
}

/// Checking `λ x. x` against `{A} → A → A` produces a term β-equal to
/// `λ {A} x. x`.
#[test]
fn implicit_eta_for_checking() {
    let e = elab("let i : {A : U} → A → A = λ x. x in U");
    let zonked = e.zonked_tm().unwrap();
    let Tm::Let { val, .. } = &*zonked else { panic!("expected let") };
    assert_eq!(print(val), "λ {A} x. x");
    assert_invariants(&e.meta);
}

#[test]
fn annotated_top_level_lambdas_are_postulates() {
    let e = elab("λ (A : U) (x : A). x");
    assert_eq!(print(&e.ty), "(A : U) → (x : A) → A");
    assert_invariants(&e.meta);
}

#[test]
fn hole_against_function_type_elaborates() {
    let e = elab("let g : (A : U) → A → A = _ in g");
    assert_eq!(print(&e.ty), "(A : U) → A → A");
    // The hole got a fresh meta; it stays unsolved but scoped.
    assert!(e
        .meta
        .iter()
        .any(|(_, entry)| matches!(entry, MetaEntry::Unsolved { .. })));
    assert_invariants(&e.meta);
}

/// Inferring an unannotated function generalizes it over a telescope; with no
/// use site to constrain it, the telescope and the pending constancy
/// constraint survive elaboration.
#[test]
fn unapplied_function_keeps_pending_constancy() {
    let e = elab("let f = λ x. x in f");
    let Tm::PiTel { .. } = &*e.ty else { panic!("expected a telescope type") };

    let constancies: Vec<(MetaVar, HashSet<MetaVar>)> = e
        .meta
        .iter()
        .filter_map(|(c, entry)| match entry {
            MetaEntry::Constancy { blockers, .. } => Some((*c, blockers.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(constancies.len(), 1);
    assert!(!constancies[0].1.is_empty());
    assert_invariants(&e.meta);
}

/// Applying the generalized function collapses its telescope: the constancy
/// constraint resolves to the empty telescope and disappears.
#[test]
fn use_site_collapses_telescope() {
    let e = elab("let f = λ x. x in f U");
    assert_eq!(print(&e.nf().unwrap()), "U");
    assert!(!e
        .meta
        .iter()
        .any(|(_, entry)| matches!(entry, MetaEntry::Constancy { .. })));
    // Some telescope meta must have been solved to the empty telescope.
    let has_empty_tel = e.meta.iter().any(|(_, entry)| {
        matches!(entry, MetaEntry::Solved(v) if matches!(&**v, elaborator::normalizer::val::Val::TEmpty))
    });
    assert!(has_empty_tel);
    assert_invariants(&e.meta);
}

#[test]
fn out_of_scope_variable_fails() {
    let raw = parser::parse_term("x").unwrap();
    let err = elaborate(&raw).unwrap_err();
    assert!(matches!(*err, elaborator::TypeError::NameNotInScope { .. }));
}

#[test]
fn ill_typed_application_fails() {
    let raw = parser::parse_term("let a : U → U = λ x. x in a a").unwrap();
    assert!(elaborate(&raw).is_err());
}

#[test]
fn shadowing_resolves_to_innermost_binder() {
    let e = elab("let x : U = U in let x : U → U = λ y. y in x U");
    assert_eq!(print(&e.nf().unwrap()), "U");
    assert_invariants(&e.meta);
}

#[test]
fn inserted_binders_are_invisible_to_lookup() {
    // The inserted implicit binder is named A; the source variable A must
    // still refer to the outer postulate, not the inserted binder.
    let e = elab("λ (A : U) (f : {A : U} → A → A) (x : A). f x");
    assert_eq!(print(&e.ty), "(A : U) → (f : {A : U} → A → A) → (x : A) → A");
    assert_invariants(&e.meta);
}
