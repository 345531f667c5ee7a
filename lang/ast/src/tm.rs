use std::rc::Rc;

use crate::common::*;
use crate::de_bruijn::Idx;

/// Core terms.
///
/// Variables are de Bruijn indices. On top of the ordinary lambda calculus
/// formers the syntax has a universe of telescopes (`Tel`, `TEmpty`, `TCons`),
/// records over telescopes (`Rec`, `Tempty`, `Tcons`, projections) and the
/// telescope-generalized function formers `PiTel`/`LamTel`/`AppTel`.
///
/// `Skip` strengthens past a bound variable; it is produced only while
/// closing the type of a fresh metavariable over a context with `let`-bound
/// entries and is eliminated by evaluation.
#[derive(Debug, Clone)]
pub enum Tm {
    Var(Idx),
    Let { name: Name, ty: Rc<Tm>, val: Rc<Tm>, body: Rc<Tm> },
    Pi { name: Name, icit: Icit, dom: Rc<Tm>, cod: Rc<Tm> },
    Lam { name: Name, icit: Icit, ty: Rc<Tm>, body: Rc<Tm> },
    App { fun: Rc<Tm>, arg: Rc<Tm>, icit: Icit },
    U,
    Meta(MetaVar),
    Skip(Rc<Tm>),

    // The universe of telescopes and its constructors
    Tel,
    TEmpty,
    TCons { name: Name, ty: Rc<Tm>, rest: Rc<Tm> },

    // Records of telescopes and their constructors
    Rec(Rc<Tm>),
    Tempty,
    Tcons { head: Rc<Tm>, tail: Rc<Tm> },
    Proj1(Rc<Tm>),
    Proj2(Rc<Tm>),

    // Function types over telescopes
    PiTel { name: Name, dom: Rc<Tm>, cod: Rc<Tm> },
    AppTel { tel: Rc<Tm>, fun: Rc<Tm>, arg: Rc<Tm> },
    LamTel { name: Name, dom: Rc<Tm>, body: Rc<Tm> },
}

impl Tm {
    pub fn contains_meta(&self, m: MetaVar) -> bool {
        match self {
            Tm::Var(_) | Tm::U | Tm::Tel | Tm::TEmpty | Tm::Tempty => false,
            Tm::Meta(m2) => *m2 == m,
            Tm::Let { ty, val, body, .. } => {
                ty.contains_meta(m) || val.contains_meta(m) || body.contains_meta(m)
            }
            Tm::Pi { dom, cod, .. } => dom.contains_meta(m) || cod.contains_meta(m),
            Tm::Lam { ty, body, .. } => ty.contains_meta(m) || body.contains_meta(m),
            Tm::App { fun, arg, .. } => fun.contains_meta(m) || arg.contains_meta(m),
            Tm::Skip(t) | Tm::Rec(t) | Tm::Proj1(t) | Tm::Proj2(t) => t.contains_meta(m),
            Tm::TCons { ty, rest, .. } => ty.contains_meta(m) || rest.contains_meta(m),
            Tm::Tcons { head, tail } => head.contains_meta(m) || tail.contains_meta(m),
            Tm::PiTel { dom, cod, .. } => dom.contains_meta(m) || cod.contains_meta(m),
            Tm::AppTel { tel, fun, arg } => {
                tel.contains_meta(m) || fun.contains_meta(m) || arg.contains_meta(m)
            }
            Tm::LamTel { dom, body, .. } => dom.contains_meta(m) || body.contains_meta(m),
        }
    }

    /// Free variable indices of a term, relative to its root.
    pub fn free_vars(&self) -> Vec<Idx> {
        fn go(t: &Tm, depth: usize, acc: &mut Vec<Idx>) {
            match t {
                Tm::Var(Idx(i)) => {
                    if *i >= depth {
                        acc.push(Idx(*i - depth));
                    }
                }
                Tm::U | Tm::Meta(_) | Tm::Tel | Tm::TEmpty | Tm::Tempty => {}
                Tm::Let { ty, val, body, .. } => {
                    go(ty, depth, acc);
                    go(val, depth, acc);
                    go(body, depth + 1, acc);
                }
                Tm::Pi { dom, cod, .. } => {
                    go(dom, depth, acc);
                    go(cod, depth + 1, acc);
                }
                Tm::Lam { ty, body, .. } => {
                    go(ty, depth, acc);
                    go(body, depth + 1, acc);
                }
                Tm::App { fun, arg, .. } => {
                    go(fun, depth, acc);
                    go(arg, depth, acc);
                }
                Tm::Skip(t) => go(t, depth + 1, acc),
                Tm::Rec(t) | Tm::Proj1(t) | Tm::Proj2(t) => go(t, depth, acc),
                Tm::TCons { ty, rest, .. } => {
                    go(ty, depth, acc);
                    go(rest, depth + 1, acc);
                }
                Tm::Tcons { head, tail } => {
                    go(head, depth, acc);
                    go(tail, depth, acc);
                }
                Tm::PiTel { dom, cod, .. } => {
                    go(dom, depth, acc);
                    go(cod, depth + 1, acc);
                }
                Tm::AppTel { tel, fun, arg } => {
                    go(tel, depth, acc);
                    go(fun, depth, acc);
                    go(arg, depth, acc);
                }
                Tm::LamTel { dom, body, .. } => {
                    go(dom, depth, acc);
                    go(body, depth + 1, acc);
                }
            }
        }
        let mut acc = Vec::new();
        go(self, 0, &mut acc);
        acc
    }
}
