//! Pretty-printing of core terms.
//!
//! Printing threads a stack of binder names; variables whose binder has no
//! printable name are shown as `@l` where `l` is the de Bruijn level of the
//! binder. Metavariables are shown as `?n`.

use pretty::DocAllocator;
use printer::tokens::*;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::common::*;
use crate::de_bruijn::Idx;
use crate::tm::Tm;

/// `let` and `λ`
const PREC_TOP: u8 = 0;
/// function arrows and telescope cons
const PREC_PI: u8 = 1;
/// application
const PREC_APP: u8 = 2;
/// projections
const PREC_PROJ: u8 = 3;

impl Print for Tm {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let mut names = Vec::new();
        tm(self, &mut names, PREC_TOP, cfg, alloc)
    }
}

fn parens_if(cond: bool, doc: Builder<'_>) -> Builder<'_> {
    if cond {
        doc.parens()
    } else {
        doc
    }
}

fn var_name(names: &[Name], idx: Idx) -> String {
    let lvl = names.len().checked_sub(idx.0 + 1);
    match lvl.and_then(|l| names.get(l)) {
        Some(n) if n.as_str() != HOLE && !n.is_empty() => n.trim_start_matches('*').to_owned(),
        _ => match lvl {
            Some(l) => format!("{AT}{l}"),
            None => format!("{AT}{QUESTION_MARK}"),
        },
    }
}

fn tm<'a>(
    t: &'a Tm,
    names: &mut Vec<Name>,
    prec: u8,
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    match t {
        Tm::Var(idx) => alloc.text(var_name(names, *idx)),
        Tm::U => alloc.text(TYPE),
        Tm::Tel => alloc.text(TEL),
        Tm::TEmpty => alloc.text(TEMPTY),
        Tm::Tempty => alloc.text(TNIL),
        Tm::Meta(m) => {
            if cfg.print_metavar_ids {
                alloc.text(format!("{m}"))
            } else {
                alloc.text(QUESTION_MARK)
            }
        }
        // A `Skip` binder can never be referenced, so the node prints as its
        // body with an anonymous slot on the name stack.
        Tm::Skip(body) => {
            names.push(HOLE.to_owned());
            let doc = tm(body, names, prec, cfg, alloc);
            names.pop();
            doc
        }
        Tm::Lam { .. } | Tm::LamTel { .. } => {
            let mut binders = alloc.nil();
            let mut cur = t;
            let mut depth = 0usize;
            loop {
                match cur {
                    Tm::Lam { name, icit, body, .. } => {
                        let b = match icit {
                            Icit::Expl => alloc.text(name.clone()),
                            Icit::Impl => alloc.text(name.clone()).braces(),
                        };
                        binders = binders.append(alloc.space()).append(b);
                        names.push(name.clone());
                        depth += 1;
                        cur = body;
                    }
                    Tm::LamTel { name, body, .. } => {
                        let b = alloc.text(name.clone()).braces().braces();
                        binders = binders.append(alloc.space()).append(b);
                        names.push(name.clone());
                        depth += 1;
                        cur = body;
                    }
                    _ => break,
                }
            }
            let body = tm(cur, names, PREC_TOP, cfg, alloc);
            names.truncate(names.len() - depth);
            let doc =
                alloc.text(LAMBDA).append(binders).append(DOT).append(alloc.space()).append(body);
            parens_if(prec > PREC_TOP, doc)
        }
        Tm::Let { name, ty, val, body } => {
            let ty = tm(ty, names, PREC_TOP, cfg, alloc);
            let val = tm(val, names, PREC_TOP, cfg, alloc);
            names.push(name.clone());
            let body = tm(body, names, PREC_TOP, cfg, alloc);
            names.pop();
            let doc = alloc
                .text(LET)
                .append(alloc.space())
                .append(alloc.text(name.clone()))
                .append(alloc.space())
                .append(COLON)
                .append(alloc.space())
                .append(ty)
                .append(alloc.space())
                .append(EQ)
                .append(alloc.space())
                .append(val)
                .append(alloc.line())
                .append(IN)
                .append(alloc.space())
                .append(body)
                .group();
            parens_if(prec > PREC_TOP, doc)
        }
        Tm::Pi { name, icit, dom, cod } => {
            let dom_doc = match (icit, name.as_str()) {
                (Icit::Expl, HOLE) => tm(dom, names, PREC_APP, cfg, alloc),
                (Icit::Expl, _) => binder_ann(name, dom, names, cfg, alloc).parens(),
                (Icit::Impl, _) => binder_ann(name, dom, names, cfg, alloc).braces(),
            };
            names.push(name.clone());
            let cod = tm(cod, names, PREC_PI, cfg, alloc);
            names.pop();
            let doc = dom_doc
                .append(alloc.space())
                .append(ARROW)
                .append(alloc.space())
                .append(cod);
            parens_if(prec > PREC_PI, doc)
        }
        Tm::PiTel { name, dom, cod } => {
            let dom_doc = binder_ann(name, dom, names, cfg, alloc).braces().braces();
            names.push(name.clone());
            let cod = tm(cod, names, PREC_PI, cfg, alloc);
            names.pop();
            let doc = dom_doc
                .append(alloc.space())
                .append(ARROW)
                .append(alloc.space())
                .append(cod);
            parens_if(prec > PREC_PI, doc)
        }
        Tm::TCons { name, ty, rest } => {
            let hd = binder_ann(name, ty, names, cfg, alloc).parens();
            names.push(name.clone());
            let tl = tm(rest, names, PREC_PI, cfg, alloc);
            names.pop();
            let doc =
                hd.append(alloc.space()).append(TCONS).append(alloc.space()).append(tl);
            parens_if(prec > PREC_PI, doc)
        }
        Tm::Tcons { head, tail } => {
            let hd = tm(head, names, PREC_APP, cfg, alloc);
            let tl = tm(tail, names, PREC_PI, cfg, alloc);
            let doc =
                hd.append(alloc.space()).append(TCONS).append(alloc.space()).append(tl);
            parens_if(prec > PREC_PI, doc)
        }
        Tm::App { fun, arg, icit } => {
            let fun = tm(fun, names, PREC_APP, cfg, alloc);
            let arg = match icit {
                Icit::Expl => tm(arg, names, PREC_PROJ, cfg, alloc),
                Icit::Impl => tm(arg, names, PREC_TOP, cfg, alloc).braces(),
            };
            let doc = fun.append(alloc.space()).append(arg);
            parens_if(prec > PREC_APP, doc)
        }
        Tm::AppTel { fun, arg, .. } => {
            let fun = tm(fun, names, PREC_APP, cfg, alloc);
            let arg = tm(arg, names, PREC_TOP, cfg, alloc).braces().braces();
            let doc = fun.append(alloc.space()).append(arg);
            parens_if(prec > PREC_APP, doc)
        }
        Tm::Rec(t) => {
            let doc = alloc
                .text(REC)
                .append(alloc.space())
                .append(tm(t, names, PREC_PROJ, cfg, alloc));
            parens_if(prec > PREC_APP, doc)
        }
        Tm::Proj1(t) => tm(t, names, PREC_PROJ, cfg, alloc).append(PROJ1),
        Tm::Proj2(t) => tm(t, names, PREC_PROJ, cfg, alloc).append(PROJ2),
    }
}

fn binder_ann<'a>(
    name: &'a Name,
    ty: &'a Tm,
    names: &mut Vec<Name>,
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    alloc
        .text(name.clone())
        .append(alloc.space())
        .append(COLON)
        .append(alloc.space())
        .append(tm(ty, names, PREC_TOP, cfg, alloc))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn rc(t: Tm) -> Rc<Tm> {
        Rc::new(t)
    }

    #[test]
    fn print_identity() {
        // λ A x. x
        let t = Tm::Lam {
            name: "A".to_owned(),
            icit: Icit::Expl,
            ty: rc(Tm::U),
            body: rc(Tm::Lam {
                name: "x".to_owned(),
                icit: Icit::Expl,
                ty: rc(Tm::Var(Idx(0))),
                body: rc(Tm::Var(Idx(0))),
            }),
        };
        assert_eq!(t.print_to_string(None), "λ A x. x");
    }

    #[test]
    fn print_pi() {
        // (A : U) → A → A
        let t = Tm::Pi {
            name: "A".to_owned(),
            icit: Icit::Expl,
            dom: rc(Tm::U),
            cod: rc(Tm::Pi {
                name: "_".to_owned(),
                icit: Icit::Expl,
                dom: rc(Tm::Var(Idx(0))),
                cod: rc(Tm::Var(Idx(1))),
            }),
        };
        assert_eq!(t.print_to_string(None), "(A : U) → A → A");
    }

    #[test]
    fn print_implicit_app() {
        // f {U} x under binders f, x
        let t = Tm::Lam {
            name: "f".to_owned(),
            icit: Icit::Expl,
            ty: rc(Tm::U),
            body: rc(Tm::App {
                fun: rc(Tm::App {
                    fun: rc(Tm::Var(Idx(0))),
                    arg: rc(Tm::U),
                    icit: Icit::Impl,
                }),
                arg: rc(Tm::U),
                icit: Icit::Expl,
            }),
        };
        assert_eq!(t.print_to_string(None), "λ f. f {U} U");
    }

    #[test]
    fn print_meta() {
        let t = Tm::Meta(MetaVar { id: 3 });
        assert_eq!(t.print_to_string(None), "?3");
    }

    #[test]
    fn print_nested_arrow_domain() {
        // (U → U) → U
        let t = Tm::Pi {
            name: "_".to_owned(),
            icit: Icit::Expl,
            dom: rc(Tm::Pi {
                name: "_".to_owned(),
                icit: Icit::Expl,
                dom: rc(Tm::U),
                cod: rc(Tm::U),
            }),
            cod: rc(Tm::U),
        };
        assert_eq!(t.print_to_string(None), "(U → U) → U");
    }
}
