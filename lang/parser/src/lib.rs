mod grammar;
pub mod lexer;
mod result;

use ast::Raw;
use lexer::Lexer;

pub use result::*;

/// Parse a single surface term.
pub fn parse_term(s: &str) -> Result<Box<Raw>, ParseError> {
    let lexer = Lexer::new(s);
    grammar::raw::TermParser::new().parse(lexer).map_err(From::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{Icit, Raw};

    fn parse(s: &str) -> Raw {
        strip(*parse_term(s).unwrap())
    }

    /// Remove position wrappers everywhere so tests can match on structure.
    fn strip(t: Raw) -> Raw {
        match t {
            Raw::SrcPos { inner, .. } => strip(*inner),
            Raw::Lam { name, ann, icit, body } => Raw::Lam {
                name,
                ann: ann.map(|a| Box::new(strip(*a))),
                icit,
                body: Box::new(strip(*body)),
            },
            Raw::App { fun, arg, icit } => Raw::App {
                fun: Box::new(strip(*fun)),
                arg: Box::new(strip(*arg)),
                icit,
            },
            Raw::Pi { name, icit, dom, cod } => Raw::Pi {
                name,
                icit,
                dom: Box::new(strip(*dom)),
                cod: Box::new(strip(*cod)),
            },
            Raw::Let { name, ann, val, body } => Raw::Let {
                name,
                ann: Box::new(strip(*ann)),
                val: Box::new(strip(*val)),
                body: Box::new(strip(*body)),
            },
            t => t,
        }
    }

    #[test]
    fn parse_universe() {
        assert!(matches!(parse("U"), Raw::Univ));
    }

    #[test]
    fn parse_hole() {
        assert!(matches!(parse("_"), Raw::Hole));
    }

    #[test]
    fn parse_lambda() {
        let t = parse("λ x. x");
        let Raw::Lam { name, ann, icit, body } = t else { panic!("expected lambda") };
        assert_eq!(name, "x");
        assert!(ann.is_none());
        assert_eq!(icit, Icit::Expl);
        assert!(matches!(*body, Raw::Var(x) if x == "x"));
    }

    #[test]
    fn parse_ascii_lambda() {
        let t = parse(r"\ {A} (x : A). x");
        let Raw::Lam { name, icit, .. } = t else { panic!("expected lambda") };
        assert_eq!(name, "A");
        assert_eq!(icit, Icit::Impl);
    }

    #[test]
    fn parse_implicit_pi_group() {
        // {A B} → A expands to two implicit binders with hole domains
        let t = parse("{A B} → A");
        let Raw::Pi { name, icit, dom, cod } = t else { panic!("expected pi") };
        assert_eq!(name, "A");
        assert_eq!(icit, Icit::Impl);
        assert!(matches!(*dom, Raw::Hole));
        let Raw::Pi { name, icit, .. } = *cod else { panic!("expected pi") };
        assert_eq!(name, "B");
        assert_eq!(icit, Icit::Impl);
    }

    #[test]
    fn parse_annotated_pi() {
        let t = parse("(A : U) → A → A");
        let Raw::Pi { name, icit, dom, cod } = t else { panic!("expected pi") };
        assert_eq!(name, "A");
        assert_eq!(icit, Icit::Expl);
        assert!(matches!(*dom, Raw::Univ));
        let Raw::Pi { name, dom, .. } = *cod else { panic!("expected pi") };
        assert_eq!(name, "_");
        assert!(matches!(*dom, Raw::Var(x) if x == "A"));
    }

    #[test]
    fn parse_arrow_right_assoc() {
        let t = parse("U → U → U");
        let Raw::Pi { cod, .. } = t else { panic!("expected pi") };
        assert!(matches!(*cod, Raw::Pi { .. }));
    }

    #[test]
    fn parse_application() {
        let t = parse("f x {y} z");
        let Raw::App { fun, icit, .. } = t else { panic!("expected app") };
        assert_eq!(icit, Icit::Expl);
        let Raw::App { icit, .. } = *fun else { panic!("expected app") };
        assert_eq!(icit, Icit::Impl);
    }

    #[test]
    fn parse_let_without_annotation() {
        let t = parse("let f = λ x. x in f");
        let Raw::Let { name, ann, .. } = t else { panic!("expected let") };
        assert_eq!(name, "f");
        assert!(matches!(*ann, Raw::Hole));
    }

    #[test]
    fn parse_let_with_annotation() {
        let t = parse("let id : {A} → A → A = λ x. x in id U");
        let Raw::Let { ann, body, .. } = t else { panic!("expected let") };
        assert!(matches!(*ann, Raw::Pi { icit: Icit::Impl, .. }));
        assert!(matches!(*body, Raw::App { .. }));
    }

    #[test]
    fn parse_comment() {
        assert!(matches!(parse("-- a comment\nU"), Raw::Univ));
    }

    #[test]
    fn parse_spans_cover_input() {
        let src = "let f = λ x. x in f";
        let t = *parse_term(src).unwrap();
        let Raw::SrcPos { span, .. } = t else { panic!("expected position wrapper") };
        assert_eq!(span.start().to_usize(), 0);
        assert_eq!(span.end().to_usize(), src.len());
    }

    #[test]
    fn parse_error_has_span() {
        let err = parse_term("λ . x").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }
}
