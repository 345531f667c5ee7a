use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::{LexicalError, Token};

/// Errors emitted while lexing or parsing a term.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid token")]
    #[diagnostic(code("P-001"))]
    InvalidToken {
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected token {token}")]
    #[diagnostic(code("P-002"))]
    UnexpectedToken {
        token: String,
        expected: String,
        #[label("expected {expected}")]
        span: SourceSpan,
    },
    #[error("Unexpected end of input")]
    #[diagnostic(code("P-003"))]
    UnexpectedEof {
        expected: String,
        #[label("expected {expected}")]
        span: SourceSpan,
    },
    #[error("Unexpected trailing input {token}")]
    #[diagnostic(code("P-004"))]
    ExtraToken {
        token: String,
        #[label]
        span: SourceSpan,
    },
}

type LalrpopError = lalrpop_util::ParseError<usize, Token, (LexicalError, std::ops::Range<usize>)>;

impl From<LalrpopError> for ParseError {
    fn from(err: LalrpopError) -> Self {
        use lalrpop_util::ParseError::*;
        match err {
            InvalidToken { location } => {
                ParseError::InvalidToken { span: (location, 0).into() }
            }
            UnrecognizedEof { location, expected } => ParseError::UnexpectedEof {
                expected: one_of(&expected),
                span: (location, 0).into(),
            },
            UnrecognizedToken { token: (l, tok, r), expected } => ParseError::UnexpectedToken {
                token: tok.to_string(),
                expected: one_of(&expected),
                span: (l, r - l).into(),
            },
            ExtraToken { token: (l, tok, r) } => {
                ParseError::ExtraToken { token: tok.to_string(), span: (l, r - l).into() }
            }
            User { error: (_, span) } => {
                ParseError::InvalidToken { span: (span.start, span.end - span.start).into() }
            }
        }
    }
}

fn one_of(expected: &[String]) -> String {
    expected.join(" or ")
}
