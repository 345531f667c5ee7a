use std::fmt;

use logos::{Logos, SpannedIter};

#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[default]
    InvalidToken,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"\s+", skip r"--[^\n\r]*", error = LexicalError)]
pub enum Token {
    // Keywords
    //
    //
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("U", priority = 3)]
    Type,

    // Parens and braces
    //
    //
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Symbols
    //
    //
    #[token("λ")]
    #[token("\\")]
    Lambda,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("→")]
    #[token("->")]
    Arrow,
    #[token("_")]
    Underscore,

    // Identifiers
    //
    //
    #[regex(r"[a-zA-Zα-ωΑ-Ω][a-zA-Zα-ωΑ-Ω0-9'_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Ident(id) => write!(f, "{id}"),
            t => write!(f, "{t:?}"),
        }
    }
}

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), (Error, std::ops::Range<usize>)>;

pub struct Lexer<'input> {
    token_stream: SpannedIter<'input, Token>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self { token_stream: Token::lexer(input).spanned() }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Token, usize, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.token_stream.next().map(|(token, span)| match token {
            Ok(token) => Ok((span.start, token, span.end)),
            Err(err) => Err((err, span)),
        })
    }
}
