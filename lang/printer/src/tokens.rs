//! String constants used by the pretty-printer.

pub const ARROW: &str = "→";
pub const LAMBDA: &str = "λ";
pub const DOT: &str = ".";
pub const COLON: &str = ":";
pub const EQ: &str = "=";
pub const LET: &str = "let";
pub const IN: &str = "in";
pub const TYPE: &str = "U";
pub const HOLE: &str = "_";
pub const QUESTION_MARK: &str = "?";
pub const AT: &str = "@";
pub const TEL: &str = "Tel";
pub const REC: &str = "Rec";
pub const TEMPTY: &str = "∙";
pub const TNIL: &str = "[]";
pub const TCONS: &str = "::";
pub const PROJ1: &str = ".1";
pub const PROJ2: &str = ".2";
