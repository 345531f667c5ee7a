use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use ast::{Lvl, Name};

/// The result type specialized to elaboration errors.
pub type TcResult<T = ()> = Result<T, Box<TypeError>>;

/// Reasons a metavariable spine fails the pattern condition.
///
/// These are raised inside `check_sp` and caught in `solve_meta` (rethrown as
/// a rich [TypeError]) and in the flex-flex case of unification (used to pick
/// the side to solve).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpineError {
    /// An eliminator argument is not a bound variable.
    NonVariable,
    /// The same bound variable appears twice in the spine.
    NonLinear(Lvl),
    /// The spine contains a record projection.
    Projection,
}

/// Reasons a candidate solution cannot be moved into a metavariable's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengtheningError {
    /// A bound variable outside the renaming's domain occurs in the solution.
    ScopeError(Lvl),
    /// The metavariable being solved occurs in the candidate solution.
    OccursCheck,
}

/// Union of the recoverable failure classes plus genuine elaboration errors
/// encountered while traversing a candidate solution.
#[derive(Debug)]
pub enum SolveError {
    Spine(SpineError),
    Strengthening(StrengtheningError),
    Tc(Box<TypeError>),
}

impl From<SpineError> for SolveError {
    fn from(err: SpineError) -> Self {
        SolveError::Spine(err)
    }
}

impl From<StrengtheningError> for SolveError {
    fn from(err: StrengtheningError) -> Self {
        SolveError::Strengthening(err)
    }
}

impl From<Box<TypeError>> for SolveError {
    fn from(err: Box<TypeError>) -> Self {
        SolveError::Tc(err)
    }
}

/// All errors that can be emitted during elaboration, i.e. during
/// bidirectional type inference, normalization, metavariable solving or
/// unification.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Variable {name} is not in scope")]
    #[diagnostic(code("T-001"))]
    NameNotInScope {
        name: Name,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The following types are not equal:\n  1: {lhs}\n  2: {rhs}\n")]
    #[diagnostic(code("T-002"))]
    UnifyError {
        names: Vec<Name>,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    /// Outer decoration preserving the sides the caller originally equated.
    #[error("While unifying {lhs} with {rhs}")]
    #[diagnostic(code("T-003"))]
    UnifyErrorWhile {
        lhs: String,
        rhs: String,
        #[label("while elaborating")]
        span: Option<SourceSpan>,
        #[source]
        #[diagnostic_source]
        inner: Box<TypeError>,
    },
    #[error("The metavariable {meta_var} received an argument that is not a variable")]
    #[diagnostic(
        code("T-004"),
        help("This means that the metavariable cannot be solved automatically.")
    )]
    MetaArgNotVariable {
        meta_var: String,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The metavariable {meta_var} received the variable {arg} as an argument more than once")]
    #[diagnostic(
        code("T-005"),
        help("This means that the metavariable cannot be solved automatically.")
    )]
    MetaArgNotDistinct {
        meta_var: String,
        arg: String,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The metavariable {meta_var} is eliminated by a record projection")]
    #[diagnostic(
        code("T-006"),
        help("This means that the metavariable cannot be solved automatically.")
    )]
    MetaSpineProjection {
        meta_var: String,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The metavariable {meta_var} was equated with a term that mentions {out_of_scope}, which is not in scope for {meta_var}")]
    #[diagnostic(code("T-007"))]
    MetaEquatedToOutOfScope {
        meta_var: String,
        out_of_scope: String,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The metavariable {meta_var} was equated with a term that contains {meta_var} itself")]
    #[diagnostic(code("T-008"))]
    MetaOccursCheckFailed {
        meta_var: String,
        lhs: String,
        rhs: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Expected an {expected} argument but the application provides an {got} one")]
    #[diagnostic(code("T-009"))]
    IcitMismatch {
        expected: ast::Icit,
        got: ast::Icit,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Applied a term of non-function type {got}")]
    #[diagnostic(code("T-010"))]
    ExpectedFunction {
        got: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("An unexpected internal error occurred: {message}")]
    #[diagnostic(code("T-XXX"))]
    /// This error should not occur. Some internal invariant has been violated.
    Impossible {
        message: String,
        #[label]
        span: Option<SourceSpan>,
    },
}

impl std::borrow::Borrow<dyn Diagnostic> for Box<TypeError> {
    fn borrow(&self) -> &(dyn Diagnostic + 'static) {
        self.as_ref()
    }
}

impl TypeError {
    pub fn impossible(message: impl Into<String>) -> Box<Self> {
        Box::new(TypeError::Impossible { message: message.into(), span: None })
    }

    /// The id of the metavariable a solve error is about, if any.
    pub fn meta_var(&self) -> Option<&str> {
        match self {
            TypeError::MetaArgNotVariable { meta_var, .. }
            | TypeError::MetaArgNotDistinct { meta_var, .. }
            | TypeError::MetaSpineProjection { meta_var, .. }
            | TypeError::MetaEquatedToOutOfScope { meta_var, .. }
            | TypeError::MetaOccursCheckFailed { meta_var, .. } => Some(meta_var),
            _ => None,
        }
    }
}
