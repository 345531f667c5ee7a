pub use codespan::Span;

/// Conversion of byte spans into miette's source spans.
///
/// Spans are carried through elaboration as plain byte ranges and only turned
/// into [miette::SourceSpan] at the error boundary.
pub trait ToMiette {
    type Target;

    fn to_miette(self) -> Self::Target;
}

impl ToMiette for Span {
    type Target = miette::SourceSpan;

    fn to_miette(self) -> Self::Target {
        let start = self.start().to_usize();
        let len = self.end().to_usize() - start;
        miette::SourceSpan::new(start.into(), len)
    }
}

impl<T: ToMiette> ToMiette for Option<T> {
    type Target = Option<T::Target>;

    fn to_miette(self) -> Self::Target {
        self.map(ToMiette::to_miette)
    }
}
