use ast::{Icit, Name, Raw, Span};

/// A surface binder: name, optional type annotation, icitness.
pub type Binder = (Name, Option<Box<Raw>>, Icit);

pub fn spanned(l: usize, r: usize, t: Raw) -> Box<Raw> {
    Box::new(Raw::SrcPos { span: Span::new(l as u32, r as u32), inner: Box::new(t) })
}

pub fn lam(l: usize, r: usize, binders: Vec<Binder>, body: Box<Raw>) -> Box<Raw> {
    let t = binders
        .into_iter()
        .rev()
        .fold(body, |body, (name, ann, icit)| Box::new(Raw::Lam { name, ann, icit, body }));
    Box::new(Raw::SrcPos { span: Span::new(l as u32, r as u32), inner: t })
}

/// Fold a row of binder groups into nested `Pi`s. A binder without an
/// annotation gets a hole as its domain.
pub fn pi(l: usize, r: usize, doms: Vec<Vec<Binder>>, cod: Box<Raw>) -> Box<Raw> {
    let binders: Vec<Binder> = doms.into_iter().flatten().collect();
    let t = binders.into_iter().rev().fold(cod, |cod, (name, ann, icit)| {
        Box::new(Raw::Pi {
            name,
            icit,
            dom: ann.unwrap_or_else(|| Box::new(Raw::Hole)),
            cod,
        })
    });
    Box::new(Raw::SrcPos { span: Span::new(l as u32, r as u32), inner: t })
}

/// A non-dependent explicit function type.
pub fn arrow(l: usize, r: usize, dom: Box<Raw>, cod: Box<Raw>) -> Box<Raw> {
    spanned(l, r, Raw::Pi { name: "_".to_owned(), icit: Icit::Expl, dom, cod })
}

pub fn app(l: usize, r: usize, fun: Box<Raw>, arg: Box<Raw>, icit: Icit) -> Box<Raw> {
    spanned(l, r, Raw::App { fun, arg, icit })
}

/// A `let` without an annotation elaborates against a hole.
pub fn let_(
    l: usize,
    r: usize,
    name: Name,
    ann: Option<Box<Raw>>,
    val: Box<Raw>,
    body: Box<Raw>,
) -> Box<Raw> {
    spanned(
        l,
        r,
        Raw::Let { name, ann: ann.unwrap_or_else(|| Box::new(Raw::Hole)), val, body },
    )
}

/// Annotate every binder in a group with (a copy of) the same type.
pub fn annotated(names: Vec<Name>, ty: Box<Raw>, icit: Icit) -> Vec<Binder> {
    names.into_iter().map(|x| (x, Some(ty.clone()), icit)).collect()
}
