use std::io::Read;
use std::rc::Rc;

use ast::Tm;
use elaborator::{Elab, TypeError};
use miette::{IntoDiagnostic, Report};
use printer::Print;

pub fn read_stdin() -> miette::Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
    Ok(buf)
}

pub fn elaborate(src: &str) -> miette::Result<Elab> {
    let raw = parser::parse_term(src)
        .map_err(|err| Report::new(err).with_source_code(src.to_owned()))?;
    elaborator::elaborate(&raw).map_err(|err| to_report(err, src))
}

pub fn to_report(err: Box<TypeError>, src: &str) -> Report {
    Report::new(*err).with_source_code(src.to_owned())
}

pub fn print_tm(tm: &Rc<Tm>) {
    println!("{}", tm.print_to_string(None));
}
