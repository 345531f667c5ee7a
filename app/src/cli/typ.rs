use super::pipeline;

pub fn exec() -> miette::Result<()> {
    let src = pipeline::read_stdin()?;
    let elab = pipeline::elaborate(&src)?;
    pipeline::print_tm(&elab.ty);
    Ok(())
}
