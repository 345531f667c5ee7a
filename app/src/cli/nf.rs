use super::pipeline;

pub fn exec() -> miette::Result<()> {
    let src = pipeline::read_stdin()?;
    let elab = pipeline::elaborate(&src)?;
    let nf = elab.nf().map_err(|err| pipeline::to_report(err, &src))?;
    pipeline::print_tm(&nf);
    Ok(())
}
