use super::pipeline;

pub fn exec() -> miette::Result<()> {
    let src = pipeline::read_stdin()?;
    let elab = pipeline::elaborate(&src)?;
    let tm = elab.zonked_tm().map_err(|err| pipeline::to_report(err, &src))?;
    pipeline::print_tm(&tm);
    Ok(())
}
