mod cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    env_logger::init();
    cli::exec()
}
