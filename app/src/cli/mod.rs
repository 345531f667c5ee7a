use clap::{Parser, Subcommand};

mod elab;
mod nf;
mod pipeline;
mod typ;

pub fn exec() -> miette::Result<()> {
    use Command::*;
    let cli = Cli::parse();
    match cli.command {
        Elab => elab::exec(),
        Nf => nf::exec(),
        Type => typ::exec(),
    }
}

#[derive(Parser)]
#[clap(author, about, version, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Elaborate a term read from stdin and print it
    Elab,
    /// Print the normal form of a term read from stdin
    Nf,
    /// Print the type of a term read from stdin
    Type,
}
