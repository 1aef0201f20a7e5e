use clap::Parser;
use miette::Result;
use purchaser::cli::Cli;
use purchaser::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new().with_verbose(cli.verbose);

    purchaser::cli::build::run(&cli.build, &printer)?;

    Ok(())
}
