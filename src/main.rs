use clap::Parser;
use trierouter::cli::{run_cli, Cli};
use trierouter::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    run_cli(cli)
}
