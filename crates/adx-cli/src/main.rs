use std::process::ExitCode;

use adx_cli::Cli;
use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    adx_cli::run(&cli)
}
