use std::process::ExitCode;

use clap::Parser;
use search_desk::cli::Cli;

fn main() -> ExitCode {
    search_desk::app::run(Cli::parse())
}
