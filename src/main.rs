use clap::Parser;
use godlife::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
