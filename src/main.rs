use clap::Parser;
use commands::Cli;

mod cache;
mod commands;
mod errors;
mod metadata;
mod session;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();
    commands::run_command(args)
}
