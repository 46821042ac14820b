use anyhow::Result;
use clap::Parser;

use bindery_cli::{Bindery, Cargo, CargoCommand};

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // `cargo bindery ...` passes "bindery" as the first argument
    let invoked_by_cargo = std::env::args().nth(1).is_some_and(|arg| arg == "bindery");

    let command = if invoked_by_cargo {
        let CargoCommand::Bindery(bindery) = Cargo::parse().command;
        bindery.command
    } else {
        Bindery::parse().command
    };

    command.execute()
}
