use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{collect_command, init_command, list_command};

#[derive(Parser)]
#[command(bin_name = "cargo")]
#[command(version, propagate_version = true)]
pub struct Cargo {
    #[command(subcommand)]
    pub command: CargoCommand,
}

#[derive(Subcommand, Debug)]
pub enum CargoCommand {
    #[command(name = "bindery")]
    #[command(about = "Collect and inspect service binding registries")]
    Bindery(Bindery),
}

#[derive(Parser, Debug)]
#[command(name = "cargo-bindery")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Bindery {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources for bindings and update the registries
    #[command(visible_alias = "c")]
    Collect {
        /// Files or directories to scan (defaults to the configured source roots)
        paths: Vec<PathBuf>,

        /// Directory the registries are written to
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Configuration file (defaults to the closest .bindery.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Crate name used for binary names (defaults to Cargo.toml)
        #[arg(long = "crate-name")]
        crate_name: Option<String>,
    },
    /// List the registered implementations of a contract
    #[command(visible_alias = "l")]
    List {
        /// Binary name of the contract, e.g. my_app::Greeter
        contract: String,

        /// Search roots, in lookup order (defaults to the output dir and search path)
        #[arg(short, long = "search")]
        search: Vec<PathBuf>,

        /// Read plain service registries instead of collected bindings
        #[arg(long)]
        services: bool,

        /// Configuration file (defaults to the closest .bindery.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default .bindery.json
    Init {
        /// Specify the current working directory
        #[arg(long)]
        cwd: Option<String>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Collect {
                paths,
                out,
                config,
                crate_name,
            } => collect_command(&paths, out.as_deref(), config.as_deref(), crate_name.as_deref()),
            Commands::List {
                contract,
                search,
                services,
                config,
                json,
            } => list_command(&contract, &search, services, config.as_deref(), json),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Bindery::command().debug_assert();
        Cargo::command().debug_assert();
    }

    #[test]
    fn test_parse_as_cargo_subcommand() {
        let cargo = Cargo::try_parse_from(["cargo", "bindery", "list", "app::Bob", "--services"])
            .unwrap();
        let CargoCommand::Bindery(bindery) = cargo.command;
        match bindery.command {
            Commands::List {
                contract, services, ..
            } => {
                assert_eq!(contract, "app::Bob");
                assert!(services);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_collect_paths_and_out() {
        let bindery =
            Bindery::try_parse_from(["cargo-bindery", "collect", "src", "lib", "-o", "out"]).unwrap();
        match bindery.command {
            Commands::Collect { paths, out, .. } => {
                assert_eq!(paths, vec![PathBuf::from("src"), PathBuf::from("lib")]);
                assert_eq!(out, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
