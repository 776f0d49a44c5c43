use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    catalogue::{self, CatalogueArgs},
    demo::{self, DemoArgs},
    deviation::{self, DeviationArgs},
    inspect::{self, InspectArgs},
    validate::{self, ValidateArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pcg", about = "Parameter computation graph tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay validation rules over an exported store.
    Validate(ValidateArgs),
    /// List the entries of an exported store.
    Inspect(InspectArgs),
    /// Score a value against the reference stored at a path.
    Deviation(DeviationArgs),
    /// Report formula references an exported store cannot resolve.
    Catalogue(CatalogueArgs),
    /// Run the built-in pi doubling session.
    Demo(DemoArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    pcg_exec::logging::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Validate(args) => validate::run(&args),
        Command::Inspect(args) => inspect::run(&args),
        Command::Deviation(args) => deviation::run(&args),
        Command::Catalogue(args) => catalogue::run(&args),
        Command::Demo(args) => demo::run(&args),
    }
}
