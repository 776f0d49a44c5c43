use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use super::{load_store, print_json};

#[derive(Args, Debug)]
pub struct DeviationArgs {
    /// Store export holding the reference.
    #[arg(long)]
    pub store: PathBuf,
    /// Parameter carrying the reference value.
    #[arg(long)]
    pub path: String,
    /// Value to score; defaults to the stored value.
    #[arg(long)]
    pub theory: Option<f64>,
}

pub fn run(args: &DeviationArgs) -> Result<(), Box<dyn Error>> {
    let store = load_store(&args.store)?;
    let deviation = match args.theory {
        Some(theory) => store.deviation(theory, &args.path)?,
        None => store.deviation_of(&args.path)?,
    };
    print_json(&deviation)
}
