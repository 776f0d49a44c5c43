use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pcg_store::ExportEntry;

use super::{load_store, print_json};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Store export to list.
    #[arg(long)]
    pub store: PathBuf,
    /// Only list entries inside this namespace.
    #[arg(long)]
    pub prefix: Option<String>,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let store = load_store(&args.store)?;
    let entries = match &args.prefix {
        Some(prefix) => store.with_prefix(prefix),
        None => store.entries(),
    };
    let listed: Vec<ExportEntry> = entries.into_iter().map(ExportEntry::from).collect();
    print_json(&listed)
}
