use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use pcg_store::FormulaCatalogue;
use serde_json::json;

use super::{load_store, print_json};

#[derive(Args, Debug)]
pub struct CatalogueArgs {
    /// YAML list of formula entries.
    #[arg(long)]
    pub catalogue: PathBuf,
    /// Store export to resolve references against.
    #[arg(long)]
    pub store: PathBuf,
}

pub fn run(args: &CatalogueArgs) -> Result<(), Box<dyn Error>> {
    let catalogue = FormulaCatalogue::from_yaml_slice(&fs::read(&args.catalogue)?)?;
    let store = load_store(&args.store)?;
    let unresolved = catalogue.unresolved(&store);
    print_json(&json!({
        "formulas": catalogue.len(),
        "unresolved": unresolved,
    }))
}
