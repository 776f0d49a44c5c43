use std::error::Error;
use std::path::Path;

use pcg_store::{read_export, ParameterStore};
use serde::Serialize;

pub mod catalogue;
pub mod demo;
pub mod deviation;
pub mod inspect;
pub mod validate;

/// Rebuilds a store from an export file, verifying its hash.
pub fn load_store(path: &Path) -> Result<ParameterStore, Box<dyn Error>> {
    let export = read_export(path)?;
    Ok(ParameterStore::from_export(&export)?)
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
