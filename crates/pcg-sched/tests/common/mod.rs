#![allow(dead_code)]

use std::collections::BTreeSet;

use pcg_core::PcgError;
use pcg_sched::{UnitDescriptor, UnitOutputs, UnitRegistry};

/// Unit that writes `1.0` to every declared output.
pub fn constant_unit(id: &str, requires: &[&str], produces: &[&str]) -> UnitDescriptor {
    let outputs: Vec<String> = produces.iter().map(|p| p.to_string()).collect();
    UnitDescriptor::builder(id)
        .requires_all(requires.iter().copied())
        .produces_all(produces.iter().copied())
        .build(move |_view| {
            Ok(outputs
                .iter()
                .fold(UnitOutputs::new(), |acc, path| acc.with(path.clone(), 1.0)))
        })
        .unwrap()
}

pub fn registry(units: Vec<UnitDescriptor>) -> Result<UnitRegistry, PcgError> {
    let mut registry = UnitRegistry::new();
    for unit in units {
        registry.register(unit)?;
    }
    Ok(registry)
}

pub fn seeds(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}
