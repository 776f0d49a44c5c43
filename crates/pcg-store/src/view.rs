use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use pcg_core::errors::{codes, PcgError};
use pcg_core::Value;

use crate::parameter::Parameter;
use crate::store::{expect_number, ParameterStore};

/// Read-only window onto exactly the inputs a unit declared.
///
/// Any access to a path outside the declared set is refused and remembered,
/// so the engine can fail the unit even when `run` swallowed the error.
#[derive(Debug)]
pub struct StoreView<'a> {
    unit: String,
    entries: BTreeMap<&'a str, &'a Parameter>,
    undeclared: RefCell<BTreeSet<String>>,
}

impl<'a> StoreView<'a> {
    /// Builds the view for `unit` over `inputs`.
    ///
    /// Fails with `missing-input` if any declared input is absent from `store`.
    pub fn for_unit<I, S>(store: &'a ParameterStore, unit: &str, inputs: I) -> Result<Self, PcgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        for input in inputs {
            let input = input.as_ref();
            let (path, parameter) = store.get_entry(input).ok_or_else(|| {
                PcgError::contract(
                    codes::MISSING_INPUT,
                    format!("unit `{unit}` requires `{input}` but the store does not hold it"),
                )
                .with_context("unit", unit)
                .with_context("path", input)
            })?;
            entries.insert(path.as_str(), parameter);
        }
        Ok(Self {
            unit: unit.to_string(),
            entries,
            undeclared: RefCell::new(BTreeSet::new()),
        })
    }

    /// Identifier of the unit this view belongs to.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Declared input paths visible through this view.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().copied()
    }

    /// Returns the full record of a declared input.
    pub fn parameter(&self, path: &str) -> Result<&'a Parameter, PcgError> {
        match self.entries.get(path) {
            Some(parameter) => Ok(*parameter),
            None => Err(self.refuse(path)),
        }
    }

    /// Returns the value of a declared input.
    pub fn get(&self, path: &str) -> Result<&'a Value, PcgError> {
        self.parameter(path).map(|parameter| &parameter.value)
    }

    /// Returns the numeric value of a declared input.
    pub fn number(&self, path: &str) -> Result<f64, PcgError> {
        expect_number(path, self.get(path)?)
    }

    /// Returns the value of a declared input, or `default` for any other path.
    ///
    /// An undeclared path still counts as a hidden read.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        match self.entries.get(path) {
            Some(parameter) => parameter.value.clone(),
            None => {
                self.record(path);
                default.into()
            }
        }
    }

    /// Whether `path` is a declared input. Probing other paths counts as a hidden read.
    pub fn has(&self, path: &str) -> bool {
        let declared = self.entries.contains_key(path);
        if !declared {
            self.record(path);
        }
        declared
    }

    /// Paths the unit attempted to read without declaring them.
    pub fn undeclared_reads(&self) -> Vec<String> {
        self.undeclared.borrow().iter().cloned().collect()
    }

    fn record(&self, path: &str) {
        self.undeclared.borrow_mut().insert(path.to_string());
    }

    fn refuse(&self, path: &str) -> PcgError {
        self.record(path);
        PcgError::contract(
            codes::UNDECLARED_READ,
            format!("unit `{}` read `{path}` without declaring it", self.unit),
        )
        .with_context("unit", self.unit.clone())
        .with_context("path", path)
        .with_hint("add the path to the unit's required inputs")
    }
}
