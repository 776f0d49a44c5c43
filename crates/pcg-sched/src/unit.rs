use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use pcg_core::errors::{codes, PcgError};
use pcg_core::{ParamPath, Status, Value};
use pcg_store::{Metadata, Reference, StoreView};

/// Pure computation entry point of a unit.
///
/// Implementations receive a view restricted to the unit's declared inputs and
/// must return every declared output.
pub trait Derivation: Send + Sync {
    /// Computes the unit's outputs from its inputs.
    fn run(&self, inputs: &StoreView<'_>) -> Result<UnitOutputs, PcgError>;
}

impl<F> Derivation for F
where
    F: Fn(&StoreView<'_>) -> Result<UnitOutputs, PcgError> + Send + Sync,
{
    fn run(&self, inputs: &StoreView<'_>) -> Result<UnitOutputs, PcgError> {
        self(inputs)
    }
}

/// One produced value with optional per-parameter provenance overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Produced payload.
    pub value: Value,
    /// Status override; the unit's default status applies when unset.
    pub status: Option<Status>,
    /// Reference attached for deviation scoring.
    pub reference: Option<Reference>,
    /// Uninterpreted qualifiers.
    pub metadata: Metadata,
}

impl Output {
    /// Creates an output carrying only a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            status: None,
            reference: None,
            metadata: Metadata::new(),
        }
    }

    /// Overrides the status for this output.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a reference value.
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Adds a metadata qualifier.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Map of produced paths returned by a unit's `run`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOutputs {
    values: BTreeMap<String, Output>,
}

impl UnitOutputs {
    /// Creates an empty output map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain value.
    pub fn with(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(path, Output::new(value));
        self
    }

    /// Adds a value with an explicit status.
    pub fn with_status(
        mut self,
        path: impl Into<String>,
        value: impl Into<Value>,
        status: Status,
    ) -> Self {
        self.insert(path, Output::new(value).with_status(status));
        self
    }

    /// Adds a fully described output, replacing any earlier one at `path`.
    pub fn insert(&mut self, path: impl Into<String>, output: Output) {
        self.values.insert(path.into(), output);
    }

    /// Returns the output produced at `path`.
    pub fn get(&self, path: &str) -> Option<&Output> {
        self.values.get(path)
    }

    /// Produced paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of produced paths.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was produced.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes and returns the output at `path`.
    pub fn take(&mut self, path: &str) -> Option<Output> {
        self.values.remove(path)
    }
}

/// Immutable contract of one computation unit.
#[derive(Clone)]
pub struct UnitDescriptor {
    id: String,
    description: Option<String>,
    required_inputs: BTreeSet<ParamPath>,
    output_params: BTreeSet<ParamPath>,
    default_status: Status,
    derivation: Arc<dyn Derivation>,
}

impl UnitDescriptor {
    /// Starts declaring a unit with the given id.
    pub fn builder(id: impl Into<String>) -> UnitDescriptorBuilder {
        UnitDescriptorBuilder {
            id: id.into(),
            description: None,
            required_inputs: Vec::new(),
            output_params: Vec::new(),
            default_status: Status::Derived,
        }
    }

    /// Unique unit identifier; also the `source` of every value it writes.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Optional human-readable description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Paths the unit reads.
    pub fn required_inputs(&self) -> &BTreeSet<ParamPath> {
        &self.required_inputs
    }

    /// Paths the unit must produce.
    pub fn output_params(&self) -> &BTreeSet<ParamPath> {
        &self.output_params
    }

    /// Status applied to outputs that do not override it.
    pub fn default_status(&self) -> Status {
        self.default_status
    }

    /// Runs the unit's derivation against a filtered view.
    pub fn run(&self, inputs: &StoreView<'_>) -> Result<UnitOutputs, PcgError> {
        self.derivation.run(inputs)
    }
}

impl fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("id", &self.id)
            .field("required_inputs", &self.required_inputs)
            .field("output_params", &self.output_params)
            .field("default_status", &self.default_status)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`UnitDescriptor::builder`].
#[derive(Debug, Clone)]
pub struct UnitDescriptorBuilder {
    id: String,
    description: Option<String>,
    required_inputs: Vec<String>,
    output_params: Vec<String>,
    default_status: Status,
}

impl UnitDescriptorBuilder {
    /// Sets a human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares one required input.
    pub fn requires(mut self, path: impl Into<String>) -> Self {
        self.required_inputs.push(path.into());
        self
    }

    /// Declares several required inputs.
    pub fn requires_all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Declares one output.
    pub fn produces(mut self, path: impl Into<String>) -> Self {
        self.output_params.push(path.into());
        self
    }

    /// Declares several outputs.
    pub fn produces_all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_params.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Status applied to outputs that do not override it.
    pub fn status(mut self, status: Status) -> Self {
        self.default_status = status;
        self
    }

    /// Finishes the descriptor with a closure derivation.
    pub fn build<F>(self, run: F) -> Result<UnitDescriptor, PcgError>
    where
        F: Fn(&StoreView<'_>) -> Result<UnitOutputs, PcgError> + Send + Sync + 'static,
    {
        self.build_with(run)
    }

    /// Finishes the descriptor with any [`Derivation`] implementation.
    pub fn build_with<D>(self, derivation: D) -> Result<UnitDescriptor, PcgError>
    where
        D: Derivation + 'static,
    {
        if self.id.trim().is_empty() {
            return Err(PcgError::config(codes::INVALID_PATH, "unit id must not be empty"));
        }
        let id = self.id;
        let parse_all = |paths: Vec<String>| -> Result<BTreeSet<ParamPath>, PcgError> {
            paths
                .into_iter()
                .map(|path| ParamPath::parse(path).map_err(|err| err.with_context("unit", id.clone())))
                .collect()
        };
        let required_inputs = parse_all(self.required_inputs)?;
        let output_params = parse_all(self.output_params)?;
        Ok(UnitDescriptor {
            id,
            description: self.description,
            required_inputs,
            output_params,
            default_status: self.default_status,
            derivation: Arc::new(derivation),
        })
    }
}
