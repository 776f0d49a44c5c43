use std::collections::{BTreeMap, BTreeSet};

use pcg_core::errors::{codes, PcgError};
use pcg_core::{ParamPath, Status, Value, EXTERNAL_SOURCE};
use tracing::debug;

use crate::deviation::{score, Deviation};
use crate::parameter::{Metadata, Parameter, Reference};

pub(crate) fn not_found(path: &str) -> PcgError {
    PcgError::store(codes::NOT_FOUND, format!("no parameter stored at `{path}`"))
        .with_context("path", path)
}

pub(crate) fn expect_number(path: &str, value: &Value) -> Result<f64, PcgError> {
    value.as_f64().ok_or_else(|| {
        PcgError::store(
            codes::TYPE_MISMATCH,
            format!("parameter `{path}` holds a {} payload, not a number", value.kind()),
        )
        .with_context("path", path)
    })
}

fn check_finite(
    path: &str,
    value: &Value,
    reference: Option<&Reference>,
    metadata: Option<&Metadata>,
) -> Result<(), PcgError> {
    let offending = if !value.is_finite() {
        Some("value")
    } else if reference
        .is_some_and(|r| !r.expected_value.is_finite() || !r.uncertainty.is_finite())
    {
        Some("reference")
    } else if metadata.is_some_and(|m| !m.values().all(Value::is_finite)) {
        Some("metadata")
    } else {
        None
    };
    match offending {
        Some(field) => Err(PcgError::store(
            codes::NON_FINITE_VALUE,
            format!("parameter `{path}` carries a non-finite number in its {field}"),
        )
        .with_context("path", path)
        .with_context("field", field)),
        None => Ok(()),
    }
}

/// Append-mostly keyed table of provenance-tagged values.
///
/// Every write goes through [`ParameterStore::put`], which enforces the
/// overwrite rules: entries classed `MEASURED` or `ESTABLISHED` are final, and
/// any other entry may only be rewritten by the source that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    entries: BTreeMap<ParamPath, Parameter>,
    next_order: u64,
}

impl ParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a value is stored at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the value at `path`, failing with `not-found` if absent.
    pub fn get(&self, path: &str) -> Result<&Value, PcgError> {
        self.parameter(path).map(|parameter| &parameter.value)
    }

    /// Returns the value at `path`, or `default` if absent. Never fails.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        match self.entries.get(path) {
            Some(parameter) => parameter.value.clone(),
            None => default.into(),
        }
    }

    /// Returns the numeric value at `path`.
    pub fn number(&self, path: &str) -> Result<f64, PcgError> {
        expect_number(path, self.get(path)?)
    }

    /// Returns the full record stored at `path`.
    pub fn parameter(&self, path: &str) -> Result<&Parameter, PcgError> {
        self.entries.get(path).ok_or_else(|| not_found(path))
    }

    /// Writes a value and returns the insertion order assigned to it.
    ///
    /// Fails with `immutable-overwrite` when `path` already holds a
    /// `MEASURED`/`ESTABLISHED` entry, or when a different source wrote it.
    /// Fails with `non-finite-value` when the payload, reference or metadata
    /// carries a NaN or infinite number.
    pub fn put(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        source: &str,
        status: Status,
        reference: Option<Reference>,
        metadata: Option<Metadata>,
    ) -> Result<u64, PcgError> {
        let key = ParamPath::parse(path)?;
        let value = value.into();
        check_finite(path, &value, reference.as_ref(), metadata.as_ref())?;
        let revision = match self.entries.get(path) {
            Some(existing) => {
                check_overwrite(existing, source, status)?;
                existing.revision + 1
            }
            None => 0,
        };
        let insertion_order = self.next_order;
        self.next_order += 1;
        debug!(path = %key, source, status = %status, insertion_order, revision, "store write");
        self.entries.insert(
            key.clone(),
            Parameter {
                path: key,
                value,
                status,
                source: source.to_string(),
                reference,
                metadata: metadata.unwrap_or_default(),
                insertion_order,
                revision,
            },
        );
        Ok(insertion_order)
    }

    /// Seeds an externally sourced value ahead of a session.
    pub fn seed(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        status: Status,
    ) -> Result<u64, PcgError> {
        self.put(path, value, EXTERNAL_SOURCE, status, None, None)
    }

    /// Scores `theory_value` against the reference attached at `path`.
    ///
    /// Fails with `no-reference` when `path` carries no reference and with
    /// `invalid-reference` when the reference uncertainty is not positive.
    pub fn deviation(&self, theory_value: f64, path: &str) -> Result<Deviation, PcgError> {
        let parameter = self.parameter(path)?;
        let reference = parameter.reference.as_ref().ok_or_else(|| {
            PcgError::store(
                codes::NO_REFERENCE,
                format!("parameter `{path}` carries no reference value"),
            )
            .with_context("path", path)
        })?;
        score(theory_value, reference, path)
    }

    /// Scores the stored numeric value at `path` against its own reference.
    pub fn deviation_of(&self, path: &str) -> Result<Deviation, PcgError> {
        let theory = self.number(path)?;
        self.deviation(theory, path)
    }

    /// All parameters in insertion order.
    pub fn entries(&self) -> Vec<&Parameter> {
        let mut entries: Vec<&Parameter> = self.entries.values().collect();
        entries.sort_by_key(|parameter| parameter.insertion_order);
        entries
    }

    /// Parameters inside namespace `prefix`, in insertion order.
    pub fn with_prefix(&self, prefix: &str) -> Vec<&Parameter> {
        self.entries()
            .into_iter()
            .filter(|parameter| parameter.path.in_namespace(prefix))
            .collect()
    }

    /// Set of every stored path.
    pub fn path_set(&self) -> BTreeSet<String> {
        self.entries.keys().map(|path| path.to_string()).collect()
    }

    pub(crate) fn get_entry(&self, path: &str) -> Option<(&ParamPath, &Parameter)> {
        self.entries.get_key_value(path)
    }

    /// Rebuilds a store from records that already carry insertion orders.
    pub(crate) fn from_parameters(parameters: Vec<Parameter>) -> Result<Self, PcgError> {
        let mut entries = BTreeMap::new();
        let mut next_order = 0;
        for parameter in parameters {
            next_order = next_order.max(parameter.insertion_order + 1);
            let path = parameter.path.clone();
            if entries.insert(path.clone(), parameter).is_some() {
                return Err(PcgError::serde(
                    "export_duplicate_path",
                    format!("export lists `{path}` more than once"),
                )
                .with_context("path", path.to_string()));
            }
        }
        Ok(Self {
            entries,
            next_order,
        })
    }
}

fn check_overwrite(existing: &Parameter, source: &str, status: Status) -> Result<(), PcgError> {
    let refuse = |message: String| {
        PcgError::store(codes::IMMUTABLE_OVERWRITE, message)
            .with_context("path", existing.path.to_string())
            .with_context("existing_status", existing.status.to_string())
            .with_context("existing_source", existing.source.clone())
            .with_context("attempted_status", status.to_string())
            .with_context("attempted_source", source)
    };
    if existing.status.is_immutable() {
        return Err(refuse(format!(
            "`{}` is {} and can never be overwritten",
            existing.path, existing.status
        ))
        .with_hint("externally seeded ground truth is final for the session"));
    }
    if existing.source != source {
        return Err(refuse(format!(
            "`{}` was written by `{}`; `{}` may not overwrite it",
            existing.path, existing.source, source
        ))
        .with_hint("two producers for one path indicates a scheduling bug"));
    }
    Ok(())
}
