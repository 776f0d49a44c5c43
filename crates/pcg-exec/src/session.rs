use std::sync::Arc;

use pcg_cert::{Certificate, Clock, Gate, RuleSet, ValidationEngine, ValidationReport};
use pcg_core::errors::PcgError;
use pcg_core::{ParamPath, Status, Value, EXTERNAL_SOURCE};
use pcg_sched::{Schedule, UnitDescriptor, UnitRegistry};
use pcg_store::{ParameterStore, Reference};
use tracing::info;

use crate::config::SessionConfig;
use crate::engine::{ExecutionEngine, ExecutionSummary};

#[derive(Debug, Clone)]
struct Seed {
    path: ParamPath,
    value: Value,
    status: Status,
    reference: Option<Reference>,
}

/// Everything a completed session produced.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Final store, including validation meta-values when recording is enabled.
    pub store: ParameterStore,
    /// Plan the units ran under.
    pub schedule: Schedule,
    /// Commit log of the execution.
    pub summary: ExecutionSummary,
    /// Validation outcome over the post-execution store.
    pub report: ValidationReport,
}

/// Collects units, seeds and checks, then runs sessions on fresh stores.
///
/// The builder is reusable: every call to [`SessionBuilder::run`] starts from
/// an empty store, so repeated runs are independent.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    registry: UnitRegistry,
    seeds: Vec<Seed>,
    validation: ValidationEngine,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Empty builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty builder with `config`.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: SessionConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Registers a unit.
    pub fn register(&mut self, unit: UnitDescriptor) -> Result<&mut Self, PcgError> {
        self.registry.register(unit)?;
        Ok(self)
    }

    /// Registered units.
    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Queues an external value written before any unit runs.
    pub fn seed(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        status: Status,
    ) -> Result<&mut Self, PcgError> {
        self.push_seed(path, value.into(), status, None)
    }

    /// Queues an external value carrying a reference.
    pub fn seed_with_reference(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        status: Status,
        reference: Reference,
    ) -> Result<&mut Self, PcgError> {
        self.push_seed(path, value.into(), status, Some(reference))
    }

    /// Registers a certificate.
    pub fn certificate(&mut self, certificate: Certificate) -> Result<&mut Self, PcgError> {
        self.validation.add_certificate(certificate)?;
        Ok(self)
    }

    /// Registers an audit gate.
    pub fn gate(&mut self, gate: Gate) -> Result<&mut Self, PcgError> {
        self.validation.add_gate(gate)?;
        Ok(self)
    }

    /// Registers every rule of a declarative rule set.
    pub fn rules(&mut self, rules: RuleSet) -> Result<&mut Self, PcgError> {
        rules.register_into(&mut self.validation)?;
        Ok(self)
    }

    /// Replaces the clock stamped onto gate results.
    pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
        self.validation.set_clock(clock);
        self
    }

    /// Runs a session on a fresh store.
    pub fn run(&self) -> Result<SessionOutcome, PcgError> {
        self.run_on(ParameterStore::new())
    }

    /// Runs a session on top of an existing store, applying queued seeds first.
    pub fn run_on(&self, mut store: ParameterStore) -> Result<SessionOutcome, PcgError> {
        for seed in &self.seeds {
            store.put(
                seed.path.as_str(),
                seed.value.clone(),
                EXTERNAL_SOURCE,
                seed.status,
                seed.reference.clone(),
                None,
            )?;
        }

        let engine = ExecutionEngine::new(&self.registry, self.config.execution.clone());
        let schedule = engine.plan(&store)?;
        let summary = engine.execute(&schedule, &mut store)?;

        let report = self.validation.run_all(&store)?;
        if self.config.validation.record_results {
            report.record_into(&mut store)?;
        }
        info!(
            units = summary.units.len(),
            entries = store.len(),
            overall_pass = report.overall_pass,
            "session complete"
        );
        Ok(SessionOutcome {
            store,
            schedule,
            summary,
            report,
        })
    }

    fn push_seed(
        &mut self,
        path: &str,
        value: Value,
        status: Status,
        reference: Option<Reference>,
    ) -> Result<&mut Self, PcgError> {
        self.seeds.push(Seed {
            path: ParamPath::parse(path)?,
            value,
            status,
            reference,
        });
        Ok(self)
    }
}
