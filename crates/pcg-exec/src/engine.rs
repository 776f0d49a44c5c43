use std::collections::BTreeMap;

use pcg_core::errors::{codes, PcgError};
use pcg_core::ParamPath;
use pcg_sched::{plan_schedule, Output, Schedule, UnitDescriptor, UnitRegistry};
use pcg_store::{ParameterStore, StoreView};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ExecutionConfig, ExecutionMode};

/// Outputs of one unit, validated against its contract and ready to commit.
type Staged<'r> = (&'r UnitDescriptor, Vec<(String, Output)>);

/// Commit record of one executed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    /// Unit identifier.
    pub unit: String,
    /// Wave the unit belongs to.
    pub wave: usize,
    /// Paths written, in commit order.
    pub written: Vec<String>,
}

/// What a completed execution did, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    /// Mode the units were dispatched in.
    pub mode: ExecutionMode,
    /// One record per executed unit.
    pub units: Vec<UnitRecord>,
}

impl ExecutionSummary {
    /// Executed unit ids in commit order.
    pub fn executed_units(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|record| record.unit.as_str())
    }

    /// Written paths in commit order.
    pub fn written_paths(&self) -> impl Iterator<Item = &str> {
        self.units
            .iter()
            .flat_map(|record| record.written.iter().map(String::as_str))
    }

    /// Total number of store writes.
    pub fn write_count(&self) -> usize {
        self.units.iter().map(|record| record.written.len()).sum()
    }
}

/// Runs the units of a registry against a store.
#[derive(Debug)]
pub struct ExecutionEngine<'r> {
    registry: &'r UnitRegistry,
    config: ExecutionConfig,
}

impl<'r> ExecutionEngine<'r> {
    /// Engine over `registry` dispatching per `config`.
    pub fn new(registry: &'r UnitRegistry, config: ExecutionConfig) -> Self {
        Self { registry, config }
    }

    /// Plans against the paths currently present in `store`.
    pub fn plan(&self, store: &ParameterStore) -> Result<Schedule, PcgError> {
        plan_schedule(self.registry, &store.path_set())
    }

    /// Plans and executes in one step.
    pub fn run(&self, store: &mut ParameterStore) -> Result<(Schedule, ExecutionSummary), PcgError> {
        let schedule = self.plan(store)?;
        let summary = self.execute(&schedule, store)?;
        Ok((schedule, summary))
    }

    /// Executes a schedule previously planned for this registry.
    ///
    /// Units commit into a working copy that replaces `store` only once every
    /// unit has succeeded. The first contract violation aborts the session and
    /// leaves `store` as it was.
    pub fn execute(
        &self,
        schedule: &Schedule,
        store: &mut ParameterStore,
    ) -> Result<ExecutionSummary, PcgError> {
        let mut working = store.clone();
        let units = match self.config.mode {
            ExecutionMode::Sequential => self.execute_sequential(schedule, &mut working)?,
            ExecutionMode::Parallel => self.execute_parallel(schedule, &mut working)?,
        };
        *store = working;
        let summary = ExecutionSummary {
            mode: self.config.mode,
            units,
        };
        info!(
            mode = ?summary.mode,
            units = summary.units.len(),
            writes = summary.write_count(),
            "execution finished"
        );
        Ok(summary)
    }

    fn execute_sequential(
        &self,
        schedule: &Schedule,
        store: &mut ParameterStore,
    ) -> Result<Vec<UnitRecord>, PcgError> {
        let waves = wave_index(schedule);
        let mut records = Vec::with_capacity(schedule.len());
        for id in &schedule.order {
            let unit = self.unit(id)?;
            let staged = evaluate(unit, store)?;
            let wave = waves.get(id.as_str()).copied().unwrap_or_default();
            records.push(commit(store, (unit, staged), wave)?);
        }
        Ok(records)
    }

    fn execute_parallel(
        &self,
        schedule: &Schedule,
        store: &mut ParameterStore,
    ) -> Result<Vec<UnitRecord>, PcgError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.max(1))
            .build()
            .map_err(|err| PcgError::config("thread_pool", err.to_string()))?;
        let mut records = Vec::with_capacity(schedule.len());
        for (wave, ids) in schedule.waves.iter().enumerate() {
            let outcomes: Vec<Result<Staged<'r>, PcgError>> = {
                let committed: &ParameterStore = store;
                pool.install(|| {
                    ids.par_iter()
                        .map(|id| -> Result<Staged<'r>, PcgError> {
                            let unit = self.unit(id)?;
                            Ok((unit, evaluate(unit, committed)?))
                        })
                        .collect()
                })
            };
            debug!(wave, units = ids.len(), "wave evaluated");
            for outcome in outcomes {
                records.push(commit(store, outcome?, wave)?);
            }
        }
        Ok(records)
    }

    fn unit(&self, id: &str) -> Result<&'r UnitDescriptor, PcgError> {
        self.registry.get(id).ok_or_else(|| {
            PcgError::contract(
                codes::NOT_FOUND,
                format!("scheduled unit `{id}` is not registered with this engine"),
            )
            .with_context("unit", id)
        })
    }
}

fn wave_index(schedule: &Schedule) -> BTreeMap<&str, usize> {
    schedule
        .waves
        .iter()
        .enumerate()
        .flat_map(|(wave, ids)| ids.iter().map(move |id| (id.as_str(), wave)))
        .collect()
}

/// Runs one unit against a view of its declared inputs and checks its result.
fn evaluate(unit: &UnitDescriptor, store: &ParameterStore) -> Result<Vec<(String, Output)>, PcgError> {
    let view = StoreView::for_unit(
        store,
        unit.id(),
        unit.required_inputs().iter().map(ParamPath::as_str),
    )?;
    let result = unit.run(&view);
    let hidden = view.undeclared_reads();
    if !hidden.is_empty() {
        return Err(PcgError::contract(
            codes::UNDECLARED_READ,
            format!("unit `{}` read paths it did not declare", unit.id()),
        )
        .with_context("unit", unit.id())
        .with_context("path", hidden.join(","))
        .with_hint("add the paths to the unit's required inputs"));
    }
    let mut outputs = result.map_err(|err| err.with_context("unit", unit.id()))?;

    let mut staged = Vec::with_capacity(unit.output_params().len());
    for path in unit.output_params() {
        let output = outputs.take(path.as_str()).ok_or_else(|| {
            PcgError::contract(
                codes::INCOMPLETE_OUTPUT,
                format!("unit `{}` did not produce declared output `{path}`", unit.id()),
            )
            .with_context("unit", unit.id())
            .with_context("path", path.as_str())
        })?;
        staged.push((path.as_str().to_string(), output));
    }
    if let Some(extra) = outputs.paths().next() {
        return Err(PcgError::contract(
            codes::UNDECLARED_OUTPUT,
            format!("unit `{}` produced undeclared output `{extra}`", unit.id()),
        )
        .with_context("unit", unit.id())
        .with_context("path", extra));
    }
    Ok(staged)
}

fn commit(
    store: &mut ParameterStore,
    (unit, staged): Staged<'_>,
    wave: usize,
) -> Result<UnitRecord, PcgError> {
    let mut written = Vec::with_capacity(staged.len());
    for (path, output) in staged {
        let status = output.status.unwrap_or(unit.default_status());
        store
            .put(
                &path,
                output.value,
                unit.id(),
                status,
                output.reference,
                Some(output.metadata),
            )
            .map_err(|err| err.with_context("unit", unit.id()))?;
        written.push(path);
    }
    debug!(unit = %unit.id(), wave, outputs = written.len(), "unit committed");
    Ok(UnitRecord {
        unit: unit.id().to_string(),
        wave,
        written,
    })
}
