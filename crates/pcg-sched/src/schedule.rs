//! Dependency scheduling over declared unit inputs and outputs.
//!
//! Producers are resolved first (`path -> unit`), then units are ordered with
//! Kahn's algorithm. Among simultaneously ready units the earliest registered
//! one runs first, which keeps the order deterministic for a fixed registry.

use std::collections::{BTreeMap, BTreeSet};

use pcg_core::errors::{codes, PcgError};
use pcg_core::{EXTERNAL_SOURCE, RESERVED_NAMESPACES};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registry::UnitRegistry;
use crate::unit::UnitDescriptor;

/// Linear execution order plus the wave structure behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unit ids in execution order.
    pub order: Vec<String>,
    /// Groups of units with no producer/consumer edge between them, in
    /// dependency order; each wave is sorted by declaration order.
    pub waves: Vec<Vec<String>>,
    /// Producing unit for every unit-produced path.
    pub producers: BTreeMap<String, String>,
}

impl Schedule {
    /// Position of `unit` in the linear order.
    pub fn position(&self, unit: &str) -> Option<usize> {
        self.order.iter().position(|id| id == unit)
    }

    /// Number of scheduled units.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn duplicate_producer(path: &str, first: &str, second: &str) -> PcgError {
    PcgError::config(
        codes::DUPLICATE_PRODUCER,
        format!("`{path}` is produced by both `{first}` and `{second}`"),
    )
    .with_context("path", path)
    .with_context("producers", format!("{first},{second}"))
    .with_hint("each path must have exactly one producer")
}

fn reserved_output(unit: &str, path: &str, namespace: &str) -> PcgError {
    PcgError::config(
        codes::RESERVED_NAMESPACE,
        format!("unit `{unit}` declares `{path}` inside the reserved `{namespace}` namespace"),
    )
    .with_context("unit", unit)
    .with_context("path", path)
    .with_hint("validation results and session flags are recorded by the validator")
}

fn unproduced_input(unit: &str, path: &str) -> PcgError {
    PcgError::config(
        codes::UNPRODUCED_INPUT,
        format!("unit `{unit}` requires `{path}`, which no unit produces and no seed provides"),
    )
    .with_context("unit", unit)
    .with_context("path", path)
}

fn cycle_error(units: &[UnitDescriptor], cycle: &[usize]) -> PcgError {
    let ids: Vec<&str> = cycle.iter().map(|&idx| units[idx].id()).collect();
    let mut rendered = ids.join(" -> ");
    if let Some(first) = ids.first() {
        rendered.push_str(" -> ");
        rendered.push_str(first);
    }
    PcgError::config(
        codes::CYCLE,
        format!("dependency cycle between units: {rendered}"),
    )
    .with_context("cycle", rendered.clone())
    .with_context("units", ids.join(","))
}

/// Plans an execution order for every registered unit.
///
/// `seeded` lists the paths present in the store before any unit runs. Fails
/// with `reserved-namespace`, `duplicate-producer`, `unproduced-input`, or
/// `cycle` before anything executes.
pub fn plan_schedule(
    registry: &UnitRegistry,
    seeded: &BTreeSet<String>,
) -> Result<Schedule, PcgError> {
    let units = registry.as_slice();
    let count = units.len();

    let mut producers: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, unit) in units.iter().enumerate() {
        for output in unit.output_params() {
            let path = output.as_str();
            if let Some(namespace) = RESERVED_NAMESPACES
                .iter()
                .find(|namespace| output.in_namespace(namespace))
            {
                return Err(reserved_output(unit.id(), path, namespace));
            }
            if seeded.contains(path) {
                return Err(duplicate_producer(path, EXTERNAL_SOURCE, unit.id()));
            }
            if let Some(&previous) = producers.get(path) {
                return Err(duplicate_producer(path, units[previous].id(), unit.id()));
            }
            producers.insert(path, idx);
        }
    }

    let mut upstream: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
    let mut downstream: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
    for (idx, unit) in units.iter().enumerate() {
        for input in unit.required_inputs() {
            let path = input.as_str();
            if seeded.contains(path) {
                continue;
            }
            let producer = *producers
                .get(path)
                .ok_or_else(|| unproduced_input(unit.id(), path))?;
            upstream[idx].insert(producer);
            downstream[producer].insert(idx);
        }
    }

    let mut in_degree: Vec<usize> = upstream.iter().map(BTreeSet::len).collect();
    let mut level = vec![0usize; count];
    let mut ready: BTreeSet<usize> = (0..count).filter(|&idx| in_degree[idx] == 0).collect();
    let mut order = Vec::with_capacity(count);
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &dependent in &downstream[next] {
            level[dependent] = level[dependent].max(level[next] + 1);
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < count {
        let remaining: BTreeSet<usize> = (0..count).filter(|&idx| in_degree[idx] > 0).collect();
        return Err(cycle_error(units, &find_cycle(&upstream, &remaining)));
    }

    let depth = order.iter().map(|&idx| level[idx] + 1).max().unwrap_or(0);
    let mut waves: Vec<Vec<String>> = vec![Vec::new(); depth];
    for (idx, unit) in units.iter().enumerate() {
        waves[level[idx]].push(unit.id().to_string());
    }

    let schedule = Schedule {
        order: order.iter().map(|&idx| units[idx].id().to_string()).collect(),
        waves,
        producers: producers
            .into_iter()
            .map(|(path, idx)| (path.to_string(), units[idx].id().to_string()))
            .collect(),
    };
    info!(
        units = schedule.order.len(),
        waves = schedule.waves.len(),
        seeded = seeded.len(),
        "schedule planned"
    );
    Ok(schedule)
}

/// Walks producer edges among unscheduled units until one repeats, then
/// returns the loop in feed order, rotated to start at its earliest unit.
fn find_cycle(upstream: &[BTreeSet<usize>], remaining: &BTreeSet<usize>) -> Vec<usize> {
    let Some(&start) = remaining.first() else {
        return Vec::new();
    };
    let mut walk = Vec::new();
    let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
    let mut current = start;
    let mut cycle = loop {
        if let Some(&pos) = seen.get(&current) {
            break walk[pos..].to_vec();
        }
        seen.insert(current, walk.len());
        walk.push(current);
        match upstream[current].iter().find(|idx| remaining.contains(idx)) {
            Some(&producer) => current = producer,
            None => break walk.clone(),
        }
    };
    cycle.reverse();
    if let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, idx)| **idx)
        .map(|(pos, _)| pos)
    {
        cycle.rotate_left(min_pos);
    }
    cycle
}
