use std::collections::BTreeMap;

use pcg_core::errors::{codes, PcgError};

use crate::unit::UnitDescriptor;

/// Units registered for a session, kept in declaration order.
///
/// The core never discovers units; callers register them before planning.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<UnitDescriptor>,
    index: BTreeMap<String, usize>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit, rejecting duplicate ids.
    pub fn register(&mut self, unit: UnitDescriptor) -> Result<(), PcgError> {
        if self.index.contains_key(unit.id()) {
            return Err(PcgError::config(
                codes::DUPLICATE_UNIT,
                format!("unit `{}` is registered twice", unit.id()),
            )
            .with_context("unit", unit.id()));
        }
        self.index.insert(unit.id().to_string(), self.units.len());
        self.units.push(unit);
        Ok(())
    }

    /// Looks up a unit by id.
    pub fn get(&self, id: &str) -> Option<&UnitDescriptor> {
        self.index.get(id).map(|&idx| &self.units[idx])
    }

    /// Declaration index of a unit.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Units in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitDescriptor> {
        self.units.iter()
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit is registered.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[UnitDescriptor] {
        &self.units
    }
}
