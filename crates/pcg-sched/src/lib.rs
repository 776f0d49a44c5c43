#![deny(missing_docs)]
#![doc = "Unit contracts and the dependency scheduler that orders them."]

/// Registration of unit descriptors in declaration order.
pub mod registry;
/// Kahn scheduling with declaration-order tie-breaks.
pub mod schedule;
/// Unit descriptors, derivations, and checked outputs.
pub mod unit;

pub use registry::UnitRegistry;
pub use schedule::{plan_schedule, Schedule};
pub use unit::{Derivation, Output, UnitDescriptor, UnitDescriptorBuilder, UnitOutputs};
