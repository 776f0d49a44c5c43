#![deny(missing_docs)]
#![doc = "Parameter store: provenance-tagged values, trust-aware overwrite rules, deviation scoring, filtered unit views, and flat export for replay."]

/// Read-only catalogue of formula metadata used by renderers.
pub mod catalogue;
/// Sigma deviation scoring against reference values.
pub mod deviation;
/// Flat export and replay of store contents.
pub mod export;
/// Stored parameter records.
pub mod parameter;
/// The parameter store itself.
pub mod store;
/// Filtered read views handed to units.
pub mod view;

pub use catalogue::{FormulaCatalogue, FormulaEntry, UnresolvedRef};
pub use deviation::{Deviation, DeviationStatus};
pub use export::{read_export, write_export, ExportEntry, StoreExport};
pub use parameter::{Metadata, Parameter, Reference};
pub use store::ParameterStore;
pub use view::StoreView;
