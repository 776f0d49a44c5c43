#![deny(missing_docs)]
#![doc = "Core types shared by the parameter computation graph crates: errors, trust classes, value payloads, and canonical serialization."]

pub mod errors;
pub mod hash;
pub mod path;
pub mod provenance;
pub mod serde;
pub mod status;
pub mod value;

pub use errors::{codes, ErrorInfo, PcgError};
pub use hash::stable_hash_string;
pub use path::{validate_path, ParamPath};
pub use provenance::{SchemaVersion, EXTERNAL_SOURCE, RESERVED_NAMESPACES, VALIDATOR_SOURCE};
pub use status::Status;
pub use value::Value;
