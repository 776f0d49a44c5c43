#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pcg_cert::{FixedClock, ValidationEngine};
use pcg_core::{PcgError, Status};
use pcg_store::{ParameterStore, Reference};

pub fn derived_store() -> Result<ParameterStore, PcgError> {
    let mut store = ParameterStore::new();
    store.seed("const.pi", 3.14159, Status::Established)?;
    store.put(
        "derived.two_pi",
        6.28318,
        "double",
        Status::Derived,
        Some(Reference::new(6.2832, 0.001, "tabulated")),
        None,
    )?;
    Ok(store)
}

pub fn fixed_engine(seconds: i64) -> ValidationEngine {
    let instant = Utc
        .timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp");
    ValidationEngine::with_clock(Arc::new(FixedClock(instant)))
}
