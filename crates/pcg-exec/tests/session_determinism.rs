use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pcg_cert::{Certificate, FixedClock, Gate};
use pcg_core::{PcgError, Status};
use pcg_exec::{SessionBuilder, SessionConfig};
use pcg_sched::{UnitDescriptor, UnitOutputs};
use pcg_store::Reference;
use proptest::prelude::*;

/// Chain of `len` units each adding its seed offset to the previous link.
fn chain_session(base: f64, offsets: &[f64], config: SessionConfig) -> Result<SessionBuilder, PcgError> {
    let mut session = SessionBuilder::with_config(config);
    session.seed_with_reference("chain.base", base, Status::Measured, Reference::new(base, 0.5, "bench"))?;
    let mut previous = "chain.base".to_string();
    for (idx, offset) in offsets.iter().copied().enumerate() {
        let output = format!("chain.link{idx}");
        let input = previous.clone();
        let read = input.clone();
        session.register(
            UnitDescriptor::builder(format!("link{idx}"))
                .requires(input)
                .produces(output.clone())
                .build(move |inputs| {
                    let value = inputs.number(&read)? + offset;
                    Ok(UnitOutputs::new().with(output_key(idx), value))
                })?,
        )?;
        previous = output;
    }
    let last = previous;
    session.certificate(Certificate::new("chain_finite", "last link is finite", move |ctx| {
        Ok(ctx.number(&last)?.is_finite())
    }))?;
    session.gate(Gate::new("base_close", "base within reference", |ctx| {
        Ok(ctx.deviation("chain.base")?.sigma <= 1.0)
    }))?;
    let instant = Utc.timestamp_opt(1_700_000_000, 0).single().expect("timestamp");
    session.clock(Arc::new(FixedClock(instant)));
    Ok(session)
}

fn output_key(idx: usize) -> String {
    format!("chain.link{idx}")
}

proptest! {
    #[test]
    fn repeated_sessions_are_bit_identical(
        base in -1.0e6f64..1.0e6,
        offsets in prop::collection::vec(-10.0f64..10.0, 1..8),
        threads in 1usize..4,
    ) {
        let sequential = chain_session(base, &offsets, SessionConfig::default()).expect("session");
        let first = sequential.run().expect("first run");
        let second = sequential.run().expect("second run");
        prop_assert_eq!(&first.store, &second.store);
        prop_assert_eq!(&first.report, &second.report);
        prop_assert_eq!(
            first.store.content_hash().expect("hash"),
            second.store.content_hash().expect("hash")
        );

        let mut config = SessionConfig::default();
        config.execution = pcg_exec::ExecutionConfig::parallel(threads);
        let parallel = chain_session(base, &offsets, config).expect("session").run().expect("parallel run");
        prop_assert_eq!(&first.report.analysis_hash, &parallel.report.analysis_hash);
    }
}
