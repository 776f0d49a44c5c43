mod common;

use pcg_cert::{Certificate, CheckStatus};
use pcg_core::{PcgError, Status};
use pcg_exec::{SessionBuilder, SessionConfig};
use pcg_sched::{UnitDescriptor, UnitOutputs};

use common::double_unit;

fn pi_session(config: SessionConfig) -> Result<SessionBuilder, PcgError> {
    let mut session = SessionBuilder::with_config(config);
    session.seed("const.pi", 3.14159, Status::Established)?;
    session.register(double_unit()?)?;
    session.certificate(Certificate::new("two_pi_large", "derived.two_pi > 6.0", |ctx| {
        Ok(ctx.number("derived.two_pi")? > 6.0)
    }))?;
    Ok(session)
}

#[test]
fn doubling_pi_derives_and_certifies() -> Result<(), PcgError> {
    let outcome = pi_session(SessionConfig::default())?.run()?;

    let entry = outcome.store.parameter("derived.two_pi")?;
    assert_eq!(entry.value.as_f64(), Some(6.28318));
    assert_eq!(entry.status, Status::Derived);
    assert_eq!(entry.source, "double");

    let seeded = outcome.store.parameter("const.pi")?;
    assert_eq!(seeded.source, "external");
    assert!(seeded.insertion_order < entry.insertion_order);

    assert_eq!(outcome.report.certificates[0].status, CheckStatus::Pass);
    assert!(outcome.report.overall_pass);
    assert_eq!(outcome.schedule.order, vec!["double"]);
    assert_eq!(outcome.summary.written_paths().collect::<Vec<_>>(), vec!["derived.two_pi"]);
    Ok(())
}

#[test]
fn recording_writes_validation_meta_values() -> Result<(), PcgError> {
    let config = SessionConfig::from_yaml_slice(b"validation:\n  record_results: true\n")?;
    let outcome = pi_session(config)?.run()?;
    let recorded = outcome.store.parameter("validation.two_pi_large")?;
    assert_eq!(recorded.status, Status::Validation);
    assert_eq!(recorded.value.as_bool(), Some(true));
    assert_eq!(outcome.store.get("system.overall_pass")?.as_bool(), Some(true));
    Ok(())
}

#[test]
fn each_run_starts_from_a_fresh_store() -> Result<(), PcgError> {
    let session = pi_session(SessionConfig::default())?;
    let first = session.run()?;
    let second = session.run()?;
    assert_eq!(first.store, second.store);
    assert_eq!(first.store.len(), 2);
    Ok(())
}

#[test]
fn seeding_a_unit_output_is_a_configuration_error() -> Result<(), PcgError> {
    let mut session = pi_session(SessionConfig::default())?;
    session.seed("derived.two_pi", 6.0, Status::Measured)?;
    let err = session.run().expect_err("seed shadows unit output");
    assert!(matches!(err, PcgError::Config(ref info) if info.code == "duplicate-producer"));
    Ok(())
}

#[test]
fn unrecordable_certificate_ids_fail_at_registration() -> Result<(), PcgError> {
    let config = SessionConfig::from_yaml_slice(b"validation:\n  record_results: true\n")?;
    let mut session = pi_session(config)?;
    let err = session
        .certificate(Certificate::new("pi is positive", "spaced id", |_| Ok(true)))
        .expect_err("id with whitespace");
    assert!(matches!(err, PcgError::Config(ref info) if info.code == "invalid-path"));

    let outcome = session.run()?;
    assert_eq!(outcome.report.certificates.len(), 1);
    assert_eq!(outcome.store.get("system.overall_pass")?.as_bool(), Some(true));
    Ok(())
}

#[test]
fn units_cannot_squat_on_validation_paths() -> Result<(), PcgError> {
    let config = SessionConfig::from_yaml_slice(b"validation:\n  record_results: true\n")?;
    let mut session = pi_session(config)?;
    session.register(
        UnitDescriptor::builder("forger")
            .produces("validation.two_pi_large")
            .build(|_| Ok(UnitOutputs::new().with("validation.two_pi_large", true)))?,
    )?;
    let err = session.run().expect_err("unit writes into validation namespace");
    assert!(matches!(err, PcgError::Config(ref info) if info.code == "reserved-namespace"));
    Ok(())
}
