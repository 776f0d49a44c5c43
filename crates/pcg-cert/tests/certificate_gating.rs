mod common;

use pcg_cert::{Certificate, CheckStatus, Gate};
use pcg_core::errors::codes;
use pcg_core::{PcgError, Status};

use common::{derived_store, fixed_engine};

#[test]
fn passing_certificate_sets_overall_pass() -> Result<(), PcgError> {
    let store = derived_store()?;
    let mut engine = fixed_engine(0);
    engine.add_certificate(
        Certificate::new("two_pi_ok", "derived.two_pi ~ 6.28318", |ctx| {
            Ok(ctx.within(ctx.number("derived.two_pi")?, 6.28318))
        })
        .with_tolerance(1e-9),
    )?;
    let report = engine.run_all(&store)?;
    assert!(report.overall_pass);
    assert_eq!(report.certificates[0].status, CheckStatus::Pass);
    Ok(())
}

#[test]
fn failing_gate_does_not_affect_overall_pass() -> Result<(), PcgError> {
    let store = derived_store()?;
    let mut engine = fixed_engine(0);
    engine.add_certificate(Certificate::new("pi_present", "const.pi exists", |ctx| {
        Ok(ctx.store().has("const.pi"))
    }))?;
    engine.add_gate(
        Gate::new("audit_negative", "two_pi is negative", |ctx| {
            Ok(ctx.number("derived.two_pi")? < 0.0)
        })
        .with_detail("owner", "audit"),
    )?;
    let report = engine.run_all(&store)?;
    assert!(report.overall_pass);
    let gate = report.gate("audit_negative").expect("gate result");
    assert_eq!(gate.status, CheckStatus::Fail);
    assert_eq!(gate.details.get("owner").and_then(|v| v.as_str()), Some("audit"));
    assert_eq!(report.failed_gates().count(), 1);
    Ok(())
}

#[test]
fn failing_certificate_clears_overall_pass() -> Result<(), PcgError> {
    let store = derived_store()?;
    let mut engine = fixed_engine(0);
    engine.add_certificate(Certificate::new("ok", "trivially true", |_| Ok(true)))?;
    engine.add_certificate(Certificate::new("bad", "pi is large", |ctx| {
        Ok(ctx.number("const.pi")? > 10.0)
    }))?;
    let report = engine.run_all(&store)?;
    assert!(!report.overall_pass);
    let failed: Vec<&str> = report.failed_certificates().map(|r| r.id.as_str()).collect();
    assert_eq!(failed, vec!["bad"]);
    Ok(())
}

#[test]
fn condition_error_becomes_failure_with_note() -> Result<(), PcgError> {
    let store = derived_store()?;
    let mut engine = fixed_engine(0);
    engine.add_certificate(Certificate::new("missing", "reads absent path", |ctx| {
        Ok(ctx.number("nowhere.value")? > 0.0)
    }))?;
    let report = engine.run_all(&store)?;
    let result = report.certificate("missing").expect("certificate result");
    assert_eq!(result.status, CheckStatus::Fail);
    assert!(result.note.as_deref().unwrap_or("").contains("not-found"));
    assert!(!report.overall_pass);
    Ok(())
}

#[test]
fn empty_engine_passes_trivially() -> Result<(), PcgError> {
    let store = derived_store()?;
    let report = fixed_engine(0).run_all(&store)?;
    assert!(report.overall_pass);
    assert!(report.certificates.is_empty());
    Ok(())
}

#[test]
fn duplicate_identifiers_are_rejected() {
    let mut engine = fixed_engine(0);
    engine
        .add_certificate(Certificate::new("same", "first", |_| Ok(true)))
        .expect("first registration");
    let err = engine
        .add_gate(Gate::new("same", "second", |_| Ok(true)))
        .expect_err("duplicate id");
    assert!(matches!(err, PcgError::Config(ref info) if info.code == codes::DUPLICATE_CHECK));
}

#[test]
fn identifiers_must_form_recordable_paths() {
    let mut engine = fixed_engine(0);
    for id in ["pi is positive", "trailing.", "a..b"] {
        let err = engine
            .add_certificate(Certificate::new(id, "unrecordable", |_| Ok(true)))
            .expect_err("unrecordable id");
        assert!(matches!(err, PcgError::Config(ref info) if info.code == codes::INVALID_PATH));
        assert_eq!(err.info().context.get("id").map(String::as_str), Some(id));
    }
    let err = engine
        .add_gate(Gate::new("gate one", "spaced", |_| Ok(true)))
        .expect_err("unrecordable gate id");
    assert_eq!(err.info().context.get("kind").map(String::as_str), Some("gate"));
    assert!(engine.is_empty());

    engine
        .add_certificate(Certificate::new("pi_is_positive", "recordable", |_| Ok(true)))
        .expect("valid id after rejected ones");
}

#[test]
fn record_into_writes_validation_entries() -> Result<(), PcgError> {
    let mut store = derived_store()?;
    let mut engine = fixed_engine(0);
    engine.add_certificate(Certificate::new("pi_present", "const.pi exists", |ctx| {
        Ok(ctx.store().has("const.pi"))
    }))?;
    let report = engine.run_all(&store)?;
    report.record_into(&mut store)?;

    let entry = store.parameter("validation.pi_present")?;
    assert_eq!(entry.value.as_bool(), Some(true));
    assert_eq!(entry.status, Status::Validation);
    assert_eq!(entry.source, "validator");
    let overall = store.parameter("system.overall_pass")?;
    assert_eq!(overall.status, Status::System);
    assert_eq!(overall.value.as_bool(), Some(true));

    // A second run may rewrite its own entries.
    report.record_into(&mut store)?;
    assert_eq!(store.parameter("system.overall_pass")?.revision, 1);
    Ok(())
}
