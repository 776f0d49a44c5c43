use pcg_core::errors::codes;
use pcg_core::{PcgError, Status, Value};
use pcg_store::{ParameterStore, StoreView};

fn seeded() -> Result<ParameterStore, PcgError> {
    let mut store = ParameterStore::new();
    store.seed("const.pi", 3.14159, Status::Established)?;
    store.seed("const.e", 2.71828, Status::Established)?;
    Ok(store)
}

#[test]
fn view_exposes_only_declared_inputs() -> Result<(), PcgError> {
    let store = seeded()?;
    let view = StoreView::for_unit(&store, "double", ["const.pi"])?;
    assert_eq!(view.unit(), "double");
    assert_eq!(view.number("const.pi")?, 3.14159);
    assert_eq!(view.paths().collect::<Vec<_>>(), vec!["const.pi"]);

    let err = view.get("const.e").unwrap_err();
    assert!(matches!(&err, PcgError::Contract(info) if info.code == codes::UNDECLARED_READ));
    assert_eq!(err.info().context["unit"], "double");
    assert_eq!(view.undeclared_reads(), vec!["const.e".to_string()]);
    Ok(())
}

#[test]
fn swallowed_hidden_reads_are_still_recorded() -> Result<(), PcgError> {
    let store = seeded()?;
    let view = StoreView::for_unit(&store, "sneaky", ["const.pi"])?;
    assert_eq!(view.get_or("const.e", 0.0), Value::Number(0.0));
    assert!(!view.has("const.other"));
    assert!(view.has("const.pi"));
    assert_eq!(
        view.undeclared_reads(),
        vec!["const.e".to_string(), "const.other".to_string()]
    );
    Ok(())
}

#[test]
fn missing_declared_input_fails_view_construction() -> Result<(), PcgError> {
    let store = seeded()?;
    let err = StoreView::for_unit(&store, "late", ["const.pi", "derived.absent"]).unwrap_err();
    assert!(matches!(&err, PcgError::Contract(info) if info.code == codes::MISSING_INPUT));
    assert_eq!(err.info().context["path"], "derived.absent");
    Ok(())
}
