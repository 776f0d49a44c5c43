use pcg_core::errors::codes;
use pcg_core::{PcgError, Status};
use pcg_store::{FormulaCatalogue, ParameterStore};

const CATALOGUE: &str = r#"
- id: two_pi
  description: Doubles pi.
  inputs: [const.pi]
  outputs: [derived.two_pi]
- id: tau_ratio
  description: Ratio of tau to two pi.
  inputs: [derived.two_pi, derived.tau]
  outputs: [derived.tau_ratio]
"#;

#[test]
fn unresolved_lists_missing_paths_per_formula() -> Result<(), PcgError> {
    let catalogue = FormulaCatalogue::from_yaml_slice(CATALOGUE.as_bytes())?;
    let mut store = ParameterStore::new();
    store.seed("const.pi", 3.14159, Status::Established)?;
    store.put("derived.two_pi", 6.28318, "double", Status::Derived, None, None)?;

    let missing: Vec<_> = catalogue
        .unresolved(&store)
        .into_iter()
        .map(|r| (r.formula, r.path.to_string()))
        .collect();
    assert_eq!(
        missing,
        vec![
            ("tau_ratio".to_string(), "derived.tau".to_string()),
            ("tau_ratio".to_string(), "derived.tau_ratio".to_string()),
        ]
    );
    assert_eq!(catalogue.referencing("derived.two_pi").len(), 2);
    assert_eq!(catalogue.get("two_pi").map(|f| f.outputs.len()), Some(1));
    Ok(())
}

#[test]
fn duplicate_formula_ids_are_rejected() {
    let doubled = format!("{CATALOGUE}- id: two_pi\n  description: again\n");
    let err = FormulaCatalogue::from_yaml_slice(doubled.as_bytes()).unwrap_err();
    assert_eq!(err.code(), codes::DUPLICATE_FORMULA);
}

#[test]
fn malformed_paths_fail_to_parse() {
    let bad = "- id: broken\n  description: bad path\n  inputs: ['a..b']\n";
    let err = FormulaCatalogue::from_yaml_slice(bad.as_bytes()).unwrap_err();
    assert!(matches!(err, PcgError::Serde(_)));
}
