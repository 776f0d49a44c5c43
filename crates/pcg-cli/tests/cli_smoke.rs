use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn pcg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pcg"))
        .args(args)
        .env("PCG_LOG", "off")
        .output()
        .expect("run pcg")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "pcg failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

fn demo_store(dir: &Path) -> String {
    let out = dir.join("demo");
    let out_str = out.to_str().expect("utf8 path").to_string();
    stdout_json(&pcg(&["demo", "--out", &out_str]));
    out.join("store.json").to_str().expect("utf8 path").to_string()
}

#[test]
fn demo_reports_certified_two_pi() {
    let value = stdout_json(&pcg(&["demo"]));
    assert_eq!(value["two_pi"].as_f64(), Some(6.28318));
    assert_eq!(value["overall_pass"].as_bool(), Some(true));
    assert_eq!(value["order"][0].as_str(), Some("double"));
}

#[test]
fn demo_is_deterministic() {
    let first = stdout_json(&pcg(&["demo"]));
    let second = stdout_json(&pcg(&["demo"]));
    assert_eq!(first["store_hash"], second["store_hash"]);
    assert_eq!(first["analysis_hash"], second["analysis_hash"]);
}

#[test]
fn validate_replays_rules_and_grows_gate_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = demo_store(dir.path());
    let rules = dir.path().join("rules.yaml");
    fs::write(
        &rules,
        "rules:\n  - id: two_pi_large\n    kind: threshold\n    path: derived.two_pi\n    op: gt\n    value: 6.0\n  - id: close\n    kind: deviation\n    path: derived.two_pi\n    max_sigma: 3\n    gate: true\n",
    )
    .expect("write rules");
    let out = dir.path().join("validation");
    let args = [
        "validate",
        "--store",
        store.as_str(),
        "--rules",
        rules.to_str().expect("utf8 path"),
        "--out",
        out.to_str().expect("utf8 path"),
        "--record",
    ];

    let first = stdout_json(&pcg(&args));
    assert_eq!(first["overall_pass"].as_bool(), Some(true));
    assert_eq!(first["gate_log_entries"].as_u64(), Some(1));
    assert!(out.join("validation_report.json").exists());

    let second = stdout_json(&pcg(&args));
    assert_eq!(second["gate_log_entries"].as_u64(), Some(2));
    assert_eq!(first["analysis_hash"], second["analysis_hash"]);

    let recorded = stdout_json(&pcg(&[
        "inspect",
        "--store",
        out.join("store.json").to_str().expect("utf8 path"),
        "--prefix",
        "validation",
    ]));
    assert_eq!(recorded[0]["path"].as_str(), Some("validation.two_pi_large"));
    assert_eq!(recorded[0]["status"].as_str(), Some("VALIDATION"));
}

#[test]
fn failing_certificate_can_fail_the_process() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = demo_store(dir.path());
    let rules = dir.path().join("strict.yaml");
    fs::write(
        &rules,
        "rules:\n  - id: impossible\n    kind: threshold\n    path: derived.two_pi\n    op: lt\n    value: 0\n",
    )
    .expect("write rules");
    let out = dir.path().join("strict");
    let output = pcg(&[
        "validate",
        "--store",
        store.as_str(),
        "--rules",
        rules.to_str().expect("utf8 path"),
        "--out",
        out.to_str().expect("utf8 path"),
        "--fail-on-certificate",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("impossible"));
}

#[test]
fn inspect_and_deviation_read_exports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = demo_store(dir.path());

    let entries = stdout_json(&pcg(&["inspect", "--store", &store]));
    let paths: Vec<&str> = entries
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["const.pi", "derived.two_pi"]);

    let deviation = stdout_json(&pcg(&[
        "deviation",
        "--store",
        &store,
        "--path",
        "derived.two_pi",
        "--theory",
        "6.283165307",
    ]));
    assert_eq!(deviation["sigma"].as_f64(), Some(2.0));
    assert_eq!(deviation["status"].as_str(), Some("GOOD"));

    let missing = pcg(&["deviation", "--store", &store, "--path", "const.pi"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("no-reference"));
}

#[test]
fn catalogue_lists_unresolved_references() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = demo_store(dir.path());
    let catalogue = dir.path().join("catalogue.yaml");
    fs::write(
        &catalogue,
        "- id: tau_ratio\n  description: Ratio of tau to two pi.\n  inputs: [derived.two_pi, derived.tau]\n  outputs: [derived.tau_ratio]\n",
    )
    .expect("write catalogue");
    let value = stdout_json(&pcg(&[
        "catalogue",
        "--catalogue",
        catalogue.to_str().expect("utf8 path"),
        "--store",
        &store,
    ]));
    assert_eq!(value["formulas"].as_u64(), Some(1));
    let unresolved: Vec<&str> = value["unresolved"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["path"].as_str())
        .collect();
    assert_eq!(unresolved, vec!["derived.tau", "derived.tau_ratio"]);
}
