use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use pcg_cert::{GateLog, RuleSet};
use pcg_core::serde::{from_json_slice, to_canonical_json_bytes};
use pcg_store::write_export;
use serde_json::json;
use tracing::info;

use super::{load_store, print_json};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Store export produced by a previous session.
    #[arg(long)]
    pub store: PathBuf,
    /// YAML rule set declaring certificates and gates.
    #[arg(long)]
    pub rules: PathBuf,
    /// Output directory for the report and gate log.
    #[arg(long)]
    pub out: PathBuf,
    /// Write validation meta-values back and persist the updated store.
    #[arg(long)]
    pub record: bool,
    /// Exit with an error when any certificate fails.
    #[arg(long)]
    pub fail_on_certificate: bool,
}

/// Replays validation over an exported store.
pub fn run(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let mut store = load_store(&args.store)?;
    let engine = RuleSet::load(&args.rules)?.into_engine()?;
    let report = engine.run_all(&store)?;
    fs::write(args.out.join("validation_report.json"), report.to_bytes()?)?;

    let log_path = args.out.join("gate_log.json");
    let mut log: GateLog = if log_path.exists() {
        from_json_slice(&fs::read(&log_path)?)?
    } else {
        GateLog::new()
    };
    log.append(&report);
    fs::write(&log_path, to_canonical_json_bytes(&log)?)?;

    if args.record {
        report.record_into(&mut store)?;
        write_export(&args.out.join("store.json"), &store.export()?)?;
    }
    info!(
        report = %args.out.display(),
        overall_pass = report.overall_pass,
        "validation replayed"
    );

    let failed: Vec<&str> = report
        .failed_certificates()
        .map(|result| result.id.as_str())
        .collect();
    print_json(&json!({
        "analysis_hash": report.analysis_hash,
        "store_hash": report.store_hash,
        "overall_pass": report.overall_pass,
        "certificates": report.certificates.len(),
        "gates": report.gates.len(),
        "failed": failed,
        "gate_log_entries": log.len(),
    }))?;

    if args.fail_on_certificate && !report.overall_pass {
        return Err(format!("{} certificate(s) failed: {}", failed.len(), failed.join(", ")).into());
    }
    Ok(())
}
