use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use pcg_cert::{Certificate, Gate};
use pcg_core::{PcgError, Status};
use pcg_exec::{SessionBuilder, SessionConfig, SessionOutcome};
use pcg_sched::{Output, UnitDescriptor, UnitOutputs};
use pcg_store::{write_export, Reference};
use serde_json::json;

use super::print_json;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Directory receiving `store.json` and `validation_report.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Optional session configuration YAML.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Seeds pi, doubles it, and certifies the result.
fn demo_session(config: SessionConfig) -> Result<SessionBuilder, PcgError> {
    let mut session = SessionBuilder::with_config(config);
    session.seed("const.pi", 3.14159, Status::Established)?;
    session.register(
        UnitDescriptor::builder("double")
            .description("twice the seeded pi")
            .requires("const.pi")
            .produces("derived.two_pi")
            .build(|inputs| {
                let pi = inputs.number("const.pi")?;
                let mut outputs = UnitOutputs::new();
                outputs.insert(
                    "derived.two_pi",
                    Output::new(2.0 * pi).with_reference(Reference::new(6.283185307, 1e-5, "tau")),
                );
                Ok(outputs)
            })?,
    )?;
    session.certificate(Certificate::new("two_pi_large", "derived.two_pi > 6.0", |ctx| {
        Ok(ctx.number("derived.two_pi")? > 6.0)
    }))?;
    session.gate(
        Gate::new("two_pi_deviation", "two_pi agrees with tau within 3 sigma", |ctx| {
            Ok(ctx.deviation("derived.two_pi")?.sigma <= 3.0)
        })
        .with_detail("reference", "tau"),
    )?;
    Ok(session)
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let SessionOutcome {
        store,
        schedule,
        report,
        ..
    } = demo_session(config)?.run()?;

    if let Some(out) = &args.out {
        fs::create_dir_all(out)?;
        write_export(&out.join("store.json"), &store.export()?)?;
        fs::write(out.join("validation_report.json"), report.to_bytes()?)?;
    }
    print_json(&json!({
        "order": schedule.order,
        "two_pi": store.number("derived.two_pi")?,
        "store_hash": store.content_hash()?,
        "analysis_hash": report.analysis_hash,
        "overall_pass": report.overall_pass,
    }))
}
