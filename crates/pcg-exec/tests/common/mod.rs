#![allow(dead_code)]

use pcg_core::{PcgError, Status};
use pcg_exec::SessionBuilder;
use pcg_sched::{UnitDescriptor, UnitOutputs};

pub fn double_unit() -> Result<UnitDescriptor, PcgError> {
    UnitDescriptor::builder("double")
        .description("twice pi")
        .requires("const.pi")
        .produces("derived.two_pi")
        .build(|inputs| {
            let pi = inputs.number("const.pi")?;
            Ok(UnitOutputs::new().with("derived.two_pi", 2.0 * pi))
        })
}

/// `a -> {b, c} -> d` over seed `seed.x`.
pub fn diamond_session() -> Result<SessionBuilder, PcgError> {
    let mut session = SessionBuilder::new();
    session.seed("seed.x", 1.5, Status::Measured)?;
    session.register(
        UnitDescriptor::builder("a")
            .requires("seed.x")
            .produces("a.out")
            .build(|inputs| Ok(UnitOutputs::new().with("a.out", inputs.number("seed.x")? + 1.0)))?,
    )?;
    session.register(
        UnitDescriptor::builder("b")
            .requires("a.out")
            .produces("b.out")
            .build(|inputs| Ok(UnitOutputs::new().with("b.out", inputs.number("a.out")? * 3.0)))?,
    )?;
    session.register(
        UnitDescriptor::builder("c")
            .requires("a.out")
            .produces("c.out")
            .status(Status::Predicted)
            .build(|inputs| Ok(UnitOutputs::new().with("c.out", inputs.number("a.out")? - 0.5)))?,
    )?;
    session.register(
        UnitDescriptor::builder("d")
            .requires_all(["b.out", "c.out"])
            .produces("d.sum")
            .build(|inputs| {
                Ok(UnitOutputs::new().with("d.sum", inputs.number("b.out")? + inputs.number("c.out")?))
            })?,
    )?;
    Ok(session)
}
