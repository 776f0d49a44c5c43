mod common;

use pcg_core::PcgError;
use pcg_sched::plan_schedule;

use common::{constant_unit, registry, seeds};

#[test]
fn ready_units_run_in_declaration_order() -> Result<(), PcgError> {
    let registry = registry(vec![
        constant_unit("zeta", &["const.a"], &["z.out"]),
        constant_unit("alpha", &["const.a"], &["a.out"]),
        constant_unit("mid", &["z.out", "a.out"], &["m.out"]),
    ])?;
    let schedule = plan_schedule(&registry, &seeds(&["const.a"]))?;
    assert_eq!(schedule.order, vec!["zeta", "alpha", "mid"]);
    assert_eq!(
        schedule.waves,
        vec![
            vec!["zeta".to_string(), "alpha".to_string()],
            vec!["mid".to_string()]
        ]
    );
    Ok(())
}

#[test]
fn consumers_declared_first_still_run_after_producers() -> Result<(), PcgError> {
    let registry = registry(vec![
        constant_unit("consumer", &["derived.x"], &["derived.y"]),
        constant_unit("producer", &["const.a"], &["derived.x"]),
    ])?;
    let schedule = plan_schedule(&registry, &seeds(&["const.a"]))?;
    assert_eq!(schedule.order, vec!["producer", "consumer"]);
    assert_eq!(schedule.producers["derived.x"], "producer");
    assert_eq!(schedule.producers["derived.y"], "consumer");
    Ok(())
}

#[test]
fn diamond_respects_every_edge() -> Result<(), PcgError> {
    let registry = registry(vec![
        constant_unit("d", &["b.out", "c.out"], &["d.out"]),
        constant_unit("c", &["a.out"], &["c.out"]),
        constant_unit("b", &["a.out"], &["b.out"]),
        constant_unit("a", &[], &["a.out"]),
    ])?;
    let schedule = plan_schedule(&registry, &seeds(&[]))?;
    let pos = |id: &str| schedule.position(id).unwrap();
    assert!(pos("a") < pos("b"));
    assert!(pos("a") < pos("c"));
    assert!(pos("b") < pos("d"));
    assert!(pos("c") < pos("d"));
    assert_eq!(schedule.order, vec!["a", "c", "b", "d"]);
    assert_eq!(schedule.waves.len(), 3);
    Ok(())
}

#[test]
fn empty_registry_yields_empty_schedule() -> Result<(), PcgError> {
    let schedule = plan_schedule(&registry(Vec::new())?, &seeds(&["const.a"]))?;
    assert!(schedule.is_empty());
    assert!(schedule.waves.is_empty());
    Ok(())
}
