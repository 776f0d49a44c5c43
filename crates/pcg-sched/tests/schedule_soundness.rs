mod common;

use std::collections::BTreeSet;

use pcg_sched::{plan_schedule, UnitDescriptor};
use proptest::prelude::*;

use common::{constant_unit, registry, seeds};

/// Builds units where unit `i` may only consume outputs of units `< i`, then
/// registers them in a shuffled order so declaration order differs from
/// dependency order.
fn random_dag(edges: &[Vec<bool>], rotation: usize) -> Vec<UnitDescriptor> {
    let count = edges.len();
    let mut units = Vec::with_capacity(count);
    for (idx, row) in edges.iter().enumerate() {
        let inputs: Vec<String> = row
            .iter()
            .take(idx)
            .enumerate()
            .filter(|(_, flag)| **flag)
            .map(|(producer, _)| format!("u{producer}.out"))
            .chain(std::iter::once("seed.base".to_string()))
            .collect();
        let input_refs: Vec<&str> = inputs.iter().map(String::as_str).collect();
        let output = format!("u{idx}.out");
        units.push(constant_unit(&format!("u{idx}"), &input_refs, &[output.as_str()]));
    }
    units.rotate_left(rotation % count.max(1));
    units
}

proptest! {
    #[test]
    fn every_input_is_produced_before_use(
        edges in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 8), 1..8),
        rotation in 0usize..8,
    ) {
        let units = random_dag(&edges, rotation);
        let declared: Vec<(String, BTreeSet<String>)> = units
            .iter()
            .map(|u| (u.id().to_string(), u.required_inputs().iter().map(|p| p.to_string()).collect()))
            .collect();
        let registry = registry(units).unwrap();
        let schedule = plan_schedule(&registry, &seeds(&["seed.base"])).unwrap();
        prop_assert_eq!(schedule.len(), declared.len());

        let mut written: BTreeSet<String> = seeds(&["seed.base"]);
        for id in &schedule.order {
            let (_, inputs) = declared.iter().find(|(uid, _)| uid == id).unwrap();
            for input in inputs {
                prop_assert!(written.contains(input), "{} ran before {} was written", id, input);
            }
            written.insert(format!("{id}.out"));
        }

        let again = plan_schedule(&registry, &seeds(&["seed.base"])).unwrap();
        prop_assert_eq!(again, schedule);
    }
}
