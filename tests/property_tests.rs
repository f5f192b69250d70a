//! Property-based tests using proptest
//!
//! Invariants that must hold for every seed:
//! - Placed blocking modules never overlap
//! - Matched edges close opposite flags on both ends
//! - Every room and hall is connected after capping
//! - Same seed and config give the same layout

use proptest::prelude::*;

use dungeon_core::catalog::ModuleCatalog;
use dungeon_core::config::{GeneratorConfig, PointSelection};
use dungeon_core::generation::rebuild;
use dungeon_core::module::Tag;
use dungeon_core::{generate, World};

fn config(seed: u64, iterations: u32, selection: PointSelection) -> GeneratorConfig {
    GeneratorConfig {
        seed,
        iterations,
        point_selection: selection,
        ..Default::default()
    }
    .without_pacing()
}

fn selection() -> impl Strategy<Value = PointSelection> {
    prop_oneof![Just(PointSelection::Uniform), Just(PointSelection::ExcludeLast)]
}

fn build(seed: u64, iterations: u32, selection: PointSelection) -> World {
    generate(config(seed, iterations, selection), ModuleCatalog::standard())
        .expect("standard catalog is valid")
        .0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_blocking_modules_never_overlap(
        seed in any::<u64>(),
        iterations in 0u32..30,
        selection in selection(),
    ) {
        let world = build(seed, iterations, selection);
        let bodies: Vec<_> = world
            .placed()
            .filter(|m| m.tag.is_blocking())
            .map(|m| (m.id, m.bounds()))
            .collect();
        for (i, (a_id, a)) in bodies.iter().enumerate() {
            for (b_id, b) in &bodies[i + 1..] {
                prop_assert!(!a.overlaps(b), "{a_id:?} overlaps {b_id:?}");
            }
        }
    }

    #[test]
    fn prop_connections_close_opposite_edges(seed in any::<u64>(), iterations in 1u32..30) {
        let world = build(seed, iterations, PointSelection::Uniform);
        for (a, b, direction) in world.connections() {
            let (anchor, module) = if a < b { (a, b) } else { (b, a) };
            let anchor = world.get(anchor).unwrap();
            let module = world.get(module).unwrap();
            prop_assert!(anchor.flags.get(direction));
            prop_assert!(module.flags.get(direction.opposite()));
            prop_assert_eq!(module.position - anchor.position, direction.unit() * 4.0);
        }
    }

    #[test]
    fn prop_rooms_and_halls_connected_after_capping(seed in any::<u64>(), iterations in 0u32..30) {
        let world = build(seed, iterations, PointSelection::Uniform);
        for tag in [Tag::Room, Tag::Hall] {
            for id in world.tagged(tag) {
                let module = world.get(id).unwrap();
                prop_assert!(module.flags.count_set() > 0, "{id:?} has no closed edge");
            }
        }
        prop_assert!(world.is_connected_to_seed());
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>(), iterations in 0u32..20) {
        let a = build(seed, iterations, PointSelection::Uniform).layout();
        let b = build(seed, iterations, PointSelection::Uniform).layout();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_rebuild_is_idempotent(seed in any::<u64>(), iterations in 0u32..20) {
        let mut world = build(seed, iterations, PointSelection::Uniform);
        let first = rebuild(&mut world).points().to_vec();
        let second = rebuild(&mut world).points().to_vec();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_layout_json_roundtrip(seed in any::<u64>(), iterations in 0u32..12) {
        let layout = build(seed, iterations, PointSelection::Uniform).layout();
        let parsed = dungeon_core::DungeonLayout::from_json(&layout.to_json());
        prop_assert_eq!(parsed, Some(layout));
    }
}

#[test]
fn different_seeds_usually_differ() {
    let layouts: Vec<_> = (0..8u64)
        .map(|seed| build(seed, 15, PointSelection::Uniform).layout())
        .collect();
    let distinct = layouts
        .iter()
        .enumerate()
        .filter(|(i, l)| layouts[..*i].iter().all(|other| other != *l))
        .count();
    assert!(distinct > 1);
}
