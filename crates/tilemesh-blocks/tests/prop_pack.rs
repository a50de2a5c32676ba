use std::collections::BTreeMap;

use proptest::prelude::*;
use tilemesh_blocks::{BlockState, Direction, ModelElement};
use tilemesh_geom::Vec3;

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn coord() -> impl Strategy<Value = f32> {
    (0u8..=32).prop_map(|v| f32::from(v) * 0.5)
}

proptest! {
    #[test]
    fn block_state_display_parses_back(
        namespace in prop::option::of(ident()),
        name in ident(),
        props in prop::collection::btree_map(ident(), ident(), 0..4),
    ) {
        let full = match namespace {
            Some(ns) => format!("{ns}:{name}"),
            None => name,
        };
        let state = BlockState::with_properties(&full, props.clone());
        let parsed: BlockState = state.to_string().parse().unwrap();
        prop_assert_eq!(parsed.name(), full.as_str());
        prop_assert_eq!(parsed.properties(), &props);
        prop_assert_eq!(parsed, state);
    }

    #[test]
    fn default_uvs_stay_on_the_texture(
        a in (coord(), coord(), coord()),
        b in (coord(), coord(), coord()),
    ) {
        let from = Vec3::new(a.0.min(b.0), a.1.min(b.1), a.2.min(b.2));
        let to = Vec3::new(a.0.max(b.0), a.1.max(b.1), a.2.max(b.2));
        let element = ModelElement::new(from, to);
        for dir in Direction::ALL {
            let [u0, v0, u1, v1] = element.default_uv(dir);
            for c in [u0, v0, u1, v1] {
                prop_assert!((0.0..=16.0).contains(&c), "{dir:?} uv {c}");
            }
            prop_assert!(u0 <= u1 && v0 <= v1, "{dir:?} uv flipped");
        }
    }
}

#[test]
fn block_state_without_properties_prints_bare_name() {
    let state = BlockState::with_properties("minecraft:stone", BTreeMap::new());
    assert_eq!(state.to_string(), "minecraft:stone");
    assert!("stone[axis=y".parse::<BlockState>().is_err());
}
