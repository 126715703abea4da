//! Algebraic-invariant checks (spec.md §8), property-tested the way the
//! graph-algorithm pack example tests its own min-cut code: generate
//! random inputs, assert invariants rather than fixed expected outputs.

use keep_planner::grid::RoomGrid;
use keep_planner::{pos_to_vertex, vertex_to_pos};
use proptest::prelude::*;

fn arb_field() -> impl Strategy<Value = RoomGrid<f64>> {
    prop::collection::vec(-100.0f64..100.0, 2500).prop_map(|values| {
        let mut grid = RoomGrid::new(0.0);
        for y in 0..50usize {
            for x in 0..50usize {
                grid.set(x, y, values[y * 50 + x]);
            }
        }
        grid
    })
}

proptest! {
    #[test]
    fn vertex_to_pos_and_pos_to_vertex_are_mutual_inverses(v in 0usize..2500) {
        let (x, y) = vertex_to_pos(v);
        prop_assert_eq!(pos_to_vertex(x, y), v);
    }

    #[test]
    fn pos_to_vertex_roundtrips_through_vertex_to_pos(x in 0u8..50, y in 0u8..50) {
        let v = pos_to_vertex(x, y);
        prop_assert_eq!(vertex_to_pos(v), (x, y));
    }

    #[test]
    fn add_fields_is_commutative(a in arb_field(), b in arb_field()) {
        let ab = keep_planner::distance::add_fields(&[&a, &b]);
        let ba = keep_planner::distance::add_fields(&[&b, &a]);
        for y in 0..50usize {
            for x in 0..50usize {
                prop_assert!((ab.get(x, y) - ba.get(x, y)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn mul_field_by_one_is_identity(a in arb_field()) {
        let scaled = keep_planner::distance::mul_field(&a, 1.0);
        for y in 0..50usize {
            for x in 0..50usize {
                prop_assert!((scaled.get(x, y) - a.get(x, y)).abs() < 1e-9);
            }
        }
    }
}
