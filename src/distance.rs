//! Distance field builder and combinators (spec.md §4.5).
//!
//! A distance field is a plain `RoomGrid<f64>`: callers pre-fill it with
//! whatever "untouched" sentinel they want unexplored cells to keep (the
//! layout planner uses `f64::INFINITY` so an unexplored cell never wins a
//! `find_min` scan), then `bfs_cost` fills in the reachable cells in place.

use crate::constants::{NEIGHBORS_8, ROOM_HEIGHT, ROOM_WIDTH};
use crate::grid::RoomGrid;
use crate::terrain::TerrainQuery;
use std::collections::VecDeque;

/// 8-neighbor BFS from `(sx, sy)`, writing distances into `field` in place.
///
/// `explored` is a scratch grid, independent of `field`: a tile's value in
/// `field` is only ever written once it's dequeued by this BFS, so repeated
/// calls seeding the same field from different sources layer their results
/// rather than clobbering cells outside their own reach. Tiles beyond
/// `max_range` or behind a wall are left exactly as `field` found them.
pub fn bfs_cost(
    field: &mut RoomGrid<f64>,
    sx: u8,
    sy: u8,
    max_range: u32,
    terrain: &dyn TerrainQuery,
) {
    let mut explored = RoomGrid::new(false);
    let mut queue: VecDeque<(u8, u8, u32)> = VecDeque::new();

    field.set(sx as usize, sy as usize, 0.0);
    explored.set(sx as usize, sy as usize, true);
    queue.push_back((sx, sy, 0));

    while let Some((x, y, d)) = queue.pop_front() {
        if d >= max_range {
            continue;
        }
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            if nx < 0 || ny < 0 || nx >= ROOM_WIDTH as i16 || ny >= ROOM_HEIGHT as i16 {
                continue;
            }
            let (nx, ny) = (nx as u8, ny as u8);
            if explored.get(nx as usize, ny as usize) || terrain.is_wall(nx, ny) {
                continue;
            }
            explored.set(nx as usize, ny as usize, true);
            let nd = d + 1;
            field.set(nx as usize, ny as usize, nd as f64);
            if nd < max_range {
                queue.push_back((nx, ny, nd));
            }
        }
    }
}

/// Multi-source variant used for `wallField` (spec.md §4.6): every wall or
/// room-edge tile seeds the BFS at value 0, and each step's value is
/// `(previous + 10) * 0.75` rather than a plain depth increment.
pub fn wall_proximity_field(terrain: &dyn TerrainQuery) -> RoomGrid<f64> {
    let mut field = RoomGrid::new(0.0);
    let mut explored = RoomGrid::new(false);
    let mut queue: VecDeque<(u8, u8, f64)> = VecDeque::new();

    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            let is_seed = terrain.is_wall(x, y)
                || x == 0
                || y == 0
                || x == ROOM_WIDTH - 1
                || y == ROOM_HEIGHT - 1;
            if is_seed {
                field.set(x as usize, y as usize, 0.0);
                explored.set(x as usize, y as usize, true);
                queue.push_back((x, y, 0.0));
            }
        }
    }

    while let Some((x, y, val)) = queue.pop_front() {
        let next_val = (val + 10.0) * 0.75;
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            if nx < 0 || ny < 0 || nx >= ROOM_WIDTH as i16 || ny >= ROOM_HEIGHT as i16 {
                continue;
            }
            let (nx, ny) = (nx as u8, ny as u8);
            if explored.get(nx as usize, ny as usize) || terrain.is_wall(nx, ny) {
                continue;
            }
            explored.set(nx as usize, ny as usize, true);
            field.set(nx as usize, ny as usize, next_val);
            queue.push_back((nx, ny, next_val));
        }
    }

    field
}

/// Elementwise sum of any number of fields, spec.md §4.5. Cells absent from
/// every input (never written) read as the first field's own value at that
/// cell -- callers that rely on a sentinel should pre-fill all inputs
/// consistently.
pub fn add_fields(fields: &[&RoomGrid<f64>]) -> RoomGrid<f64> {
    assert!(!fields.is_empty(), "add_fields requires at least one field");
    let mut out = RoomGrid::new(0.0);
    for y in 0..ROOM_HEIGHT as usize {
        for x in 0..ROOM_WIDTH as usize {
            let sum: f64 = fields.iter().map(|f| f.get(x, y)).sum();
            out.set(x, y, sum);
        }
    }
    out
}

/// Elementwise scalar multiply, spec.md §4.5.
pub fn mul_field(field: &RoomGrid<f64>, k: f64) -> RoomGrid<f64> {
    let mut out = RoomGrid::new(0.0);
    for y in 0..ROOM_HEIGHT as usize {
        for x in 0..ROOM_WIDTH as usize {
            out.set(x, y, field.get(x, y) * k);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::BufferTerrain;

    #[test]
    fn bfs_cost_matches_spec_example() {
        let terrain = BufferTerrain::empty();
        let mut field = RoomGrid::new(f64::INFINITY);
        bfs_cost(&mut field, 10, 10, 3, &terrain);
        assert_eq!(field.get(10, 10), 0.0);
        assert_eq!(field.get(11, 10), 1.0);
        assert_eq!(field.get(12, 10), 2.0);
        assert_eq!(field.get(13, 10), 3.0);
        assert_eq!(field.get(14, 10), f64::INFINITY);
    }

    #[test]
    fn bfs_cost_routes_around_a_wall() {
        let mut terrain = BufferTerrain::empty();
        terrain.set_wall(11, 10);
        let mut field = RoomGrid::new(f64::INFINITY);
        bfs_cost(&mut field, 10, 10, 3, &terrain);
        assert!(field.get(12, 10) > 0.0);
        assert!(field.get(12, 10).is_finite());
    }

    #[test]
    fn add_fields_is_commutative_and_associative() {
        let mut a = RoomGrid::new(1.0);
        let mut b = RoomGrid::new(2.0);
        let c = RoomGrid::new(3.0);
        a.set(5, 5, 10.0);
        b.set(5, 5, 20.0);

        let ab = add_fields(&[&a, &b]);
        let ba = add_fields(&[&b, &a]);
        for y in 0..ROOM_HEIGHT as usize {
            for x in 0..ROOM_WIDTH as usize {
                assert_eq!(ab.get(x, y), ba.get(x, y));
            }
        }

        let ab_c = add_fields(&[&add_fields(&[&a, &b]), &c]);
        let a_bc = add_fields(&[&a, &add_fields(&[&b, &c])]);
        for y in 0..ROOM_HEIGHT as usize {
            for x in 0..ROOM_WIDTH as usize {
                assert_eq!(ab_c.get(x, y), a_bc.get(x, y));
            }
        }
    }

    #[test]
    fn mul_field_by_one_is_identity() {
        let mut a = RoomGrid::new(4.0);
        a.set(2, 2, 9.0);
        let scaled = mul_field(&a, 1.0);
        for y in 0..ROOM_HEIGHT as usize {
            for x in 0..ROOM_WIDTH as usize {
                assert_eq!(scaled.get(x, y), a.get(x, y));
            }
        }
    }
}
