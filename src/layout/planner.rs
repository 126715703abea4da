//! Layout search (spec.md §4.6): iterative cluster placement driven by
//! weighted sums of distance fields, followed by road/container/link
//! routing through the host path-finder.

use crate::constants::{xy_is_border, NEIGHBORS_8, ROOM_HEIGHT, ROOM_WIDTH};
use crate::distance::{add_fields, bfs_cost, mul_field, wall_proximity_field};
use crate::error::{PlannerError, PlannerResult};
use crate::grid::RoomGrid;
use crate::host::{encode_pos, MemoryBag, PathFinder, PathOptions, StructureLookup};
use crate::layout::{BuiltGrid, ClusterKind, LayoutRecord, StructureKind};
use crate::terrain::TerrainQuery;
use log::warn;

/// A named resource position the layout connects roads/containers to:
/// a source, the mineral deposit, or the controller. `id` is the key
/// written into the host memory bag (spec.md §4.6 step 6).
#[derive(Clone, Debug)]
pub struct ResourceTarget {
    pub id: String,
    pub pos: (u8, u8),
}

fn is_mineral(id: &str, mineral_id: &str) -> bool {
    id == mineral_id
}

/// Linear scan over all 2500 cells for the minimum value satisfying
/// `predicate`, tie-broken row-major by x then y (spec.md §4.6). Returns
/// `None` rather than the source's `(0, 0)` sentinel -- spec.md §9 flags
/// that sentinel as a latent bug.
fn find_min(
    field: &RoomGrid<f64>,
    mut predicate: impl FnMut(u8, u8) -> bool,
) -> Option<(u8, u8)> {
    let mut best: Option<((u8, u8), f64)> = None;
    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            if !predicate(x, y) {
                continue;
            }
            let v = field.get(x as usize, y as usize);
            match best {
                Some((_, bv)) if bv <= v => {}
                _ => best = Some(((x, y), v)),
            }
        }
    }
    best.map(|(pos, _)| pos)
}

fn can_put(
    built: &BuiltGrid,
    terrain: &dyn TerrainQuery,
    structures: &dyn StructureLookup,
    x: u8,
    y: u8,
    cluster: ClusterKind,
) -> bool {
    cluster.offsets().iter().all(|&(_, dx, dy)| {
        let ax = x as i16 + dx as i16;
        let ay = y as i16 + dy as i16;
        if ax < 0 || ay < 0 || ax >= ROOM_WIDTH as i16 || ay >= ROOM_HEIGHT as i16 {
            return false;
        }
        let (ax, ay) = (ax as u8, ay as u8);
        !built.is_built(ax as i16, ay as i16) && !terrain.is_wall(ax, ay) && !structures.occupied(ax, ay)
    })
}

fn put(layout: &mut LayoutRecord, built: &mut BuiltGrid, x: u8, y: u8, cluster: ClusterKind) {
    for &(kind, dx, dy) in cluster.offsets() {
        let ax = (x as i16 + dx as i16) as u8;
        let ay = (y as i16 + dy as i16) as u8;
        layout.push(kind, ax, ay);
        built.set_built(ax, ay);
    }
}

fn near_wall_or_edge(terrain: &dyn TerrainQuery, x: u8, y: u8) -> bool {
    if xy_is_border(x, y) || terrain.is_wall(x, y) {
        return true;
    }
    NEIGHBORS_8.iter().any(|(dx, dy)| {
        let nx = x as i16 + *dx as i16;
        let ny = y as i16 + *dy as i16;
        nx >= 0
            && ny >= 0
            && nx < ROOM_WIDTH as i16
            && ny < ROOM_HEIGHT as i16
            && terrain.is_wall(nx as u8, ny as u8)
    })
}

fn on_wall_or_edge(terrain: &dyn TerrainQuery, x: u8, y: u8) -> bool {
    xy_is_border(x, y) || terrain.is_wall(x, y)
}

/// Run the full layout search and write the resulting layout record,
/// mutating `memory` with container/link positions keyed by target id
/// (spec.md §4.6).
#[allow(clippy::too_many_arguments)]
pub fn build_layout(
    terrain: &dyn TerrainQuery,
    path_finder: &dyn PathFinder,
    structures: &dyn StructureLookup,
    sources: &[ResourceTarget],
    mineral: &ResourceTarget,
    controller: &ResourceTarget,
    memory: &mut dyn MemoryBag,
) -> PlannerResult<LayoutRecord> {
    let mut layout = LayoutRecord::new();
    let mut built = BuiltGrid::new();

    let mut source_field = RoomGrid::new(f64::INFINITY);
    for s in sources {
        bfs_cost(&mut source_field, s.pos.0, s.pos.1, 3, terrain);
    }
    let mut mineral_field = RoomGrid::new(f64::INFINITY);
    bfs_cost(&mut mineral_field, mineral.pos.0, mineral.pos.1, 2, terrain);
    let mut controller_field = RoomGrid::new(f64::INFINITY);
    bfs_cost(
        &mut controller_field,
        controller.pos.0,
        controller.pos.1,
        4,
        terrain,
    );
    let wall_field = wall_proximity_field(terrain);

    // Step 1: storage.
    let storage_score = add_fields(&[
        &source_field,
        &mul_field(&mineral_field, 0.25),
        &controller_field,
        &mul_field(&wall_field, -1.0),
    ]);
    let (sx, sy) = find_min(&storage_score, |x, y| {
        can_put(&built, terrain, structures, x, y, ClusterKind::Storage)
    })
    .ok_or(PlannerError::NoPlacement { cluster: "storage" })?;

    let mut storage_field = RoomGrid::new(f64::INFINITY);
    bfs_cost(&mut storage_field, sx, sy, 0, terrain);
    put(&mut layout, &mut built, sx, sy, ClusterKind::Storage);

    let mut cluster_centers: Vec<(u8, u8)> = Vec::new();

    // Step 2: lab.
    let lab_score = add_fields(&[
        &mineral_field,
        &mul_field(&storage_field, 5.0),
        &mul_field(&source_field, 0.01),
        &mul_field(&controller_field, 0.01),
    ]);
    let (lx, ly) = find_min(&lab_score, |x, y| {
        can_put(&built, terrain, structures, x, y, ClusterKind::Lab)
    })
    .ok_or(PlannerError::NoPlacement { cluster: "lab" })?;
    put(&mut layout, &mut built, lx, ly, ClusterKind::Lab);

    // Step 3: six tower/extension iterations.
    let tower_score = add_fields(&[
        &mul_field(&mineral_field, 0.01),
        &storage_field,
        &mul_field(&source_field, 0.01),
        &mul_field(&controller_field, 0.01),
    ]);
    let extension_score = add_fields(&[
        &mul_field(&mineral_field, 0.01),
        &mul_field(&storage_field, 4.0),
        &source_field,
        &mul_field(&controller_field, 0.01),
    ]);

    for _ in 0..6 {
        let (tx, ty) = find_min(&tower_score, |x, y| {
            can_put(&built, terrain, structures, x, y, ClusterKind::Tower)
        })
        .ok_or(PlannerError::NoPlacement { cluster: "tower" })?;
        put(&mut layout, &mut built, tx, ty, ClusterKind::Tower);
        cluster_centers.push((tx, ty));

        let (ex, ey) = find_min(&extension_score, |x, y| {
            can_put(&built, terrain, structures, x, y, ClusterKind::Extension)
        })
        .ok_or(PlannerError::NoPlacement {
            cluster: "extension",
        })?;
        put(&mut layout, &mut built, ex, ey, ClusterKind::Extension);
        cluster_centers.push((ex, ey));
    }

    // Step 4: observer. Commits like every other cluster, but spec.md §4.6
    // grants "records its center for later road routing" to step 3 only --
    // the observer gets no road of its own.
    let (ox, oy) = find_min(&tower_score, |x, y| {
        can_put(&built, terrain, structures, x, y, ClusterKind::Observer)
    })
    .ok_or(PlannerError::NoPlacement {
        cluster: "observer",
    })?;
    put(&mut layout, &mut built, ox, oy, ClusterKind::Observer);

    // Step 5: route roads from every recorded cluster center to storage.
    let road_options = PathOptions::road_routing();
    for &(cx, cy) in &cluster_centers {
        let path = path_finder.find_path((cx, cy), (sx, sy), road_options);
        for (px, py) in path {
            if !built.is_built(px as i16, py as i16) {
                layout.push(StructureKind::Road, px, py);
                built.set_built(px, py);
            }
        }
    }

    // Step 6: containers & links for controller, each source, and mineral.
    let mineral_id = mineral.id.clone();
    let mut targets: Vec<&ResourceTarget> = vec![controller];
    targets.extend(sources.iter());
    targets.push(mineral);

    for target in targets {
        let range = if target.id == controller.id { 3 } else { 1 };
        let options = road_options.with_range(range);
        let path = path_finder.find_path((sx, sy), target.pos, options);
        if path.is_empty() {
            warn!("no path found from storage to target `{}`", target.id);
            continue;
        }

        let (last, rest) = path.split_last().expect("path is non-empty");
        for &(px, py) in rest {
            if !built.is_built(px as i16, py as i16) {
                layout.push(StructureKind::Road, px, py);
                built.set_built(px, py);
            }
        }

        let (cx, cy) = *last;
        layout.push(StructureKind::Container, cx, cy);
        built.set_built(cx, cy);
        memory.set(&format!("containerPos:{}", target.id), encode_pos(cx, cy));

        if is_mineral(&target.id, &mineral_id) {
            continue;
        }

        let link_pos = NEIGHBORS_8
            .iter()
            .map(|(dx, dy)| (cx as i16 + *dx as i16, cy as i16 + *dy as i16))
            .find(|&(nx, ny)| {
                nx >= 0
                    && ny >= 0
                    && nx < ROOM_WIDTH as i16
                    && ny < ROOM_HEIGHT as i16
                    && !near_wall_or_edge(terrain, nx as u8, ny as u8)
                    && !built.is_built(nx, ny)
            })
            .or_else(|| {
                NEIGHBORS_8
                    .iter()
                    .map(|(dx, dy)| (cx as i16 + *dx as i16, cy as i16 + *dy as i16))
                    .find(|&(nx, ny)| {
                        nx >= 0
                            && ny >= 0
                            && nx < ROOM_WIDTH as i16
                            && ny < ROOM_HEIGHT as i16
                            && !on_wall_or_edge(terrain, nx as u8, ny as u8)
                            && !built.is_built(nx, ny)
                    })
            });

        match link_pos {
            Some((nx, ny)) => {
                let (nx, ny) = (nx as u8, ny as u8);
                layout.push(StructureKind::Link, nx, ny);
                built.set_built(nx, ny);
                memory.set(&format!("linkPos:{}", target.id), encode_pos(nx, ny));
            }
            None => {
                // spec.md §9: the source never signals this case either;
                // treated as a soft failure, no link is recorded.
                warn!("no link placement found near container for `{}`", target.id);
            }
        }
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryBag;
    use crate::terrain::BufferTerrain;

    struct NoopStructures;
    impl StructureLookup for NoopStructures {
        fn occupied(&self, _x: u8, _y: u8) -> bool {
            false
        }
    }

    struct StraightLinePathFinder;
    impl PathFinder for StraightLinePathFinder {
        fn find_path(&self, from: (u8, u8), to: (u8, u8), _options: PathOptions) -> Vec<(u8, u8)> {
            let mut path = Vec::new();
            let (mut x, mut y) = (from.0 as i16, from.1 as i16);
            let (tx, ty) = (to.0 as i16, to.1 as i16);
            path.push((x as u8, y as u8));
            while (x, y) != (tx, ty) {
                x += (tx - x).signum();
                y += (ty - y).signum();
                path.push((x as u8, y as u8));
            }
            path
        }
    }

    #[test]
    fn find_min_breaks_ties_row_major() {
        let field = RoomGrid::new(5.0);
        let pos = find_min(&field, |_, _| true);
        assert_eq!(pos, Some((0, 0)));
    }

    #[test]
    fn find_min_tie_break_is_scan_order_not_lexicographic_xy() {
        // Two cells share the lowest score, and their x/y orderings
        // disagree: (0,5) has the smaller x, (3,0) has the smaller y. The
        // scan in `find_min` walks y outermost, x innermost, so (3,0) --
        // reached while still on row y=0 -- must win over (0,5) on row
        // y=5, even though (0,5) would win a plain lexicographic-by-(x,y)
        // comparison.
        let mut field = RoomGrid::new(f64::INFINITY);
        field.set(0, 5, 1.0);
        field.set(3, 0, 1.0);
        let pos = find_min(&field, |_, _| true);
        assert_eq!(pos, Some((3, 0)));
    }

    #[test]
    fn find_min_returns_none_when_no_candidate() {
        let field = RoomGrid::new(5.0);
        let pos = find_min(&field, |_, _| false);
        assert_eq!(pos, None);
    }

    #[test]
    fn build_layout_places_storage_and_reports_no_error() {
        let terrain = BufferTerrain::empty();
        let structures = NoopStructures;
        let path_finder = StraightLinePathFinder;
        let mut memory = InMemoryBag::new();

        let sources = vec![ResourceTarget {
            id: "source0".to_string(),
            pos: (10, 10),
        }];
        let mineral = ResourceTarget {
            id: "mineral".to_string(),
            pos: (40, 40),
        };
        let controller = ResourceTarget {
            id: "controller".to_string(),
            pos: (25, 5),
        };

        let layout = build_layout(
            &terrain,
            &path_finder,
            &structures,
            &sources,
            &mineral,
            &controller,
            &mut memory,
        )
        .expect("layout should succeed on an open room");

        assert_eq!(layout.get(StructureKind::Storage).len(), 1);
        assert!(memory.get("containerPos:controller").is_some());
    }
}
