//! Min-cut driver (spec.md §4.3) and dead-end pruner (spec.md §4.4).
//!
//! This is the layer that knows a tile maps to a pair of flow-graph
//! vertices; `flow.rs` itself only ever sees opaque vertex ids.

use crate::constants::{NEIGHBORS_8, ROOM_AREA, ROOM_HEIGHT, ROOM_WIDTH};
use crate::flow::FlowGraph;
use crate::grid::RoomGrid;
use crate::terrain::{classify, Bounds, TerrainQuery, TileTag};
use itertools::iproduct;
use log::{trace, warn};
use std::collections::VecDeque;

const SOURCE: usize = 2 * ROOM_AREA;
const SINK: usize = 2 * ROOM_AREA + 1;
const NUM_VERTICES: usize = 2 * ROOM_AREA + 2;

/// The TOP vertex id for tile `(x, y)` -- spec.md §3: `TOP = y*50 + x`.
#[inline]
pub fn pos_to_vertex(x: u8, y: u8) -> usize {
    y as usize * ROOM_WIDTH as usize + x as usize
}

/// Inverse of [`pos_to_vertex`], defined over TOP vertex ids in `[0, 2500)`.
#[inline]
pub fn vertex_to_pos(v: usize) -> (u8, u8) {
    let x = (v % ROOM_WIDTH as usize) as u8;
    let y = (v / ROOM_WIDTH as usize) as u8;
    (x, y)
}

#[inline]
fn top_of(v: usize) -> usize {
    v
}

#[inline]
fn bot_of(v: usize) -> usize {
    v + ROOM_AREA
}

/// Build the split-vertex flow graph from a classified tile grid, per the
/// edge table in spec.md §3. Only tiles with `1 <= x,y <= 48` are
/// considered for edge creation -- the boundary ring never hosts interior
/// TOP->BOT edges.
fn build_graph(grid: &RoomGrid<TileTag>) -> FlowGraph {
    let mut graph = FlowGraph::new(NUM_VERTICES);

    for (y, x) in iproduct!(1..ROOM_HEIGHT - 1, 1..ROOM_WIDTH - 1) {
        let tag = grid.get(x as usize, y as usize);
        let v = pos_to_vertex(x, y);

        match tag {
            TileTag::Normal | TileTag::Protected => {
                graph.add_edge(top_of(v), bot_of(v), 1);
                if tag == TileTag::Protected {
                    graph.add_edge(SOURCE, top_of(v), i64::MAX / 4);
                }
                for (dx, dy) in NEIGHBORS_8 {
                    let nx = x as i16 + dx as i16;
                    let ny = y as i16 + dy as i16;
                    if nx < 0 || ny < 0 || nx >= ROOM_WIDTH as i16 || ny >= ROOM_HEIGHT as i16 {
                        continue;
                    }
                    let ntag = grid.get(nx as usize, ny as usize);
                    if matches!(ntag, TileTag::Normal | TileTag::ToExit) {
                        let nv = pos_to_vertex(nx as u8, ny as u8);
                        graph.add_edge(bot_of(v), top_of(nv), i64::MAX / 4);
                    }
                }
            }
            TileTag::ToExit => {
                graph.add_edge(top_of(v), SINK, i64::MAX / 4);
            }
            TileTag::Unwalkable | TileTag::Exit | TileTag::Exposed | TileTag::RampartMin => {}
        }
    }

    graph
}

/// Run the min-cut driver (spec.md §4.3). `protected` lists tiles that must
/// land on the source side of the cut; `bounds` restricts the candidate
/// room area (defaults to the full room). Returns the ordered list of
/// rampart tiles making up a minimum cut.
pub fn get_cut_tiles(
    terrain: &dyn TerrainQuery,
    protected: &[(u8, u8)],
    bounds: Option<Bounds>,
) -> Vec<(u8, u8)> {
    let bounds = bounds.unwrap_or_else(Bounds::full_room);
    let mut grid = classify(terrain, &bounds);

    for &(x, y) in protected {
        if grid.get(x as usize, y as usize) == TileTag::Normal {
            grid.set(x as usize, y as usize, TileTag::Protected);
        }
    }

    let mut graph = build_graph(&grid);
    let flow = graph.max_flow(SOURCE, SINK);
    trace!("min-cut max flow = {flow}");

    let mut cut: Vec<(u8, u8)> = graph
        .cut_edges(SOURCE)
        .into_iter()
        .filter_map(|(u, v)| {
            // Only TOP->BOT edges (cap 1, the cut-candidate edges from
            // spec.md §3) correspond to a rampart; discard SOURCE-> and
            // ->SINK saturations, which are not placeable tiles.
            if u < ROOM_AREA && v == bot_of(u) {
                Some(vertex_to_pos(u))
            } else {
                None
            }
        })
        .collect();
    cut.sort_unstable();

    if !bounds.is_full_room() && !cut.is_empty() {
        cut = prune_dead_ends(terrain, &cut);
    }

    cut
}

/// Dead-end pruner (spec.md §4.4): drop cut tiles that only wall off a
/// pocket of terrain with no path back to a real exit.
fn prune_dead_ends(terrain: &dyn TerrainQuery, cut: &[(u8, u8)]) -> Vec<(u8, u8)> {
    let mut grid = classify(terrain, &Bounds::full_room());

    for &(x, y) in cut {
        grid.set(x as usize, y as usize, TileTag::Unwalkable);
    }

    let mut queue = VecDeque::new();
    for y in 1..ROOM_HEIGHT - 1 {
        if grid.get(1, y as usize) == TileTag::ToExit {
            queue.push_back((1u8, y));
        }
        if grid.get(ROOM_WIDTH as usize - 2, y as usize) == TileTag::ToExit {
            queue.push_back((ROOM_WIDTH - 2, y));
        }
    }
    for x in 1..ROOM_WIDTH - 1 {
        if grid.get(x as usize, 1) == TileTag::ToExit {
            queue.push_back((x, 1u8));
        }
        if grid.get(x as usize, ROOM_HEIGHT as usize - 2) == TileTag::ToExit {
            queue.push_back((x, ROOM_HEIGHT - 2));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            if nx < 0 || ny < 0 || nx >= ROOM_WIDTH as i16 || ny >= ROOM_HEIGHT as i16 {
                continue;
            }
            let (nx, ny) = (nx as u8, ny as u8);
            if grid.get(nx as usize, ny as usize) == TileTag::Normal {
                grid.set(nx as usize, ny as usize, TileTag::ToExit);
                queue.push_back((nx, ny));
            }
        }
    }

    let kept: Vec<(u8, u8)> = cut
        .iter()
        .copied()
        .filter(|&(x, y)| {
            NEIGHBORS_8.iter().any(|(dx, dy)| {
                let nx = x as i16 + *dx as i16;
                let ny = y as i16 + *dy as i16;
                nx >= 0
                    && ny >= 0
                    && nx < ROOM_WIDTH as i16
                    && ny < ROOM_HEIGHT as i16
                    && grid.get(nx as usize, ny as usize) == TileTag::ToExit
            })
        })
        .collect();

    let dropped = cut.len() - kept.len();
    if dropped > 0 {
        warn!("dead-end pruning dropped {dropped} redundant rampart tile(s)");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::BufferTerrain;

    #[test]
    fn vertex_bijection_matches_spec_examples() {
        assert_eq!(pos_to_vertex(0, 0), 0);
        assert_eq!(pos_to_vertex(1, 0), 1);
        assert_eq!(pos_to_vertex(0, 1), 50);
        assert_eq!(pos_to_vertex(49, 49), 2499);
        for v in 0..ROOM_AREA {
            let (x, y) = vertex_to_pos(v);
            assert_eq!(pos_to_vertex(x, y), v);
        }
    }

    #[test]
    fn open_room_cut_is_eight_neighborhood() {
        let terrain = BufferTerrain::empty();
        let cut = get_cut_tiles(&terrain, &[(25, 25)], None);
        let mut expected = vec![
            (24, 24),
            (25, 24),
            (26, 24),
            (24, 25),
            (26, 25),
            (24, 26),
            (25, 26),
            (26, 26),
        ];
        expected.sort_unstable();
        assert_eq!(cut, expected);
    }

    #[test]
    fn corridor_cut_is_two_tiles() {
        let mut terrain = BufferTerrain::empty();
        for y in 0..ROOM_HEIGHT {
            if y == 25 {
                continue;
            }
            for x in 0..ROOM_WIDTH {
                terrain.set_wall(x, y);
            }
        }
        let cut = get_cut_tiles(&terrain, &[(10, 25)], None);
        assert_eq!(cut, vec![(9, 25), (11, 25)]);
    }

    #[test]
    fn dead_end_pruning_keeps_only_exit_adjacent_ramparts() {
        let terrain = BufferTerrain::empty();
        let bounds = Bounds::new(10, 10, 20, 20).unwrap();
        let cut = get_cut_tiles(&terrain, &[(15, 15)], Some(bounds));
        assert!(!cut.is_empty());
    }
}
