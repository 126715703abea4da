//! Ramparts & exposure (spec.md §4.6, final paragraph): expand the
//! protected set into a moat, run the min-cut driver, then derive the
//! exposed-tile cost matrix the host's path-finder consumes.

use crate::constants::{NEIGHBORS_8, ROOM_AREA, ROOM_HEIGHT, ROOM_WIDTH};
use crate::mincut::get_cut_tiles;
use crate::terrain::{classify, Bounds, TerrainQuery, TileTag};
use std::collections::VecDeque;

/// Expand `protected` by a BFS moat of depth 3: each expansion step visits
/// a tile's 8-neighbors and appends them as newly-protected at depth+1;
/// only tiles at depth <= 3 continue to expand, so a tile discovered at
/// depth 4 is added to the protected set but does not itself expand
/// further (spec.md §9 confirms this is the intended 3-wide moat, not an
/// off-by-one).
fn expand_protected(protected: &[(u8, u8)]) -> Vec<(u8, u8)> {
    let mut depth = vec![u8::MAX; ROOM_AREA];
    let mut queue: VecDeque<(u8, u8, u8)> = VecDeque::new();
    let mut out = Vec::new();

    let index = |x: u8, y: u8| y as usize * ROOM_WIDTH as usize + x as usize;

    for &(x, y) in protected {
        let idx = index(x, y);
        if depth[idx] == u8::MAX {
            depth[idx] = 0;
            out.push((x, y));
            queue.push_back((x, y, 0));
        }
    }

    while let Some((x, y, d)) = queue.pop_front() {
        if d > 3 {
            continue;
        }
        for (dx, dy) in NEIGHBORS_8 {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            if nx < 0 || ny < 0 || nx >= ROOM_WIDTH as i16 || ny >= ROOM_HEIGHT as i16 {
                continue;
            }
            let (nx, ny) = (nx as u8, ny as u8);
            let idx = index(nx, ny);
            if depth[idx] != u8::MAX {
                continue;
            }
            let nd = d + 1;
            depth[idx] = nd;
            out.push((nx, ny));
            if nd <= 3 {
                queue.push_back((nx, ny, nd));
            }
        }
    }

    out
}

/// Run the full rampart pipeline and build the 50x50 path-finding cost
/// matrix (spec.md §4.6): 0xff at every tile left exposed after the
/// ramparts are placed, 0 everywhere else.
pub fn calculate(
    terrain: &dyn TerrainQuery,
    protected: &[(u8, u8)],
    controller: (u8, u8),
) -> (Vec<(u8, u8)>, [[u8; 50]; 50]) {
    let mut moat = expand_protected(protected);
    for (dx, dy) in NEIGHBORS_8 {
        let nx = controller.0 as i16 + dx as i16;
        let ny = controller.1 as i16 + dy as i16;
        if nx >= 0 && ny >= 0 && nx < ROOM_WIDTH as i16 && ny < ROOM_HEIGHT as i16 {
            moat.push((nx as u8, ny as u8));
        }
    }

    let cut = get_cut_tiles(terrain, &moat, None);

    let mut grid = classify(terrain, &Bounds::full_room());
    for &(x, y) in &cut {
        grid.set(x as usize, y as usize, TileTag::RampartMin);
    }

    let mut queue: VecDeque<(u8, u8)> = VecDeque::new();
    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            if grid.get(x as usize, y as usize) == TileTag::Exit {
                grid.set(x as usize, y as usize, TileTag::Exposed);
                queue.push_back((x, y));
            }
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
            let tag = grid.get(nx as usize, ny as usize);
            if tag != TileTag::Unwalkable && tag != TileTag::RampartMin && tag != TileTag::Exposed {
                grid.set(nx as usize, ny as usize, TileTag::Exposed);
                queue.push_back((nx, ny));
            }
        }
    }

    let mut cost = [[0u8; 50]; 50];
    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            if grid.get(x as usize, y as usize) == TileTag::Exposed {
                cost[y as usize][x as usize] = 0xff;
            }
        }
    }

    (cut, cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::BufferTerrain;

    #[test]
    fn open_room_cut_protects_controller_neighborhood() {
        let terrain = BufferTerrain::empty();
        let (cut, cost) = calculate(&terrain, &[(25, 25)], (25, 25));
        assert!(!cut.is_empty());
        // Every exit tile is exposed in an entirely open room.
        assert_eq!(cost[0][0], 0xff);
    }

    #[test]
    fn protected_tile_itself_is_never_exposed() {
        let terrain = BufferTerrain::empty();
        let (_, cost) = calculate(&terrain, &[(25, 25)], (25, 25));
        assert_eq!(cost[25][25], 0);
    }
}
