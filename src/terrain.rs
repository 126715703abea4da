//! Terrain sampling and the tile classifier (spec.md §4.1).

use crate::constants::*;
use crate::error::{PlannerError, PlannerResult};
use crate::grid::RoomGrid;
use bitflags::bitflags;

bitflags! {
    /// Raw terrain bitmask as the host's terrain query would return it.
    /// The classifier only ever reads `WALL`; `SWAMP`/`LAVA` are carried
    /// because that's the real shape of the bitmask this is sampling from,
    /// not because this planner distinguishes movement cost.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TerrainSample: u8 {
        const NONE = 0;
        const WALL = 1;
        const SWAMP = 2;
        const LAVA = 4;
    }
}

impl TerrainSample {
    pub fn is_wall(self) -> bool {
        self.contains(TerrainSample::WALL)
    }
}

/// Host collaborator: a pure terrain lookup. spec.md §6: "pure function
/// (x, y) -> integer where bit 0 set denotes wall."
pub trait TerrainQuery {
    fn tile(&self, x: u8, y: u8) -> TerrainSample;

    #[inline]
    fn is_wall(&self, x: u8, y: u8) -> bool {
        self.tile(x, y).is_wall()
    }
}

/// A fixed in-memory terrain buffer, useful for tests and for hosts that
/// already have the room's terrain as a flat byte buffer.
#[derive(Clone)]
pub struct BufferTerrain {
    buffer: Vec<u8>,
}

impl BufferTerrain {
    pub fn new(buffer: Vec<u8>) -> Self {
        assert_eq!(buffer.len(), ROOM_AREA, "terrain buffer must cover the whole room");
        BufferTerrain { buffer }
    }

    pub fn empty() -> Self {
        BufferTerrain {
            buffer: vec![0u8; ROOM_AREA],
        }
    }

    pub fn set_wall(&mut self, x: u8, y: u8) {
        let idx = y as usize * ROOM_WIDTH as usize + x as usize;
        self.buffer[idx] |= TerrainSample::WALL.bits();
    }
}

impl TerrainQuery for BufferTerrain {
    fn tile(&self, x: u8, y: u8) -> TerrainSample {
        let idx = y as usize * ROOM_WIDTH as usize + x as usize;
        TerrainSample::from_bits_truncate(self.buffer[idx])
    }
}

/// Inclusive sub-rectangle of the room. `x1 < x2 <= 49`, `y1 < y2 <= 49`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub x1: u8,
    pub y1: u8,
    pub x2: u8,
    pub y2: u8,
}

impl Bounds {
    pub fn full_room() -> Self {
        Bounds {
            x1: 0,
            y1: 0,
            x2: ROOM_WIDTH - 1,
            y2: ROOM_HEIGHT - 1,
        }
    }

    pub fn new(x1: u8, y1: u8, x2: u8, y2: u8) -> PlannerResult<Self> {
        if x1 >= x2 || y1 >= y2 || x2 > ROOM_WIDTH - 1 || y2 > ROOM_HEIGHT - 1 {
            return Err(PlannerError::InvalidBounds { x1, y1, x2, y2 });
        }
        Ok(Bounds { x1, y1, x2, y2 })
    }

    pub fn is_full_room(&self) -> bool {
        *self == Bounds::full_room()
    }

    #[inline]
    pub fn contains(&self, x: u8, y: u8) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    #[inline]
    pub fn on_edge(&self, x: u8, y: u8) -> bool {
        self.contains(x, y) && (x == self.x1 || x == self.x2 || y == self.y1 || y == self.y2)
    }
}

/// Tile classification, discriminants as given in spec.md §3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum TileTag {
    Unwalkable = -1,
    Normal = 0,
    Protected = 1,
    ToExit = 2,
    Exit = 3,
    Exposed = 5,
    RampartMin = 9,
}

/// Classify every tile in the room (spec.md §4.1).
///
/// Tiles outside `bounds` are always `Unwalkable`, independent of terrain.
/// Inside `bounds`, non-wall tiles are `Normal`, upgraded to `ToExit` if on
/// the bounds edge, then upgraded again to `Exit` if on the true room edge.
/// An additional pass marks the tile one step in from each exit tile as
/// `ToExit` too (a defensive wall adjacent to an exit is never allowed),
/// using the three-cell moving window spec.md describes; diagonal-corner
/// exits get no special case beyond what that window already covers
/// (see SPEC_FULL.md's open-question resolution).
pub fn classify(terrain: &dyn TerrainQuery, bounds: &Bounds) -> RoomGrid<TileTag> {
    let mut grid = RoomGrid::new(TileTag::Unwalkable);

    for y in bounds.y1..=bounds.y2 {
        for x in bounds.x1..=bounds.x2 {
            if terrain.is_wall(x, y) {
                continue;
            }
            let mut tag = TileTag::Normal;
            if bounds.on_edge(x, y) {
                tag = TileTag::ToExit;
            }
            if xy_is_border(x, y) {
                tag = TileTag::Exit;
            }
            grid.set(x as usize, y as usize, tag);
        }
    }

    // Exit-adjacency band: the tile one step in from an exit must stay
    // open. A three-cell moving window along each edge checks whether any
    // of the three tiles at y-1,y,y+1 (or x-1,x,x+1 on the top/bottom
    // edges) is an EXIT; if so, the inner neighbor is forced to TO_EXIT.
    for y in 1..ROOM_HEIGHT - 1 {
        if is_exit(&grid, 0, y.saturating_sub(1))
            || is_exit(&grid, 0, y)
            || is_exit(&grid, 0, y + 1)
        {
            mark_to_exit(&mut grid, 1, y);
        }
        if is_exit(&grid, ROOM_WIDTH - 1, y.saturating_sub(1))
            || is_exit(&grid, ROOM_WIDTH - 1, y)
            || is_exit(&grid, ROOM_WIDTH - 1, y + 1)
        {
            mark_to_exit(&mut grid, ROOM_WIDTH - 2, y);
        }
    }
    for x in 1..ROOM_WIDTH - 1 {
        if is_exit(&grid, x.saturating_sub(1), 0)
            || is_exit(&grid, x, 0)
            || is_exit(&grid, x + 1, 0)
        {
            mark_to_exit(&mut grid, x, 1);
        }
        if is_exit(&grid, x.saturating_sub(1), ROOM_HEIGHT - 1)
            || is_exit(&grid, x, ROOM_HEIGHT - 1)
            || is_exit(&grid, x + 1, ROOM_HEIGHT - 1)
        {
            mark_to_exit(&mut grid, x, ROOM_HEIGHT - 2);
        }
    }

    grid
}

fn is_exit(grid: &RoomGrid<TileTag>, x: u8, y: u8) -> bool {
    if x >= ROOM_WIDTH || y >= ROOM_HEIGHT {
        return false;
    }
    grid.get(x as usize, y as usize) == TileTag::Exit
}

fn mark_to_exit(grid: &mut RoomGrid<TileTag>, x: u8, y: u8) {
    if x >= ROOM_WIDTH || y >= ROOM_HEIGHT {
        return;
    }
    if grid.get(x as usize, y as usize) == TileTag::Normal {
        grid.set(x as usize, y as usize, TileTag::ToExit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_room_corners_are_exits() {
        let terrain = BufferTerrain::empty();
        let grid = classify(&terrain, &Bounds::full_room());
        for &(x, y) in &[(0u8, 0u8), (0, 49), (49, 0), (49, 49)] {
            assert_eq!(grid.get(x as usize, y as usize), TileTag::Exit);
        }
    }

    #[test]
    fn wall_corner_is_not_an_exit() {
        let mut terrain = BufferTerrain::empty();
        terrain.set_wall(0, 0);
        let grid = classify(&terrain, &Bounds::full_room());
        assert_eq!(grid.get(0, 0), TileTag::Unwalkable);
    }

    #[test]
    fn sub_rectangle_outside_tiles_are_unwalkable() {
        let terrain = BufferTerrain::empty();
        let bounds = Bounds::new(10, 10, 20, 20).unwrap();
        let grid = classify(&terrain, &bounds);
        assert_eq!(grid.get(5, 5), TileTag::Unwalkable);
        assert_eq!(grid.get(15, 15), TileTag::Normal);
    }

    #[test]
    fn sub_rectangle_edge_is_to_exit() {
        let terrain = BufferTerrain::empty();
        let bounds = Bounds::new(10, 10, 20, 20).unwrap();
        let grid = classify(&terrain, &bounds);
        assert_eq!(grid.get(10, 15), TileTag::ToExit);
        assert_eq!(grid.get(20, 15), TileTag::ToExit);
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(Bounds::new(5, 5, 5, 10).is_err());
        assert!(Bounds::new(5, 5, 10, 5).is_err());
        assert!(Bounds::new(5, 5, 60, 10).is_err());
    }

    #[test]
    fn inner_tile_adjacent_to_exit_is_to_exit() {
        let terrain = BufferTerrain::empty();
        let grid = classify(&terrain, &Bounds::full_room());
        // (0,0) is an exit; (1,0) sits on the room border so it too is an
        // exit, but (1,1) is purely interior and must be forced open.
        assert_eq!(grid.get(1, 1), TileTag::ToExit);
    }

}
