//! Fixed grid dimensions and the 8/4-neighbor offset tables.

/// Room width in tiles. Fixed by the host game; never varies.
pub const ROOM_WIDTH: u8 = 50;
/// Room height in tiles. Fixed by the host game; never varies.
pub const ROOM_HEIGHT: u8 = 50;
/// Total tile count in a room.
pub const ROOM_AREA: usize = ROOM_WIDTH as usize * ROOM_HEIGHT as usize;

/// Neighbor offsets for 8-directional (Chebyshev) movement, starting
/// top-left and proceeding clockwise.
pub const NEIGHBORS_8: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// True if `(x, y)` lies within the room's tile grid.
#[inline]
pub fn xy_in_bounds(x: i16, y: i16) -> bool {
    x >= 0 && y >= 0 && x < ROOM_WIDTH as i16 && y < ROOM_HEIGHT as i16
}

/// True if `(x, y)` is on the room border (the actual exit ring).
#[inline]
pub fn xy_is_border(x: u8, y: u8) -> bool {
    x == 0 || y == 0 || x == ROOM_WIDTH - 1 || y == ROOM_HEIGHT - 1
}
