//! Packed room-tile coordinate.
//!
//! Kept as a tight `u16` the way the rest of this crate's ancestry packs
//! room coordinates: cheap to copy, cheap to hash, and a natural `Copy` key
//! for the `Fnv`-hashed maps used throughout the planner.

use crate::constants::{xy_is_border, ROOM_HEIGHT, ROOM_WIDTH};
use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_xy(x: u8, y: u8) -> Self {
        Location {
            packed: ((x as u16) << 8) | (y as u16),
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn xy(self) -> (u8, u8) {
        (self.x(), self.y())
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Offset by `(dx, dy)`, returning `None` if the result falls outside
    /// the room's tile grid.
    pub fn checked_add(self, dx: i8, dy: i8) -> Option<Location> {
        let nx = self.x() as i16 + dx as i16;
        let ny = self.y() as i16 + dy as i16;
        if nx >= 0 && ny >= 0 && nx < ROOM_WIDTH as i16 && ny < ROOM_HEIGHT as i16 {
            Some(Location::from_xy(nx as u8, ny as u8))
        } else {
            None
        }
    }

    /// True if this tile sits on the room border (x or y at 0 or 49).
    pub fn is_border(self) -> bool {
        xy_is_border(self.x(), self.y())
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xy_roundtrip() {
        for x in 0..50u8 {
            for y in 0..50u8 {
                let loc = Location::from_xy(x, y);
                assert_eq!(loc.xy(), (x, y));
            }
        }
    }

    #[test]
    fn border_detection() {
        assert!(Location::from_xy(0, 0).is_border());
        assert!(Location::from_xy(49, 49).is_border());
        assert!(Location::from_xy(25, 0).is_border());
        assert!(!Location::from_xy(25, 25).is_border());
    }

    #[test]
    fn checked_add_clamps_at_edges() {
        assert_eq!(Location::from_xy(0, 0).checked_add(-1, 0), None);
        assert_eq!(
            Location::from_xy(0, 0).checked_add(1, 1),
            Some(Location::from_xy(1, 1))
        );
    }
}
