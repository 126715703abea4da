//! A 50x50 room-sized dense array, the same shape used throughout this
//! crate for tile tags, distance fields, the built-grid, and the final
//! cost matrix.

use crate::constants::{ROOM_AREA, ROOM_WIDTH};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct RoomGrid<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> RoomGrid<T> {
    pub fn new(initial: T) -> Self {
        RoomGrid {
            data: vec![initial; ROOM_AREA],
        }
    }

    #[inline]
    fn index(x: usize, y: usize) -> usize {
        y * (ROOM_WIDTH as usize) + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[Self::index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = Self::index(x, y);
        self.data[idx] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        self.data.iter().enumerate().map(|(i, v)| {
            let x = i % (ROOM_WIDTH as usize);
            let y = i / (ROOM_WIDTH as usize);
            ((x, y), *v)
        })
    }
}

impl<T: Copy + Serialize> Serialize for RoomGrid<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Copy + Deserialize<'de>> Deserialize<'de> for RoomGrid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<T>::deserialize(deserializer)?;
        if data.len() != ROOM_AREA {
            return Err(serde::de::Error::custom("invalid room grid size"));
        }
        Ok(RoomGrid { data })
    }
}
