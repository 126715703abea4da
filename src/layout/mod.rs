//! Structure kinds, building clusters and the layout record (spec.md §3,
//! §4.6). `planner.rs` holds the placement search itself; this module just
//! holds the vocabulary it's built from.

use crate::constants::{ROOM_AREA, ROOM_HEIGHT, ROOM_WIDTH};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

pub mod planner;

/// One of the fourteen structure kinds a layout record can place
/// (spec.md §3). Re-expressed as a tagged variant rather than the
/// string-keyed maps the source used (spec.md §9).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Spawn,
    Extension,
    Extractor,
    Factory,
    Lab,
    Tower,
    Link,
    Nuker,
    Observer,
    PowerSpawn,
    Storage,
    Terminal,
    Container,
    Road,
}

impl StructureKind {
    pub const ALL: [StructureKind; 14] = [
        StructureKind::Spawn,
        StructureKind::Extension,
        StructureKind::Extractor,
        StructureKind::Factory,
        StructureKind::Lab,
        StructureKind::Tower,
        StructureKind::Link,
        StructureKind::Nuker,
        StructureKind::Observer,
        StructureKind::PowerSpawn,
        StructureKind::Storage,
        StructureKind::Terminal,
        StructureKind::Container,
        StructureKind::Road,
    ];
}

/// A named cluster of structures, offsets relative to an anchor (0,0)
/// (spec.md §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterKind {
    Storage,
    Lab,
    Tower,
    Extension,
    Observer,
}

impl ClusterKind {
    /// The fixed `(kind, dx, dy)` offsets making up this cluster, anchor at
    /// `(0, 0)`.
    pub fn offsets(self) -> &'static [(StructureKind, i8, i8)] {
        match self {
            ClusterKind::Storage => &[
                (StructureKind::Storage, 0, 0),
                (StructureKind::Link, 0, 1),
            ],
            // 10 labs filling the 3x3 block around the anchor, plus the
            // tile two steps below it (spec.md §4.6).
            ClusterKind::Lab => &[
                (StructureKind::Lab, -1, -1),
                (StructureKind::Lab, 0, -1),
                (StructureKind::Lab, 1, -1),
                (StructureKind::Lab, -1, 0),
                (StructureKind::Lab, 0, 0),
                (StructureKind::Lab, 1, 0),
                (StructureKind::Lab, -1, 1),
                (StructureKind::Lab, 0, 1),
                (StructureKind::Lab, 1, 1),
                (StructureKind::Lab, 0, 2),
            ],
            ClusterKind::Tower => &[
                (StructureKind::Tower, -1, -1),
                (StructureKind::Tower, 0, -1),
                (StructureKind::Tower, 1, -1),
            ],
            ClusterKind::Extension => &[
                (StructureKind::Extension, -1, -1),
                (StructureKind::Extension, 0, -1),
                (StructureKind::Extension, 1, -1),
                (StructureKind::Extension, -1, 0),
                (StructureKind::Extension, 1, 0),
            ],
            ClusterKind::Observer => &[(StructureKind::Observer, 0, 0)],
        }
    }
}

/// Mapping from structure kind to an ordered list of placements
/// (spec.md §3).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayoutRecord {
    placements: FnvHashMap<StructureKind, Vec<(u8, u8)>>,
}

impl LayoutRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: StructureKind, x: u8, y: u8) {
        self.placements.entry(kind).or_default().push((x, y));
    }

    pub fn get(&self, kind: StructureKind) -> &[(u8, u8)] {
        self.placements
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StructureKind, &Vec<(u8, u8)>)> {
        self.placements.iter()
    }
}

/// 50x50 boolean array, true once a tile is claimed by any placement.
/// Invariant: monotonic within a planning run (spec.md §3).
#[derive(Clone)]
pub struct BuiltGrid {
    data: Vec<bool>,
}

impl BuiltGrid {
    pub fn new() -> Self {
        BuiltGrid {
            data: vec![false; ROOM_AREA],
        }
    }

    #[inline]
    fn index(x: u8, y: u8) -> usize {
        y as usize * ROOM_WIDTH as usize + x as usize
    }

    /// Out-of-range reads return `false` rather than panicking, matching
    /// the defensive-indexing convention spec.md §7 asks for.
    pub fn is_built(&self, x: i16, y: i16) -> bool {
        if x < 0 || y < 0 || x >= ROOM_WIDTH as i16 || y >= ROOM_HEIGHT as i16 {
            return false;
        }
        self.data[Self::index(x as u8, y as u8)]
    }

    pub fn set_built(&mut self, x: u8, y: u8) {
        let idx = Self::index(x, y);
        self.data[idx] = true;
    }
}

impl Default for BuiltGrid {
    fn default() -> Self {
        Self::new()
    }
}
