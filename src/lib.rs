//! Minimum-cut rampart placement and building layout search for a
//! grid-based room.
//!
//! This crate is deliberately host-agnostic: it consumes terrain, path-
//! finding, and structure-lookup through the traits in [`host`] and
//! [`terrain`], and never touches a concrete game API directly. See
//! [`get_cut_tiles`], [`calculate`], and [`build_layout`] for the three
//! public entry points.

pub mod constants;
pub mod distance;
pub mod error;
pub mod flow;
pub mod grid;
pub mod host;
pub mod layout;
pub mod location;
pub mod mincut;
pub mod ramparts;
pub mod terrain;

pub use error::{PlannerError, PlannerResult};
pub use host::{InMemoryBag, MemoryBag, PathFinder, PathOptions, StructureLookup};
pub use layout::planner::{build_layout, ResourceTarget};
pub use layout::{BuiltGrid, ClusterKind, LayoutRecord, StructureKind};
pub use location::Location;
pub use mincut::{get_cut_tiles, pos_to_vertex, vertex_to_pos};
pub use ramparts::calculate;
pub use terrain::{BufferTerrain, Bounds, TerrainQuery, TileTag};
