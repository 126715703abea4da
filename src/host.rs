//! Host collaborator traits (spec.md §6).
//!
//! These are the "external collaborators" spec.md explicitly puts out of
//! scope: the host's own path-finding helper, structure/construction-site
//! lookup, and persistent memory storage. The core only ever talks to
//! these through the trait objects below.

/// Options mirrored from the host's path-finder, spec.md §6.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathOptions {
    pub ignore_creeps: bool,
    pub ignore_destructible_structures: bool,
    pub ignore_roads: bool,
    pub swamp_cost: u8,
    pub heuristic_weight: f32,
    pub range: u8,
}

impl PathOptions {
    /// The options the layout planner uses for road routing (spec.md §4.6
    /// step 5): ignore creeps and destructible structures and roads,
    /// uniform swamp cost, heuristic weight 1, range 1.
    pub fn road_routing() -> Self {
        PathOptions {
            ignore_creeps: true,
            ignore_destructible_structures: true,
            ignore_roads: true,
            swamp_cost: 1,
            heuristic_weight: 1.0,
            range: 1,
        }
    }

    pub fn with_range(mut self, range: u8) -> Self {
        self.range = range;
        self
    }
}

/// Host collaborator: shortest walkable path between two tiles.
/// spec.md §6: "returns an ordered list of {x,y} tiles from start to goal
/// inclusive of intermediate tiles."
pub trait PathFinder {
    fn find_path(&self, from: (u8, u8), to: (u8, u8), options: PathOptions) -> Vec<(u8, u8)>;
}

/// Host collaborator: is this tile occupied by a structure or construction
/// site? Used by `can_put` (spec.md §4.6).
pub trait StructureLookup {
    fn occupied(&self, x: u8, y: u8) -> bool;
}

/// Host collaborator: the persistent memory bag the layout planner writes
/// container/link positions into, keyed by target id (spec.md §4.6 step 6).
pub trait MemoryBag {
    fn set(&mut self, key: &str, value: String);
}

/// A `MemoryBag` that only accumulates writes in-process, useful for tests
/// and for hosts that want to inspect everything written in one call
/// before committing it to their own persistent store.
#[derive(Default, Debug, Clone)]
pub struct InMemoryBag {
    entries: std::collections::HashMap<String, String>,
}

impl InMemoryBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn entries(&self) -> &std::collections::HashMap<String, String> {
        &self.entries
    }
}

impl MemoryBag for InMemoryBag {
    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Encode a tile as the `"x,y"` string spec.md §6 requires for memory
/// bag writes.
pub fn encode_pos(x: u8, y: u8) -> String {
    format!("{x},{y}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_bag_roundtrips() {
        let mut bag = InMemoryBag::new();
        bag.set("source1", encode_pos(12, 34));
        assert_eq!(bag.get("source1"), Some("12,34"));
        assert_eq!(bag.get("missing"), None);
    }
}
