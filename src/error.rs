//! Typed error surface for the planner core.
//!
//! spec.md's error-handling design flags one sentinel-return pattern as a
//! latent bug (`find_min` returning `(0, 0)` on no candidate) and asks for
//! it to become a distinct, surfaced error instead of a silent corruption.
//! This enum is that surface; every other fallible entry point in the
//! crate returns it too instead of inventing its own ad-hoc convention.
//!
//! `FlowGraph::max_flow`'s own `s == t` sentinel (spec.md §4.2/§7) is not
//! wrapped here: `mincut::SOURCE`/`SINK` are fixed, always-distinct vertex
//! ids, so no caller in this crate can ever hit that case, and there is no
//! public entry point that lets a host pass its own `s`/`t` into the flow
//! graph. Adding a variant for an unreachable path would just be more
//! surface to keep in sync for no real error it could ever carry.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("invalid bounds ({x1},{y1})-({x2},{y2}): must satisfy x1<x2<=49, y1<y2<=49")]
    InvalidBounds { x1: u8, y1: u8, x2: u8, y2: u8 },

    #[error("no valid placement found for cluster `{cluster}`")]
    NoPlacement { cluster: &'static str },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
