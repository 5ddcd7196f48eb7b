//! Group inference.
//!
//! Clusters the players of a series into persistent participant groups by
//! connectivity: teammates are linked, winners are linked to the match's win,
//! and every weakly connected component becomes one group.

mod disjoint_set;
mod graph;

pub use disjoint_set::DisjointSet;
pub use graph::{infer_groups, InferredGroup, NodeKind, ParticipantGraph};
