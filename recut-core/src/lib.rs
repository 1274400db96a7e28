//! Recut core library.
//!
//! Refines an existing clustering of an undirected graph so that every
//! returned cluster meets a minimum edge-connectivity requirement: weakly
//! cut clusters are split along their global mincut and each side is
//! reclustered, recursively, until only cut-valid clusters remain. The
//! crate provides the refinement engine and its supporting structures;
//! concrete clusterers live behind the [`Clusterer`] capability trait
//! (see the `recut-clusterers` crate for the subprocess-backed ones).

mod cluster;
mod clusterer;
mod engine;
mod error;
mod graph;
mod mincut;
mod pruner;
mod requirement;
mod tree;
mod view;

pub use crate::{
    cluster::{ClusterIndex, IntangibleCluster},
    clusterer::Clusterer,
    engine::{Refinement, Refiner},
    error::{
        ClustererError, ClustererErrorCode, RecutError, RecutErrorCode, Result,
    },
    graph::GlobalGraph,
    mincut::{MincutError, MincutResult},
    pruner::prune,
    requirement::{MincutRequirement, ThresholdParseError},
    tree::{HierarchyTree, NodeId, TreeNode, TreeNodeData},
    view::{ClusterView, CompactIds},
};
