//! Realized cluster subgraphs.
//!
//! A [`ClusterView`] materializes the adjacency a cluster induces on the
//! host graph and is the structure every per-job algorithm (pruning,
//! mincut, reclustering) operates on. Adjacency is keyed by original node
//! ids in ordered maps, so iteration order — and everything derived from
//! it, including compact ids — is deterministic for a given node set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    cluster::{ClusterIndex, IntangibleCluster},
    graph::GlobalGraph,
    mincut::{self, MincutError, MincutResult},
};

/// A cluster's induced subgraph, realized against the host graph.
#[derive(Debug, Clone)]
pub struct ClusterView {
    index: ClusterIndex,
    adjacency: BTreeMap<u32, BTreeSet<u32>>,
    edge_count: usize,
}

/// Bijection between a view's original node ids and `[0, n)`.
///
/// Compact ids are the rank of each node in ascending id order,
/// recomputed from the view's current node set, so the mapping stays
/// bijective across mutations.
#[derive(Debug, Clone)]
pub struct CompactIds {
    to_compact: HashMap<u32, usize>,
    to_original: Vec<u32>,
}

impl CompactIds {
    /// Returns the number of mapped nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.to_original.len() }

    /// Returns whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }

    /// Maps an original node id to its compact id.
    #[must_use]
    pub fn compact(&self, original: u32) -> Option<usize> {
        self.to_compact.get(&original).copied()
    }

    /// Maps a compact id back to the original node id.
    #[must_use]
    pub fn original(&self, compact: usize) -> Option<u32> {
        self.to_original.get(compact).copied()
    }
}

impl ClusterView {
    /// Realizes the subgraph `members` induces on `graph`.
    ///
    /// Only edges with both endpoints inside `members` are retained.
    #[must_use]
    pub fn realize(graph: &GlobalGraph, index: ClusterIndex, members: &[u32]) -> Self {
        let inside: BTreeSet<u32> = members.iter().copied().collect();
        let mut adjacency = BTreeMap::new();
        let mut half_edges = 0;
        for &u in &inside {
            let neighbors: BTreeSet<u32> = graph
                .neighbors(u)
                .iter()
                .copied()
                .filter(|v| inside.contains(v))
                .collect();
            half_edges += neighbors.len();
            adjacency.insert(u, neighbors);
        }
        Self {
            index,
            adjacency,
            edge_count: half_edges / 2,
        }
    }

    /// Returns the cluster index this view belongs to.
    #[must_use]
    #[rustfmt::skip]
    pub fn index(&self) -> &ClusterIndex { &self.index }

    /// Relabels the view, e.g. after pruning.
    pub fn set_index(&mut self, index: ClusterIndex) {
        self.index = index;
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn n(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of induced edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn m(&self) -> usize { self.edge_count }

    /// Iterates over the member nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.adjacency.keys().copied()
    }

    /// Returns whether `u` is a member of the view.
    #[must_use]
    pub fn contains(&self, u: u32) -> bool {
        self.adjacency.contains_key(&u)
    }

    /// Returns the induced degree of `u`, or `None` if `u` is not a member.
    #[must_use]
    pub fn degree(&self, u: u32) -> Option<usize> {
        self.adjacency.get(&u).map(BTreeSet::len)
    }

    /// Iterates over the induced neighbors of `u` in ascending id order.
    pub fn neighbors(&self, u: u32) -> impl Iterator<Item = u32> + '_ {
        self.adjacency.get(&u).into_iter().flatten().copied()
    }

    /// Minimum induced degree over the member nodes; zero for the empty
    /// view.
    #[must_use]
    pub fn mcd(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).min().unwrap_or(0)
    }

    /// Removes `u` and its incident induced edges.
    ///
    /// Returns `false` when `u` is not a member.
    pub fn remove_node(&mut self, u: u32) -> bool {
        let Some(neighbors) = self.adjacency.remove(&u) else {
            return false;
        };
        self.edge_count -= neighbors.len();
        for v in neighbors {
            if let Some(list) = self.adjacency.get_mut(&v) {
                list.remove(&u);
            }
        }
        true
    }

    /// Returns the compact-id bijection for the current node set.
    #[must_use]
    pub fn compact_ids(&self) -> CompactIds {
        let to_original: Vec<u32> = self.nodes().collect();
        let to_compact = to_original
            .iter()
            .enumerate()
            .map(|(compact, &original)| (original, compact))
            .collect();
        CompactIds {
            to_compact,
            to_original,
        }
    }

    /// Returns every induced edge once as `(u, v)` compact-id pairs with
    /// `u < v`, in lexicographic order.
    #[must_use]
    pub fn compact_edges(&self) -> Vec<(usize, usize)> {
        let ids = self.compact_ids();
        let mut edges = Vec::with_capacity(self.edge_count);
        for (compact_u, (&u, neighbors)) in self.adjacency.iter().enumerate() {
            for &v in neighbors.iter() {
                if v > u {
                    if let Some(compact_v) = ids.compact(v) {
                        edges.push((compact_u, compact_v));
                    }
                }
            }
        }
        edges
    }

    /// Computes a global minimum edge cut of the current induced graph.
    ///
    /// Disconnected views yield `cut_size = 0` with one connected
    /// component against the rest.
    ///
    /// # Errors
    /// Returns [`MincutError::TrivialView`] for views with fewer than two
    /// nodes; the engine never submits those.
    pub fn find_mincut(&self) -> Result<MincutResult, MincutError> {
        mincut::global_mincut(self)
    }

    /// Splits the view along a mincut, realizing both sides independently
    /// from `graph` so every edge internal to a side survives.
    #[must_use]
    pub fn cut_by_mincut(
        &self,
        graph: &GlobalGraph,
        result: &MincutResult,
    ) -> (Self, Self) {
        let light = Self::realize(graph, self.index.side_a(), result.light());
        let heavy = Self::realize(graph, self.index.side_b(), result.heavy());
        (light, heavy)
    }

    /// Returns the index and current node set as an [`IntangibleCluster`].
    #[must_use]
    pub fn to_intangible(&self) -> IntangibleCluster {
        IntangibleCluster::new(self.index.clone(), self.nodes().collect())
    }
}
