//! Cluster labels and unrealized cluster node sets.
//!
//! An [`IntangibleCluster`] is just an index and a node set; it carries no
//! adjacency and is cheap to keep on the work stack. Realizing it against
//! the host graph produces a [`ClusterView`](crate::view::ClusterView).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{graph::GlobalGraph, view::ClusterView};

/// Suffix appended to a cluster index after pruning.
const PRUNED_SUFFIX: char = 'δ';

/// Hierarchical cluster label.
///
/// Children derive their label by appending a suffix to the parent's:
/// `a`/`b` for the two sides of a mincut split, `δ` for the pruned
/// remainder of a cluster, and a decimal local id for every reclustered
/// subcluster. A parent's label is therefore always a prefix of its
/// descendants' labels.
///
/// # Examples
/// ```
/// use recut_core::ClusterIndex;
///
/// let index = ClusterIndex::new("5");
/// assert_eq!(index.side_a().as_str(), "5a");
/// assert_eq!(index.side_b().as_str(), "5b");
/// assert_eq!(index.pruned().as_str(), "5δ");
/// assert_eq!(index.side_a().subcluster("2").as_str(), "5a2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterIndex(String);

impl ClusterIndex {
    /// Creates an index from an arbitrary label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The empty index labelling the host graph itself.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Returns the label as a string slice.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Index of the light side of a mincut split.
    #[must_use]
    pub fn side_a(&self) -> Self {
        Self(format!("{}a", self.0))
    }

    /// Index of the heavy side of a mincut split.
    #[must_use]
    pub fn side_b(&self) -> Self {
        Self(format!("{}b", self.0))
    }

    /// Index of the cluster remaining after pruning.
    #[must_use]
    pub fn pruned(&self) -> Self {
        Self(format!("{}{PRUNED_SUFFIX}", self.0))
    }

    /// Index of a reclustered subcluster with the given local id.
    #[must_use]
    pub fn subcluster(&self, local_id: &str) -> Self {
        Self(format!("{}{local_id}", self.0))
    }
}

impl fmt::Display for ClusterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An indexed node set that has not been realized against the host graph.
///
/// Produced by the initial clustering loader and by reclusterers. Node
/// ids refer to the host graph and are kept sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntangibleCluster {
    index: ClusterIndex,
    nodes: Vec<u32>,
}

impl IntangibleCluster {
    /// Creates a cluster over the given nodes; the node list is sorted
    /// and deduplicated.
    #[must_use]
    pub fn new(index: ClusterIndex, mut nodes: Vec<u32>) -> Self {
        nodes.sort_unstable();
        nodes.dedup();
        Self { index, nodes }
    }

    /// Returns the cluster index.
    #[must_use]
    #[rustfmt::skip]
    pub fn index(&self) -> &ClusterIndex { &self.index }

    /// Returns the member nodes in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[u32] { &self.nodes }

    /// Returns the number of member nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn n(&self) -> usize { self.nodes.len() }

    /// Materializes the induced subgraph of this cluster over `graph`.
    #[must_use]
    pub fn realize(&self, graph: &GlobalGraph) -> ClusterView {
        ClusterView::realize(graph, self.index.clone(), &self.nodes)
    }
}
