//! The reclustering capability consumed by the engine.

use std::path::Path;

use crate::{
    cluster::IntangibleCluster,
    error::ClustererError,
    view::ClusterView,
};

/// Abstraction over a clustering algorithm the engine can call back into.
///
/// Implementations cluster a realized subgraph into candidate
/// subclusters and load the initial clustering they previously produced.
/// The engine treats every implementation identically apart from the two
/// IKC capability hooks: [`requires_positive_modularity`] gates
/// acceptance on Newman modularity and [`k`] feeds the `k` term of the
/// threshold expression.
///
/// Reclustering must behave as a pure function of the view: the engine
/// relies on it for determinism and calls it at most once per split side.
///
/// [`requires_positive_modularity`]: Clusterer::requires_positive_modularity
/// [`k`]: Clusterer::k
pub trait Clusterer {
    /// Short name used in logs and scratch-file paths.
    fn name(&self) -> &str;

    /// Clusters the realized subgraph into candidate subclusters.
    ///
    /// Returned clusters must carry indices derived from the view's index
    /// (see [`ClusterIndex::subcluster`]) and node ids of the host graph.
    ///
    /// # Errors
    /// Returns [`ClustererError`] when the underlying algorithm fails;
    /// the engine treats this as fatal.
    ///
    /// [`ClusterIndex::subcluster`]: crate::cluster::ClusterIndex::subcluster
    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError>;

    /// Clusters the view and drops singleton results.
    ///
    /// # Errors
    /// Propagates any [`ClustererError`] from [`cluster`](Clusterer::cluster).
    fn cluster_without_singletons(
        &self,
        view: &ClusterView,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        Ok(self
            .cluster(view)?
            .into_iter()
            .filter(|cluster| cluster.n() > 1)
            .collect())
    }

    /// Loads the initial clustering from the file format this clusterer
    /// writes. Clusters of size one or less are dropped.
    ///
    /// # Errors
    /// Returns [`ClustererError`] when the file cannot be read or parsed.
    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError>;

    /// Whether accepted clusters must additionally have positive Newman
    /// modularity. Only IKC sets this.
    fn requires_positive_modularity(&self) -> bool {
        false
    }

    /// The IKC `k` parameter, when this clusterer carries one.
    fn k(&self) -> Option<u32> {
        None
    }
}
