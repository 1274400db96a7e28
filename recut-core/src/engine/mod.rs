//! The cut-validate-split-recluster driver.
//!
//! The engine consumes a work stack of unrealized clusters. Each popped
//! job is realized against the host graph, pruned, and cut: a weak cut
//! splits the cluster into its two sides, reclusters each side and pushes
//! the resulting subclusters back; a strong cut accepts the cluster.
//! Every decision lands in the hierarchy tree, and every visited cluster
//! stamps its members in the label map, so the terminal stamp wins.
//!
//! The loop is iterative over an explicit stack — refinement depth never
//! touches the call stack.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, instrument};

use crate::{
    cluster::{ClusterIndex, IntangibleCluster},
    clusterer::Clusterer,
    error::{RecutError, Result},
    graph::GlobalGraph,
    pruner::prune,
    requirement::MincutRequirement,
    tree::{HierarchyTree, NodeId},
};

/// Everything a refinement run produces.
#[derive(Debug, Clone)]
pub struct Refinement {
    clusters: Vec<IntangibleCluster>,
    labels: BTreeMap<u32, ClusterIndex>,
    tree: HierarchyTree,
}

impl Refinement {
    /// Returns the accepted clusters in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn clusters(&self) -> &[IntangibleCluster] { &self.clusters }

    /// Returns the terminal label of every node that belonged to an
    /// initial cluster.
    ///
    /// A terminal cluster discarded by the IKC modularity guard keeps its
    /// label here even though it is absent from [`clusters`]: the stamp is
    /// never overwritten because the cluster has no descendants.
    ///
    /// [`clusters`]: Refinement::clusters
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &BTreeMap<u32, ClusterIndex> { &self.labels }

    /// Returns the hierarchy tree of every decision taken.
    #[must_use]
    #[rustfmt::skip]
    pub fn tree(&self) -> &HierarchyTree { &self.tree }

    /// Decomposes the refinement into its parts.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Vec<IntangibleCluster>,
        BTreeMap<u32, ClusterIndex>,
        HierarchyTree,
    ) {
        (self.clusters, self.labels, self.tree)
    }
}

/// Drives refinement jobs until every remaining cluster is cut-valid.
#[derive(Debug, Clone)]
pub struct Refiner {
    requirement: MincutRequirement,
}

impl Refiner {
    /// Creates a refiner enforcing the given connectivity requirement.
    #[must_use]
    pub fn new(requirement: MincutRequirement) -> Self {
        Self { requirement }
    }

    /// Returns the configured requirement.
    #[must_use]
    #[rustfmt::skip]
    pub fn requirement(&self) -> &MincutRequirement { &self.requirement }

    /// Refines `initial` over `graph` until the work stack drains.
    ///
    /// Jobs are popped LIFO, matching the original driver; the order only
    /// affects the log sequence, never the result set.
    ///
    /// # Errors
    /// Returns [`RecutError::Clusterer`] when reclustering a split side
    /// fails and [`RecutError::Mincut`]/[`RecutError::Invariant`] on
    /// internal invariant violations. Any error aborts the whole run.
    #[instrument(
        name = "engine.refine",
        skip_all,
        fields(
            graph_n = graph.node_count(),
            graph_m = graph.num_edges(),
            initial_clusters = initial.len(),
        ),
    )]
    pub fn refine<C>(
        &self,
        graph: &GlobalGraph,
        initial: Vec<IntangibleCluster>,
        clusterer: &C,
    ) -> Result<Refinement>
    where
        C: Clusterer + ?Sized,
    {
        let mut tree = HierarchyTree::new(graph.node_count());
        let mut tree_ids: HashMap<ClusterIndex, NodeId> = HashMap::new();
        for cluster in &initial {
            let id = tree.add_child(tree.root(), cluster.index(), cluster.n());
            tree_ids.insert(cluster.index().clone(), id);
        }

        let mut stack = initial;
        let mut clusters = Vec::new();
        let mut labels: BTreeMap<u32, ClusterIndex> = BTreeMap::new();
        info!(queue_size = stack.len(), "starting refinement");

        while let Some(job) = stack.pop() {
            debug!(
                queue_size = stack.len(),
                cluster = %job.index(),
                n = job.n(),
                "popped cluster"
            );
            for &u in job.nodes() {
                labels.insert(u, job.index().clone());
            }
            if job.n() <= 1 {
                continue;
            }

            let mut view = job.realize(graph);
            let mut active = lookup(&tree_ids, view.index())?;

            let original_mcd = view.mcd();
            let num_pruned = prune(&mut view, &self.requirement, clusterer);
            if num_pruned > 0 {
                // Pruning acts as a cut of the original minimum degree,
                // separating the stripped nodes from the remainder.
                tree.set_cut_size(active, original_mcd);
                let pruned_index = view.index().pruned();
                view.set_index(pruned_index.clone());
                let child = tree.add_child(active, &pruned_index, view.n());
                tree_ids.insert(pruned_index.clone(), child);
                active = child;
                for u in view.nodes() {
                    labels.insert(u, pruned_index.clone());
                }
                debug!(
                    cluster = %view.index(),
                    num_pruned,
                    n = view.n(),
                    m = view.m(),
                    mcd = view.mcd(),
                    "pruned cluster"
                );
            }
            if view.n() <= 1 {
                continue;
            }

            let mincut = view.find_mincut()?;
            if mincut.light().is_empty() || mincut.heavy().is_empty() {
                return Err(RecutError::Invariant {
                    detail: format!(
                        "mincut of cluster {} returned an empty partition",
                        view.index()
                    ),
                });
            }
            let threshold = self.requirement.validity_threshold(clusterer, &view);
            tree.set_cut_size(active, mincut.cut_size());
            tree.set_validity_threshold(active, threshold);
            debug!(
                cluster = %view.index(),
                cut_size = mincut.cut_size(),
                light = mincut.light().len(),
                heavy = mincut.heavy().len(),
                threshold,
                "mincut computed"
            );

            if mincut.cut_size() > 0 && (mincut.cut_size() as f64) <= threshold {
                // Weak cut: split, recluster each side and push only the
                // reclustered subclusters — never the sides themselves.
                let (light, heavy) = view.cut_by_mincut(graph, &mincut);
                let mut summaries = Vec::with_capacity(2);
                for side in [light, heavy] {
                    let side_id = tree.add_child(active, side.index(), side.n());
                    tree_ids.insert(side.index().clone(), side_id);
                    let subclusters = clusterer
                        .cluster_without_singletons(&side)
                        .map_err(|source| RecutError::Clusterer { source })?;
                    summaries.push(summarize(&subclusters));
                    for sub in subclusters {
                        let sub_id = tree.add_child(side_id, sub.index(), sub.n());
                        tree_ids.insert(sub.index().clone(), sub_id);
                        stack.push(sub);
                    }
                }
                info!(
                    cluster = %view.index(),
                    side_a = %summaries[0],
                    side_b = %summaries[1],
                    "cluster split"
                );
            } else {
                let candidate = view.to_intangible();
                if clusterer.requires_positive_modularity() {
                    let modularity = graph.modularity(candidate.nodes());
                    if modularity <= 0.0 {
                        tree.set_extant(active, false);
                        info!(
                            cluster = %view.index(),
                            modularity,
                            "cut valid, but modularity non-positive, discarded"
                        );
                        continue;
                    }
                }
                tree.set_extant(active, true);
                info!(cluster = %view.index(), n = candidate.n(), "cut valid, accepted");
                clusters.push(candidate);
            }
        }

        info!(
            clusters = clusters.len(),
            labelled = labels.len(),
            tree_nodes = tree.len(),
            "refinement finished"
        );
        Ok(Refinement {
            clusters,
            labels,
            tree,
        })
    }
}

fn lookup(tree_ids: &HashMap<ClusterIndex, NodeId>, index: &ClusterIndex) -> Result<NodeId> {
    tree_ids
        .get(index)
        .copied()
        .ok_or_else(|| RecutError::Invariant {
            detail: format!("no tree node recorded for cluster {index}"),
        })
}

/// Compresses a subcluster list for logging.
fn summarize(clusters: &[IntangibleCluster]) -> String {
    match clusters {
        [] => "[](empty)".to_owned(),
        [one] => format!("[{}](1)", one.index()),
        [first, .., last] if clusters.len() > 3 => {
            format!("[{}, ..., {}]({})", first.index(), last.index(), clusters.len())
        }
        _ => {
            let names: Vec<&str> = clusters.iter().map(|c| c.index().as_str()).collect();
            format!("[{}]({})", names.join(", "), clusters.len())
        }
    }
}

#[cfg(test)]
mod tests;
