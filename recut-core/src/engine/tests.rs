//! End-to-end engine scenarios over a pure in-process clusterer.

use std::collections::HashSet;
use std::path::Path;

use rstest::rstest;

use crate::{
    ClusterIndex, ClusterView, Clusterer, GlobalGraph, IntangibleCluster,
    MincutRequirement, Refinement, Refiner, error::ClustererError, error::RecutError,
};

/// Reclusters a view into its connected components — deterministic, pure
/// and singleton-free after the trait's default filter, which makes it a
/// faithful stand-in for the external clusterers.
struct ComponentClusterer;

fn components(view: &ClusterView) -> Vec<Vec<u32>> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut found = Vec::new();
    for u in view.nodes() {
        if seen.contains(&u) {
            continue;
        }
        seen.insert(u);
        let mut component = vec![u];
        let mut queue = vec![u];
        while let Some(x) = queue.pop() {
            for v in view.neighbors(x) {
                if seen.insert(v) {
                    component.push(v);
                    queue.push(v);
                }
            }
        }
        found.push(component);
    }
    found
}

impl Clusterer for ComponentClusterer {
    fn name(&self) -> &str {
        "components"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        Ok(components(view)
            .into_iter()
            .enumerate()
            .map(|(local, members)| {
                IntangibleCluster::new(view.index().subcluster(&local.to_string()), members)
            })
            .collect())
    }

    fn from_existing_clustering(
        &self,
        _path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        Ok(Vec::new())
    }
}

/// The component clusterer with IKC's acceptance semantics bolted on.
struct IkcLikeClusterer {
    inner: ComponentClusterer,
    k: u32,
}

impl Clusterer for IkcLikeClusterer {
    fn name(&self) -> &str {
        "ikc-like"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        self.inner.cluster(view)
    }

    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        self.inner.from_existing_clustering(path)
    }

    fn requires_positive_modularity(&self) -> bool {
        true
    }

    fn k(&self) -> Option<u32> {
        Some(self.k)
    }
}

struct FailingClusterer;

impl Clusterer for FailingClusterer {
    fn name(&self) -> &str {
        "failing"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        Err(ClustererError::MalformedClustering {
            path: Path::new("unused").to_path_buf(),
            line: 1,
            detail: format!("refusing to recluster {}", view.index()),
        })
    }

    fn from_existing_clustering(
        &self,
        _path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        Ok(Vec::new())
    }
}

fn refine(
    edges: &[(u32, u32)],
    initial: Vec<(&str, Vec<u32>)>,
    threshold: &str,
    clusterer: &dyn Clusterer,
) -> Refinement {
    let graph = GlobalGraph::from_edges(edges.iter().copied());
    let clusters = initial
        .into_iter()
        .map(|(index, nodes)| IntangibleCluster::new(ClusterIndex::new(index), nodes))
        .collect();
    let requirement: MincutRequirement = threshold.parse().expect("threshold must parse");
    Refiner::new(requirement)
        .refine(&graph, clusters, clusterer)
        .expect("refinement must succeed")
}

fn label_of(refinement: &Refinement, node: u32) -> &str {
    refinement
        .labels()
        .get(&node)
        .expect("node must be labelled")
        .as_str()
}

/// Universal invariants: parent-prefix tree shape, extant exclusivity,
/// and agreement between accepted clusters and terminal labels.
fn assert_refinement_invariants(refinement: &Refinement) {
    let tree = refinement.tree();
    for (_, node) in tree.iter() {
        if let Some(parent) = node.parent() {
            let prefix = tree.get(parent).graph_index().as_str();
            assert!(
                node.graph_index().as_str().starts_with(prefix),
                "{} must extend its parent {prefix}",
                node.graph_index()
            );
        }
        if node.extant() {
            let mut ancestor = node.parent();
            while let Some(id) = ancestor {
                assert!(!tree.get(id).extant(), "extant nodes must not nest");
                ancestor = tree.get(id).parent();
            }
        }
    }
    for cluster in refinement.clusters() {
        let members: Vec<u32> = refinement
            .labels()
            .iter()
            .filter_map(|(&node, index)| (index == cluster.index()).then_some(node))
            .collect();
        assert_eq!(
            members,
            cluster.nodes(),
            "terminal labels must reproduce accepted membership"
        );
    }
}

#[test]
fn triangle_at_equal_threshold_splits_and_dissolves() {
    let refinement = refine(
        &[(0, 1), (1, 2), (0, 2)],
        vec![("0", vec![0, 1, 2])],
        "2",
        &ComponentClusterer,
    );
    assert!(refinement.clusters().is_empty(), "equal cuts must split");
    // The peeled-off side never becomes a job, so its node keeps the
    // parent stamp; the reclustered pair dissolves under pruning.
    assert_eq!(label_of(&refinement, 2), "0");
    assert_eq!(label_of(&refinement, 0), "0b0");
    assert_eq!(label_of(&refinement, 1), "0b0");
    let indices: HashSet<&str> = refinement
        .tree()
        .iter()
        .map(|(_, node)| node.graph_index().as_str())
        .collect();
    assert_eq!(
        indices,
        HashSet::from(["", "0", "0a", "0b", "0b0", "0b0δ"])
    );
    assert_refinement_invariants(&refinement);
}

#[test]
fn bridged_triangles_split_once_and_both_sides_survive() {
    let refinement = refine(
        &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)],
        vec![("0", vec![0, 1, 2, 3, 4, 5])],
        "1",
        &ComponentClusterer,
    );
    let accepted: HashSet<Vec<u32>> = refinement
        .clusters()
        .iter()
        .map(|cluster| cluster.nodes().to_vec())
        .collect();
    assert_eq!(
        accepted,
        HashSet::from([vec![0, 1, 2], vec![3, 4, 5]])
    );
    // Both accepted clusters must beat the threshold on their own.
    let graph = GlobalGraph::from_edges([(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)]);
    for cluster in refinement.clusters() {
        let view = cluster.realize(&graph);
        let cut = view.find_mincut().expect("mincut must succeed");
        assert!(cut.cut_size() > 1);
    }
    assert_refinement_invariants(&refinement);
}

#[test]
fn star_dissolves_to_nothing() {
    let refinement = refine(
        &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)],
        vec![("0", vec![0, 1, 2, 3, 4, 5])],
        "1",
        &ComponentClusterer,
    );
    assert!(refinement.clusters().is_empty());
    for node in 0..6 {
        assert!(refinement.labels().contains_key(&node));
    }
    assert!(refinement.tree().iter().all(|(_, node)| !node.extant()));
    assert_refinement_invariants(&refinement);
}

#[rstest]
#[case::plain(false, 1)]
#[case::ikc(true, 0)]
fn disconnected_cluster_takes_the_accept_branch(#[case] ikc: bool, #[case] accepted: usize) {
    // Two disjoint edges in one initial cluster: the zero cut goes to the
    // accept branch, where only the IKC modularity guard may discard it
    // (modularity of the whole vertex set is exactly zero).
    let clusterer: Box<dyn Clusterer> = if ikc {
        Box::new(IkcLikeClusterer {
            inner: ComponentClusterer,
            k: 2,
        })
    } else {
        Box::new(ComponentClusterer)
    };
    let refinement = refine(
        &[(0, 1), (2, 3)],
        vec![("0", vec![0, 1, 2, 3])],
        "1",
        clusterer.as_ref(),
    );
    assert_eq!(refinement.clusters().len(), accepted);
    // Discarded or not, the terminal stamp stays in the labels map.
    for node in 0..4 {
        assert_eq!(label_of(&refinement, node), "0");
    }
    assert_refinement_invariants(&refinement);
}

#[test]
fn ikc_accepts_clusters_with_positive_modularity() {
    let clusterer = IkcLikeClusterer {
        inner: ComponentClusterer,
        k: 2,
    };
    let refinement = refine(
        &[(0, 1), (2, 3)],
        vec![("0", vec![0, 1]), ("1", vec![2, 3])],
        "0.5",
        &clusterer,
    );
    assert_eq!(refinement.clusters().len(), 2);
    assert_refinement_invariants(&refinement);
}

#[test]
fn ikc_k_feeds_the_threshold_expression() {
    // Threshold 1k with k = 2 puts the triangle's cut of 2 at the split
    // branch; the component clusterer then fails to rebuild anything
    // durable, so nothing is accepted.
    let clusterer = IkcLikeClusterer {
        inner: ComponentClusterer,
        k: 2,
    };
    let refinement = refine(
        &[(0, 1), (1, 2), (0, 2)],
        vec![("0", vec![0, 1, 2])],
        "1k",
        &clusterer,
    );
    assert!(refinement.clusters().is_empty());
}

#[test]
fn pruning_cascade_records_a_delta_child_and_exits() {
    let edges: Vec<(u32, u32)> = (0..10).map(|u| (u, u + 1)).collect();
    let refinement = refine(
        &edges,
        vec![("0", (0..=10).collect())],
        "2",
        &ComponentClusterer,
    );
    assert!(refinement.clusters().is_empty());
    let tree = refinement.tree();
    let cluster_node = tree
        .iter()
        .find(|(_, node)| node.graph_index().as_str() == "0")
        .map(|(id, _)| id)
        .expect("initial cluster must be in the tree");
    // The cascade is recorded as a cut of the original minimum degree.
    assert_eq!(tree.get(cluster_node).cut_size(), Some(1));
    let children = tree.get(cluster_node).children();
    assert_eq!(children.len(), 1);
    let delta = tree.get(children[0]);
    assert_eq!(delta.graph_index().as_str(), "0δ");
    assert!(delta.num_nodes() <= 1);
    assert_refinement_invariants(&refinement);
}

#[test]
fn singleton_and_empty_jobs_are_skipped() {
    let refinement = refine(
        &[(0, 1)],
        vec![("0", vec![5]), ("1", vec![])],
        "1",
        &ComponentClusterer,
    );
    assert!(refinement.clusters().is_empty());
    assert_eq!(label_of(&refinement, 5), "0");
    // Both jobs still appear as initial tree nodes under the root.
    assert_eq!(refinement.tree().len(), 3);
}

#[test]
fn zero_threshold_accepts_everything() {
    let refinement = refine(
        &[(0, 1), (1, 2), (0, 2)],
        vec![("0", vec![0, 1, 2])],
        "",
        &ComponentClusterer,
    );
    assert_eq!(refinement.clusters().len(), 1);
    assert_refinement_invariants(&refinement);
}

#[test]
fn clusterer_failure_aborts_the_run() {
    let graph = GlobalGraph::from_edges([(0, 1), (1, 2), (0, 2)]);
    let initial = vec![IntangibleCluster::new(ClusterIndex::new("0"), vec![0, 1, 2])];
    let requirement: MincutRequirement = "2".parse().expect("threshold must parse");
    let err = Refiner::new(requirement)
        .refine(&graph, initial, &FailingClusterer)
        .expect_err("split must surface the clusterer failure");
    assert!(matches!(err, RecutError::Clusterer { .. }));
}

#[test]
fn tree_round_trips_through_its_nested_form() {
    let refinement = refine(
        &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)],
        vec![("0", vec![0, 1, 2, 3, 4, 5])],
        "1",
        &ComponentClusterer,
    );
    let data = refinement.tree().to_data();
    let rebuilt = crate::HierarchyTree::from_data(&data);
    assert_eq!(rebuilt.to_data(), data);
    // Walking extant leaves of the reloaded tree finds exactly the
    // accepted cluster indices.
    let mut extant: Vec<String> = rebuilt
        .iter()
        .filter(|(_, node)| node.extant())
        .map(|(_, node)| node.graph_index().as_str().to_owned())
        .collect();
    extant.sort();
    let mut accepted: Vec<String> = refinement
        .clusters()
        .iter()
        .map(|cluster| cluster.index().as_str().to_owned())
        .collect();
    accepted.sort();
    assert_eq!(extant, accepted);
}
