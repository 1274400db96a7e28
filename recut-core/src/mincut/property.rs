//! Property tests comparing Stoer–Wagner against a brute-force oracle.
//!
//! Small graphs admit exhaustive enumeration of every bipartition, so the
//! oracle is the true global minimum; the algorithm must match it on the
//! cut size and must report a partition whose crossing-edge count equals
//! the size it claims.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::{ClusterIndex, ClusterView, GlobalGraph};

const NODES: u32 = 7;

/// Every candidate undirected edge over `NODES` vertices, in canonical
/// order; a boolean mask over this list describes one graph.
fn candidate_edges() -> Vec<(u32, u32)> {
    let mut edges = Vec::new();
    for u in 0..NODES {
        for v in (u + 1)..NODES {
            edges.push((u, v));
        }
    }
    edges
}

fn realize(mask: &[bool]) -> ClusterView {
    let edges: Vec<(u32, u32)> = candidate_edges()
        .into_iter()
        .zip(mask)
        .filter_map(|(edge, &keep)| keep.then_some(edge))
        .collect();
    let graph = GlobalGraph::from_edges(edges);
    let members: Vec<u32> = (0..NODES).collect();
    ClusterView::realize(&graph, ClusterIndex::new("0"), &members)
}

/// Exhaustive minimum over every proper bipartition of the view.
fn brute_force_mincut(view: &ClusterView) -> usize {
    let members: Vec<u32> = view.nodes().collect();
    let n = members.len();
    let mut best = usize::MAX;
    for bits in 1..(1u32 << n) - 1 {
        let inside: HashSet<u32> = members
            .iter()
            .enumerate()
            .filter_map(|(i, &u)| (bits & (1 << i) != 0).then_some(u))
            .collect();
        let crossing: usize = inside
            .iter()
            .map(|&u| view.neighbors(u).filter(|v| !inside.contains(v)).count())
            .sum();
        best = best.min(crossing);
    }
    best
}

fn crossing_edges(view: &ClusterView, side: &[u32]) -> usize {
    let inside: HashSet<u32> = side.iter().copied().collect();
    side.iter()
        .map(|&u| view.neighbors(u).filter(|v| !inside.contains(v)).count())
        .sum()
}

proptest! {
    #[test]
    fn matches_the_exhaustive_oracle(mask in prop::collection::vec(any::<bool>(), 21)) {
        let view = realize(&mask);
        let cut = view.find_mincut().expect("views with two or more nodes must cut");
        prop_assert_eq!(cut.cut_size(), brute_force_mincut(&view));
    }

    #[test]
    fn reported_partition_realizes_the_reported_size(
        mask in prop::collection::vec(any::<bool>(), 21),
    ) {
        let view = realize(&mask);
        let cut = view.find_mincut().expect("views with two or more nodes must cut");
        prop_assert_eq!(crossing_edges(&view, cut.light()), cut.cut_size());
        prop_assert_eq!(cut.light().len() + cut.heavy().len(), view.n());
    }
}
