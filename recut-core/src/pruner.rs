//! Iterative removal of weakly attached nodes before the mincut.
//!
//! A node whose induced degree is below the validity threshold cannot
//! survive in any accepted cluster, and leaving it in place invites
//! degenerate cuts that merely peel it off. Removal is monotone within a
//! job: a pruned node never reappears.

use tracing::debug;

use crate::{
    clusterer::Clusterer, requirement::MincutRequirement, view::ClusterView,
};

/// Strips below-threshold-degree nodes from `view` until its minimum
/// induced degree meets the validity threshold or at most one node
/// remains. Each round removes every offending node at once, then
/// re-evaluates the threshold against the shrunken view.
///
/// Returns the total number of nodes removed; zero leaves the view
/// untouched.
pub fn prune<C>(view: &mut ClusterView, requirement: &MincutRequirement, clusterer: &C) -> usize
where
    C: Clusterer + ?Sized,
{
    let mut removed = 0;
    loop {
        if view.n() <= 1 {
            break;
        }
        let threshold = requirement.validity_threshold(clusterer, view);
        if view.mcd() as f64 >= threshold {
            break;
        }
        let doomed: Vec<u32> = view
            .nodes()
            .filter(|&u| view.degree(u).is_some_and(|d| (d as f64) < threshold))
            .collect();
        for u in doomed {
            view.remove_node(u);
            removed += 1;
        }
        debug!(n = view.n(), m = view.m(), removed, "pruning round finished");
    }
    removed
}
