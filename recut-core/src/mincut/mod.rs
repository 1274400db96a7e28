//! Global minimum edge cuts of realized cluster subgraphs.
//!
//! Implements the Stoer–Wagner algorithm over a view's compact ids with
//! unit edge weights and sparse merged-weight maps. Every scan walks
//! compact ids in ascending order and ties resolve toward the smallest
//! id, so the result is fully determined by the view's node set.
//! Disconnected views short-circuit: the cut size is zero and one
//! connected component stands against the rest.

use std::collections::HashMap;

use thiserror::Error;

use crate::view::{ClusterView, CompactIds};

/// Errors returned while computing a minimum cut.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum MincutError {
    /// The view has fewer than two nodes, so no cut exists.
    #[error("cannot cut a view with {nodes} node(s)")]
    TrivialView {
        /// Number of nodes in the rejected view.
        nodes: usize,
    },
}

/// A global minimum edge cut of a realized subgraph.
///
/// The two partitions are disjoint, non-empty, sorted by node id, and
/// together cover the view's node set; the light partition is never
/// larger than the heavy one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MincutResult {
    light: Vec<u32>,
    heavy: Vec<u32>,
    cut_size: usize,
}

impl MincutResult {
    fn new(a: Vec<u32>, b: Vec<u32>, cut_size: usize) -> Self {
        let (light, heavy) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        Self {
            light,
            heavy,
            cut_size,
        }
    }

    /// Returns the smaller partition, ascending by node id.
    #[must_use]
    #[rustfmt::skip]
    pub fn light(&self) -> &[u32] { &self.light }

    /// Returns the larger partition, ascending by node id.
    #[must_use]
    #[rustfmt::skip]
    pub fn heavy(&self) -> &[u32] { &self.heavy }

    /// Returns the number of induced edges crossing the partition.
    #[must_use]
    #[rustfmt::skip]
    pub fn cut_size(&self) -> usize { self.cut_size }
}

pub(crate) fn global_mincut(view: &ClusterView) -> Result<MincutResult, MincutError> {
    let ids = view.compact_ids();
    let n = ids.len();
    if n < 2 {
        return Err(MincutError::TrivialView { nodes: n });
    }

    let mut weights: Vec<HashMap<usize, u64>> = vec![HashMap::new(); n];
    for (u, v) in view.compact_edges() {
        weights[u].insert(v, 1);
        weights[v].insert(u, 1);
    }

    if let Some(component) = proper_component(&weights) {
        let rest: Vec<usize> = (0..n).filter(|v| !component.contains(v)).collect();
        return Ok(MincutResult::new(
            to_original(&ids, &component),
            to_original(&ids, &rest),
            0,
        ));
    }

    let mut merged = vec![false; n];
    let mut absorbed: Vec<Vec<usize>> = (0..n).map(|v| vec![v]).collect();
    let mut best_cut = u64::MAX;
    let mut best_side: Vec<usize> = Vec::new();

    for _ in 1..n {
        let (s, t, phase_cut) = minimum_cut_phase(&weights, &merged);
        if phase_cut < best_cut {
            best_cut = phase_cut;
            best_side = absorbed[t].clone();
        }
        merge(&mut weights, &mut merged, &mut absorbed, s, t);
    }

    best_side.sort_unstable();
    let rest: Vec<usize> = {
        let mut inside = vec![false; n];
        for &v in &best_side {
            inside[v] = true;
        }
        (0..n).filter(|&v| !inside[v]).collect()
    };
    Ok(MincutResult::new(
        to_original(&ids, &best_side),
        to_original(&ids, &rest),
        best_cut as usize,
    ))
}

/// One maximum-adjacency phase: grow set A from the first active vertex
/// by repeatedly adding the most tightly connected remaining vertex.
///
/// Returns `(s, t, cut_of_the_phase)` where `s` and `t` are the last two
/// vertices added and the phase cut is `t`'s total attachment when it was
/// added, i.e. the weight of the cut separating `t` from everything else.
fn minimum_cut_phase(weights: &[HashMap<usize, u64>], merged: &[bool]) -> (usize, usize, u64) {
    let active: Vec<usize> = (0..weights.len()).filter(|&v| !merged[v]).collect();

    let mut in_a = vec![false; weights.len()];
    let mut attach = vec![0u64; weights.len()];

    let first = active[0];
    in_a[first] = true;
    for (&v, &w) in &weights[first] {
        attach[v] = w;
    }

    let mut previous = first;
    let mut last = first;
    let mut phase_cut = 0;

    for _ in 1..active.len() {
        // Ascending scan with a strict comparison: the smallest id wins
        // attachment ties, keeping the whole run deterministic.
        let mut next = usize::MAX;
        let mut next_weight = 0u64;
        for &v in &active {
            if !in_a[v] && (next == usize::MAX || attach[v] > next_weight) {
                next = v;
                next_weight = attach[v];
            }
        }

        previous = last;
        last = next;
        phase_cut = next_weight;
        in_a[next] = true;

        for (&v, &w) in &weights[next] {
            if !in_a[v] {
                attach[v] += w;
            }
        }
    }

    (previous, last, phase_cut)
}

/// Merges super-vertex `t` into `s`, combining edge weights and the
/// absorbed original vertices.
fn merge(
    weights: &mut [HashMap<usize, u64>],
    merged: &mut [bool],
    absorbed: &mut [Vec<usize>],
    s: usize,
    t: usize,
) {
    merged[t] = true;
    let moved = std::mem::take(&mut absorbed[t]);
    absorbed[s].extend(moved);

    let t_edges = std::mem::take(&mut weights[t]);
    for (v, w) in t_edges {
        weights[v].remove(&t);
        if v == s {
            continue;
        }
        *weights[s].entry(v).or_insert(0) += w;
        *weights[v].entry(s).or_insert(0) += w;
    }
}

/// Searches from compact id 0; returns the reached component (sorted)
/// when it does not cover the whole view.
fn proper_component(weights: &[HashMap<usize, u64>]) -> Option<Vec<usize>> {
    let n = weights.len();
    let mut seen = vec![false; n];
    let mut queue = vec![0];
    seen[0] = true;
    let mut reached = 1;
    while let Some(u) = queue.pop() {
        for &v in weights[u].keys() {
            if !seen[v] {
                seen[v] = true;
                reached += 1;
                queue.push(v);
            }
        }
    }
    if reached == n {
        return None;
    }
    Some((0..n).filter(|&v| seen[v]).collect())
}

fn to_original(ids: &CompactIds, compact: &[usize]) -> Vec<u32> {
    compact.iter().filter_map(|&v| ids.original(v)).collect()
}

#[cfg(test)]
mod property;
