//! The immutable host graph shared by every cluster job.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{RecutError, Result};

/// Undirected simple graph over dense node ids `[0, N)`.
///
/// Built once per run from the input edgelist and never mutated
/// afterwards; any number of concurrent readers is fine. Node ids are
/// inferred from the edges, so isolated nodes below the maximum id exist
/// with degree zero.
#[derive(Debug, Clone, Default)]
pub struct GlobalGraph {
    adjacency: Vec<Vec<u32>>,
    num_edges: usize,
}

impl GlobalGraph {
    /// Builds a graph from an edge iterator.
    ///
    /// Self-loops are skipped and duplicate edges are collapsed.
    /// Adjacency lists are sorted ascending, which keeps neighbor order
    /// stable within a run.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut adjacency: Vec<Vec<u32>> = Vec::new();
        for (u, v) in edges {
            if u == v {
                continue;
            }
            let needed = (u.max(v) as usize) + 1;
            if adjacency.len() < needed {
                adjacency.resize_with(needed, Vec::new);
            }
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }
        let mut num_edges = 0;
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
            num_edges += list.len();
        }
        Self {
            adjacency,
            num_edges: num_edges / 2,
        }
    }

    /// Reads a tab-separated edgelist (`u\tv` per line, 0-based ids).
    ///
    /// Blank lines are skipped; any other line that does not hold exactly
    /// two non-negative integers is rejected.
    ///
    /// # Errors
    /// Returns [`RecutError::InputGraph`] when the file cannot be read and
    /// [`RecutError::MalformedEdge`] for an unparseable record.
    pub fn from_edgelist_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| RecutError::InputGraph {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut edges = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| RecutError::InputGraph {
                path: path.to_path_buf(),
                source,
            })?;
            let record = line.trim();
            if record.is_empty() {
                continue;
            }
            let mut fields = record.split_whitespace();
            let edge = match (fields.next(), fields.next(), fields.next()) {
                (Some(u), Some(v), None) => match (u.parse::<u32>(), v.parse::<u32>()) {
                    (Ok(u), Ok(v)) => (u, v),
                    _ => {
                        return Err(malformed(path, line_no, "node ids must be non-negative integers"));
                    }
                },
                _ => return Err(malformed(path, line_no, "expected `u<TAB>v`")),
            };
            edges.push(edge);
        }
        let graph = Self::from_edges(edges);
        info!(
            n = graph.node_count(),
            m = graph.num_edges(),
            path = %path.display(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Returns the number of nodes, i.e. the end of the dense id range.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.adjacency.len() }

    /// Returns the number of undirected edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn num_edges(&self) -> usize { self.num_edges }

    /// Iterates over all node ids.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.adjacency.len()).map(|u| u as u32)
    }

    /// Returns the neighbors of `u`, each exactly once, in ascending order.
    #[must_use]
    pub fn neighbors(&self, u: u32) -> &[u32] {
        self.adjacency
            .get(u as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of `u`.
    #[must_use]
    pub fn degree(&self, u: u32) -> usize {
        self.neighbors(u).len()
    }

    /// Newman modularity of the two-community partition `{S, V∖S}`.
    ///
    /// `members` must hold distinct node ids. Used only by the IKC
    /// acceptance guard; a graph without edges scores zero.
    #[must_use]
    pub fn modularity(&self, members: &[u32]) -> f64 {
        if self.num_edges == 0 {
            return 0.0;
        }
        let inside: HashSet<u32> = members.iter().copied().collect();
        let mut intra = 0usize;
        let mut degree_sum = 0usize;
        for &u in members {
            degree_sum += self.degree(u);
            for &v in self.neighbors(u) {
                if u < v && inside.contains(&v) {
                    intra += 1;
                }
            }
        }
        let m = self.num_edges as f64;
        let intra = intra as f64;
        let degree_sum = degree_sum as f64;
        let rest_intra = m - degree_sum + intra;
        let rest_degree_sum = 2.0 * m - degree_sum;
        let community = |edges: f64, degrees: f64| edges / m - (degrees / (2.0 * m)).powi(2);
        community(intra, degree_sum) + community(rest_intra, rest_degree_sum)
    }
}

fn malformed(path: &Path, line_no: usize, detail: &str) -> RecutError {
    RecutError::MalformedEdge {
        path: path.to_path_buf(),
        line: line_no + 1,
        detail: detail.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GlobalGraph {
        GlobalGraph::from_edges([(0, 1), (1, 2), (0, 2)])
    }

    #[test]
    fn from_edges_sorts_and_collapses() {
        let graph = GlobalGraph::from_edges([(2, 0), (0, 1), (1, 0), (3, 3)]);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.degree(3), 0);
    }

    #[test]
    fn modularity_of_whole_graph_is_zero() {
        let graph = triangle();
        let q = graph.modularity(&[0, 1, 2]);
        assert!(q.abs() < 1e-12, "expected 0, got {q}");
    }

    #[test]
    fn modularity_of_separated_pair_is_positive() {
        // Two disjoint edges; either edge alone is a better-than-chance
        // community.
        let graph = GlobalGraph::from_edges([(0, 1), (2, 3)]);
        let q = graph.modularity(&[0, 1]);
        assert!((q - 0.5).abs() < 1e-12, "expected 0.5, got {q}");
    }

    #[test]
    fn modularity_of_tight_pair_in_triangle_is_negative() {
        let graph = triangle();
        assert!(graph.modularity(&[0, 1]) < 0.0);
    }

    #[test]
    fn edgelist_parses_and_rejects() {
        use std::io::Write;

        let dir = std::env::temp_dir().join("recut-graph-tests");
        std::fs::create_dir_all(&dir).expect("temp dir must be creatable");

        let good = dir.join("good.tsv");
        let mut file = std::fs::File::create(&good).expect("file must be creatable");
        writeln!(file, "0\t1\n1\t2\n\n0\t2").expect("write must succeed");
        drop(file);
        let graph = GlobalGraph::from_edgelist_path(&good).expect("edgelist must parse");
        assert_eq!(graph.num_edges(), 3);

        let bad = dir.join("bad.tsv");
        std::fs::write(&bad, "0\tx\n").expect("write must succeed");
        let err = GlobalGraph::from_edgelist_path(&bad).expect_err("bad ids must be rejected");
        assert!(matches!(err, RecutError::MalformedEdge { line: 1, .. }));
    }
}
