//! Wrapper around an external IKC (iterative k-core clustering) binary.

use std::path::Path;
use std::process::Command;

use recut_core::{ClusterView, Clusterer, ClustererError, IntangibleCluster};

use crate::{
    context::RunContext,
    process::run_captured,
    scratch::{load_existing, read_membership, remap_to_subclusters, write_compact_edgelist, ParsedLine},
};

/// IKC clusterer invoked as a subprocess.
///
/// IKC output is CSV: `node,cluster,k,modularity` per line. Clusters
/// accepted from an IKC run must additionally have positive Newman
/// modularity, which the engine enforces through
/// [`Clusterer::requires_positive_modularity`].
#[derive(Debug, Clone)]
pub struct IkcClusterer {
    context: RunContext,
    k: u32,
}

impl IkcClusterer {
    /// Creates an IKC clusterer with the given `k`.
    #[must_use]
    pub fn new(context: RunContext, k: u32) -> Self {
        Self { context, k }
    }
}

fn parse_ikc_line(record: &str) -> ParsedLine {
    if record.is_empty() {
        return Ok(None);
    }
    let fields: Vec<&str> = record.split(',').collect();
    let &[node, cluster, _k, _modularity] = fields.as_slice() else {
        return Err("expected `node,cluster,k,modularity`".to_owned());
    };
    node.trim()
        .parse()
        .map(|node| Some((node, cluster.trim().to_owned())))
        .map_err(|_| "node id must be a non-negative integer".to_owned())
}

impl Clusterer for IkcClusterer {
    fn name(&self) -> &str {
        "ikc"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        let edge_path = self.context.scratch_path(view.index(), "edgelist");
        write_compact_edgelist(view, &edge_path)?;
        let out_path = self.context.scratch_path(view.index(), "ikc");
        let stdout_path = self.context.scratch_path(view.index(), "ikc.stdout");
        let stderr_path = self.context.scratch_path(view.index(), "ikc.stderr");

        let mut command = Command::new(self.context.ikc_bin());
        command
            .arg("-e")
            .arg(&edge_path)
            .arg("-o")
            .arg(&out_path)
            .arg("-k")
            .arg(self.k.to_string());
        run_captured(&mut command, &stdout_path, &stderr_path)?;

        let groups = read_membership(&out_path, parse_ikc_line)?;
        remap_to_subclusters(view, groups, &out_path)
    }

    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        load_existing(path, parse_ikc_line)
    }

    fn requires_positive_modularity(&self) -> bool {
        true
    }

    fn k(&self) -> Option<u32> {
        Some(self.k)
    }
}
