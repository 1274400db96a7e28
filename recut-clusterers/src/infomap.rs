//! Wrapper around an external Infomap binary.

use std::path::Path;
use std::process::Command;

use recut_core::{ClusterView, Clusterer, ClustererError, IntangibleCluster};

use crate::{
    context::RunContext,
    process::run_captured,
    scratch::{load_existing, read_membership, remap_to_subclusters, write_compact_edgelist, ParsedLine},
};

/// Infomap clusterer invoked as a subprocess.
///
/// Infomap takes the network file and an output directory and writes a
/// `.clu` file named after the network's stem: `node cluster flow` lines
/// with `#`-prefixed comments.
#[derive(Debug, Clone)]
pub struct InfomapClusterer {
    context: RunContext,
}

impl InfomapClusterer {
    /// Creates an Infomap clusterer.
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }
}

fn parse_clu_line(record: &str) -> ParsedLine {
    if record.is_empty() || record.starts_with('#') {
        return Ok(None);
    }
    let mut fields = record.split_whitespace();
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(node), Some(cluster), Some(_flow), None) => node
            .parse()
            .map(|node| Some((node, cluster.to_owned())))
            .map_err(|_| "node id must be a non-negative integer".to_owned()),
        _ => Err("expected `node cluster flow`".to_owned()),
    }
}

impl Clusterer for InfomapClusterer {
    fn name(&self) -> &str {
        "infomap"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        let edge_path = self.context.scratch_path(view.index(), "edgelist");
        write_compact_edgelist(view, &edge_path)?;
        let stdout_path = self.context.scratch_path(view.index(), "infomap.stdout");
        let stderr_path = self.context.scratch_path(view.index(), "infomap.stderr");

        let mut command = Command::new(self.context.infomap_bin());
        command
            .arg(&edge_path)
            .arg(self.context.working_dir())
            .args(["--clu", "-2", "--silent"]);
        run_captured(&mut command, &stdout_path, &stderr_path)?;

        // Infomap names its output after the network stem inside the
        // output directory, which matches our scratch naming.
        let clu_path = self.context.scratch_path(view.index(), "clu");
        let groups = read_membership(&clu_path, parse_clu_line)?;
        remap_to_subclusters(view, groups, &clu_path)
    }

    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        load_existing(path, parse_clu_line)
    }
}
