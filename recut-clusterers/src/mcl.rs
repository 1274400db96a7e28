//! Wrapper around an external MCL (Markov clustering) binary.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;

use recut_core::{ClusterView, Clusterer, ClustererError, IntangibleCluster};

use crate::{
    context::RunContext,
    process::run_captured,
    scratch::{load_existing, parse_node_cluster, remap_to_subclusters, write_compact_edgelist},
};

/// MCL clusterer invoked as a subprocess.
///
/// The edgelist goes out in MCL's `abc` label format; the native output
/// holds one cluster per line as whitespace-separated member ids, so the
/// line number doubles as the local cluster id.
#[derive(Debug, Clone)]
pub struct MclClusterer {
    context: RunContext,
    inflation: f64,
}

impl MclClusterer {
    /// Creates an MCL clusterer with the given inflation parameter.
    #[must_use]
    pub fn new(context: RunContext, inflation: f64) -> Self {
        Self { context, inflation }
    }

    /// Returns the inflation parameter.
    #[must_use]
    #[rustfmt::skip]
    pub fn inflation(&self) -> f64 { self.inflation }
}

/// Reads MCL native output: every non-empty line is one cluster.
fn read_mcl_output(path: &Path) -> Result<Vec<Vec<u32>>, ClustererError> {
    let file = File::open(path).map_err(|source| ClustererError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut clusters = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ClustererError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        let members: Result<Vec<u32>, _> =
            record.split_whitespace().map(str::parse).collect();
        match members {
            Ok(members) => clusters.push(members),
            Err(_) => {
                return Err(ClustererError::MalformedClustering {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    detail: "cluster members must be non-negative integers".to_owned(),
                });
            }
        }
    }
    Ok(clusters)
}

impl Clusterer for MclClusterer {
    fn name(&self) -> &str {
        "mcl"
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        let edge_path = self.context.scratch_path(view.index(), "edgelist");
        write_compact_edgelist(view, &edge_path)?;
        let out_path = self.context.scratch_path(view.index(), "mcl");
        let stdout_path = self.context.scratch_path(view.index(), "mcl.stdout");
        let stderr_path = self.context.scratch_path(view.index(), "mcl.stderr");

        let mut command = Command::new(self.context.mcl_bin());
        command
            .arg(&edge_path)
            .arg("--abc")
            .arg("-I")
            .arg(self.inflation.to_string())
            .arg("-o")
            .arg(&out_path);
        run_captured(&mut command, &stdout_path, &stderr_path)?;

        let groups = read_mcl_output(&out_path)?
            .into_iter()
            .enumerate()
            .map(|(local, members)| (local.to_string(), members))
            .collect();
        remap_to_subclusters(view, groups, &out_path)
    }

    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        load_existing(path, parse_node_cluster)
    }
}
