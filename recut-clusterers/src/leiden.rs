//! Wrapper around an external Leiden binary.

use std::path::Path;
use std::process::Command;

use recut_core::{ClusterView, Clusterer, ClustererError, IntangibleCluster};

use crate::{
    context::RunContext,
    process::run_captured,
    scratch::{load_existing, parse_node_cluster, read_membership, remap_to_subclusters, write_compact_edgelist},
};

/// Quality function driving the Leiden optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Constant Potts model, parameterized by a resolution.
    Cpm,
    /// Plain modularity, no resolution parameter.
    Modularity,
}

/// Leiden clusterer invoked as a subprocess.
///
/// The binary is expected to accept `-i <edgelist> -o <clustering>` plus
/// the quality arguments and to write `node cluster` lines.
#[derive(Debug, Clone)]
pub struct LeidenClusterer {
    context: RunContext,
    quality: Quality,
    resolution: f64,
}

impl LeidenClusterer {
    /// Creates a CPM-quality Leiden clusterer with the given resolution.
    #[must_use]
    pub fn new(context: RunContext, resolution: f64) -> Self {
        Self {
            context,
            quality: Quality::Cpm,
            resolution,
        }
    }

    /// Creates a modularity-quality Leiden clusterer.
    #[must_use]
    pub fn with_modularity(context: RunContext) -> Self {
        Self {
            context,
            quality: Quality::Modularity,
            resolution: 0.0,
        }
    }

    /// Returns the configured quality function.
    #[must_use]
    #[rustfmt::skip]
    pub fn quality(&self) -> Quality { self.quality }

    /// Returns the CPM resolution; meaningless under modularity quality.
    #[must_use]
    #[rustfmt::skip]
    pub fn resolution(&self) -> f64 { self.resolution }
}

impl Clusterer for LeidenClusterer {
    fn name(&self) -> &str {
        match self.quality {
            Quality::Cpm => "leiden",
            Quality::Modularity => "leiden-mod",
        }
    }

    fn cluster(&self, view: &ClusterView) -> Result<Vec<IntangibleCluster>, ClustererError> {
        let edge_path = self.context.scratch_path(view.index(), "edgelist");
        write_compact_edgelist(view, &edge_path)?;
        let out_path = self.context.scratch_path(view.index(), "leiden");
        let stdout_path = self.context.scratch_path(view.index(), "leiden.stdout");
        let stderr_path = self.context.scratch_path(view.index(), "leiden.stderr");

        let mut command = Command::new(self.context.leiden_bin());
        command.arg("-i").arg(&edge_path).arg("-o").arg(&out_path);
        match self.quality {
            Quality::Cpm => {
                command
                    .args(["--quality", "cpm", "--resolution"])
                    .arg(self.resolution.to_string());
            }
            Quality::Modularity => {
                command.args(["--quality", "modularity"]);
            }
        }
        run_captured(&mut command, &stdout_path, &stderr_path)?;

        let groups = read_membership(&out_path, parse_node_cluster)?;
        remap_to_subclusters(view, groups, &out_path)
    }

    fn from_existing_clustering(
        &self,
        path: &Path,
    ) -> Result<Vec<IntangibleCluster>, ClustererError> {
        load_existing(path, parse_node_cluster)
    }
}
