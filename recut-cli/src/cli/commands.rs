//! Command implementation and argument parsing for the recut CLI.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use recut_clusterers::{
    IkcClusterer, InfomapClusterer, LeidenClusterer, MclClusterer, RunContext,
};
use recut_core::{
    ClusterIndex, Clusterer, ClustererError, GlobalGraph, HierarchyTree, MincutRequirement,
    RecutError, Refiner,
};
use thiserror::Error;
use tracing::info;

const DEFAULT_MCL_INFLATION: f64 = 2.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "recut",
    about = "Refine an existing clustering until every cluster is cut-valid."
)]
pub struct Cli {
    /// Input graph as a tab-separated edgelist.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Existing clustering to refine, in the chosen clusterer's format.
    #[arg(short = 'e', long)]
    pub existing_clustering: PathBuf,

    /// Clusterer used to rebuild the sides of every split.
    #[arg(short = 'c', long, value_enum)]
    pub clusterer: ClustererSpec,

    /// k parameter (IKC only).
    #[arg(short = 'k', long)]
    pub k: Option<u32>,

    /// Resolution parameter (CPM Leiden only).
    #[arg(short = 'g', long)]
    pub resolution: Option<f64>,

    /// Inflation parameter (MCL only).
    #[arg(long, default_value_t = DEFAULT_MCL_INFLATION)]
    pub inflation: f64,

    /// Connectivity threshold expression, e.g. `1log10` or `2mcd+1`.
    #[arg(short = 't', long, default_value = "")]
    pub threshold: String,

    /// Output labels file; the hierarchy tree is written beside it with a
    /// `.tree.json` suffix.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Scratch directory for clusterer exchanges; defaults to
    /// `<input>_working_dir`.
    #[arg(short = 'd', long)]
    pub working_dir: Option<PathBuf>,

    /// Log fatal errors only.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Clusterer variants selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClustererSpec {
    /// Leiden with the constant Potts model quality.
    Leiden,
    /// Leiden with the modularity quality.
    LeidenMod,
    /// Iterative k-core clustering.
    Ikc,
    /// Markov clustering.
    Mcl,
    /// Infomap.
    Infomap,
}

impl ClustererSpec {
    fn as_str(self) -> &'static str {
        match self {
            Self::Leiden => "leiden",
            Self::LeidenMod => "leiden-mod",
            Self::Ikc => "ikc",
            Self::Mcl => "mcl",
            Self::Infomap => "infomap",
        }
    }
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The chosen clusterer needs a parameter that was not supplied.
    #[error("clusterer `{clusterer}` requires `--{parameter}`")]
    MissingParameter {
        /// The selected clusterer.
        clusterer: &'static str,
        /// The flag that must be supplied.
        parameter: &'static str,
    },
    /// The chosen clusterer does not accept a supplied parameter.
    #[error("clusterer `{clusterer}` does not accept `--{parameter}`")]
    UnexpectedParameter {
        /// The selected clusterer.
        clusterer: &'static str,
        /// The flag that must be dropped.
        parameter: &'static str,
    },
    /// File I/O failed while writing an output.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The hierarchy tree could not be serialized.
    #[error("failed to serialize hierarchy tree to `{path}`: {source}")]
    TreeSerialize {
        /// The tree output path.
        path: PathBuf,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// Loading inputs or running the engine failed.
    #[error(transparent)]
    Core(#[from] RecutError),
    /// An external clusterer failed outside the engine, e.g. while
    /// loading the existing clustering.
    #[error(transparent)]
    Clusterer(#[from] ClustererError),
}

/// Summarises the outcome of a refinement run.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Number of accepted clusters.
    pub clusters: usize,
    /// Number of labelled nodes.
    pub labelled: usize,
    /// Path of the labels file.
    pub output: PathBuf,
    /// Path of the hierarchy tree file.
    pub tree_output: PathBuf,
}

/// Executes the refinement pipeline described by `cli`.
///
/// # Errors
/// Returns [`CliError`] when parameter validation, input loading, the
/// engine, or output writing fails.
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let requirement: MincutRequirement =
        cli.threshold.parse().map_err(RecutError::from)?;

    let working_dir = cli
        .working_dir
        .clone()
        .unwrap_or_else(|| default_working_dir(&cli.input));
    let context = RunContext::new(working_dir)?;
    let clusterer = build_clusterer(&cli, context)?;

    let graph = GlobalGraph::from_edgelist_path(&cli.input)?;
    let initial = clusterer.from_existing_clustering(&cli.existing_clustering)?;
    info!(
        num_clusters = initial.len(),
        clusterer = clusterer.name(),
        "loaded existing clustering"
    );

    let refinement = Refiner::new(requirement).refine(&graph, initial, clusterer.as_ref())?;
    let (clusters, labels, tree) = refinement.into_parts();

    write_labels(&cli.output, &labels)?;
    let tree_output = tree_output_path(&cli.output);
    write_tree(&tree_output, &tree)?;

    Ok(ExecutionSummary {
        clusters: clusters.len(),
        labelled: labels.len(),
        output: cli.output,
        tree_output,
    })
}

fn build_clusterer(cli: &Cli, context: RunContext) -> Result<Box<dyn Clusterer>, CliError> {
    let spec = cli.clusterer;
    match spec {
        ClustererSpec::Leiden => {
            let resolution = cli.resolution.ok_or(CliError::MissingParameter {
                clusterer: spec.as_str(),
                parameter: "resolution",
            })?;
            Ok(Box::new(LeidenClusterer::new(context, resolution)))
        }
        ClustererSpec::LeidenMod => {
            if cli.resolution.is_some() {
                return Err(CliError::UnexpectedParameter {
                    clusterer: spec.as_str(),
                    parameter: "resolution",
                });
            }
            Ok(Box::new(LeidenClusterer::with_modularity(context)))
        }
        ClustererSpec::Ikc => {
            let k = cli.k.ok_or(CliError::MissingParameter {
                clusterer: spec.as_str(),
                parameter: "k",
            })?;
            Ok(Box::new(IkcClusterer::new(context, k)))
        }
        ClustererSpec::Mcl => Ok(Box::new(MclClusterer::new(context, cli.inflation))),
        ClustererSpec::Infomap => Ok(Box::new(InfomapClusterer::new(context))),
    }
}

fn default_working_dir(input: &Path) -> PathBuf {
    PathBuf::from(format!("{}_working_dir", input.display()))
}

fn tree_output_path(output: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tree.json", output.display()))
}

fn write_labels(path: &Path, labels: &BTreeMap<u32, ClusterIndex>) -> Result<(), CliError> {
    let io_err = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    for (node, index) in labels {
        writeln!(writer, "{node} {index}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

fn write_tree(path: &Path, tree: &HierarchyTree) -> Result<(), CliError> {
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &tree.to_data()).map_err(|source| {
        CliError::TreeSerialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "accepted clusters: {}", summary.clusters)?;
    writeln!(writer, "labelled nodes: {}", summary.labelled)?;
    writeln!(writer, "labels: {}", summary.output.display())?;
    writeln!(writer, "tree: {}", summary.tree_output.display())?;
    Ok(())
}
