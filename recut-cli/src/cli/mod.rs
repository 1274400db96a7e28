//! Command-line interface orchestration for the recut pipeline.
//!
//! The CLI mirrors the original connectivity-modifier flag set: an input
//! edgelist, an existing clustering, a clusterer selector with its
//! parameters, a threshold expression, and an output path for the labels
//! file (the hierarchy tree lands beside it with a `.tree.json` suffix).

mod commands;

pub use commands::{
    Cli, CliError, ClustererSpec, ExecutionSummary, render_summary, run_cli,
};
