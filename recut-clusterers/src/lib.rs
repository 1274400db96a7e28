//! Subprocess-backed clusterers for the recut engine.
//!
//! Each wrapper implements the core [`Clusterer`] capability by writing
//! the view's compact-id edgelist to a scratch file, invoking the
//! external binary synchronously, and reading its clustering back,
//! remapped to original node ids. All scratch data, including captured
//! stdout/stderr, lands in the [`RunContext`] working directory for
//! post-mortem inspection.
//!
//! [`Clusterer`]: recut_core::Clusterer

mod context;
mod ikc;
mod infomap;
mod leiden;
mod mcl;
mod process;
mod scratch;

pub use crate::{
    context::RunContext,
    ikc::IkcClusterer,
    infomap::InfomapClusterer,
    leiden::{LeidenClusterer, Quality},
    mcl::MclClusterer,
};
