//! Error types for the recut core library.
//!
//! Defines the fatal error taxonomy exposed by the public API and a
//! convenient result alias. Module-local errors ([`MincutError`],
//! [`ThresholdParseError`]) fold into [`RecutError`] at the engine
//! boundary.
//!
//! [`MincutError`]: crate::mincut::MincutError
//! [`ThresholdParseError`]: crate::requirement::ThresholdParseError

use std::{fmt, io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::{mincut::MincutError, requirement::ThresholdParseError};

/// Stable codes describing [`ClustererError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ClustererErrorCode {
    /// A scratch or clustering file could not be read or written.
    Io,
    /// The external clusterer binary could not be started.
    Spawn,
    /// The external clusterer exited with a non-zero status.
    NonZeroExit,
    /// A clustering file did not match the expected format.
    MalformedClustering,
}

impl ClustererErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "CLUSTERER_IO",
            Self::Spawn => "CLUSTERER_SPAWN",
            Self::NonZeroExit => "CLUSTERER_NON_ZERO_EXIT",
            Self::MalformedClustering => "CLUSTERER_MALFORMED_CLUSTERING",
        }
    }
}

impl fmt::Display for ClustererErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced by [`Clusterer`] operations.
///
/// External clusterers run as synchronous subprocesses; any failure in
/// that exchange is fatal for the current run and never retried.
///
/// [`Clusterer`]: crate::clusterer::Clusterer
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClustererError {
    /// A scratch or clustering file could not be read or written.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The external clusterer binary could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// The program that could not be started.
        program: String,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The external clusterer exited with a non-zero status.
    #[error("`{program}` exited with {status}")]
    NonZeroExit {
        /// The program that failed.
        program: String,
        /// The reported exit status.
        status: ExitStatus,
    },
    /// A clustering file did not match the expected format.
    #[error("malformed clustering in `{path}` at line {line}: {detail}")]
    MalformedClustering {
        /// The clustering file being parsed.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with the record.
        detail: String,
    },
}

impl ClustererError {
    /// Retrieve the stable [`ClustererErrorCode`] for this error.
    pub const fn code(&self) -> ClustererErrorCode {
        match self {
            Self::Io { .. } => ClustererErrorCode::Io,
            Self::Spawn { .. } => ClustererErrorCode::Spawn,
            Self::NonZeroExit { .. } => ClustererErrorCode::NonZeroExit,
            Self::MalformedClustering { .. } => ClustererErrorCode::MalformedClustering,
        }
    }
}

/// Stable codes describing [`RecutError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum RecutErrorCode {
    /// The input graph could not be read.
    InputGraph,
    /// The input graph contained a malformed edge record.
    MalformedEdge,
    /// The threshold expression could not be parsed.
    Threshold,
    /// An external clusterer failed.
    Clusterer,
    /// The mincut routine rejected its input.
    Mincut,
    /// An internal invariant was violated, indicating a bug.
    InvariantViolation,
}

impl RecutErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputGraph => "RECUT_INPUT_GRAPH",
            Self::MalformedEdge => "RECUT_MALFORMED_EDGE",
            Self::Threshold => "RECUT_THRESHOLD",
            Self::Clusterer => "RECUT_CLUSTERER",
            Self::Mincut => "RECUT_MINCUT",
            Self::InvariantViolation => "RECUT_INVARIANT_VIOLATION",
        }
    }
}

impl fmt::Display for RecutErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced while loading inputs or running the engine.
///
/// Any error inside a cluster job aborts the whole run; there is no
/// per-job recovery.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RecutError {
    /// The input graph could not be read.
    #[error("failed to read input graph `{path}`: {source}")]
    InputGraph {
        /// Path of the edgelist file.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input graph contained a malformed edge record.
    #[error("malformed edge in `{path}` at line {line}: {detail}")]
    MalformedEdge {
        /// Path of the edgelist file.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with the record.
        detail: String,
    },
    /// The threshold expression could not be parsed.
    #[error(transparent)]
    Threshold(#[from] ThresholdParseError),
    /// An external clusterer failed while the engine was running.
    #[error("clusterer failed: {source}")]
    Clusterer {
        /// The underlying clusterer failure.
        #[source]
        source: ClustererError,
    },
    /// The mincut routine rejected its input. The engine never submits
    /// trivial views, so this indicates a bug.
    #[error("mincut failed: {source}")]
    Mincut {
        /// The underlying mincut failure.
        #[from]
        source: MincutError,
    },
    /// An internal invariant was violated, indicating a bug.
    #[error("invariant violated: {detail}")]
    Invariant {
        /// Description of the violated invariant.
        detail: String,
    },
}

impl RecutError {
    /// Retrieve the stable [`RecutErrorCode`] for this error.
    pub const fn code(&self) -> RecutErrorCode {
        match self {
            Self::InputGraph { .. } => RecutErrorCode::InputGraph,
            Self::MalformedEdge { .. } => RecutErrorCode::MalformedEdge,
            Self::Threshold(_) => RecutErrorCode::Threshold,
            Self::Clusterer { .. } => RecutErrorCode::Clusterer,
            Self::Mincut { .. } => RecutErrorCode::Mincut,
            Self::Invariant { .. } => RecutErrorCode::InvariantViolation,
        }
    }

    /// Retrieve the inner [`ClustererErrorCode`] when the error originated
    /// in a clusterer.
    pub const fn clusterer_code(&self) -> Option<ClustererErrorCode> {
        match self {
            Self::Clusterer { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RecutError>;
