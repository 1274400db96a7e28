//! Run-scoped configuration for external clusterer invocations.

use std::fs;
use std::path::{Path, PathBuf};

use recut_core::{ClusterIndex, ClustererError};

/// Working directory and external binary locations for one engine run.
///
/// A plain value owned by the clusterer wrappers — nothing process-wide.
/// The working directory is created on construction and collects every
/// per-cluster scratch file of the run: compact edgelists, raw clusterer
/// output, and captured stdout/stderr.
#[derive(Debug, Clone)]
pub struct RunContext {
    working_dir: PathBuf,
    leiden_bin: PathBuf,
    ikc_bin: PathBuf,
    mcl_bin: PathBuf,
    infomap_bin: PathBuf,
}

impl RunContext {
    /// Creates a context rooted at `working_dir`, creating the directory
    /// if needed. Binaries default to their plain names on `PATH`.
    ///
    /// # Errors
    /// Returns [`ClustererError::Io`] when the directory cannot be created.
    pub fn new(working_dir: impl Into<PathBuf>) -> Result<Self, ClustererError> {
        let working_dir = working_dir.into();
        fs::create_dir_all(&working_dir).map_err(|source| ClustererError::Io {
            path: working_dir.clone(),
            source,
        })?;
        Ok(Self {
            working_dir,
            leiden_bin: PathBuf::from("leiden"),
            ikc_bin: PathBuf::from("ikc"),
            mcl_bin: PathBuf::from("mcl"),
            infomap_bin: PathBuf::from("infomap"),
        })
    }

    /// Overrides the Leiden binary location.
    #[must_use]
    pub fn with_leiden_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.leiden_bin = path.into();
        self
    }

    /// Overrides the IKC binary location.
    #[must_use]
    pub fn with_ikc_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.ikc_bin = path.into();
        self
    }

    /// Overrides the MCL binary location.
    #[must_use]
    pub fn with_mcl_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.mcl_bin = path.into();
        self
    }

    /// Overrides the Infomap binary location.
    #[must_use]
    pub fn with_infomap_bin(mut self, path: impl Into<PathBuf>) -> Self {
        self.infomap_bin = path.into();
        self
    }

    /// Returns the working directory.
    #[must_use]
    #[rustfmt::skip]
    pub fn working_dir(&self) -> &Path { &self.working_dir }

    /// Returns the Leiden binary location.
    #[must_use]
    #[rustfmt::skip]
    pub fn leiden_bin(&self) -> &Path { &self.leiden_bin }

    /// Returns the IKC binary location.
    #[must_use]
    #[rustfmt::skip]
    pub fn ikc_bin(&self) -> &Path { &self.ikc_bin }

    /// Returns the MCL binary location.
    #[must_use]
    #[rustfmt::skip]
    pub fn mcl_bin(&self) -> &Path { &self.mcl_bin }

    /// Returns the Infomap binary location.
    #[must_use]
    #[rustfmt::skip]
    pub fn infomap_bin(&self) -> &Path { &self.infomap_bin }

    /// Scratch path for data related to one cluster, e.g.
    /// `cluster-5a.edgelist`.
    #[must_use]
    pub fn scratch_path(&self, index: &ClusterIndex, suffix: &str) -> PathBuf {
        self.working_dir.join(format!("cluster-{index}.{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_working_directory() {
        let dir = tempfile::tempdir().expect("temp dir must be creatable");
        let nested = dir.path().join("a/b");
        let context = RunContext::new(&nested).expect("context must build");
        assert!(nested.is_dir());
        assert_eq!(context.working_dir(), nested);
    }

    #[test]
    fn scratch_paths_embed_the_cluster_index() {
        let dir = tempfile::tempdir().expect("temp dir must be creatable");
        let context = RunContext::new(dir.path()).expect("context must build");
        let path = context.scratch_path(&ClusterIndex::new("5a"), "edgelist");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("cluster-5a.edgelist")
        );
    }

    #[test]
    fn binary_overrides_stick() {
        let dir = tempfile::tempdir().expect("temp dir must be creatable");
        let context = RunContext::new(dir.path())
            .expect("context must build")
            .with_leiden_bin("/opt/leiden")
            .with_ikc_bin("/opt/ikc");
        assert_eq!(context.leiden_bin(), Path::new("/opt/leiden"));
        assert_eq!(context.ikc_bin(), Path::new("/opt/ikc"));
        assert_eq!(context.mcl_bin(), Path::new("mcl"));
    }
}
