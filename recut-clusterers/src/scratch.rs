//! Scratch-file formats shared by the clusterer wrappers.
//!
//! Clusterers exchange data with their binaries through files: the view
//! goes out as a compact-id edgelist and the clustering comes back as a
//! line-oriented membership file. Membership is grouped into a `BTreeMap`
//! so cluster enumeration order is deterministic regardless of file
//! order.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use recut_core::{ClusterIndex, ClusterView, ClustererError, IntangibleCluster};

/// One parsed membership line: `Ok(None)` skips the line, `Ok(Some(_))`
/// yields a `(node, cluster)` record, `Err` carries the malformation
/// detail.
pub(crate) type ParsedLine = Result<Option<(u32, String)>, String>;

/// Writes every induced edge of `view` as `u\tv` over compact ids.
pub(crate) fn write_compact_edgelist(
    view: &ClusterView,
    path: &Path,
) -> Result<(), ClustererError> {
    let io_err = |source| ClustererError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    for (u, v) in view.compact_edges() {
        writeln!(writer, "{u}\t{v}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Reads a line-oriented membership file, grouping nodes by cluster id.
pub(crate) fn read_membership(
    path: &Path,
    parse: impl Fn(&str) -> ParsedLine,
) -> Result<BTreeMap<String, Vec<u32>>, ClustererError> {
    let file = File::open(path).map_err(|source| ClustererError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut clusters: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ClustererError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match parse(line.trim()) {
            Ok(None) => {}
            Ok(Some((node, cluster))) => clusters.entry(cluster).or_default().push(node),
            Err(detail) => {
                return Err(ClustererError::MalformedClustering {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    detail,
                });
            }
        }
    }
    Ok(clusters)
}

/// Loads an existing clustering over original node ids, dropping
/// clusters of size one or less.
pub(crate) fn load_existing(
    path: &Path,
    parse: impl Fn(&str) -> ParsedLine,
) -> Result<Vec<IntangibleCluster>, ClustererError> {
    Ok(read_membership(path, parse)?
        .into_iter()
        .map(|(cluster, members)| IntangibleCluster::new(ClusterIndex::new(cluster), members))
        .filter(|cluster| cluster.n() > 1)
        .collect())
}

/// Turns a compact-id membership grouping back into subclusters of
/// `view`, deriving each child index from the view's.
pub(crate) fn remap_to_subclusters(
    view: &ClusterView,
    groups: BTreeMap<String, Vec<u32>>,
    path: &Path,
) -> Result<Vec<IntangibleCluster>, ClustererError> {
    let ids = view.compact_ids();
    let mut clusters = Vec::with_capacity(groups.len());
    for (local, members) in groups {
        let mut original = Vec::with_capacity(members.len());
        for compact in members {
            let Some(node) = ids.original(compact as usize) else {
                return Err(ClustererError::MalformedClustering {
                    path: path.to_path_buf(),
                    line: 0,
                    detail: format!(
                        "compact id {compact} is outside the view's range of {}",
                        ids.len()
                    ),
                });
            };
            original.push(node);
        }
        clusters.push(IntangibleCluster::new(
            view.index().subcluster(&local),
            original,
        ));
    }
    Ok(clusters)
}

/// Parses `node<ws>cluster` membership lines (Leiden and MCL existing
/// clusterings, and Leiden's own output).
pub(crate) fn parse_node_cluster(record: &str) -> ParsedLine {
    if record.is_empty() {
        return Ok(None);
    }
    let mut fields = record.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(node), Some(cluster), None) => node
            .parse()
            .map(|node| Some((node, cluster.to_owned())))
            .map_err(|_| "node id must be a non-negative integer".to_owned()),
        _ => Err("expected `node cluster`".to_owned()),
    }
}
