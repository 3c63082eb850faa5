use crate::core::topology::{Topology, TopologyError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum TopologyParseError {
    #[error("no `<nodes> <edges>` header line found")]
    MissingHeader,
    #[error("header is missing the {0} count")]
    MissingField(&'static str),
    #[error("{field} count `{value}` is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A topology file found in the topology directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyFile {
    pub name: String,
    pub path: PathBuf,
}

/// Reads the `<nodes> <edges>` header that opens a topology file. Comment
/// lines start with `#`; the edge list after the header is not read.
pub fn parse_topology_header<R: BufRead>(reader: R) -> Result<Topology, TopologyParseError> {
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let node_count = parse_count(fields.next(), "node")?;
        let edge_count = parse_count(fields.next(), "edge")?;
        return Ok(Topology::new(node_count, edge_count)?);
    }

    Err(TopologyParseError::MissingHeader)
}

fn parse_count(field: Option<&str>, name: &'static str) -> Result<u32, TopologyParseError> {
    let value = field.ok_or(TopologyParseError::MissingField(name))?;
    value
        .parse::<u32>()
        .map_err(|_| TopologyParseError::InvalidNumber {
            field: name,
            value: value.to_string(),
        })
}

pub fn read_topology(path: &Path) -> Result<Topology, TopologyParseError> {
    let topology = parse_topology_header(BufReader::new(File::open(path)?))?;
    if topology.edge_count() as u64 > topology.max_edge_count() {
        warn!(
            path = %path.display(),
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "more edges than node pairs, density exceeds 1"
        );
    }
    Ok(topology)
}

/// Lists the regular files of `dir` ordered by file name. The order is part
/// of what makes a sweep reproducible.
///
/// Two files sharing a stem, like `ring.txt` and `ring.dat`, would write to
/// the same output directory and are rejected.
pub fn discover_topologies(dir: &Path) -> anyhow::Result<Vec<TopologyFile>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!(path = %path.display(), "skipping topology with a non UTF-8 name");
            continue;
        };
        files.push(TopologyFile {
            name: name.to_string(),
            path,
        });
    }
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    let mut names = HashMap::new();
    for file in &files {
        if let Some(previous) = names.insert(file.name.as_str(), &file.path) {
            anyhow::bail!(
                "topologies {} and {} share the name `{}`",
                previous.display(),
                file.path.display(),
                file.name
            );
        }
    }

    anyhow::Ok(files)
}
