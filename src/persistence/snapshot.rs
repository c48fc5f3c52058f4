//! Graph snapshots (checkpoint/restart)
//!
//! Layout, all bincode-encoded (little-endian, `u64` lengths):
//!
//! ```text
//! header  { magic: b"SRG\0", version: u32, compressed: bool }
//! body    size: u64
//!         size x row { count: u64, count x column: u64 }
//! ```
//!
//! When `compressed` is set the body is a gzip stream. Columns inside a row
//! are written in set iteration order, not sorted.

use super::{PersistenceError, PersistenceResult};
use crate::config::{GraphConfig, SnapshotConfig};
use crate::graph::{IndexType, RowSet, SparseRowGraph};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Leading bytes of every snapshot
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SRG\0";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 4],
    version: u32,
    compressed: bool,
}

impl SnapshotHeader {
    fn new(compressed: bool) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            compressed,
        }
    }

    fn verify(&self) -> PersistenceResult<()> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(PersistenceError::InvalidMagic(self.magic));
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl SparseRowGraph {
    /// Write the graph using the snapshot options of its own config
    pub fn save<W: Write>(&self, writer: W) -> PersistenceResult<()> {
        self.save_with(writer, &self.config().snapshot)
    }

    pub fn save_with<W: Write>(&self, mut writer: W, options: &SnapshotConfig) -> PersistenceResult<()> {
        bincode::serialize_into(&mut writer, &SnapshotHeader::new(options.compress))?;

        if options.compress {
            let encoder = GzEncoder::new(writer, Compression::default());
            let mut writer = write_body(self, encoder)?.finish()?;
            writer.flush()?;
        } else {
            write_body(self, writer)?.flush()?;
        }
        Ok(())
    }

    /// Read a graph written by [`save`](Self::save) with the default config
    pub fn load<R: Read>(reader: R) -> PersistenceResult<Self> {
        Self::load_with_config(reader, GraphConfig::default())
    }

    pub fn load_with_config<R: Read>(reader: R, config: GraphConfig) -> PersistenceResult<Self> {
        read_snapshot(reader, None, config)
    }

    /// Insert the entries of a snapshot into this graph.
    ///
    /// The stored size must equal `self.size()`. On any error the graph is
    /// left untouched.
    pub fn load_into<R: Read>(&mut self, reader: R) -> PersistenceResult<()> {
        let loaded = read_snapshot(reader, Some(self.size()), *self.config())?;
        self.add_graph(&loaded);
        Ok(())
    }

    /// Save to a file, creating parent directories as needed
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        self.save(BufWriter::new(file))?;
        info!(
            "Saved graph snapshot to {:?} ({} rows, {} non-zeros)",
            path,
            self.size(),
            self.nnz()
        );
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>, config: GraphConfig) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let graph = Self::load_with_config(BufReader::new(file), config)?;
        info!(
            "Loaded graph snapshot from {:?} ({} rows, {} non-zeros)",
            path,
            graph.size(),
            graph.nnz()
        );
        Ok(graph)
    }
}

fn write_body<W: Write>(graph: &SparseRowGraph, mut writer: W) -> PersistenceResult<W> {
    bincode::serialize_into(&mut writer, &(graph.size() as u64))?;
    for (_, cols) in graph {
        bincode::serialize_into(&mut writer, cols)?;
    }
    Ok(writer)
}

fn read_snapshot<R: Read>(
    mut reader: R,
    expected_size: Option<IndexType>,
    config: GraphConfig,
) -> PersistenceResult<SparseRowGraph> {
    let header: SnapshotHeader = bincode::deserialize_from(&mut reader)?;
    header.verify()?;
    debug!("Reading snapshot v{} (compressed: {})", header.version, header.compressed);

    if header.compressed {
        read_body(GzDecoder::new(reader), expected_size, config)
    } else {
        read_body(reader, expected_size, config)
    }
}

fn read_body<R: Read>(
    mut reader: R,
    expected_size: Option<IndexType>,
    config: GraphConfig,
) -> PersistenceResult<SparseRowGraph> {
    let stored: u64 = bincode::deserialize_from(&mut reader)?;
    let size = IndexType::try_from(stored)
        .map_err(|_| PersistenceError::Corrupted(format!("graph size {} does not fit", stored)))?;

    if let Some(expected) = expected_size {
        if expected != size {
            return Err(PersistenceError::SizeMismatch {
                expected,
                found: size,
            });
        }
    }

    // The stored size is untrusted: rows are allocated only as they are read
    let mut rows: Vec<RowSet> = Vec::new();
    for _ in 0..size {
        let cols: Vec<IndexType> = bincode::deserialize_from(&mut reader)?;
        let mut row = RowSet::with_capacity_and_hasher(
            config.row_capacity.max(cols.len()),
            Default::default(),
        );
        row.extend(cols);
        rows.push(row);
    }
    Ok(SparseRowGraph::from_rows(rows, config))
}
