//! Mesh I/O for ADCIRC fort.14 files.
//!
//! This module provides a trait-based reader for loading a [`Fort14Mesh`]
//! together with the lower-level pieces it is built from: the line scanner,
//! the boundary trailer parser and the ibtype-aware boundary view.
//!
//! [`Fort14Mesh`]: crate::topology::mesh::Fort14Mesh

pub mod boundary_chain;
pub mod fort14;
pub mod fort14_boundaries;
pub mod scanner;

use crate::mesh_error::MeshAuditError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub use fort14::{Fort14Document, Fort14ReadOptions, Fort14Reader, parse_fort14, parse_fort14_str};
pub use fort14_boundaries::{BoundaryMeta, Fort14Boundaries, Fort14DocumentReader, read_fort14_boundaries};

/// Trait for mesh readers.
pub trait MeshReader {
    /// Mesh record produced by the reader.
    type Mesh;

    /// Parse a mesh from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Self::Mesh, MeshAuditError>;

    /// Open `path` and parse it. The file handle is released before returning,
    /// on success and on error alike.
    fn read_path(&self, path: &Path) -> Result<Self::Mesh, MeshAuditError> {
        let file = File::open(path)
            .map_err(|e| MeshAuditError::Io(format!("{}: {e}", path.display())))?;
        self.read(BufReader::new(file))
    }
}
