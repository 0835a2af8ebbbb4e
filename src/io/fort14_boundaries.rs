//! Index-space view of the fort.14 boundary trailer.
//!
//! [`Fort14Boundaries`] is what renderers and auditors consume: node
//! coordinates in file order, boundary segments as 0-based positions into
//! that table, the `ibtype` of each segment when the layout carries one, and
//! the ADCIRC header counts.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::io::boundary_chain::{BoundaryGroup, BoundarySegment, GroupLayout};
use crate::io::fort14::{Fort14Document, Fort14ReadOptions, Fort14Reader};
use crate::io::MeshReader;
use crate::mesh_error::MeshAuditError;
use crate::topology::mesh::NodeId;

/// A boundary segment in index space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSegment {
    pub ibtype: Option<i64>,
    /// 0-based positions into [`Fort14Boundaries::nodes_xy`].
    pub nodes: Vec<usize>,
}

/// ADCIRC boundary header counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMeta {
    /// Number of open boundary segments.
    pub nope: usize,
    /// Total open boundary nodes.
    pub nbou: usize,
    /// Number of land boundary segments.
    pub nbob: usize,
    /// Total land boundary nodes.
    pub nbobn: usize,
    pub nnodes: usize,
    pub nelems: usize,
}

/// Boundary segments with ibtype codes, resolved against the node table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fort14Boundaries {
    pub nodes_xy: Vec<[f64; 2]>,
    pub open_segments: Vec<IndexSegment>,
    pub land_segments: Vec<IndexSegment>,
    pub meta: BoundaryMeta,
}

impl Fort14Boundaries {
    /// Builds the index-space view from a parsed document.
    ///
    /// Segments referencing a node id that is not in the node table are
    /// dropped; empty segments are kept.
    pub fn from_document(doc: &Fort14Document) -> Self {
        let mesh = &doc.mesh;
        let index = mesh.node_index();

        let resolve = |group: Option<&BoundaryGroup>, label: &str| -> Vec<IndexSegment> {
            group
                .map(|g| &g.segments[..])
                .unwrap_or_default()
                .iter()
                .enumerate()
                .filter_map(|(i, seg)| {
                    let resolved = to_indices(seg, &index);
                    if resolved.is_none() {
                        log::warn!("{label} segment {i} references unknown node ids; dropped");
                    }
                    resolved
                })
                .collect()
        };

        let open_segments = resolve(doc.open_group.as_ref(), "open");
        let land_segments = resolve(doc.land_group.as_ref(), "land");

        let (nope, nbou) = group_counts(doc.open_group.as_ref());
        let (nbob, nbobn) = group_counts(doc.land_group.as_ref());

        Self {
            nodes_xy: mesh.nodes_xy(),
            open_segments,
            land_segments,
            meta: BoundaryMeta {
                nope,
                nbou,
                nbob,
                nbobn,
                nnodes: mesh.node_count(),
                nelems: mesh.element_count(),
            },
        }
    }

    /// Open segments without ibtype information.
    pub fn open_index_lists(&self) -> Vec<Vec<usize>> {
        self.open_segments.iter().map(|s| s.nodes.clone()).collect()
    }

    /// Land segments without ibtype information.
    pub fn land_index_lists(&self) -> Vec<Vec<usize>> {
        self.land_segments.iter().map(|s| s.nodes.clone()).collect()
    }
}

fn to_indices(seg: &BoundarySegment, index: &HashMap<NodeId, usize>) -> Option<IndexSegment> {
    let nodes = seg
        .nodes
        .iter()
        .map(|id| index.get(id).copied())
        .collect::<Option<Vec<_>>>()?;
    Some(IndexSegment {
        ibtype: seg.ibtype,
        nodes,
    })
}

/// Declared counts for the ADCIRC layout, observed counts otherwise.
fn group_counts(group: Option<&BoundaryGroup>) -> (usize, usize) {
    match group {
        Some(g) if g.layout == GroupLayout::Adcirc => (
            g.declared,
            g.total.and_then(|t| usize::try_from(t).ok()).unwrap_or_default(),
        ),
        Some(g) => (g.segments.len(), g.node_total()),
        None => (0, 0),
    }
}

/// Reads the file at `path` and returns its boundary view.
pub fn read_fort14_boundaries(path: impl AsRef<Path>) -> Result<Fort14Boundaries, MeshAuditError> {
    let doc = Fort14DocumentReader::default().read_path(path.as_ref())?;
    Ok(Fort14Boundaries::from_document(&doc))
}

/// Boundary view of in-memory fort.14 text.
pub fn fort14_boundaries_from_str(text: &str) -> Result<Fort14Boundaries, MeshAuditError> {
    let doc = Fort14Reader.parse_document(text, Fort14ReadOptions::default())?;
    Ok(Fort14Boundaries::from_document(&doc))
}

/// [`MeshReader`] yielding the whole [`Fort14Document`].
#[derive(Debug, Default, Clone)]
pub struct Fort14DocumentReader {
    pub options: Fort14ReadOptions,
}

impl MeshReader for Fort14DocumentReader {
    type Mesh = Fort14Document;

    fn read<R: std::io::Read>(&self, reader: R) -> Result<Fort14Document, MeshAuditError> {
        Fort14Reader.read_document(reader, self.options)
    }
}

/// Checks that every segment has at least two entries and only indices below
/// `node_count`. Fails on the first offending segment.
pub fn validate_segments(node_count: usize, segments: &[Vec<usize>]) -> Result<(), MeshAuditError> {
    for (index, seg) in segments.iter().enumerate() {
        if seg.len() < 2 {
            return Err(MeshAuditError::InvalidSegment {
                index,
                reason: format!("too short: len={}; head={:?}", seg.len(), head(seg)),
            });
        }
        let (lo, hi) = seg
            .iter()
            .fold((usize::MAX, 0), |(lo, hi), &i| (lo.min(i), hi.max(i)));
        if hi >= node_count {
            return Err(MeshAuditError::InvalidSegment {
                index,
                reason: format!(
                    "index out of range: min={lo}, max={hi}, node count={node_count}; head={:?}",
                    head(seg)
                ),
            });
        }
    }
    Ok(())
}

fn head(seg: &[usize]) -> &[usize] {
    &seg[..seg.len().min(5)]
}
