//! Index-space helpers over boundary segments and the element table.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::io::fort14_boundaries::IndexSegment;
use crate::topology::mesh::Fort14Mesh;

/// Land segments split by ibtype.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandClassification {
    pub coast: Vec<Vec<usize>>,
    pub other: Vec<Vec<usize>>,
}

/// Splits land segments into coastline (`ibtype` in `coast_ibtypes`) and the
/// rest. A segment without an ibtype is treated as coastline so islands from
/// terse files are not lost.
pub fn classify_land_segments(
    segments: &[IndexSegment],
    coast_ibtypes: &[i64],
) -> LandClassification {
    let (coast, other): (Vec<_>, Vec<_>) = segments.iter().partition(|seg| match seg.ibtype {
        None => true,
        Some(ib) => coast_ibtypes.contains(&ib),
    });
    LandClassification {
        coast: coast.into_iter().map(|s| s.nodes.clone()).collect(),
        other: other.into_iter().map(|s| s.nodes.clone()).collect(),
    }
}

/// Consecutive index pairs of every segment, `len - 1` per segment.
pub fn segment_edges(segments: &[Vec<usize>]) -> Vec<(usize, usize)> {
    segments
        .iter()
        .flat_map(|seg| seg.iter().copied().tuple_windows())
        .collect()
}

/// Coordinate polylines for `segments`.
///
/// Indices outside `nodes_xy` are dropped; polylines left with fewer than two
/// points are skipped.
pub fn segment_paths(nodes_xy: &[[f64; 2]], segments: &[Vec<usize>]) -> Vec<Vec<[f64; 2]>> {
    segments
        .iter()
        .map(|seg| {
            seg.iter()
                .filter_map(|&i| nodes_xy.get(i).copied())
                .collect::<Vec<_>>()
        })
        .filter(|path| path.len() >= 2)
        .collect()
}

/// Deduplicated triangle edges as sorted index pairs (smaller index first).
///
/// Edges touching a node id that is not in the node table are skipped.
pub fn unique_mesh_edges(mesh: &Fort14Mesh) -> Vec<(usize, usize)> {
    let index = mesh.node_index();
    let mut edges: Vec<(usize, usize)> = mesh
        .elements()
        .iter()
        .flat_map(|e| e.edges())
        .filter_map(|(a, b)| {
            let (ia, ib) = (*index.get(&a)?, *index.get(&b)?);
            Some((ia.min(ib), ia.max(ib)))
        })
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}
