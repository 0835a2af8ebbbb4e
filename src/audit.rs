//! One-call mesh audit.
//!
//! [`audit_mesh`] combines the parsed tables, the boundary view and the
//! reconstructed topology into a single serializable [`MeshAudit`]: extent,
//! hull and holes, coastline versus other land segments, how closely the
//! declared open boundary follows the hull, and element quality counts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algs::boundary::{LoopClassification, classify_outer_vs_holes, compute_boundary_loops};
use crate::algs::distance::{filter_rings_near_paths, hausdorff_distance, signed_distance_to_ring};
use crate::algs::segments::{LandClassification, classify_land_segments, segment_paths};
use crate::config::AuditConfig;
use crate::geometry::quality::mesh_quality;
use crate::io::MeshReader;
use crate::io::fort14::Fort14Reader;
use crate::io::fort14_boundaries::{BoundaryMeta, Fort14Boundaries, Fort14DocumentReader};
use crate::mesh_error::MeshAuditError;
use crate::topology::mesh::{BoundingBox, Fort14Mesh};

/// Condensed element quality figures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub inverted: usize,
    pub degenerate: usize,
    pub unresolvable: usize,
    pub worst_min_angle_deg: Option<f64>,
    /// Element ids below the configured minimum angle.
    pub small_angle_elements: Vec<i64>,
}

/// Result of [`audit_mesh`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshAudit {
    pub title: String,
    pub meta: BoundaryMeta,
    pub bbox: Option<BoundingBox>,
    pub depth_range: Option<(f64, f64)>,
    pub dangling_references: usize,
    pub loops: LoopClassification,
    pub land: LandClassification,
    /// Hausdorff distance between the open boundary polylines and the outer
    /// hull. `None` when either is missing.
    pub open_hull_distance: Option<f64>,
    /// Most inward signed offset of an open-boundary vertex from the hull.
    pub open_hull_offset: Option<f64>,
    /// Coastline polylines after dropping rings that trace an open boundary.
    pub coast_rings: Vec<Vec<[f64; 2]>>,
    pub quality: QualitySummary,
}

/// Audits a parsed mesh against its boundary view.
pub fn audit_mesh(
    mesh: &Fort14Mesh,
    boundaries: &Fort14Boundaries,
    config: &AuditConfig,
) -> MeshAudit {
    let coords = mesh.node_xy();
    let loops = compute_boundary_loops(mesh.elements());
    let loops = classify_outer_vs_holes(&loops, &coords);

    let hull: Vec<[f64; 2]> = loops
        .outer
        .iter()
        .flat_map(|l| &l.nodes)
        .filter_map(|id| coords.get(id).copied())
        .collect();
    let open_paths = segment_paths(&boundaries.nodes_xy, &boundaries.open_index_lists());
    let (open_hull_distance, open_hull_offset) = if hull.len() >= 2 && !open_paths.is_empty() {
        (
            Some(hausdorff_distance(&open_paths, std::slice::from_ref(&hull))),
            Some(signed_distance_to_ring(&open_paths, &hull)),
        )
    } else {
        (None, None)
    };

    let land = classify_land_segments(&boundaries.land_segments, &config.coast_ibtypes);
    let mut coast_rings = segment_paths(&boundaries.nodes_xy, &land.coast);
    let tol = config.coast_near_open_tolerance;
    if tol > 0.0 && !open_paths.is_empty() {
        let before = coast_rings.len();
        coast_rings = filter_rings_near_paths(&coast_rings, &open_paths, tol);
        log::debug!(
            "dropped {} coast rings within {tol} of open boundaries",
            before - coast_rings.len()
        );
    }

    let report = mesh_quality(mesh);
    let quality = QualitySummary {
        inverted: report.inverted,
        degenerate: report.degenerate,
        unresolvable: report.unresolvable,
        worst_min_angle_deg: report.worst_min_angle(),
        small_angle_elements: report.below_min_angle(config.min_angle_warning_deg),
    };

    MeshAudit {
        title: mesh.title().to_owned(),
        meta: boundaries.meta,
        bbox: mesh.bbox(),
        depth_range: mesh.depth_range(),
        dangling_references: mesh.dangling_reference_count(),
        loops,
        land,
        open_hull_distance,
        open_hull_offset,
        coast_rings,
        quality,
    }
}

/// Reads `path` once and audits it.
pub fn audit_fort14(path: impl AsRef<Path>, config: &AuditConfig) -> Result<MeshAudit, MeshAuditError> {
    let reader = Fort14DocumentReader {
        options: config.read,
    };
    let doc = reader.read_path(path.as_ref())?;
    let boundaries = Fort14Boundaries::from_document(&doc);
    Ok(audit_mesh(&doc.mesh, &boundaries, config))
}

/// Audits in-memory fort.14 text.
pub fn audit_fort14_str(text: &str, config: &AuditConfig) -> Result<MeshAudit, MeshAuditError> {
    let doc = Fort14Reader.parse_document(text, config.read)?;
    let boundaries = Fort14Boundaries::from_document(&doc);
    Ok(audit_mesh(&doc.mesh, &boundaries, config))
}
