//! # adcirc-mesh-audit
//!
//! adcirc-mesh-audit reads ADCIRC `fort.14` mesh files, including the many
//! hand-edited variants found in practice, and reconstructs the boundary
//! topology implied by the element table so the declared boundaries can be
//! checked against it.
//!
//! ## Features
//! - Tolerant fort.14 reader: strict ADCIRC boundary layout first, with a
//!   scored fallback for terse or nonstandard boundary sections
//! - ibtype-aware boundary view in node-index space with header counts
//! - Deterministic boundary loop walking and outer/hole classification
//! - Distance checks between open boundaries, coastline and the mesh hull
//! - Triangle quality metrics and a serializable one-call audit report
//!
//! ## Usage
//! ```no_run
//! use adcirc_mesh_audit::prelude::*;
//!
//! let mesh = parse_fort14("fort.14")?;
//! let loops = compute_boundary_loops(mesh.elements());
//! let split = classify_outer_vs_holes(&loops, &mesh.node_xy());
//! println!("{} holes", split.holes.len());
//!
//! let audit = audit_fort14("fort.14", &AuditConfig::default())?;
//! println!("{:?}", audit.quality);
//! # Ok::<(), adcirc_mesh_audit::mesh_error::MeshAuditError>(())
//! ```
//!
//! ## Logging
//! The crate logs through the `log` facade and never installs a logger.
//! Degraded reads (unreadable boundary headers, dangling node references,
//! dropped segments, loop fallback) are reported at `warn` level.

pub mod algs;
pub mod audit;
pub mod config;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used functions & types:
pub mod prelude {
    pub use crate::algs::boundary::{
        BoundaryLoop, LoopClassification, LoopKind, boundary_edges, build_edge_multiplicity,
        classify_outer_vs_holes, compute_boundary_loops, walk_closed_loops,
    };
    pub use crate::audit::{MeshAudit, audit_fort14, audit_fort14_str, audit_mesh};
    pub use crate::config::AuditConfig;
    pub use crate::io::fort14_boundaries::{IndexSegment, validate_segments};
    pub use crate::io::{
        BoundaryMeta, Fort14Boundaries, Fort14ReadOptions, Fort14Reader, MeshReader,
        parse_fort14, parse_fort14_str, read_fort14_boundaries,
    };
    pub use crate::mesh_error::{MeshAuditError, ParseStage};
    pub use crate::topology::mesh::{BoundingBox, Element, Fort14Mesh, Node, NodeId};
}
