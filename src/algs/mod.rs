//! Topology and boundary algorithms over parsed meshes.

pub mod boundary;
pub mod distance;
pub mod segments;

pub use boundary::{classify_outer_vs_holes, compute_boundary_loops};
pub use segments::{classify_land_segments, unique_mesh_edges};
