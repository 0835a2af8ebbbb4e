//! Mesh tables as read from a fort.14 file.
//!
//! [`Fort14Mesh`] holds the node and element tables plus the boundary chains
//! in node-id space. Boundary loops derived from the elements live in
//! [`algs::boundary`](crate::algs::boundary).

pub mod mesh;

pub use mesh::{BoundingBox, Element, Fort14Mesh, Node, NodeId, NodeIdSet};
