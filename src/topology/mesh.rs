//! The parsed fort.14 mesh record.
//!
//! A [`Fort14Mesh`] is built once per parse call and never mutated afterwards;
//! outside the crate its fields are only reachable through read-only accessors. Node and element
//! order is file order, which is also the order used for id→index maps.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

/// Node identifier as written in the file. Boundary chains may reference ids
/// that are zero, negative or absent from the node table.
pub type NodeId = i64;

/// Set of known node ids, used for membership tests only.
pub type NodeIdSet = HashSet<NodeId>;

/// One row of the node table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// One row of the element table.
///
/// Only triangles are modeled. `n4` is 0 when the line had no sixth field; a
/// non-zero value is kept but ignored by topology code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub id: i64,
    pub n1: NodeId,
    pub n2: NodeId,
    pub n3: NodeId,
    pub n4: NodeId,
}

impl Element {
    pub fn triangle(&self) -> [NodeId; 3] {
        [self.n1, self.n2, self.n3]
    }

    /// The three undirected edges, each with the smaller id first.
    pub fn edges(&self) -> [(NodeId, NodeId); 3] {
        let [a, b, c] = self.triangle();
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

#[inline]
pub(crate) fn ordered(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Axis-aligned extent of the node coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// `(min_x, min_y, max_x, max_y)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Immutable result of parsing one fort.14 file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fort14Mesh {
    pub(crate) title: String,
    pub(crate) node_count: usize,
    pub(crate) element_count: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) elements: Vec<Element>,
    pub(crate) open_boundaries: Vec<Vec<NodeId>>,
    pub(crate) land_boundaries: Vec<Vec<NodeId>>,
}

impl Fort14Mesh {
    /// Assemble a mesh from already-parsed parts.
    ///
    /// The declared counts are taken from the table lengths.
    pub fn new(
        title: impl Into<String>,
        nodes: Vec<Node>,
        elements: Vec<Element>,
        open_boundaries: Vec<Vec<NodeId>>,
        land_boundaries: Vec<Vec<NodeId>>,
    ) -> Self {
        Self {
            title: title.into(),
            node_count: nodes.len(),
            element_count: elements.len(),
            nodes,
            elements,
            open_boundaries,
            land_boundaries,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Node count declared in the header.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Element count declared in the header.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Open boundary chains in file order.
    pub fn open_boundaries(&self) -> &[Vec<NodeId>] {
        &self.open_boundaries
    }

    /// Land boundary chains in file order.
    pub fn land_boundaries(&self) -> &[Vec<NodeId>] {
        &self.land_boundaries
    }

    /// Bounding box of all node coordinates, `None` for an empty node table.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let first = self.nodes.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.nodes.iter().fold(init, |b, n| BoundingBox {
            min_x: b.min_x.min(n.x),
            min_y: b.min_y.min(n.y),
            max_x: b.max_x.max(n.x),
            max_y: b.max_y.max(n.y),
        }))
    }

    /// `(shallowest, deepest)` depth values, `None` for an empty node table.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        let first = self.nodes.first()?.depth;
        Some(
            self.nodes
                .iter()
                .fold((first, first), |(lo, hi), n| (lo.min(n.depth), hi.max(n.depth))),
        )
    }

    pub fn node_ids(&self) -> NodeIdSet {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Node id → position in [`nodes`](Self::nodes). Later duplicates win.
    pub fn node_index(&self) -> HashMap<NodeId, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect()
    }

    /// Node id → `[x, y]`.
    pub fn node_xy(&self) -> HashMap<NodeId, [f64; 2]> {
        self.nodes.iter().map(|n| (n.id, [n.x, n.y])).collect()
    }

    /// `[x, y]` for every node, in file order.
    pub fn nodes_xy(&self) -> Vec<[f64; 2]> {
        self.nodes.iter().map(|n| [n.x, n.y]).collect()
    }

    /// Number of element and boundary references to ids missing from the node table.
    pub fn dangling_reference_count(&self) -> usize {
        let known = self.node_ids();
        let in_elements = self
            .elements
            .iter()
            .flat_map(|e| e.triangle())
            .filter(|id| !known.contains(id))
            .count();
        let in_boundaries = self
            .open_boundaries
            .iter()
            .chain(&self.land_boundaries)
            .flatten()
            .filter(|id| !known.contains(*id))
            .count();
        in_elements + in_boundaries
    }
}
