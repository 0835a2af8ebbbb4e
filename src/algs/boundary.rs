//! Boundary loop reconstruction from triangle connectivity.
//!
//! An undirected edge used by exactly one triangle lies on the mesh exterior
//! or on the rim of a hole. These helpers count edge multiplicities, walk the
//! multiplicity-1 edges into closed loops and split the loops into the outer
//! hull (largest absolute area) and holes.
//!
//! All tie-breaks go through the smallest node id, so the same element table
//! always yields the same loops, in the same order, with the same start node
//! and direction.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::topology::mesh::{Element, NodeId, ordered};

/// Undirected edge, smaller id first.
pub type Edge = (NodeId, NodeId);

/// Role of a closed boundary loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopKind {
    Outer,
    Hole,
}

/// A closed loop of node ids (first == last).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLoop {
    pub nodes: Vec<NodeId>,
    pub kind: LoopKind,
    /// Signed shoelace area; positive for counter-clockwise loops.
    pub signed_area: f64,
}

/// Loops split into the outer hull and holes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopClassification {
    pub outer: Option<BoundaryLoop>,
    pub holes: Vec<BoundaryLoop>,
}

impl LoopClassification {
    pub fn is_empty(&self) -> bool {
        self.outer.is_none() && self.holes.is_empty()
    }

    pub fn len(&self) -> usize {
        usize::from(self.outer.is_some()) + self.holes.len()
    }
}

/// Counts how many triangles use each undirected edge.
///
/// The fourth node id of an element is ignored.
pub fn build_edge_multiplicity(elements: &[Element]) -> HashMap<Edge, usize> {
    let mut counts: HashMap<Edge, usize> = HashMap::with_capacity(elements.len() * 2);
    for element in elements {
        for edge in element.edges() {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Edges with multiplicity exactly 1, sorted.
pub fn boundary_edges(counts: &HashMap<Edge, usize>) -> Vec<Edge> {
    let mut edges: Vec<Edge> = counts
        .iter()
        .filter(|&(_, &count)| count == 1)
        .map(|(&edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}

/// Walks boundary edges into closed loops.
///
/// Start nodes are taken in ascending id order; a node is revisited as a start
/// until all of its incident edges are used. Each step takes the smallest-id
/// neighbor whose edge is unused and which is not the node just left. A walk
/// that cannot get back to its start is discarded, as is any loop with fewer
/// than three distinct nodes.
pub fn walk_closed_loops(edges: &[Edge]) -> Vec<Vec<NodeId>> {
    let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
    for &(a, b) in edges {
        if a == b {
            continue;
        }
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }

    let mut used: HashSet<Edge> = HashSet::with_capacity(edges.len());
    let next_unused = |from: NodeId, skip: Option<NodeId>, used: &HashSet<Edge>| {
        adjacency[&from]
            .iter()
            .copied()
            .find(|&v| Some(v) != skip && !used.contains(&ordered(from, v)))
    };

    let mut loops = Vec::new();
    for &start in adjacency.keys() {
        while let Some(first) = next_unused(start, None, &used) {
            used.insert(ordered(start, first));
            let mut path = vec![start, first];
            let (mut prev, mut cur) = (start, first);
            let closed = loop {
                if cur == start {
                    break true;
                }
                let Some(next) = next_unused(cur, Some(prev), &used) else {
                    break false;
                };
                used.insert(ordered(cur, next));
                path.push(next);
                (prev, cur) = (cur, next);
            };
            if !closed {
                log::trace!("open boundary chain from node {start} discarded");
                continue;
            }
            let distinct: HashSet<NodeId> = path.iter().copied().collect();
            if distinct.len() >= 3 {
                loops.push(path);
            }
        }
    }
    loops
}

/// Closed ring over the unique node ids of `elements` in first-seen order.
fn fallback_ring(elements: &[Element]) -> Option<Vec<NodeId>> {
    let mut ring: Vec<NodeId> = elements
        .iter()
        .flat_map(|e| e.triangle())
        .unique()
        .collect();
    let first = *ring.first()?;
    ring.push(first);
    Some(ring)
}

/// Boundary loops of a triangle set.
///
/// When no closed loop can be walked (for instance every edge is shared by
/// two triangles) a single ring over the referenced node ids is returned
/// instead, so callers always get a loop for any non-empty element table.
pub fn compute_boundary_loops(elements: &[Element]) -> Vec<Vec<NodeId>> {
    let edges = boundary_edges(&build_edge_multiplicity(elements));
    let loops = walk_closed_loops(&edges);
    if !loops.is_empty() {
        return loops;
    }
    log::warn!(
        "no closed boundary loop among {} boundary edges; using a ring over element nodes",
        edges.len()
    );
    fallback_ring(elements).into_iter().collect()
}

/// Signed shoelace area of a closed path. Vertices without coordinates are
/// skipped.
pub fn ring_area(path: &[NodeId], coords: &HashMap<NodeId, [f64; 2]>) -> f64 {
    0.5 * path
        .iter()
        .filter_map(|id| coords.get(id))
        .tuple_windows()
        .map(|(p, q)| p[0] * q[1] - q[0] * p[1])
        .sum::<f64>()
}

/// Tags the loop with the largest absolute area as the outer hull and every
/// other loop as a hole. On equal areas the earlier loop wins.
pub fn classify_outer_vs_holes(
    loops: &[Vec<NodeId>],
    coords: &HashMap<NodeId, [f64; 2]>,
) -> LoopClassification {
    let areas: Vec<f64> = loops.iter().map(|l| ring_area(l, coords)).collect();
    let Some(outer_idx) = (0..areas.len()).reduce(|best, i| {
        if areas[i].abs() > areas[best].abs() { i } else { best }
    }) else {
        return LoopClassification::default();
    };

    let mut classification = LoopClassification::default();
    for (i, (nodes, &signed_area)) in loops.iter().zip(&areas).enumerate() {
        let kind = if i == outer_idx {
            LoopKind::Outer
        } else {
            LoopKind::Hole
        };
        let lp = BoundaryLoop {
            nodes: nodes.clone(),
            kind,
            signed_area,
        };
        match kind {
            LoopKind::Outer => classification.outer = Some(lp),
            LoopKind::Hole => classification.holes.push(lp),
        }
    }
    classification
}
