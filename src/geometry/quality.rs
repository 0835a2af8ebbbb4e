//! Triangle quality metrics over a parsed fort.14 mesh.
//!
//! # Vertex ordering
//! Elements are evaluated in file order `[n1, n2, n3]`. A counter-clockwise
//! triangle in the XY plane has positive signed area; a negative area marks an
//! inverted element.
//!
//! # Examples
//! ```rust
//! use adcirc_mesh_audit::geometry::quality::triangle_quality;
//!
//! let q = triangle_quality(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
//! assert!(q.signed_area > 0.0);
//! assert!((q.min_angle_deg - 45.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::topology::mesh::Fort14Mesh;

/// Areas and edge lengths at or below this are treated as zero.
pub const EPS: f64 = 1e-12;

const TRI_EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

/// Basic quality metrics for a single triangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleQuality {
    /// Signed area; negative values indicate clockwise (inverted) ordering.
    pub signed_area: f64,
    /// Ratio of the longest edge length to the shortest edge length.
    /// Infinite when an edge has zero length.
    pub aspect_ratio: f64,
    /// Minimum corner angle in degrees; 0 when an edge has zero length.
    pub min_angle_deg: f64,
}

impl TriangleQuality {
    pub fn is_inverted(&self) -> bool {
        self.signed_area < -EPS
    }

    pub fn is_degenerate(&self) -> bool {
        !self.signed_area.is_finite() || self.signed_area.abs() <= EPS
    }
}

/// Quality metrics from explicit vertex coordinates.
pub fn triangle_quality(vertices: &[[f64; 2]; 3]) -> TriangleQuality {
    let [a, b, c] = *vertices;
    let signed_area = 0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]));

    let lengths = TRI_EDGES.map(|(i, j)| norm(sub(vertices[j], vertices[i])));
    let (min_len, max_len) = lengths
        .iter()
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), &l| (lo.min(l), hi.max(l)));
    if min_len <= EPS {
        return TriangleQuality {
            signed_area,
            aspect_ratio: f64::INFINITY,
            min_angle_deg: 0.0,
        };
    }

    let min_angle_deg = (0..3)
        .map(|i| {
            let p = vertices[i];
            angle_deg(sub(vertices[(i + 1) % 3], p), sub(vertices[(i + 2) % 3], p))
        })
        .fold(f64::INFINITY, f64::min);

    TriangleQuality {
        signed_area,
        aspect_ratio: max_len / min_len,
        min_angle_deg,
    }
}

/// Quality of one element of the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementQuality {
    pub element_id: i64,
    pub quality: TriangleQuality,
}

/// Per-element quality over a whole mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// One row per element whose three nodes resolve, in element order.
    pub elements: Vec<ElementQuality>,
    pub inverted: usize,
    pub degenerate: usize,
    /// Elements referencing a node id absent from the node table.
    pub unresolvable: usize,
}

impl QualityReport {
    /// Smallest minimum angle over all rows.
    pub fn worst_min_angle(&self) -> Option<f64> {
        self.elements
            .iter()
            .map(|e| e.quality.min_angle_deg)
            .reduce(f64::min)
    }

    /// Element ids whose minimum angle is strictly below `deg`.
    pub fn below_min_angle(&self, deg: f64) -> Vec<i64> {
        self.elements
            .iter()
            .filter(|e| e.quality.min_angle_deg < deg)
            .map(|e| e.element_id)
            .collect()
    }
}

/// Evaluates every element of `mesh`.
pub fn mesh_quality(mesh: &Fort14Mesh) -> QualityReport {
    let coords = mesh.node_xy();
    let mut report = QualityReport::default();
    for element in mesh.elements() {
        let [n1, n2, n3] = element.triangle();
        let (Some(&a), Some(&b), Some(&c)) = (coords.get(&n1), coords.get(&n2), coords.get(&n3))
        else {
            report.unresolvable += 1;
            continue;
        };
        let quality = triangle_quality(&[a, b, c]);
        if quality.is_degenerate() {
            report.degenerate += 1;
        } else if quality.is_inverted() {
            report.inverted += 1;
        }
        report.elements.push(ElementQuality {
            element_id: element.id,
            quality,
        });
    }
    if report.inverted + report.degenerate + report.unresolvable > 0 {
        log::debug!(
            "quality: {} inverted, {} degenerate, {} unresolvable of {} elements",
            report.inverted,
            report.degenerate,
            report.unresolvable,
            mesh.element_count()
        );
    }
    report
}

fn sub(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn norm(a: [f64; 2]) -> f64 {
    a[0].hypot(a[1])
}

fn angle_deg(a: [f64; 2], b: [f64; 2]) -> f64 {
    let cos = (a[0] * b[0] + a[1] * b[1]) / (norm(a) * norm(b));
    cos.clamp(-1.0, 1.0).acos() * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::mesh::{Element, Node};

    #[test]
    fn right_triangle_metrics() {
        let q = triangle_quality(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(q.signed_area, 0.5);
        assert!((q.aspect_ratio - 2f64.sqrt()).abs() < 1e-12);
        assert!((q.min_angle_deg - 45.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_is_inverted() {
        let q = triangle_quality(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]]);
        assert!(q.is_inverted());
        assert!(!q.is_degenerate());
    }

    #[test]
    fn collapsed_edge_is_degenerate() {
        let q = triangle_quality(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]);
        assert!(q.is_degenerate());
        assert!(q.aspect_ratio.is_infinite());
        assert_eq!(q.min_angle_deg, 0.0);
        // collinear but distinct vertices
        let q = triangle_quality(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        assert!(q.is_degenerate());
        assert!(q.min_angle_deg.abs() < 1e-9);
    }

    #[test]
    fn mesh_report_counts() {
        let node = |id, x, y| Node { id, x, y, depth: 1.0 };
        let mesh = Fort14Mesh::new(
            "q",
            vec![node(1, 0.0, 0.0), node(2, 1.0, 0.0), node(3, 0.0, 1.0), node(4, 2.0, 0.0)],
            vec![
                Element { id: 1, n1: 1, n2: 2, n3: 3, n4: 0 },
                Element { id: 2, n1: 1, n2: 3, n3: 2, n4: 0 },
                Element { id: 3, n1: 1, n2: 2, n3: 4, n4: 0 },
                Element { id: 4, n1: 1, n2: 2, n3: 7, n4: 0 },
            ],
            vec![],
            vec![],
        );
        let report = mesh_quality(&mesh);
        assert_eq!(report.elements.len(), 3);
        assert_eq!(report.inverted, 1);
        assert_eq!(report.degenerate, 1);
        assert_eq!(report.unresolvable, 1);
        assert_eq!(report.below_min_angle(10.0), vec![3]);
        assert!(report.worst_min_angle().unwrap() < 1e-9);
    }
}
