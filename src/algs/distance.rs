//! Planar distances between boundary polylines and rings.
//!
//! Used to check how well the declared open boundary follows the hull that
//! the element table implies, and to drop coastline rings that merely trace
//! an open boundary. Inputs are plain coordinate lists, converted to `geo`
//! geometries for the measurements; a single-point polyline behaves as a
//! point.

use geo::{Contains, EuclideanDistance, HausdorffDistance, LineString, MultiLineString, Point, Polygon};

type Xy = [f64; 2];

fn multi_line(paths: &[Vec<Xy>]) -> MultiLineString<f64> {
    MultiLineString::new(paths.iter().map(|p| LineString::from(p.clone())).collect())
}

/// Distance from `p` to the nearest point of any polyline in `paths`.
/// Infinite when `paths` has no vertices.
pub fn point_polyline_distance(p: Xy, paths: &[Vec<Xy>]) -> f64 {
    let p = Point::from(p);
    paths
        .iter()
        .map(|path| match path.as_slice() {
            [] => f64::INFINITY,
            // a one-vertex line string has no segments to measure against
            [only] => p.euclidean_distance(&Point::from(*only)),
            _ => p.euclidean_distance(&LineString::from(path.clone())),
        })
        .fold(f64::INFINITY, f64::min)
}

fn has_vertices(paths: &[Vec<Xy>]) -> bool {
    paths.iter().any(|p| !p.is_empty())
}

/// Symmetric Hausdorff distance between the vertex sets of two polyline
/// sets. Infinite when either side is empty.
pub fn hausdorff_distance(a: &[Vec<Xy>], b: &[Vec<Xy>]) -> f64 {
    if !has_vertices(a) || !has_vertices(b) {
        return f64::INFINITY;
    }
    multi_line(a).hausdorff_distance(&multi_line(b))
}

/// Smallest signed distance from any vertex of `paths` to the outline of
/// `ring`; negative for vertices strictly inside. `ring` may or may not
/// repeat its first vertex. Returns 0 when either input is empty.
pub fn signed_distance_to_ring(paths: &[Vec<Xy>], ring: &[Xy]) -> f64 {
    if ring.is_empty() || !has_vertices(paths) {
        return 0.0;
    }
    let polygon = Polygon::new(LineString::from(ring.to_vec()), vec![]);
    let outline = [polygon.exterior().coords().map(|c| [c.x, c.y]).collect::<Vec<_>>()];
    paths
        .iter()
        .flatten()
        .map(|&v| {
            let d = point_polyline_distance(v, &outline);
            if polygon.contains(&Point::from(v)) { -d } else { d }
        })
        .fold(f64::INFINITY, f64::min)
}

/// Keeps the rings that have at least one vertex farther than `tol` from
/// `paths`.
pub fn filter_rings_near_paths(rings: &[Vec<Xy>], paths: &[Vec<Xy>], tol: f64) -> Vec<Vec<Xy>> {
    rings
        .iter()
        .filter(|ring| ring.iter().any(|&v| point_polyline_distance(v, paths) > tol))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [Xy; 5] = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];

    #[test]
    fn polyline_distance_clamps_to_endpoints() {
        let bottom = vec![vec![[0.0, 0.0], [10.0, 0.0]]];
        assert_eq!(point_polyline_distance([5.0, 3.0], &bottom), 3.0);
        assert_eq!(point_polyline_distance([-3.0, 4.0], &bottom), 5.0);
        // single vertex acts as a point
        assert_eq!(point_polyline_distance([1.0, 1.0], &[vec![[1.0, 2.0]]]), 1.0);
        assert!(point_polyline_distance([1.0, 1.0], &[vec![]]).is_infinite());
    }

    #[test]
    fn hausdorff_is_symmetric() {
        let a = vec![vec![[0.0, 0.0], [10.0, 0.0]]];
        let b = vec![vec![[0.0, 1.0], [4.0, 1.0]]];
        // (10,0) is farthest from b: distance to (4,1)
        let expected = 6.0f64.hypot(1.0);
        assert!((hausdorff_distance(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(hausdorff_distance(&a, &b), hausdorff_distance(&b, &a));
        assert_eq!(hausdorff_distance(&a, &a), 0.0);
        assert!(hausdorff_distance(&a, &[]).is_infinite());
    }

    #[test]
    fn signed_distance_is_negative_inside() {
        let inside = vec![vec![[5.0, 2.0], [5.0, 5.0]]];
        // the deepest vertex wins
        assert_eq!(signed_distance_to_ring(&inside, &SQUARE), -5.0);
        let outside = vec![vec![[5.0, -3.0]]];
        assert_eq!(signed_distance_to_ring(&outside, &SQUARE), 3.0);
        // open ring is closed implicitly
        assert_eq!(signed_distance_to_ring(&inside, &SQUARE[..4]), -5.0);
        // on the outline counts as zero, not inside
        assert_eq!(signed_distance_to_ring(&[vec![[10.0, 4.0]]], &SQUARE), 0.0);
        assert_eq!(signed_distance_to_ring(&[], &SQUARE), 0.0);
        assert_eq!(signed_distance_to_ring(&inside, &[]), 0.0);
    }

    #[test]
    fn rings_tracing_paths_are_dropped() {
        let open = vec![vec![[0.0, 0.0], [1.0, 0.0]]];
        let traced = vec![[0.0, 0.0], [1.0, 0.0]];
        let far = vec![[10.0, 10.0], [11.0, 10.0], [11.0, 11.0]];
        let kept = filter_rings_near_paths(&[traced, far.clone()], &open, 0.01);
        assert_eq!(kept, vec![far]);
    }
}
