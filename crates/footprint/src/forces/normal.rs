//! Edge normal estimator and momentum calculator.

use geo::{Euclidean, InterpolatableLine, Length, LineString, Point};
use nalgebra::Vector2;

use super::types::EdgeForce;
use crate::cross2;
use crate::footprint::FootprintId;
use crate::geom::{vec2, Edge};

/// Midpoint of `line` and its left normal scaled by `scale × length`.
///
/// The tangent is taken between the first two coordinates; the midpoint by
/// arc-length ratio 0.5. Returns `None` for lines with fewer than two
/// coordinates or a zero-length leading tangent.
pub fn scaled_normal_at_center(
    line: &LineString<f64>,
    scale: f64,
) -> Option<(Point<f64>, Vector2<f64>)> {
    if line.0.len() < 2 {
        return None;
    }
    let center = line.point_at_ratio_from_start(&Euclidean, 0.5)?;
    let tangent = vec2(line.0[1]) - vec2(line.0[0]);
    // (x, y) ↦ (−y, x)
    let normal = Vector2::new(-tangent.y, tangent.x);
    let norm = normal.norm();
    if !norm.is_finite() || norm <= 0.0 {
        return None;
    }
    let length = Euclidean.length(line);
    Some((center, normal / norm * (scale * length)))
}

/// Scalar momentum `(center − reference) × normal`.
#[inline]
pub fn calculate_momentum(
    center: Vector2<f64>,
    normal: Vector2<f64>,
    reference: Vector2<f64>,
) -> f64 {
    cross2(center - reference, normal)
}

/// Unsigned angle in [0, π/2] between the lines spanned by `n0` and `n1`.
///
/// Defined as 0 across different footprints or when either vector vanishes.
pub fn angle_between(
    n0: Vector2<f64>,
    n1: Vector2<f64>,
    id0: FootprintId,
    id1: FootprintId,
) -> f64 {
    if id0 != id1 {
        return 0.0;
    }
    let (Some(u0), Some(u1)) = (
        n0.try_normalize(f64::EPSILON),
        n1.try_normalize(f64::EPSILON),
    ) else {
        return 0.0;
    };
    u0.dot(&u1).abs().min(1.0).acos()
}

/// Force contribution of one edge with the given height and centroid.
pub fn edge_force(edge: &Edge, height: f64, centroid: Vector2<f64>) -> Option<EdgeForce> {
    let (center, normal) = scaled_normal_at_center(&edge.to_line_string(), height)?;
    let midpoint = Vector2::new(center.x(), center.y());
    let normal_length = normal.norm();
    Some(EdgeForce {
        footprint: edge.footprint,
        midpoint,
        normal,
        normal_length,
        normal_length_sq: normal_length * normal_length,
        momentum: calculate_momentum(midpoint, normal, centroid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn normal_rotates_left_and_scales() {
        let ls = line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0)];
        let (c, n) = scaled_normal_at_center(&ls, 2.0).unwrap();
        assert!((c.x() - 2.0).abs() < 1e-12 && c.y().abs() < 1e-12);
        assert!(n.x.abs() < 1e-12);
        assert!((n.y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn multi_point_line_uses_first_tangent_and_full_length() {
        let ls = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 0.0, y: 3.0)];
        let (c, n) = scaled_normal_at_center(&ls, 1.0).unwrap();
        assert!((c.y() - 1.5).abs() < 1e-12);
        assert!((n.x + 3.0).abs() < 1e-12 && n.y.abs() < 1e-12);
    }

    #[test]
    fn degenerate_lines_have_no_normal() {
        let single = line_string![(x: 1.0, y: 1.0)];
        assert!(scaled_normal_at_center(&single, 1.0).is_none());
        let flat = line_string![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert!(scaled_normal_at_center(&flat, 1.0).is_none());
    }

    #[test]
    fn momentum_is_cross_product() {
        let m = calculate_momentum(
            Vector2::new(3.0, 1.0),
            Vector2::new(0.0, 2.0),
            Vector2::new(1.0, 1.0),
        );
        assert!((m - 4.0).abs() < 1e-12);
    }

    #[test]
    fn angle_is_unsigned_and_per_footprint() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(-1.0, 1.0);
        let id = FootprintId(0);
        assert!((angle_between(a, b, id, id) - FRAC_PI_4).abs() < 1e-12);
        assert!(angle_between(a, -a, id, id).abs() < 1e-12);
        assert_eq!(angle_between(a, b, id, FootprintId(1)), 0.0);
        assert_eq!(angle_between(a, Vector2::zeros(), id, id), 0.0);
    }
}
