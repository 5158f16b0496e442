use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Coord, Distance, Euclidean, Line, Point, Polygon, Rect};
use nalgebra::Vector2;

#[inline]
pub fn vec2(c: Coord<f64>) -> Vector2<f64> {
    Vector2::new(c.x, c.y)
}

#[inline]
pub fn coord(v: Vector2<f64>) -> Coord<f64> {
    Coord { x: v.x, y: v.y }
}

/// Largest side of the bounding box of all polygons (0 when empty).
pub fn extent(polys: &[Polygon<f64>]) -> f64 {
    match bbox(polys) {
        Some(r) => r.width().max(r.height()),
        None => 0.0,
    }
}

pub(crate) fn bbox(polys: &[Polygon<f64>]) -> Option<Rect<f64>> {
    polys
        .iter()
        .filter_map(|p| p.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

/// Rect grown by `d` on every side.
pub(crate) fn inflate(r: Rect<f64>, d: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: r.min().x - d,
            y: r.min().y - d,
        },
        Coord {
            x: r.max().x + d,
            y: r.max().y + d,
        },
    )
}

/// Parameter of `p` projected onto `seg` (0 at start, 1 at end).
#[inline]
pub(crate) fn param_on(seg: Line<f64>, p: Coord<f64>) -> f64 {
    let d = vec2(seg.end) - vec2(seg.start);
    let len2 = d.norm_squared();
    if len2 <= 0.0 {
        return 0.0;
    }
    ((vec2(p) - vec2(seg.start)).dot(&d) / len2).clamp(0.0, 1.0)
}

/// Parameters along `seg` where `other` touches it.
pub(crate) fn crossing_params(seg: Line<f64>, other: Line<f64>, out: &mut Vec<f64>) {
    match line_intersection(seg, other) {
        Some(LineIntersection::SinglePoint { intersection, .. }) => {
            out.push(param_on(seg, intersection));
        }
        Some(LineIntersection::Collinear { intersection }) => {
            out.push(param_on(seg, intersection.start));
            out.push(param_on(seg, intersection.end));
        }
        None => {}
    }
}

/// Parameters of `other`'s endpoints lying within `tol` of `seg`.
///
/// Catches split points that snapping moved just off the segment.
pub(crate) fn near_vertex_params(seg: Line<f64>, other: Line<f64>, tol: f64, out: &mut Vec<f64>) {
    for p in [other.start, other.end] {
        if Euclidean.distance(&Point::from(p), &seg) < tol {
            out.push(param_on(seg, p));
        }
    }
}

#[inline]
pub(crate) fn lerp(seg: Line<f64>, t: f64) -> Coord<f64> {
    coord(vec2(seg.start) + (vec2(seg.end) - vec2(seg.start)) * t)
}
