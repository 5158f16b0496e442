//! Boundary clipper: the part of each footprint ring that faces other mass.
//!
//! Model
//! - `close(g, b)`: buffer out by `b`, then back in by `b` (square caps,
//!   mitred joins). Gaps narrower than about `2b` are filled, slivers removed.
//!   `b = 0` is the identity.
//! - The dataset union is built once and closed; it is read-only afterwards.
//! - Each footprint is closed on its own, its rings are oriented
//!   (exterior CCW, holes CW), and only the runs lying in the *interior* of
//!   the closed union are kept. Runs along the closed union's outline face
//!   open exterior and are dropped. A footprint with nothing within reach thus
//!   gets an empty working boundary.
//!
//! Runs are found per ring segment: split the segment wherever it meets the
//! union outline, then keep a piece iff its midpoint is inside the union and
//! farther than `tol` from the outline.

use geo::algorithm::buffer::{BufferStyle, LineCap, LineJoin};
use geo::orient::Direction;
use geo::{
    unary_union, BoundingRect, Buffer, Contains, Coord, Distance, Euclidean, Intersects, Line,
    LineString, MultiLineString, MultiPolygon, Orient, Point, Polygon, Rect,
};
use rayon::prelude::*;

use super::types::ClipCfg;
use super::util::{bbox, crossing_params, extent, inflate, lerp, near_vertex_params};

/// Morphological closing of `mp` by `buffer` (square caps, mitred joins).
pub fn close(mp: &MultiPolygon<f64>, buffer: f64, cfg: &ClipCfg) -> MultiPolygon<f64> {
    if buffer <= 0.0 {
        return mp.clone();
    }
    let style = |d: f64| {
        BufferStyle::new(d)
            .line_join(LineJoin::Miter(cfg.mitre_min_angle))
            .line_cap(LineCap::Square)
    };
    mp.buffer_with_style(style(buffer))
        .buffer_with_style(style(-buffer))
}

/// Outline of a closed area, as segments, with lookups by box.
struct Outline {
    parts: Vec<(Rect<f64>, Polygon<f64>)>,
    lines: Vec<Line<f64>>,
}

/// The parts of an [`Outline`] within reach of one footprint.
struct Nearby<'a> {
    parts: Vec<&'a Polygon<f64>>,
    lines: Vec<Line<f64>>,
}

impl Outline {
    fn new(area: MultiPolygon<f64>) -> Self {
        let lines = area
            .0
            .iter()
            .flat_map(rings)
            .flat_map(|r| r.lines())
            .collect();
        let parts = area
            .0
            .into_iter()
            .filter_map(|p| Some((p.bounding_rect()?, p)))
            .collect();
        Self { parts, lines }
    }

    /// Union parts and outline segments whose boxes meet `window`.
    fn near(&self, window: Rect<f64>) -> Nearby<'_> {
        let parts = self
            .parts
            .iter()
            .filter(|(r, _)| r.intersects(&window))
            .map(|(_, p)| p)
            .collect();
        let lines = self
            .lines
            .iter()
            .filter(|l| l.bounding_rect().intersects(&window))
            .copied()
            .collect();
        Nearby { parts, lines }
    }
}

/// Working boundary of every polygon, in input order (possibly empty).
///
/// `polys` must be in a projected frame; `buffer` is in its units. Ring
/// winding is free: every polygon is oriented before the union is taken.
pub fn working_boundaries(
    polys: &[Polygon<f64>],
    buffer: f64,
    cfg: &ClipCfg,
) -> Vec<MultiLineString<f64>> {
    if polys.is_empty() {
        return Vec::new();
    }
    let polys: Vec<Polygon<f64>> = polys
        .iter()
        .map(|poly| poly.orient(Direction::Default))
        .collect();
    let tol = cfg.tol(extent(&polys));
    let union = close(&unary_union(&polys), buffer, cfg);
    let outline = Outline::new(union);
    tracing::debug!(
        footprints = polys.len(),
        outline_segments = outline.lines.len(),
        "closed union built"
    );
    polys
        .par_iter()
        .map(|p| facing_boundary(p, buffer, &outline, tol, cfg))
        .collect()
}

fn facing_boundary(
    poly: &Polygon<f64>,
    buffer: f64,
    outline: &Outline,
    tol: f64,
    cfg: &ClipCfg,
) -> MultiLineString<f64> {
    let closed = close(&MultiPolygon::new(vec![poly.clone()]), buffer, cfg);
    let Some(window) = bbox(&closed.0) else {
        return MultiLineString::new(Vec::new());
    };
    let nearby = outline.near(inflate(window, tol));
    let mut runs = Vec::new();
    for p in closed.orient(Direction::Default).0 {
        for ring in rings(&p) {
            interior_runs(ring, &nearby, tol, &mut runs);
        }
    }
    MultiLineString::new(runs)
}

/// Push the runs of `ring` lying in the interior of the union onto `out`.
fn interior_runs(
    ring: &LineString<f64>,
    nearby: &Nearby<'_>,
    tol: f64,
    out: &mut Vec<LineString<f64>>,
) {
    let mut chain: Vec<Coord<f64>> = Vec::new();
    // Segment index of the last piece in `chain`.
    let mut chain_seg = usize::MAX;
    for (k, seg) in ring.lines().enumerate() {
        let len = Euclidean.distance(seg.start_point(), seg.end_point());
        if len <= 0.0 {
            continue;
        }
        let mut ts = vec![0.0, 1.0];
        for other in &nearby.lines {
            crossing_params(seg, *other, &mut ts);
            near_vertex_params(seg, *other, tol, &mut ts);
        }
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup_by(|a, b| (*a - *b).abs() * len < tol);
        if let Some(last) = ts.last_mut() {
            *last = 1.0;
        }
        for w in ts.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            if !faces_mass(seg, 0.5 * (t0 + t1), nearby, tol) {
                continue;
            }
            let (a, b) = (lerp(seg, t0), lerp(seg, t1));
            let joins = chain
                .last()
                .is_some_and(|c| Euclidean.distance(Point::from(*c), Point::from(a)) < tol);
            if joins && chain_seg == k {
                // Same segment, straight continuation: extend, no new vertex.
                if let Some(end) = chain.last_mut() {
                    *end = b;
                }
            } else if joins {
                chain.push(b);
            } else {
                flush(&mut chain, out);
                chain.push(a);
                chain.push(b);
            }
            chain_seg = k;
        }
    }
    flush(&mut chain, out);
}

fn faces_mass(seg: Line<f64>, t: f64, nearby: &Nearby<'_>, tol: f64) -> bool {
    let mid = Point::from(lerp(seg, t));
    if !nearby.parts.iter().any(|p| p.contains(&mid)) {
        return false;
    }
    nearby
        .lines
        .iter()
        .all(|l| Euclidean.distance(&mid, l) >= tol)
}

fn rings(p: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(p.exterior()).chain(p.interiors())
}

fn flush(chain: &mut Vec<Coord<f64>>, out: &mut Vec<LineString<f64>>) {
    if chain.len() >= 2 {
        out.push(LineString::new(std::mem::take(chain)));
    } else {
        chain.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area, Length};

    /// 30 x 30 block at the origin with a 10 x 10 courtyard in the middle,
    /// both rings wound counter-clockwise.
    fn courtyard_block() -> Polygon<f64> {
        Polygon::new(
            square(0.0, 0.0, 30.0).exterior().clone(),
            vec![square(10.0, 10.0, 10.0).exterior().clone()],
        )
    }

    fn square(x0: f64, y0: f64, s: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + s, y: y0),
            (x: x0 + s, y: y0 + s),
            (x: x0, y: y0 + s),
        ]
    }

    #[test]
    fn close_zero_is_identity() {
        let mp = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        assert_eq!(close(&mp, 0.0, &ClipCfg::default()), mp);
    }

    #[test]
    fn close_fills_narrow_gap() {
        let mp = MultiPolygon::new(vec![square(0.0, 0.0, 10.0), square(11.0, 0.0, 10.0)]);
        let closed = close(&unary_union(&mp.0), 1.0, &ClipCfg::default());
        assert_eq!(closed.0.len(), 1);
        assert!((closed.unsigned_area() - 210.0).abs() < 1e-3);
    }

    #[test]
    fn isolated_square_has_empty_boundary() {
        let wb = working_boundaries(&[square(0.0, 0.0, 10.0)], 0.0, &ClipCfg::default());
        assert_eq!(wb.len(), 1);
        assert!(wb[0].0.is_empty());
    }

    #[test]
    fn shared_wall_survives() {
        let polys = [square(0.0, 0.0, 10.0), square(10.0, 0.0, 10.0)];
        let wb = working_boundaries(&polys, 0.0, &ClipCfg::default());
        for b in &wb {
            assert!((Euclidean.length(b) - 10.0).abs() < 1e-6);
        }
        // Left square's wall is x = 10, traversed upwards (CCW exterior).
        let ls = &wb[0].0[0];
        assert!(ls.0.iter().all(|c| (c.x - 10.0).abs() < 1e-6));
        assert!(ls.0[0].y < ls.0[ls.0.len() - 1].y);
    }

    #[test]
    fn partial_wall_is_split() {
        let polys = [
            square(0.0, 0.0, 10.0),
            polygon![
                (x: 10.0, y: 0.0),
                (x: 20.0, y: 0.0),
                (x: 20.0, y: 5.0),
                (x: 10.0, y: 5.0),
            ],
        ];
        let wb = working_boundaries(&polys, 0.0, &ClipCfg::default());
        assert!((Euclidean.length(&wb[0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn buffer_reaches_across_gap() {
        let polys = [square(0.0, 0.0, 10.0), square(11.0, 0.0, 10.0)];
        let none = working_boundaries(&polys, 0.0, &ClipCfg::default());
        assert!(none.iter().all(|b| b.0.is_empty()));
        let some = working_boundaries(&polys, 1.0, &ClipCfg::default());
        for b in &some {
            assert!((Euclidean.length(b) - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn winding_does_not_change_the_union() {
        let cw = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
        ];
        let polys = [cw, square(10.0, 0.0, 10.0)];
        let wb = working_boundaries(&polys, 0.0, &ClipCfg::default());
        for b in &wb {
            assert!((Euclidean.length(b) - 10.0).abs() < 1e-6);
        }
        // The clockwise square is walked as if it were counter-clockwise.
        let ls = &wb[0].0[0];
        assert!(ls.0[0].y < ls.0[ls.0.len() - 1].y);
    }

    #[test]
    fn lone_courtyard_block_has_empty_boundary() {
        let wb = working_boundaries(&[courtyard_block()], 0.0, &ClipCfg::default());
        assert!(wb[0].0.is_empty());
    }

    #[test]
    fn courtyard_occupant_keeps_only_shared_walls() {
        // Fills the southern half of the courtyard.
        let inner = polygon![
            (x: 10.0, y: 10.0),
            (x: 20.0, y: 10.0),
            (x: 20.0, y: 15.0),
            (x: 10.0, y: 15.0),
        ];
        let wb = working_boundaries(&[courtyard_block(), inner], 0.0, &ClipCfg::default());
        // South wall plus the lower halves of the west and east walls.
        assert!((Euclidean.length(&wb[0]) - 20.0).abs() < 1e-6);
        assert!((Euclidean.length(&wb[1]) - 20.0).abs() < 1e-6);
        // Nothing of the outer exterior ring survives.
        for ls in &wb[0].0 {
            assert!(ls.0.iter().all(|c| (10.0..=20.0).contains(&c.x)));
            assert!(ls.0.iter().all(|c| (10.0..=15.0).contains(&c.y)));
        }
    }
}
