//! Edge decomposer: split working boundaries into straight 2-point edges.

use geo::{Euclidean, Length, Line, LineString, MultiLineString};

use crate::footprint::FootprintId;

/// A straight boundary segment tagged with its footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub footprint: FootprintId,
    pub segment: Line<f64>,
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f64 {
        Euclidean.length(&self.segment)
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::from(self.segment)
    }
}

/// Split `boundary` at every vertex; one edge per consecutive vertex pair.
///
/// Multi-part boundaries are flattened in part order. An empty boundary gives
/// no edges. Zero-length pairs (repeated vertices) are skipped.
pub fn explode_edges(footprint: FootprintId, boundary: &MultiLineString<f64>) -> Vec<Edge> {
    boundary
        .iter()
        .flat_map(|ls| ls.lines())
        .filter(|seg| seg.start != seg.end)
        .map(|segment| Edge { footprint, segment })
        .collect()
}
