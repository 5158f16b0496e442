//! Force aggregator: two-pass reduction of edge forces per footprint.
//!
//! Pass one builds an id → accumulator map (resultant, Σ|n|², Σ momentum).
//! Pass two needs the finished resultant of each footprint to accumulate the
//! length-weighted deviation angles. The merge then walks all ids in order and
//! zero-fills footprints without surviving edges.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use super::normal::angle_between;
use super::types::{EdgeForce, ForceAttrs};
use crate::footprint::FootprintId;

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    resultant: Vector2<f64>,
    spread: f64,
    momentum: f64,
    weighted_angle: f64,
    weight: f64,
}

impl Accumulator {
    fn finish(&self) -> ForceAttrs {
        let force = self.resultant.norm();
        let normalized_angle = if self.weight > 0.0 {
            self.weighted_angle / self.weight
        } else {
            0.0
        };
        ForceAttrs {
            force,
            confinement: self.spread.sqrt() - force,
            momentum: self.momentum.abs(),
            normalized_angle,
        }
    }
}

/// Aggregate `edges` into one `ForceAttrs` per footprint id `0..n`.
///
/// Edges whose id is `>= n` are ignored.
pub fn aggregate(n: usize, edges: &[EdgeForce]) -> Vec<ForceAttrs> {
    let mut acc: BTreeMap<FootprintId, Accumulator> = BTreeMap::new();
    for e in edges.iter().filter(|e| e.footprint.0 < n) {
        let a = acc.entry(e.footprint).or_default();
        a.resultant += e.normal;
        a.spread += e.normal_length_sq;
        a.momentum += e.momentum;
    }
    for e in edges {
        let Some(a) = acc.get_mut(&e.footprint) else {
            continue;
        };
        let angle = angle_between(e.normal, a.resultant, e.footprint, e.footprint);
        a.weighted_angle += angle * e.normal_length;
        a.weight += e.normal_length;
    }
    (0..n)
        .map(|i| {
            acc.get(&FootprintId(i))
                .map(Accumulator::finish)
                .unwrap_or(ForceAttrs::ZERO)
        })
        .collect()
}
