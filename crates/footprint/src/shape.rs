//! Shape compactness.

use std::f64::consts::PI;

use geo::{Area, Euclidean, Length, Polygon};

use crate::error::Result;
use crate::footprint::{check_columns, FootprintSet, Overwrite};

/// Output column written by `polsby_popper`.
pub const POLSBY_POPPER: &str = "polsby_popper";

/// `4π·area / perimeter²` of one polygon; 1 for a disc, 0 when degenerate.
///
/// The perimeter includes the rings of holes.
pub fn polsby_popper_one(p: &Polygon<f64>) -> f64 {
    let holes: f64 = p.interiors().iter().map(|r| Euclidean.length(r)).sum();
    let perimeter = Euclidean.length(p.exterior()) + holes;
    if !perimeter.is_finite() || perimeter <= 0.0 {
        return 0.0;
    }
    4.0 * PI * p.unsigned_area() / (perimeter * perimeter)
}

/// Append the `polsby_popper` column, measured in the projected working frame.
pub fn polsby_popper(set: &FootprintSet, overwrite: Overwrite) -> Result<FootprintSet> {
    check_columns(set, &[POLSBY_POPPER], overwrite)?;
    let (frame, polys) = set.working_copy();
    let mut out = set.clone();
    for (fp, p) in out.footprints.iter_mut().zip(&polys) {
        fp.attributes.insert(POLSBY_POPPER, polsby_popper_one(p));
    }
    tracing::debug!(?frame, footprints = set.len(), "polsby-popper computed");
    Ok(out)
}
