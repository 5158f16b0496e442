//! `calc_forces`: frame → clip → edges → normals → aggregate → merge.

use geo::{Centroid, Polygon};
use nalgebra::Vector2;
use rayon::prelude::*;

use super::aggregate::aggregate;
use super::normal::edge_force;
use super::types::{EdgeForce, ForceAttrs, ForceCfg, FORCE_COLUMNS};
use crate::error::{Error, Result};
use crate::footprint::{check_columns, FootprintId, FootprintSet};
use crate::geom::{explode_edges, working_boundaries};

/// Force attributes of every footprint, appended as the `FORCE_COLUMNS`.
///
/// The returned set keeps the input frame, geometry and order; only the
/// four columns are added (or overwritten, per `cfg.overwrite`).
pub fn calc_forces(set: &FootprintSet, cfg: &ForceCfg) -> Result<FootprintSet> {
    check_columns(set, &FORCE_COLUMNS, cfg.overwrite)?;
    let attrs = force_attrs(set, cfg)?;
    let mut out = set.clone();
    for (fp, a) in out.footprints.iter_mut().zip(&attrs) {
        for (name, value) in FORCE_COLUMNS.iter().zip(a.values()) {
            fp.attributes.insert(*name, value);
        }
    }
    Ok(out)
}

/// Force attributes in id order, without touching `set`.
pub fn force_attrs(set: &FootprintSet, cfg: &ForceCfg) -> Result<Vec<ForceAttrs>> {
    if !cfg.buffer.is_finite() || cfg.buffer < 0.0 {
        return Err(Error::InvalidBuffer(cfg.buffer));
    }
    let heights = resolve_heights(set, cfg.height_column.as_deref())?;
    let (frame, polys) = set.working_copy();
    let boundaries = working_boundaries(&polys, cfg.buffer, &cfg.clip);

    let buffer = cfg.buffer;
    let edges: Vec<EdgeForce> = boundaries
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, boundary)| {
            let id = FootprintId(i);
            let centroid = centroid(&polys[i]);
            let height = heights[i];
            explode_edges(id, boundary)
                .into_iter()
                .filter(move |e| e.length() > buffer)
                .filter_map(move |e| edge_force(&e, height, centroid))
        })
        .collect();

    tracing::debug!(
        ?frame,
        footprints = set.len(),
        edges = edges.len(),
        buffer = cfg.buffer,
        "edge forces computed"
    );
    Ok(aggregate(set.len(), &edges))
}

/// Height multiplier per footprint.
///
/// Without a column every height is 1. A footprint lacking the attribute
/// gets 1; a value that does not coerce to a finite number is an error.
pub fn resolve_heights(set: &FootprintSet, column: Option<&str>) -> Result<Vec<f64>> {
    let Some(column) = column else {
        return Ok(vec![1.0; set.len()]);
    };
    set.iter()
        .map(|(id, fp)| match fp.attributes.get(column) {
            None => Ok(1.0),
            Some(v) => v
                .as_f64()
                .filter(|h| h.is_finite())
                .ok_or_else(|| Error::NonNumericHeight {
                    column: column.to_string(),
                    id: id.0,
                    value: v.to_string(),
                }),
        })
        .collect()
}

fn centroid(p: &Polygon<f64>) -> Vector2<f64> {
    p.centroid()
        .map(|c| Vector2::new(c.x(), c.y()))
        .unwrap_or_else(Vector2::zeros)
}
