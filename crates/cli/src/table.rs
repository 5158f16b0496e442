//! Vertex tables in, attribute tables out (CSV or Parquet, via polars).
//!
//! Input layout: one row per ring vertex with columns `footprint` (integer
//! key), `x`, `y`, in ring order. Rows of one footprint need not be
//! contiguous; vertices are appended in row order. Every other column is
//! carried as a footprint attribute, taking the first non-null value per
//! footprint. Numeric columns become numbers, everything else text.
//!
//! Output layout: one row per footprint in first-appearance order, with the
//! `footprint` key followed by every attribute column.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use footprint::{AttrValue, Footprint, FootprintSet, Frame};
use geo::{Coord, LineString, Polygon};
use polars::prelude::*;

pub const KEY: &str = "footprint";

/// A footprint set together with the external keys of its footprints.
pub struct Keyed {
    pub keys: Vec<i64>,
    pub set: FootprintSet,
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"))
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let lf = if is_parquet(path) {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    lf.collect()
        .with_context(|| format!("reading {}", path.display()))
}

/// Read a vertex table into a footprint set in `frame`.
pub fn read_vertices(path: &Path, frame: Frame) -> Result<Keyed> {
    let df = read_frame(path)?;
    let keys = df.column(KEY)?.cast(&DataType::Int64)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;
    let keys: Vec<Option<i64>> = keys.i64()?.into_iter().collect();
    let xs: Vec<Option<f64>> = xs.f64()?.into_iter().collect();
    let ys: Vec<Option<f64>> = ys.f64()?.into_iter().collect();

    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut order: Vec<i64> = Vec::new();
    let mut rings: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut row_of: Vec<usize> = Vec::with_capacity(keys.len());
    for (row, ((k, x), y)) in keys.iter().zip(&xs).zip(&ys).enumerate() {
        let (Some(k), Some(x), Some(y)) = (k, x, y) else {
            bail!("row {row}: null in '{KEY}', 'x' or 'y'");
        };
        let slot = *index.entry(*k).or_insert_with(|| {
            order.push(*k);
            rings.push(Vec::new());
            rings.len() - 1
        });
        rings[slot].push(Coord { x: *x, y: *y });
        row_of.push(slot);
    }

    let mut footprints: Vec<Footprint> = rings
        .into_iter()
        .map(|ring| Footprint::new(Polygon::new(LineString::new(ring), Vec::new())))
        .collect();

    let carried: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .filter(|n| n != KEY && n != "x" && n != "y")
        .collect();
    for name in &carried {
        let col = df.column(name)?;
        let values: Vec<Option<AttrValue>> = if col.dtype().is_numeric() {
            let cast = col.cast(&DataType::Float64)?;
            let out = cast
                .f64()?
                .into_iter()
                .map(|v| v.map(AttrValue::Number))
                .collect();
            out
        } else {
            let cast = col.cast(&DataType::String)?;
            let out = cast
                .str()?
                .into_iter()
                .map(|v| v.map(AttrValue::from))
                .collect();
            out
        };
        for (slot, value) in row_of.iter().zip(values) {
            let attrs = &mut footprints[*slot].attributes;
            if let Some(v) = value {
                if !attrs.contains(name) {
                    attrs.insert(name.as_str(), v);
                }
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        footprints = footprints.len(),
        attributes = carried.len(),
        "vertex table read"
    );
    Ok(Keyed {
        keys: order,
        set: FootprintSet::new(frame, footprints),
    })
}

/// Attribute column names in first-appearance order across footprints.
fn attribute_names(set: &FootprintSet) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for fp in &set.footprints {
        for (name, _) in fp.attributes.iter() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Number column if every present cell is numeric, else text column.
fn attribute_series(name: &str, cells: &[Option<&AttrValue>]) -> Series {
    let numeric = cells
        .iter()
        .all(|c| matches!(c, None | Some(AttrValue::Number(_))));
    if numeric {
        let v: Vec<Option<f64>> = cells
            .iter()
            .map(|&c| c.and_then(AttrValue::as_f64))
            .collect();
        Series::new(name.into(), v)
    } else {
        let v: Vec<Option<String>> = cells
            .iter()
            .map(|&c| c.map(AttrValue::to_string))
            .collect();
        Series::new(name.into(), v)
    }
}

/// One row per footprint: key plus all attributes.
pub fn attribute_frame(keyed: &Keyed) -> Result<DataFrame> {
    let set = &keyed.set;
    if keyed.keys.len() != set.len() {
        bail!("{} keys for {} footprints", keyed.keys.len(), set.len());
    }
    let mut cols = Vec::new();
    cols.push(Series::new(KEY.into(), keyed.keys.as_slice()).into());
    for name in attribute_names(set) {
        let cells: Vec<Option<&AttrValue>> = set
            .footprints
            .iter()
            .map(|fp| fp.attributes.get(&name))
            .collect();
        cols.push(attribute_series(&name, &cells).into());
    }
    Ok(DataFrame::new(cols)?)
}

/// Vertex table of a footprint set (exterior rings, open form).
///
/// Attributes are repeated on every vertex row of their footprint.
pub fn vertex_frame(keyed: &Keyed) -> Result<DataFrame> {
    let set = &keyed.set;
    let mut key = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let names = attribute_names(set);
    let mut extra: Vec<Vec<Option<&AttrValue>>> = vec![Vec::new(); names.len()];
    for (k, fp) in keyed.keys.iter().zip(&set.footprints) {
        let ring = &fp.polygon.exterior().0;
        // Drop the closing vertex; readers close rings again.
        let open = ring.len().saturating_sub(1);
        for c in &ring[..open] {
            key.push(*k);
            xs.push(c.x);
            ys.push(c.y);
            for (col, name) in extra.iter_mut().zip(&names) {
                col.push(fp.attributes.get(name));
            }
        }
    }
    let mut cols = Vec::new();
    cols.push(Series::new(KEY.into(), key).into());
    cols.push(Series::new("x".into(), xs).into());
    cols.push(Series::new("y".into(), ys).into());
    for (name, cells) in names.iter().zip(&extra) {
        cols.push(attribute_series(name, cells).into());
    }
    Ok(DataFrame::new(cols)?)
}

/// Write `df` as CSV, or Parquet when `path` ends in `.parquet`.
pub fn write_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    if is_parquet(path) {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).finish(df)?;
    }
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "table written"
    );
    Ok(())
}
