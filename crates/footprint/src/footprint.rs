//! Footprint collection model.
//!
//! - `FootprintSet`: ordered footprints plus the coordinate frame they live in.
//! - `Footprint`: a polygon and an ordered attribute table (the "columns").
//! - `FootprintId`: the ordinal of a footprint in its set; stable for a run.
//!
//! Stages never remove footprints. They return a new set with the same order
//! and ids, augmented or overwritten attributes, and untouched geometry.

use std::fmt;

use geo::Polygon;

use crate::error::{Error, Result};
use crate::geom::{to_working_frame, Frame};

/// Ordinal key of a footprint within its `FootprintSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FootprintId(pub usize);

impl fmt::Display for FootprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single attribute cell.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric view; numeric text is coerced (e.g. `"12.5"`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(x) => Some(*x),
            AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(x) => write!(f, "{x}"),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        AttrValue::Number(x)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// Insertion-ordered attribute table of one footprint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    cells: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.cells.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or overwrite in place (an overwritten column keeps its position).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let idx = self.cells.iter().position(|(k, _)| k == name)?;
        Some(self.cells.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A building outline with its attribute table.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    pub polygon: Polygon<f64>,
    pub attributes: Attributes,
}

impl Footprint {
    pub fn new(polygon: Polygon<f64>) -> Self {
        Self {
            polygon,
            attributes: Attributes::default(),
        }
    }

    /// Builder-style attribute insert.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Numeric attribute, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_f64)
    }
}

/// Behaviour when a stage is about to write a column that already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Emit a `tracing` warning and overwrite.
    #[default]
    Warn,
    /// Refuse with `Error::ColumnExists`.
    Strict,
}

/// Ordered footprint collection in an explicit coordinate frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FootprintSet {
    pub frame: Frame,
    pub footprints: Vec<Footprint>,
}

impl FootprintSet {
    pub fn new(frame: Frame, footprints: Vec<Footprint>) -> Self {
        Self { frame, footprints }
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FootprintId, &Footprint)> {
        self.footprints
            .iter()
            .enumerate()
            .map(|(i, fp)| (FootprintId(i), fp))
    }

    pub fn polygons(&self) -> Vec<Polygon<f64>> {
        self.footprints
            .iter()
            .map(|fp| fp.polygon.clone())
            .collect()
    }

    /// Projected copy of the polygons and the frame it lives in.
    pub fn working_copy(&self) -> (Frame, Vec<Polygon<f64>>) {
        to_working_frame(self.frame, &self.polygons())
    }

    /// True if any footprint carries `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.footprints
            .iter()
            .any(|fp| fp.attributes.contains(name))
    }

    /// Copy without the given columns.
    pub fn drop_columns(&self, names: &[&str]) -> Self {
        let mut out = self.clone();
        for fp in &mut out.footprints {
            for name in names {
                fp.attributes.remove(name);
            }
        }
        out
    }

    /// Numeric column, one value per footprint in id order.
    ///
    /// Missing cells yield `Error::MissingColumn`, non-numeric cells
    /// `Error::NonNumericColumn`.
    pub fn number_column(&self, name: &str) -> Result<Vec<f64>> {
        self.iter()
            .map(|(id, fp)| match fp.attributes.get(name) {
                None => Err(Error::MissingColumn {
                    column: name.to_string(),
                    id: id.0,
                }),
                Some(v) => v.as_f64().ok_or_else(|| Error::NonNumericColumn {
                    column: name.to_string(),
                    id: id.0,
                    value: v.to_string(),
                }),
            })
            .collect()
    }
}

/// Apply the overwrite policy to every column a stage is about to write.
pub(crate) fn check_columns(set: &FootprintSet, names: &[&str], policy: Overwrite) -> Result<()> {
    for name in names {
        if !set.has_column(name) {
            continue;
        }
        match policy {
            Overwrite::Warn => {
                tracing::warn!(
                    column = *name,
                    "column already exists and will be overwritten"
                )
            }
            Overwrite::Strict => return Err(Error::ColumnExists(name.to_string())),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn unit() -> Polygon<f64> {
        polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]
    }

    #[test]
    fn attributes_keep_insertion_order_on_overwrite() {
        let mut a = Attributes::default();
        a.insert("b", 1.0);
        a.insert("a", "x");
        a.insert("b", 2.0);
        let names: Vec<_> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(a.get("b"), Some(&AttrValue::Number(2.0)));
    }

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(AttrValue::from(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(AttrValue::from("tall").as_f64(), None);
    }

    #[test]
    fn number_column_reports_missing_and_non_numeric() {
        let set = FootprintSet::new(
            Frame::Planar,
            vec![
                Footprint::new(unit()).with_attr("h", 3.0),
                Footprint::new(unit()),
            ],
        );
        assert!(matches!(
            set.number_column("h"),
            Err(Error::MissingColumn { id: 1, .. })
        ));
        let set = FootprintSet::new(
            Frame::Planar,
            vec![Footprint::new(unit()).with_attr("h", "n/a")],
        );
        assert!(matches!(
            set.number_column("h"),
            Err(Error::NonNumericColumn { id: 0, .. })
        ));
    }

    #[test]
    fn strict_policy_rejects_existing_columns() {
        let set = FootprintSet::new(
            Frame::Planar,
            vec![Footprint::new(unit()).with_attr("force", 1.0)],
        );
        assert!(check_columns(&set, &["force"], Overwrite::Warn).is_ok());
        assert!(matches!(
            check_columns(&set, &["force"], Overwrite::Strict),
            Err(Error::ColumnExists(c)) if c == "force"
        ));
        let dropped = set.drop_columns(&["force"]);
        assert!(check_columns(&dropped, &["force"], Overwrite::Strict).is_ok());
    }
}
