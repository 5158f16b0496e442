//! Relative-position classifier.
//!
//! Force and confinement are normalized by `sqrt(area)` of each footprint,
//! which makes the thresholds independent of footprint size. Rules apply in
//! order, each later match overwriting the earlier label:
//!
//! 1. `isolated` (default)
//! 2. `lateral` when normalized force > `force_significance`
//! 3. `corner` when additionally `normalized_angle` > `angle_significance`
//! 4. `confined` when normalized confinement > `force_significance`
//!
//! So `confined` wins over `corner` and `lateral` when both hold.

use std::fmt;

use geo::Area;

use crate::error::{Error, Result};
use crate::footprint::{check_columns, FootprintSet, Overwrite};

/// Output column written by `relative_position`.
pub const RELATIVE_POSITION: &str = "relative_position";

/// Spatial context of a footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelativePosition {
    Isolated,
    Lateral,
    Corner,
    Confined,
}

impl RelativePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelativePosition::Isolated => "isolated",
            RelativePosition::Lateral => "lateral",
            RelativePosition::Corner => "corner",
            RelativePosition::Confined => "confined",
        }
    }
}

impl fmt::Display for RelativePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier thresholds and collision policy.
#[derive(Clone, Copy, Debug)]
pub struct ClassifyCfg {
    pub force_significance: f64,
    /// Radians.
    pub angle_significance: f64,
    pub overwrite: Overwrite,
}

impl Default for ClassifyCfg {
    fn default() -> Self {
        Self {
            force_significance: 0.05,
            angle_significance: 0.6,
            overwrite: Overwrite::Warn,
        }
    }
}

impl ClassifyCfg {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("force_significance", self.force_significance),
            ("angle_significance", self.angle_significance),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// Label of a single footprint. A footprint without area stays `Isolated`.
pub fn classify_one(
    force: f64,
    confinement: f64,
    normalized_angle: f64,
    area: f64,
    cfg: &ClassifyCfg,
) -> RelativePosition {
    if area.is_nan() || area <= 0.0 {
        return RelativePosition::Isolated;
    }
    let root = area.sqrt();
    let nf = force / root;
    let nc = confinement / root;
    let mut label = RelativePosition::Isolated;
    if nf > cfg.force_significance {
        label = RelativePosition::Lateral;
    }
    if normalized_angle > cfg.angle_significance && nf > cfg.force_significance {
        label = RelativePosition::Corner;
    }
    if nc > cfg.force_significance {
        label = RelativePosition::Confined;
    }
    label
}

/// Append the `relative_position` column.
///
/// Reads `force`, `confinement` and `normalized_angle` (see `calc_forces`);
/// areas are taken in the projected working frame. The returned set keeps
/// the input frame and geometry.
pub fn relative_position(set: &FootprintSet, cfg: &ClassifyCfg) -> Result<FootprintSet> {
    cfg.validate()?;
    check_columns(set, &[RELATIVE_POSITION], cfg.overwrite)?;
    let force = set.number_column("force")?;
    let confinement = set.number_column("confinement")?;
    let angle = set.number_column("normalized_angle")?;
    let (_, polys) = set.working_copy();

    let mut out = set.clone();
    let mut counts = [0usize; 4];
    for (i, fp) in out.footprints.iter_mut().enumerate() {
        let area = polys[i].unsigned_area();
        let label = classify_one(force[i], confinement[i], angle[i], area, cfg);
        counts[label as usize] += 1;
        fp.attributes.insert(RELATIVE_POSITION, label.as_str());
    }
    tracing::debug!(
        isolated = counts[0],
        lateral = counts[1],
        corner = counts[2],
        confined = counts[3],
        "footprints classified"
    );
    Ok(out)
}
