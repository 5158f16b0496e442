//! Force pipeline configuration and result types.

use nalgebra::Vector2;

use crate::footprint::{FootprintId, Overwrite};
use crate::geom::ClipCfg;

/// Output columns written by `calc_forces`, in order.
pub const FORCE_COLUMNS: [&str; 4] = ["force", "confinement", "momentum", "normalized_angle"];

/// Force pipeline configuration.
#[derive(Clone, Debug, Default)]
pub struct ForceCfg {
    /// Interaction reach in working-frame units (>= 0). Edges no longer than
    /// this are discarded.
    pub buffer: f64,
    /// Numeric attribute scaling each footprint's normals (default 1).
    pub height_column: Option<String>,
    pub overwrite: Overwrite,
    pub clip: ClipCfg,
}

impl ForceCfg {
    pub fn with_buffer(buffer: f64) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }
}

/// Per-edge force contribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeForce {
    pub footprint: FootprintId,
    pub midpoint: Vector2<f64>,
    pub normal: Vector2<f64>,
    pub normal_length: f64,
    pub normal_length_sq: f64,
    /// Signed `(midpoint − centroid) × normal`.
    pub momentum: f64,
}

/// Per-footprint force descriptors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceAttrs {
    /// Magnitude of the resultant of all edge normals.
    pub force: f64,
    /// `sqrt(Σ|n|²) − force`; large when opposing pushes cancel. Dips below
    /// zero when one straight wall is split into several collinear edges.
    pub confinement: f64,
    /// `|Σ momentum|`.
    pub momentum: f64,
    /// Length-weighted mean angle between edge normals and the resultant, in [0, π/2].
    pub normalized_angle: f64,
}

impl ForceAttrs {
    pub const ZERO: ForceAttrs = ForceAttrs {
        force: 0.0,
        confinement: 0.0,
        momentum: 0.0,
        normalized_angle: 0.0,
    };

    /// Values in `FORCE_COLUMNS` order.
    pub fn values(&self) -> [f64; 4] {
        [
            self.force,
            self.confinement,
            self.momentum,
            self.normalized_angle,
        ]
    }
}
