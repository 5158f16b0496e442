//! Force descriptors for building footprints.
//!
//! For each footprint we estimate how strongly, and from which directions,
//! neighbouring built mass presses against its boundary. The pipeline:
//!
//! footprints → `geom::clip` (closed union, facing boundary) →
//! `geom::edges` (one segment per boundary run) → `forces::normal`
//! (scaled normals, momentum) → `forces::aggregate` (per-footprint
//! resultant) → merge with zero fill → `classify`.
//!
//! Conventions
//! - Geometry is `geo` (`Polygon<f64>`, `MultiLineString<f64>`); vector
//!   algebra is `nalgebra::Vector2<f64>`.
//! - The working frame is always passed explicitly (`geom::Frame`); callers'
//!   data is never mutated, every stage returns a new `FootprintSet`.

pub mod classify;
pub mod error;
pub mod footprint;
pub mod forces;
pub mod geom;
pub mod shape;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use classify::{
    classify_one, relative_position, ClassifyCfg, RelativePosition, RELATIVE_POSITION,
};
pub use error::{Error, Result};
pub use footprint::{AttrValue, Attributes, Footprint, FootprintId, FootprintSet, Overwrite};
pub use forces::{calc_forces, ForceAttrs, ForceCfg, FORCE_COLUMNS};
pub use geom::{ClipCfg, Frame, Utm};
pub use nalgebra::Vector2 as Vec2;
pub use shape::{polsby_popper, POLSBY_POPPER};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::classify::{relative_position, ClassifyCfg, RelativePosition};
    pub use crate::error::{Error, Result};
    pub use crate::footprint::{AttrValue, Footprint, FootprintId, FootprintSet, Overwrite};
    pub use crate::forces::{calc_forces, ForceAttrs, ForceCfg, FORCE_COLUMNS};
    pub use crate::geom::rand::{draw_block, BlockCfg, ReplayToken};
    pub use crate::geom::{ClipCfg, Frame};
    pub use crate::shape::polsby_popper;
    pub use nalgebra::Vector2 as Vec2;
}

/// Scalar 2D cross product `a.x b.y - a.y b.x`.
/// Positive for a→b counterclockwise, negative otherwise.
#[inline]
pub fn cross2(a: Vec2<f64>, b: Vec2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
