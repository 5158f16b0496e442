//! 2D footprint geometry: frames, boundary clipping, edge decomposition.
//!
//! Purpose
//! - Bring footprints into a projected working frame (`frame`).
//! - Compute each footprint's working boundary: the part of its ring that
//!   faces other built mass within the buffer distance (`clip`).
//! - Split working boundaries into straight 2-point edges (`edges`).
//!
//! Conventions
//! - Rings are oriented exterior-CCW / holes-CW before traversal, so the
//!   left-rotated tangent `(x, y) ↦ (-y, x)` of every edge points into its
//!   own footprint.
//! - Tolerances are relative to the dataset extent (`ClipCfg::eps_rel`).

pub mod clip;
pub mod edges;
pub mod frame;
pub mod rand;
mod types;
mod util;

pub use clip::{close, working_boundaries};
pub use edges::{explode_edges, Edge};
pub use frame::{estimate_utm, to_working_frame, Frame, Utm};
pub use types::ClipCfg;
pub use util::{coord, extent, vec2};
