//! Force field of a footprint set.
//!
//! Purpose
//! - Per edge: midpoint, normal scaled by `height × length`, momentum about
//!   the footprint centroid (`normal`).
//! - Per footprint: resultant ("force"), confinement, |momentum| and the
//!   length-weighted mean deviation angle (`aggregate`).
//! - `calc_forces` wires frame handling, clipping, decomposition and the
//!   aggregation, and writes the results back as attributes (`pipeline`).
//!
//! Sign convention
//! - Rings are traversed exterior-CCW, so every scaled normal points into its
//!   own footprint: a wall shared with a neighbour on the east pushes west.

mod aggregate;
mod normal;
mod pipeline;
mod types;

pub use aggregate::aggregate;
pub use normal::{angle_between, calculate_momentum, edge_force, scaled_normal_at_center};
pub use pipeline::{calc_forces, force_attrs, resolve_heights};
pub use types::{EdgeForce, ForceAttrs, ForceCfg, FORCE_COLUMNS};
