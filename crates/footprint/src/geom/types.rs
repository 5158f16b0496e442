//! Clipping configuration (tolerances and buffer style).

/// Boundary-clipper configuration.
#[derive(Clone, Copy, Debug)]
pub struct ClipCfg {
    /// Tolerance relative to the dataset extent. A boundary run closer than
    /// `eps_rel * extent` to the closed union's outline counts as lying on it.
    pub eps_rel: f64,
    /// Minimum sharp angle (radians) kept as a mitre when buffering; sharper
    /// corners are bevelled. `2·asin(1/5)` matches a mitre limit of 5.
    pub mitre_min_angle: f64,
}

impl Default for ClipCfg {
    fn default() -> Self {
        Self {
            eps_rel: 1e-7,
            mitre_min_angle: 2.0 * (0.2f64).asin(),
        }
    }
}

impl ClipCfg {
    /// Absolute tolerance for a dataset of the given extent.
    #[inline]
    pub fn tol(&self, extent: f64) -> f64 {
        if extent > 0.0 {
            self.eps_rel * extent
        } else {
            self.eps_rel
        }
    }
}
