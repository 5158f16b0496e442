//! Coordinate frames and the local projected working frame.
//!
//! Distance-based operations (buffering, lengths, areas) need a linear frame.
//! Geographic input (lon/lat degrees, WGS84) is projected to the UTM zone
//! covering the dataset; projected input is used as is. The chosen frame is
//! returned to the caller together with the projected copy; nothing here keeps
//! frame state between calls.
//!
//! UTM uses the Krüger series to third order in the third flattening `n`
//! (sub-millimetre inside a zone).

use geo::{Coord, CoordsIter, MapCoords, Polygon};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Coordinate reference frame of a footprint set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Longitude/latitude in degrees (WGS84). Not linear.
    Geographic,
    /// Universal Transverse Mercator, metres.
    Utm(Utm),
    /// Some already projected, linear frame (units as given).
    Planar,
}

impl Frame {
    #[inline]
    pub fn is_projected(&self) -> bool {
        !matches!(self, Frame::Geographic)
    }
}

/// A UTM zone (1..=60) and hemisphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Utm {
    pub zone: u8,
    pub north: bool,
}

struct Series {
    e: f64,
    a_rect: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
}

fn series() -> Series {
    let n = WGS84_F / (2.0 - WGS84_F);
    let n2 = n * n;
    let n3 = n2 * n;
    Series {
        e: 2.0 * n.sqrt() / (1.0 + n),
        a_rect: WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0),
        alpha: [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
            61.0 * n3 / 240.0,
        ],
        beta: [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
            n2 / 48.0 + n3 / 15.0,
            17.0 * n3 / 480.0,
        ],
        delta: [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ],
    }
}

impl Utm {
    /// Zone containing `(lon, lat)` in degrees.
    pub fn containing(lon: f64, lat: f64) -> Self {
        let lon = ((lon + 180.0).rem_euclid(360.0)) - 180.0;
        let zone = (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;
        Self {
            zone,
            north: lat >= 0.0,
        }
    }

    /// EPSG code of the WGS84 / UTM zone.
    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + self.zone as u32
    }

    /// Central meridian in degrees.
    #[inline]
    pub fn central_meridian(&self) -> f64 {
        self.zone as f64 * 6.0 - 183.0
    }

    fn false_northing(&self) -> f64 {
        if self.north {
            0.0
        } else {
            UTM_FALSE_NORTHING_SOUTH
        }
    }

    /// `(lon, lat)` degrees → `(easting, northing)` metres.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let s = series();
        let phi = lat.to_radians();
        let dl = (lon - self.central_meridian()).to_radians();
        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - s.e * (s.e * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(dl.cos());
        let eta_p = (dl.sin() / (1.0 + t * t).sqrt()).atanh();
        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }
        let easting = UTM_FALSE_EASTING + UTM_K0 * s.a_rect * eta;
        let northing = self.false_northing() + UTM_K0 * s.a_rect * xi;
        (easting, northing)
    }

    /// `(easting, northing)` metres → `(lon, lat)` degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let s = series();
        let xi = (northing - self.false_northing()) / (UTM_K0 * s.a_rect);
        let eta = (easting - UTM_FALSE_EASTING) / (UTM_K0 * s.a_rect);
        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in s.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }
        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in s.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += d * (k * chi).sin();
        }
        let dl = eta_p.sinh().atan2(xi_p.cos());
        (self.central_meridian() + dl.to_degrees(), phi.to_degrees())
    }
}

/// UTM zone for the mean vertex of `polys` (geographic coordinates).
///
/// Returns `None` when there are no vertices.
pub fn estimate_utm(polys: &[Polygon<f64>]) -> Option<Utm> {
    let mut n = 0usize;
    let mut sx = 0.0;
    let mut sy = 0.0;
    for p in polys {
        for c in p.exterior_coords_iter() {
            sx += c.x;
            sy += c.y;
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    Some(Utm::containing(sx / n as f64, sy / n as f64))
}

/// Projected working copy of `polys` and the frame it lives in.
///
/// Projected input is cloned unchanged. Geographic input is projected to the
/// estimated UTM zone; an empty geographic set stays `Geographic`.
pub fn to_working_frame(frame: Frame, polys: &[Polygon<f64>]) -> (Frame, Vec<Polygon<f64>>) {
    if frame.is_projected() {
        return (frame, polys.to_vec());
    }
    let Some(utm) = estimate_utm(polys) else {
        return (frame, polys.to_vec());
    };
    let projected = polys
        .iter()
        .map(|p| {
            p.map_coords(|c| {
                let (x, y) = utm.forward(c.x, c.y);
                Coord { x, y }
            })
        })
        .collect();
    tracing::debug!(
        zone = utm.zone,
        north = utm.north,
        epsg = utm.epsg(),
        "projected to UTM"
    );
    (Frame::Utm(utm), projected)
}
