//! Geodetic coordinates and their Cartesian conversion.
//!
//! CSV sources usually carry WGS-84 latitude/longitude/altitude; the engine
//! works in Euclidean space, so loaded coordinates are converted to
//! Earth-centered Earth-fixed (ECEF) metres before use. Straight-line ECEF
//! distance under-reads the surface distance for far-apart points but is a
//! consistent metric, which is all the greedy selection needs.

use serde::{Deserialize, Serialize};

use crate::point::Point3;

/// WGS-84 semi-major axis, metres.
const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// A WGS-84 geographic coordinate (degrees, metres above the ellipsoid).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

impl GeoCoord {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Convert to ECEF Cartesian metres.
    pub fn to_ecef(&self) -> Point3 {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let lat = self.lat_deg.to_radians();
        let lon = self.lon_deg.to_radians();

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();

        // Prime-vertical radius of curvature.
        let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Point3 {
            x: (n + self.alt_m) * cos_lat * lon.cos(),
            y: (n + self.alt_m) * cos_lat * lon.sin(),
            z: (n * (1.0 - e2) + self.alt_m) * sin_lat,
        }
    }
}

impl From<GeoCoord> for Point3 {
    fn from(coord: GeoCoord) -> Self {
        coord.to_ecef()
    }
}
