//! Geographic coordinate type and great-circle utilities.
//!
//! `GeoPoint` stores WGS-84 latitude/longitude as `f64`.  Route lengths are
//! summed over thousands of edges and compared with a tight epsilon, so the
//! extra precision over `f32` is worth the memory.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and within the WGS-84 range.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Return `self` if it is a valid coordinate, otherwise
    /// [`CoreError::InvalidCoordinate`].
    pub fn validated(self) -> Result<Self, CoreError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CoreError::InvalidCoordinate { lat: self.lat, lon: self.lon })
        }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        // Clamp: rounding can push `a` a hair above 1 for antipodal points.
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        EARTH_RADIUS_M * c
    }

    /// Project onto the unit sphere as 3-D Cartesian `[x, y, z]`.
    ///
    /// Chord length between two projected points is `2 sin(θ/2)` for central
    /// angle θ, which is strictly increasing on `[0, π]`.  Nearest-by-chord is
    /// therefore exactly nearest-by-great-circle, with no east-west
    /// distortion away from the equator.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parses the `"lat,lon"` text form (whitespace around either part is
/// ignored) and validates the range.
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || CoreError::ParseCoordinate(s.to_owned());

        let (lat, lon) = s.split_once(',').ok_or_else(parse_err)?;
        let lat: f64 = lat.trim().parse().map_err(|_| parse_err())?;
        let lon: f64 = lon.trim().parse().map_err(|_| parse_err())?;
        GeoPoint::new(lat, lon).validated()
    }
}
