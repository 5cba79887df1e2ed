//! Geographic bounding box type

use serde::Deserialize;

/// Geographic bounding box in degrees.
///
/// The catalog wire format is a 4-element array
/// `[min_lon, min_lat, max_lon, max_lat]`, which this type deserializes
/// from directly.
///
/// `min_lon > max_lon` is a valid encoding: it means the box wraps across
/// the ±180° antimeridian and covers longitudes `>= min_lon` or `<= max_lon`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct BBox {
    /// Western bound (eastern bound of the gap for wrapping boxes)
    pub min_lon: f64,
    /// Southern bound
    pub min_lat: f64,
    /// Eastern bound
    pub max_lon: f64,
    /// Northern bound
    pub max_lat: f64,
}

impl BBox {
    /// Creates a bounding box from `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }
}

impl From<[f64; 4]> for BBox {
    fn from(raw: [f64; 4]) -> Self {
        Self::new(raw[0], raw[1], raw[2], raw[3])
    }
}
