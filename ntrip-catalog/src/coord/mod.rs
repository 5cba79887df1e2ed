//! Geographic predicates
//!
//! Pure numeric helpers shared by the stream filters and the rover
//! tie-break: longitude normalization and antimeridian-aware
//! point-in-bounding-box testing.

mod types;

pub use types::BBox;

/// Normalizes a longitude into `(-180, 180]` degrees.
///
/// Raw values of exactly -180 and 180 both normalize to 180. Non-finite
/// inputs are returned unchanged; they never compare inside any box.
///
/// Uses modular arithmetic rather than repeated add/subtract so that
/// pathologically large inputs terminate in constant time.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    let mut lon = lon % 360.0;
    if lon <= -180.0 {
        lon += 360.0;
    } else if lon > 180.0 {
        lon -= 360.0;
    }
    lon
}

/// Tests whether a point lies within a bounding box.
///
/// Latitude is a plain range check and never wraps. Longitudes (the point
/// and both box bounds) are normalized before comparison. When
/// `min_lon > max_lon` the box crosses the antimeridian and admits
/// longitudes `>= min_lon` or `<= max_lon`; otherwise the check is the
/// ordinary inclusive `[min_lon, max_lon]` range.
pub fn point_in_bbox(lat: f64, lon: f64, bbox: &BBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    let lon = normalize_lon(lon);
    let min_lon = normalize_lon(bbox.min_lon);
    let max_lon = normalize_lon(bbox.max_lon);

    if min_lon > max_lon {
        // crossing the antimeridian
        lon >= min_lon || lon <= max_lon
    } else {
        lon >= min_lon && lon <= max_lon
    }
}
