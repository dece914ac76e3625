use std::f64::consts::FRAC_PI_2;

use crate::models::BoundingBox;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometres per degree, used only for prefiltering
pub const KM_PER_DEGREE: f64 = 111.0;

/// Below this |cos(latitude)| the origin is treated as a pole
const POLE_COS_EPSILON: f64 = 1e-9;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate a bounding box around a center point
///
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude). The box is a
/// superset of the search circle: it may contain points farther than
/// `radius_km`, but never drops one that is within it.
///
/// The longitude range falls back to the whole globe when the origin sits on
/// a pole, when the circle contains a pole, or when the range would wrap
/// across the antimeridian.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let min_lat = (lat - lat_delta).max(-90.0);
    let max_lat = (lat + lat_delta).min(90.0);

    match longitude_delta(lat, radius_km) {
        Some(lon_delta) if lon - lon_delta >= -180.0 && lon + lon_delta <= 180.0 => BoundingBox {
            min_lat,
            max_lat,
            min_lon: lon - lon_delta,
            max_lon: lon + lon_delta,
        },
        _ => BoundingBox {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        },
    }
}

/// Half-width of the box in degrees of longitude, or `None` when every
/// longitude has to be scanned
fn longitude_delta(lat: f64, radius_km: f64) -> Option<f64> {
    let cos_lat = lat.to_radians().cos().abs();
    if cos_lat < POLE_COS_EPSILON {
        return None;
    }

    let angular = radius_km / EARTH_RADIUS_KM;
    if angular >= FRAC_PI_2 {
        return None;
    }

    // Tangent meridian of a spherical cap; >= 1 means the cap covers a pole
    let ratio = angular.sin() / cos_lat;
    if ratio >= 1.0 {
        return None;
    }

    let approximate = radius_km / (KM_PER_DEGREE * cos_lat);
    let exact = ratio.asin().to_degrees();
    let delta = approximate.max(exact);

    (delta < 180.0).then_some(delta)
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(
    lat: f64,
    lon: f64,
    bbox: &BoundingBox,
) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}

/// Round a distance to 2 decimal places
#[inline]
pub fn round_distance(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}
