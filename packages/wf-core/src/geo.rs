//! Great-circle distance and RSSI-weighted geometric median.
//!
//! Same formula as `wf/utils/geo.py::haversine` / `geometric_median`, with
//! the iterate/converge/cap shape of an iterative weighted solver
//! (`trilateration.rs::solve`).

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum Weiszfeld iterations before falling back to the last iterate.
pub const MAX_WEISZFELD_ITER: u32 = 1000;

/// Convergence threshold (metres) on successive-iterate movement.
pub const WEISZFELD_EPS: f64 = 1e-6;

/// Great-circle distance between `(lat, lon)` pairs, in metres.
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = phi2 - phi1;
    let d_lam = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lam / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}

/// Result of a Weiszfeld geometric-median solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianResult {
    pub lat: f64,
    pub lon: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// RSSI-weighted geometric median (Weiszfeld's algorithm) over `points`,
/// each paired with a non-negative `weights` entry. Starts at the weighted
/// centroid; iterates until successive estimates move under `WEISZFELD_EPS`
/// or `MAX_WEISZFELD_ITER` is reached, in which case the last iterate is
/// returned with `converged = false`.
///
/// Panics if `points` and `weights` differ in length or are empty, or if the
/// total weight is zero — callers (the aggregator) must filter those cases
/// before calling in, logging a warning instead of invoking this function.
pub fn geometric_median(points: &[(f64, f64)], weights: &[f64]) -> MedianResult {
    assert_eq!(points.len(), weights.len(), "points/weights length mismatch");
    assert!(!points.is_empty(), "geometric_median requires at least one point");
    let total_w: f64 = weights.iter().sum();
    assert!(total_w > 0.0, "geometric_median requires positive total weight");

    let mut x_lat: f64 = points.iter().zip(weights).map(|((lat, _), w)| w * lat).sum::<f64>() / total_w;
    let mut x_lon: f64 = points.iter().zip(weights).map(|((_, lon), w)| w * lon).sum::<f64>() / total_w;

    for iter in 1..=MAX_WEISZFELD_ITER {
        let mut num_lat = 0.0;
        let mut num_lon = 0.0;
        let mut denom = 0.0;
        for ((lat, lon), w) in points.iter().zip(weights) {
            let d = haversine_m((x_lat, x_lon), (*lat, *lon)).max(1e-12);
            let inv = w / d;
            num_lat += inv * lat;
            num_lon += inv * lon;
            denom += inv;
        }
        let new_lat = num_lat / denom;
        let new_lon = num_lon / denom;
        let moved = haversine_m((x_lat, x_lon), (new_lat, new_lon));
        x_lat = new_lat;
        x_lon = new_lon;
        if moved < WEISZFELD_EPS {
            return MedianResult { lat: x_lat, lon: x_lon, iterations: iter, converged: true };
        }
    }

    MedianResult { lat: x_lat, lon: x_lon, iterations: MAX_WEISZFELD_ITER, converged: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_of_a_point_with_itself_is_zero() {
        assert_eq!(haversine_m((40.0, -73.0), (40.0, -73.0)), 0.0);
    }

    #[test]
    fn haversine_one_degree_longitude_at_equator_is_about_111km() {
        let d = haversine_m((0.0, 0.0), (0.0, 1.0));
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn geometric_median_of_a_single_point_is_itself() {
        let result = geometric_median(&[(10.0, 20.0)], &[1.0]);
        assert!(result.converged);
        assert!((result.lat - 10.0).abs() < 1e-9);
        assert!((result.lon - 20.0).abs() < 1e-9);
    }

    #[test]
    fn geometric_median_of_symmetric_points_is_the_midpoint() {
        let result = geometric_median(&[(0.0, -1.0), (0.0, 1.0)], &[1.0, 1.0]);
        assert!(result.converged);
        assert!(result.lat.abs() < 1e-6);
        assert!(result.lon.abs() < 1e-6);
    }

    #[test]
    fn geometric_median_is_pulled_toward_the_heavier_weight() {
        let unweighted = geometric_median(&[(0.0, -1.0), (0.0, 1.0)], &[1.0, 1.0]);
        let weighted = geometric_median(&[(0.0, -1.0), (0.0, 1.0)], &[10.0, 1.0]);
        assert!(weighted.lon < unweighted.lon);
    }
}
