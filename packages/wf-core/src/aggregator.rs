//! Static AP aggregation: RSSI-weighted geometric median over stationary
//! windows.
//!
//! Runs as a two-reduction pipeline — collapse each window to a weighted
//! centroid first, then run Weiszfeld only over those per-MAC centroid
//! summaries — the ~100x speed-up documented directly in
//! `wf/analysis/classifier.py::_aggregate_static`, instead of re-running the
//! geometric median over every raw observation.

use std::collections::HashMap;

use rayon::prelude::*;
use wf_types::{ClassifierConfig, Mac, StaticAp, Window};

use crate::geo::{geometric_median, haversine_m};

struct WindowCentroid {
    lat: f64,
    lon: f64,
    weight: f64,
    ts_start: i64,
    ts_end: i64,
    n_obs: u64,
}

/// RSSI linear-power weight for a given dBm reading.
fn rssi_weight(rssi: f64) -> f64 {
    10f64.powf(rssi / 10.0)
}

fn collapse_window(w: &Window) -> WindowCentroid {
    let weights: Vec<f64> = w.points.iter().map(|p| rssi_weight(p.rssi)).collect();
    let total_w: f64 = weights.iter().sum();
    let lat = w
        .points
        .iter()
        .zip(&weights)
        .map(|(p, wt)| wt * p.lat)
        .sum::<f64>()
        / total_w;
    let lon = w
        .points
        .iter()
        .zip(&weights)
        .map(|(p, wt)| wt * p.lon)
        .sum::<f64>()
        / total_w;
    WindowCentroid {
        lat,
        lon,
        weight: total_w,
        ts_start: w.ts_start,
        ts_end: w.ts_end,
        n_obs: w.points.len() as u64,
    }
}

/// Aggregates stationary windows into one `StaticAp` row per MAC. A MAC
/// whose windows sum to zero total weight is skipped with a
/// `tracing::warn!`, never causing the run to fail. Output is sorted
/// lexicographically by MAC to keep the parallel per-MAC fan-out
/// deterministic.
pub fn aggregate_static(stat_wins: Vec<Window>, _cfg: &ClassifierConfig) -> Vec<StaticAp> {
    let mut by_mac: HashMap<Mac, Vec<WindowCentroid>> = HashMap::new();
    for w in &stat_wins {
        by_mac.entry(w.mac).or_default().push(collapse_window(w));
    }

    let mut rows: Vec<StaticAp> = by_mac
        .into_par_iter()
        .filter_map(|(mac, centroids)| {
            let total_w: f64 = centroids.iter().map(|c| c.weight).sum();
            if total_w <= 0.0 {
                tracing::warn!(%mac, "skipping MAC with zero total weight in static aggregation");
                return None;
            }

            let points: Vec<(f64, f64)> = centroids.iter().map(|c| (c.lat, c.lon)).collect();
            let weights: Vec<f64> = centroids.iter().map(|c| c.weight).collect();
            let median = geometric_median(&points, &weights);
            if !median.converged {
                tracing::warn!(
                    %mac,
                    iterations = median.iterations,
                    "Weiszfeld solve did not converge; using final iterate"
                );
            }

            let loc_error_m = centroids
                .iter()
                .map(|c| c.weight * haversine_m((median.lat, median.lon), (c.lat, c.lon)))
                .sum::<f64>()
                / total_w;

            let first_seen = centroids.iter().map(|c| c.ts_start).min().unwrap();
            let last_seen = centroids.iter().map(|c| c.ts_end).max().unwrap();
            let n_obs = centroids.iter().map(|c| c.n_obs).sum();

            Some(StaticAp {
                mac,
                lat_mean: median.lat,
                lon_mean: median.lon,
                loc_error_m,
                first_seen,
                last_seen,
                n_obs,
            })
        })
        .collect();

    rows.sort_by_key(|r| r.mac);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_types::Observation;

    fn window(mac: &str, ts_start: i64, ts_end: i64, pts: Vec<(f64, f64, f64)>) -> Window {
        let mac: Mac = mac.parse().unwrap();
        let points = pts
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon, rssi))| Observation {
                mac,
                ts: ts_start + i as i64,
                lat,
                lon,
                rssi,
            })
            .collect();
        Window { mac, ts_start, ts_end, points }
    }

    #[test]
    fn aggregates_a_single_mac_to_its_weighted_center() {
        let cfg = ClassifierConfig::default();
        let w = window(
            "AA:AA:AA:AA:AA:AA",
            0,
            10,
            vec![(40.0, -73.0, -50.0), (40.001, -73.001, -50.0)],
        );
        let rows = aggregate_static(vec![w], &cfg);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].n_obs, 2);
        assert_eq!(rows[0].first_seen, 0);
        assert_eq!(rows[0].last_seen, 10);
    }

    #[test]
    fn stronger_rssi_pulls_the_median_toward_it() {
        let cfg = ClassifierConfig::default();
        let w = window(
            "AA:AA:AA:AA:AA:AA",
            0,
            1,
            vec![(40.0, -73.0, -30.0), (41.0, -73.0, -80.0)],
        );
        let rows = aggregate_static(vec![w], &cfg);
        assert!(rows[0].lat_mean < 40.5);
    }

    #[test]
    fn output_is_sorted_lexicographically_by_mac() {
        let cfg = ClassifierConfig::default();
        let w1 = window("BB:BB:BB:BB:BB:BB", 0, 1, vec![(1.0, 1.0, -50.0)]);
        let w2 = window("AA:AA:AA:AA:AA:AA", 0, 1, vec![(2.0, 2.0, -50.0)]);
        let rows = aggregate_static(vec![w1, w2], &cfg);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].mac < rows[1].mac);
    }
}
