//! Input-integrity normalization shared by every `ObservationStore`
//! implementation: rows with NaN coordinates are excluded, and duplicate
//! `(mac, ts, lat, lon, rssi)` rows are collapsed to one. A store backend
//! whose query language can express this itself (the SQL store's
//! `SELECT DISTINCT ... WHERE lat IS NOT NULL`) may rely on that instead,
//! but a store with no such primitive (the JSON-file store) must run its
//! loaded rows through this function to honor the same contract.

use std::collections::HashSet;

use wf_types::Observation;

/// Drops observations with NaN coordinates and collapses exact duplicate
/// five-tuples, logging a summary warning when more than 10% of the input
/// was dropped.
pub fn normalize_observations(raw: Vec<Observation>) -> Vec<Observation> {
    let total = raw.len();
    let mut seen = HashSet::new();
    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(total);

    for o in raw {
        if o.lat.is_nan() || o.lon.is_nan() {
            tracing::warn!(mac = %o.mac, "dropping observation with NaN coordinates");
            dropped += 1;
            continue;
        }
        let key = (o.mac, o.ts, o.lat.to_bits(), o.lon.to_bits(), o.rssi.to_bits());
        if !seen.insert(key) {
            dropped += 1;
            continue;
        }
        out.push(o);
    }

    if total > 0 && dropped * 10 > total {
        tracing::warn!(
            dropped,
            total,
            "more than 10% of loaded observations were dropped for input-integrity reasons"
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(mac: &str, ts: i64, lat: f64, lon: f64) -> Observation {
        Observation { mac: mac.parse().unwrap(), ts, lat, lon, rssi: -60.0 }
    }

    #[test]
    fn drops_nan_coordinates() {
        let rows = vec![obs("AA:AA:AA:AA:AA:AA", 0, f64::NAN, 1.0)];
        assert!(normalize_observations(rows).is_empty());
    }

    #[test]
    fn collapses_exact_duplicate_rows() {
        let rows = vec![
            obs("AA:AA:AA:AA:AA:AA", 0, 1.0, 1.0),
            obs("AA:AA:AA:AA:AA:AA", 0, 1.0, 1.0),
        ];
        assert_eq!(normalize_observations(rows).len(), 1);
    }

    #[test]
    fn keeps_rows_differing_only_in_rssi() {
        let mut a = obs("AA:AA:AA:AA:AA:AA", 0, 1.0, 1.0);
        let b = Observation { rssi: -70.0, ..a };
        a.rssi = -60.0;
        assert_eq!(normalize_observations(vec![a, b]).len(), 2);
    }
}
