//! Visibility windowing: partition each MAC's observations into maximal
//! runs separated by a silence gap of at least `cfg.t_max_gap` seconds.
//!
//! Grounded on `wf/analysis/classifier.py::_windowize`; the per-key grouping
//! style follows the keyed-`HashMap` stateful walk in `uwb_hub.rs::SeqTracker`.

use std::collections::HashMap;
use wf_types::{ClassifierConfig, Observation, Window};

/// Builds visibility windows from a flat observation list. Each MAC's
/// points are stable-sorted by `ts`; windows shorter than
/// `cfg.min_window_len` are dropped.
pub fn windowize(obs: Vec<Observation>, cfg: &ClassifierConfig) -> Vec<Window> {
    let mut by_mac: HashMap<_, Vec<Observation>> = HashMap::new();
    for o in obs {
        by_mac.entry(o.mac).or_default().push(o);
    }

    let mut windows = Vec::new();
    for (mac, mut pts) in by_mac {
        pts.sort_by_key(|o| o.ts);

        let mut current: Vec<Observation> = Vec::new();
        for o in pts {
            if let Some(prev) = current.last() {
                if o.ts - prev.ts >= cfg.t_max_gap {
                    push_window(&mut windows, mac, std::mem::take(&mut current), cfg);
                }
            }
            current.push(o);
        }
        push_window(&mut windows, mac, current, cfg);
    }
    windows
}

fn push_window(
    out: &mut Vec<Window>,
    mac: wf_types::Mac,
    points: Vec<Observation>,
    cfg: &ClassifierConfig,
) {
    if points.len() < cfg.min_window_len {
        return;
    }
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        out.push(Window {
            mac,
            ts_start: first.ts,
            ts_end: last.ts,
            points,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(mac: &str, ts: i64) -> Observation {
        Observation { mac: mac.parse().unwrap(), ts, lat: 0.0, lon: 0.0, rssi: -60.0 }
    }

    #[test]
    fn a_gap_at_or_above_t_max_gap_splits_a_window() {
        let cfg = ClassifierConfig::default();
        let obs = vec![
            obs("AA:AA:AA:AA:AA:AA", 0),
            obs("AA:AA:AA:AA:AA:AA", 10),
            obs("AA:AA:AA:AA:AA:AA", 10 + cfg.t_max_gap),
        ];
        let windows = windowize(obs, &cfg);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows.iter().map(|w| w.points.len()).sum::<usize>(), 3);
    }

    #[test]
    fn a_gap_just_under_t_max_gap_does_not_split() {
        let cfg = ClassifierConfig::default();
        let obs = vec![
            obs("AA:AA:AA:AA:AA:AA", 0),
            obs("AA:AA:AA:AA:AA:AA", cfg.t_max_gap - 1),
        ];
        let windows = windowize(obs, &cfg);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].points.len(), 2);
    }

    #[test]
    fn distinct_macs_never_share_a_window() {
        let cfg = ClassifierConfig::default();
        let obs = vec![obs("AA:AA:AA:AA:AA:AA", 0), obs("BB:BB:BB:BB:BB:BB", 0)];
        let windows = windowize(obs, &cfg);
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn windows_below_min_window_len_are_dropped() {
        let mut cfg = ClassifierConfig::default();
        cfg.min_window_len = 2;
        let obs = vec![obs("AA:AA:AA:AA:AA:AA", 0)];
        assert!(windowize(obs, &cfg).is_empty());
    }
}
