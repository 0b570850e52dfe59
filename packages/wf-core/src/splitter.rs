//! Stationary/mobile split: a window qualifies as stationary when the
//! greatest pairwise distance between any two of its points ("diameter")
//! does not exceed `cfg.r_stationary`.
//!
//! Grounded on `wf/analysis/classifier.py::_split_stationary`.

use crate::geo::haversine_m;
use wf_types::{ClassifierConfig, Window};

/// Splits `wins` into `(stationary, mobile)`. A window whose diameter is
/// exactly `cfg.r_stationary` is classified stationary (`<=`).
pub fn split_stationary(wins: Vec<Window>, cfg: &ClassifierConfig) -> (Vec<Window>, Vec<Window>) {
    let mut stationary = Vec::new();
    let mut mobile = Vec::new();
    for w in wins {
        if window_diameter(&w, cfg.r_stationary) <= cfg.r_stationary {
            stationary.push(w);
        } else {
            mobile.push(w);
        }
    }
    (stationary, mobile)
}

/// Greatest pairwise haversine distance among `w`'s points. Exits early once
/// any pair exceeds `early_exit_above`, since the splitter only needs to
/// know whether the diameter clears the stationary threshold.
fn window_diameter(w: &Window, early_exit_above: f64) -> f64 {
    let pts = &w.points;
    let mut max_d = 0.0f64;
    for i in 0..pts.len() {
        for j in (i + 1)..pts.len() {
            let d = haversine_m((pts[i].lat, pts[i].lon), (pts[j].lat, pts[j].lon));
            if d > max_d {
                max_d = d;
            }
            if max_d > early_exit_above {
                return max_d;
            }
        }
    }
    max_d
}
