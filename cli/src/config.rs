//! Config-file + env-var loading for `ClassifierConfig`.
//!
//! Follows the `UwbHubConfig::default()` idiom
//! (`std::env::var(...).ok().and_then(|v| v.parse().ok()).unwrap_or(default)`):
//! a `config.toml` supplies the base values, and per-field env vars override
//! whatever the file (or the driving-preset `Default`) set.

use std::path::Path;

use wf_types::ClassifierConfig;

/// Loads the base config from `path` (if given and present) over top of
/// `fallback`, then applies per-field env-var overrides.
pub fn load(path: Option<&Path>, fallback: ClassifierConfig) -> anyhow::Result<ClassifierConfig> {
    let mut cfg = match path {
        Some(p) if p.exists() => {
            let text = std::fs::read_to_string(p)?;
            toml::from_str(&text)?
        }
        _ => fallback,
    };

    if let Ok(v) = std::env::var("WF_T_MAX_GAP") {
        if let Ok(v) = v.parse() {
            cfg.t_max_gap = v;
        }
    }
    if let Ok(v) = std::env::var("WF_R_STATIONARY") {
        if let Ok(v) = v.parse() {
            cfg.r_stationary = v;
        }
    }
    if let Ok(v) = std::env::var("WF_MOBILE_DECIM_D") {
        if let Ok(v) = v.parse() {
            cfg.mobile_decim_d = v;
        }
    }
    if let Ok(v) = std::env::var("WF_MOBILE_DECIM_T") {
        if let Ok(v) = v.parse() {
            cfg.mobile_decim_t = v;
        }
    }
    if let Ok(v) = std::env::var("WF_MAX_SPEED_MS") {
        if let Ok(v) = v.parse() {
            cfg.max_speed_ms = v;
        }
    }

    Ok(cfg)
}
