//! # wf-types
//!
//! Shared value types for the Wi-Fi forensics classification engine.
//!
//! These types are used by:
//! - `wf-core`: the classification pipeline (windowing, splitting, aggregation, decimation)
//! - `wf-store`: the observation-store and artifact-sink implementations
//! - `server` / `cli`: the HTTP and command-line collaborators
//!
//! ## Coordinate Conventions
//!
//! Latitude/longitude are decimal degrees (WGS84). Timestamps are `i64`
//! seconds since the Unix epoch. All derived distances are metres and all
//! internal math is `f64` (see `wf-core::geo` for the haversine/Weiszfeld
//! implementations that consume these types).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── MAC address ────────────────────────────────────────────────────────────

/// A 48-bit hardware identifier in canonical `XX:XX:XX:XX:XX:XX` textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mac([u8; 6]);

#[derive(Debug, Error)]
pub enum MacParseError {
    #[error("expected 6 colon-separated hex octets, got {0}")]
    WrongOctetCount(usize),
    #[error("invalid hex octet {0:?}")]
    InvalidOctet(String),
}

impl Mac {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The locally-administered bit (0x02 of the first octet) indicates a
    /// randomised/privacy address rather than a manufacturer-assigned one.
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for Mac {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(MacParseError::WrongOctetCount(parts.len()));
        }
        let mut octets = [0u8; 6];
        for (i, p) in parts.iter().enumerate() {
            octets[i] = u8::from_str_radix(p, 16)
                .map_err(|_| MacParseError::InvalidOctet(p.to_string()))?;
        }
        Ok(Mac(octets))
    }
}

impl TryFrom<String> for Mac {
    type Error = MacParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Mac> for String {
    fn from(mac: Mac) -> Self {
        mac.to_string()
    }
}

// ── Observation ────────────────────────────────────────────────────────────

/// A single geo-tagged packet sighting. Atomic and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub mac: Mac,
    /// Seconds since the Unix epoch.
    pub ts: i64,
    pub lat: f64,
    pub lon: f64,
    /// Received signal strength, dBm.
    pub rssi: f64,
}

// ── Window ─────────────────────────────────────────────────────────────────

/// A maximal run of one MAC's observations separated by gaps under
/// `ClassifierConfig::t_max_gap`. Points are sorted non-decreasing by `ts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub mac: Mac,
    pub ts_start: i64,
    pub ts_end: i64,
    pub points: Vec<Observation>,
}

// ── Derived artifacts ──────────────────────────────────────────────────────

/// One estimated static access-point location, produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAp {
    pub mac: Mac,
    pub lat_mean: f64,
    pub lon_mean: f64,
    pub loc_error_m: f64,
    pub first_seen: i64,
    pub last_seen: i64,
    pub n_obs: u64,
}

/// One point in a decimated mobile track, produced by the decimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobileTrackPoint {
    pub mac: Mac,
    pub ts: i64,
    pub lat: f64,
    pub lon: f64,
}

// ── Configuration ──────────────────────────────────────────────────────────

/// Tunables for the classification pipeline. Only this struct is
/// authoritative at runtime — module-level constants elsewhere exist solely
/// to seed `Default`/`walking()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Silence gap (s) that closes a visibility window.
    pub t_max_gap: i64,
    /// Minimum observations per window to emit it.
    pub min_window_len: usize,
    /// Maximum intra-window diameter (m) to classify as stationary.
    pub r_stationary: f64,
    /// Distance keep-threshold (m) for mobile-track decimation.
    pub mobile_decim_d: f64,
    /// Time keep-threshold (s) for mobile-track decimation.
    pub mobile_decim_t: i64,
    /// Maximum plausible speed (m/s); faster implies a spurious fix.
    pub max_speed_ms: f64,
}

impl Default for ClassifierConfig {
    /// The "driving" preset — the pipeline's baseline tuning.
    fn default() -> Self {
        Self {
            t_max_gap: 120,
            min_window_len: 1,
            r_stationary: 350.0,
            mobile_decim_d: 100.0,
            mobile_decim_t: 30,
            max_speed_ms: 200_000.0 / 3600.0, // 200 km/h
        }
    }
}

impl ClassifierConfig {
    /// Preset for vehicle-borne collection (alias for `Default`).
    pub fn driving() -> Self {
        Self::default()
    }

    /// Preset for pedestrian collection — tighter thresholds throughout.
    pub fn walking() -> Self {
        Self {
            t_max_gap: 60,
            min_window_len: 1,
            r_stationary: 50.0,
            mobile_decim_d: 10.0,
            mobile_decim_t: 5,
            max_speed_ms: 8_000.0 / 3600.0, // 8 km/h
        }
    }
}
