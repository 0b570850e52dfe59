//! JSON-file-backed `ObservationStore`/`ArtifactSink` for local/offline mode
//! and test fixtures.
//!
//! Grounded on `persistence.rs`'s `load_state`/`save_state`: read-or-default
//! on load, full rewrite on save, log-and-continue rather than panic on a
//! missing or corrupt file.

use std::path::PathBuf;

use tokio::fs;
use wf_core::error::StoreError;
use wf_core::{normalize_observations, ArtifactSink, ObservationStore};
use wf_types::{MobileTrackPoint, Observation, StaticAp};

/// Backs the pipeline with three flat JSON files under a directory: one for
/// input observations (read-only from this store's perspective) and one
/// each for the two derived artifacts (overwritten wholesale on every run).
pub struct JsonFileStore {
    observations_path: PathBuf,
    static_aps_path: PathBuf,
    mobile_track_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            observations_path: dir.join("observations.json"),
            static_aps_path: dir.join("static_ap.json"),
            mobile_track_path: dir.join("mobile_track.json"),
        }
    }
}

#[async_trait::async_trait]
impl ObservationStore for JsonFileStore {
    async fn load_observations(&self) -> Result<Vec<Observation>, StoreError> {
        if !self.observations_path.exists() {
            tracing::info!(path = %self.observations_path.display(), "no observations file found, returning empty set");
            return Ok(Vec::new());
        }

        match fs::read_to_string(&self.observations_path).await {
            Ok(data) => match serde_json::from_str::<Vec<Observation>>(&data) {
                Ok(obs) => Ok(normalize_observations(obs)),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse observations.json, returning empty set");
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to read observations.json, returning empty set");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait::async_trait]
impl ArtifactSink for JsonFileStore {
    async fn replace_derived_tables(
        &self,
        static_aps: &[StaticAp],
        mobile_track: &[MobileTrackPoint],
    ) -> Result<(), StoreError> {
        let static_json =
            serde_json::to_string_pretty(static_aps).map_err(|e| StoreError::Serde(e.to_string()))?;
        fs::write(&self.static_aps_path, static_json).await?;

        let mobile_json =
            serde_json::to_string_pretty(mobile_track).map_err(|e| StoreError::Serde(e.to_string()))?;
        fs::write(&self.mobile_track_path, mobile_json).await?;

        Ok(())
    }
}
