//! The six-stage pipeline driver.
//!
//! `PipelineRunner::run_once` is `async fn` so it composes with the Tokio
//! runtime and can be spawned as a periodic job (mirroring `run_engine_tick`
//! in `main.rs`), even though every stage inside it runs synchronously to
//! completion with no suspension points.

use std::sync::Arc;

use wf_types::{ClassifierConfig, MobileTrackPoint, Observation, StaticAp};

use crate::aggregator::aggregate_static;
use crate::decimator::decimate_mobile;
use crate::error::{ClassifyError, StoreError};
use crate::splitter::split_stationary;
use crate::windowizer::windowize;

/// The narrow seam the pipeline depends on for input, following the same
/// narrow-async-trait-boundary pattern used around persistence elsewhere
/// (`persistence::load_state`, `AuditLogger`).
#[async_trait::async_trait]
pub trait ObservationStore: Send + Sync {
    async fn load_observations(&self) -> Result<Vec<Observation>, StoreError>;
}

/// The narrow seam the pipeline depends on for output. A single
/// implementation may back both this and `ObservationStore` when the loader
/// and writer share one pool. Both derived tables are replaced by a single
/// call so an implementation can cover the drop+recreate+bulk-insert of
/// both tables in one transaction; a failure partway through must leave
/// both tables exactly as they were at run start, never one replaced and
/// the other stale.
#[async_trait::async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn replace_derived_tables(
        &self,
        static_aps: &[StaticAp],
        mobile_track: &[MobileTrackPoint],
    ) -> Result<(), StoreError>;
}

/// Outcome of one full classification run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub observations_loaded: usize,
    pub windows: usize,
    pub stationary_windows: usize,
    pub mobile_windows: usize,
    pub static_aps: usize,
    pub mobile_track_points: usize,
}

/// Orchestrates one run of the classification pipeline against a given
/// store/sink pair and configuration.
pub struct PipelineRunner<S> {
    store: Arc<S>,
    cfg: ClassifierConfig,
}

impl<S> PipelineRunner<S>
where
    S: ObservationStore + ArtifactSink,
{
    pub fn new(store: Arc<S>, cfg: ClassifierConfig) -> Self {
        Self { store, cfg }
    }

    /// Runs the full Loader -> Windowizer -> Splitter -> Aggregator ->
    /// Decimator -> Writer pipeline once, rebuilding both derived tables
    /// wholesale. Only fatal store errors propagate; input-integrity and
    /// non-convergence issues are logged internally by each stage.
    pub async fn run_once(&self) -> Result<RunReport, ClassifyError> {
        tracing::info!("starting classification run");

        let obs = self.store.load_observations().await?;
        let observations_loaded = obs.len();
        tracing::info!(count = observations_loaded, "loaded observations");

        let windows = windowize(obs, &self.cfg);
        let windows_count = windows.len();
        tracing::info!(count = windows_count, "windowized");

        let (stationary, mobile) = split_stationary(windows, &self.cfg);
        let stationary_windows = stationary.len();
        let mobile_windows = mobile.len();
        tracing::info!(
            stationary = stationary_windows,
            mobile = mobile_windows,
            "split stationary/mobile"
        );

        let static_aps = aggregate_static(stationary, &self.cfg);
        tracing::info!(count = static_aps.len(), "aggregated static APs");

        let mobile_points = decimate_mobile(mobile, &self.cfg);
        tracing::info!(count = mobile_points.len(), "decimated mobile tracks");

        self.store.replace_derived_tables(&static_aps, &mobile_points).await?;
        tracing::info!("classification complete");

        Ok(RunReport {
            observations_loaded,
            windows: windows_count,
            stationary_windows,
            mobile_windows,
            static_aps: static_aps.len(),
            mobile_track_points: mobile_points.len(),
        })
    }
}
