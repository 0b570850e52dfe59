//! # wf-core
//!
//! The Wi-Fi forensics classification engine: windowing, the diameter test,
//! RSSI-weighted Weiszfeld geometric median, and speed-gated mobile
//! decimation. Stages are pure functions; `pipeline::PipelineRunner` is the
//! async driver that wires them to an `ObservationStore`/`ArtifactSink` pair.

pub mod aggregator;
pub mod decimator;
pub mod error;
pub mod geo;
pub mod loader;
pub mod pipeline;
pub mod splitter;
pub mod windowizer;

pub use error::{ClassifyError, StoreError};
pub use loader::normalize_observations;
pub use pipeline::{ArtifactSink, ObservationStore, PipelineRunner, RunReport};

#[cfg(test)]
mod integration_tests {
    use std::sync::{Arc, Mutex};

    use wf_types::{ClassifierConfig, MobileTrackPoint, Observation, StaticAp};

    use crate::error::StoreError;
    use crate::{ArtifactSink, ObservationStore, PipelineRunner};

    struct FixtureStore {
        observations: Vec<Observation>,
        static_aps: Mutex<Vec<StaticAp>>,
        mobile_points: Mutex<Vec<MobileTrackPoint>>,
    }

    #[async_trait::async_trait]
    impl ObservationStore for FixtureStore {
        async fn load_observations(&self) -> Result<Vec<Observation>, StoreError> {
            Ok(self.observations.clone())
        }
    }

    #[async_trait::async_trait]
    impl ArtifactSink for FixtureStore {
        async fn replace_derived_tables(
            &self,
            static_aps: &[StaticAp],
            mobile_track: &[MobileTrackPoint],
        ) -> Result<(), StoreError> {
            *self.static_aps.lock().unwrap() = static_aps.to_vec();
            *self.mobile_points.lock().unwrap() = mobile_track.to_vec();
            Ok(())
        }
    }

    fn obs(mac: &str, ts: i64, lat: f64, lon: f64, rssi: f64) -> Observation {
        Observation { mac: mac.parse().unwrap(), ts, lat, lon, rssi }
    }

    #[tokio::test]
    async fn a_tight_cluster_of_repeated_sightings_becomes_one_static_ap() {
        let store = Arc::new(FixtureStore {
            observations: vec![
                obs("AA:AA:AA:AA:AA:AA", 0, 40.0, -73.0, -50.0),
                obs("AA:AA:AA:AA:AA:AA", 10, 40.0001, -73.0001, -55.0),
                obs("AA:AA:AA:AA:AA:AA", 20, 40.0002, -73.0, -52.0),
            ],
            static_aps: Mutex::new(Vec::new()),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store.clone(), ClassifierConfig::default());
        let report = runner.run_once().await.unwrap();

        assert_eq!(report.static_aps, 1);
        assert_eq!(report.mobile_track_points, 0);
        assert_eq!(store.static_aps.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn a_steadily_moving_track_becomes_a_decimated_mobile_track() {
        let mac = "BB:BB:BB:BB:BB:BB";
        let mut observations = Vec::new();
        for i in 0..10 {
            observations.push(obs(mac, i * 60, 40.0 + i as f64 * 0.01, -73.0, -60.0));
        }
        let store = Arc::new(FixtureStore {
            observations,
            static_aps: Mutex::new(Vec::new()),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store.clone(), ClassifierConfig::default());
        let report = runner.run_once().await.unwrap();

        assert_eq!(report.static_aps, 0);
        assert!(report.mobile_track_points >= 2);
    }

    #[tokio::test]
    async fn a_silent_gap_splits_one_macs_history_into_two_independent_windows() {
        let cfg = ClassifierConfig::default();
        let mac = "CC:CC:CC:CC:CC:CC";
        let observations = vec![
            obs(mac, 0, 40.0, -73.0, -50.0),
            obs(mac, cfg.t_max_gap * 3, 40.5, -73.5, -50.0),
        ];
        let store = Arc::new(FixtureStore {
            observations,
            static_aps: Mutex::new(Vec::new()),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store, cfg);
        let report = runner.run_once().await.unwrap();

        assert_eq!(report.windows, 2);
        // Each window has exactly one point, so neither aggregates nor decimates.
        assert_eq!(report.static_aps, 0);
        assert_eq!(report.mobile_track_points, 0);
    }

    #[tokio::test]
    async fn an_empty_store_produces_an_empty_run_without_error() {
        let store = Arc::new(FixtureStore {
            observations: Vec::new(),
            static_aps: Mutex::new(Vec::new()),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store, ClassifierConfig::default());
        let report = runner.run_once().await.unwrap();
        assert_eq!(report.observations_loaded, 0);
        assert_eq!(report.static_aps, 0);
        assert_eq!(report.mobile_track_points, 0);
    }

    #[tokio::test]
    async fn multiple_macs_are_independently_classified_in_one_run() {
        let cfg = ClassifierConfig::default();
        let mut observations = vec![
            obs("AA:AA:AA:AA:AA:AA", 0, 40.0, -73.0, -50.0),
            obs("AA:AA:AA:AA:AA:AA", 5, 40.00001, -73.00001, -50.0),
        ];
        for i in 0..10 {
            observations.push(obs(
                "DD:DD:DD:DD:DD:DD",
                i * 60,
                40.0 + i as f64 * 0.01,
                -73.0,
                -60.0,
            ));
        }
        let store = Arc::new(FixtureStore {
            observations,
            static_aps: Mutex::new(Vec::new()),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store, cfg);
        let report = runner.run_once().await.unwrap();
        assert_eq!(report.static_aps, 1);
        assert!(report.mobile_track_points >= 2);
    }

    #[tokio::test]
    async fn a_run_rebuilds_both_derived_tables_wholesale_each_time() {
        let store = Arc::new(FixtureStore {
            observations: vec![obs("AA:AA:AA:AA:AA:AA", 0, 40.0, -73.0, -50.0)],
            static_aps: Mutex::new(vec![StaticAp {
                mac: "FF:FF:FF:FF:FF:FF".parse().unwrap(),
                lat_mean: 1.0,
                lon_mean: 1.0,
                loc_error_m: 0.0,
                first_seen: 0,
                last_seen: 0,
                n_obs: 1,
            }]),
            mobile_points: Mutex::new(Vec::new()),
        });
        let runner = PipelineRunner::new(store.clone(), ClassifierConfig::default());
        runner.run_once().await.unwrap();

        let rows = store.static_aps.lock().unwrap();
        assert!(rows.iter().all(|r| r.mac != "FF:FF:FF:FF:FF:FF".parse().unwrap()));
    }
}
